//! # tasklist-sync
//!
//! Client-side state for a to-do list backed by a remote task service.
//!
//! This library provides:
//! - `TaskListStore`: an in-memory, ordered mirror of the server's tasks with
//!   derived views (active, completed, counts)
//! - Mutations (create, toggle, update, delete, bulk toggle, bulk clear) that
//!   are synchronized with the server and reported to the user
//! - An HTTP implementation of the task service over `reqwest`
//!
//! ## Architecture
//!
//! ```text
//!   UI ──▶ TaskListStore ──▶ RemoteTaskService ──▶ GET/POST/PUT/DELETE /tasks
//!               │
//!               └──────────▶ Notifier (toasts, log, channel)
//! ```
//!
//! ## Modules
//! - `task`: task records, create and update bodies
//! - `remote`: service trait, response envelopes, HTTP client
//! - `notify`: user-facing notifications
//! - `store`: the synchronized task list
//! - `settings`: client configuration
//! - `logging`: tracing subscriber setup

pub mod logging;
pub mod notify;
pub mod remote;
pub mod settings;
pub mod store;
pub mod task;

pub use notify::{ChannelNotifier, LogNotifier, Notification, Notifier, Position, Severity};
pub use remote::{HttpTaskService, RemoteError, RemoteTaskService};
pub use settings::{ClientSettings, SettingsError};
pub use store::{SharedTaskListStore, TaskListStore};
pub use task::{NewTask, Task, TaskId, TaskPatch, TaskUpdate};
