//! In-memory task list kept in sync with a remote task service.
//!
//! The store owns an ordered `Vec<Task>` mirroring the server. Every
//! mutation goes through the [`RemoteTaskService`]; the outcome is reported to
//! the user through a [`Notifier`] and to the caller as a plain value. No
//! operation returns an error:
//!
//! | operation          | on failure                                   |
//! |--------------------|----------------------------------------------|
//! | `fetch_all`        | local list untouched, returns empty          |
//! | `add`              | local list untouched, returns `None`         |
//! | `toggle`           | local `completed` flipped back, returns false|
//! | `update`           | local entry untouched, returns false         |
//! | `delete_one`       | local list untouched, returns false          |
//!
//! `toggle` is the only operation with a rollback. A caller that changed an
//! entry locally before calling `update` keeps that change on failure.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::notify::{Notification, Notifier, Position};
use crate::remote::{RemoteError, RemoteTaskService};
use crate::task::{NewTask, Task, TaskId, TaskUpdate};

/// Client-side mirror of the server's task list.
pub struct TaskListStore<S, N> {
    tasks: Vec<Task>,
    service: S,
    notifier: N,
    position: Position,
}

/// A store shared between several owners in the same session.
pub type SharedTaskListStore<S, N> = Arc<Mutex<TaskListStore<S, N>>>;

impl<S: RemoteTaskService, N: Notifier> TaskListStore<S, N> {
    /// Create an empty store. Call [`fetch_all`](Self::fetch_all) to populate it.
    pub fn new(service: S, notifier: N) -> Self {
        Self {
            tasks: Vec::new(),
            service,
            notifier,
            position: Position::default(),
        }
    }

    /// Display position hint attached to every notification.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Wrap the store for shared ownership across a session.
    pub fn into_shared(self) -> SharedTaskListStore<S, N> {
        Arc::new(Mutex::new(self))
    }

    /// The backing remote task service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The notifier receiving user-facing messages.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ==================== Views ====================

    pub fn all_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// False for an empty list.
    pub fn are_all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    fn index_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Set `completed` locally without contacting the server.
    ///
    /// This is the optimistic half of a toggle: a UI flips the entry here,
    /// then calls [`toggle`](Self::toggle) with the updated task.
    /// Returns false if no entry has this identifier.
    pub fn set_completed(&mut self, id: &TaskId, completed: bool) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.tasks[index].completed = completed;
                true
            }
            None => false,
        }
    }

    // ==================== Remote operations ====================

    /// Replace the local list with the server's.
    ///
    /// Returns the fetched tasks, or an empty list on failure (local state is
    /// then left as it was).
    pub async fn fetch_all(&mut self) -> Vec<Task> {
        match self.service.list().await {
            Ok(tasks) => {
                self.tasks = dedup_by_id(tasks);
                tracing::info!(count = self.tasks.len(), "Fetched tasks");
                self.tasks.clone()
            }
            Err(e) => {
                self.report_failure("Error fetching tasks", "Failed to fetch tasks", &e);
                Vec::new()
            }
        }
    }

    /// Create a task with an empty description.
    pub async fn add(&mut self, title: &str) -> Option<Task> {
        self.add_with_description(title, "").await
    }

    /// Create a task and append it to the end of the list.
    ///
    /// A title that is blank after trimming is rejected without a request.
    pub async fn add_with_description(&mut self, title: &str, description: &str) -> Option<Task> {
        let draft = NewTask::new(title, description)?;

        match self.service.create(&draft).await {
            Ok(task) => {
                match self.index_of(&task.id) {
                    Some(index) => {
                        tracing::warn!(id = %task.id, "Created task already present, replacing");
                        self.tasks[index] = task.clone();
                    }
                    None => self.tasks.push(task.clone()),
                }
                self.notify_success("Task added successfully");
                Some(task)
            }
            Err(e) => {
                self.report_failure("Error adding task", "Failed to add task", &e);
                None
            }
        }
    }

    /// Send `task.completed` to the server.
    ///
    /// The caller is expected to have already set the new value locally (see
    /// [`set_completed`](Self::set_completed)). On success the server's fields
    /// are merged into the local entry. On failure the local entry's
    /// `completed` flag is inverted again, undoing the optimistic change.
    pub async fn toggle(&mut self, task: &Task) -> bool {
        let updates = TaskUpdate::completed(task.completed);

        match self.service.update(&task.id, &updates).await {
            Ok(patch) => {
                if let Some(index) = self.index_of(&task.id) {
                    self.tasks[index].merge(patch);
                }
                true
            }
            Err(e) => {
                // Inverts the current value rather than restoring a saved one.
                if let Some(index) = self.index_of(&task.id) {
                    let entry = &mut self.tasks[index];
                    entry.completed = !entry.completed;
                }
                self.report_failure("Error updating task", "Failed to update task", &e);
                false
            }
        }
    }

    /// Send a partial update and merge the server's answer locally.
    ///
    /// An update carrying a blank title is rejected without a request.
    /// On failure the local entry is left as it is.
    pub async fn update(&mut self, task: &Task, updates: TaskUpdate) -> bool {
        if updates.has_blank_title() {
            return false;
        }

        match self.service.update(&task.id, &updates).await {
            Ok(patch) => {
                if let Some(index) = self.index_of(&task.id) {
                    self.tasks[index].merge(patch);
                }
                self.notify_success("Task updated successfully");
                true
            }
            Err(e) => {
                self.report_failure("Error updating task", "Failed to update task", &e);
                false
            }
        }
    }

    /// Rename a task.
    pub async fn update_title(&mut self, task: &Task, title: &str) -> bool {
        self.update(task, TaskUpdate::title(title.trim())).await
    }

    /// Delete a task on the server, then drop it locally.
    pub async fn delete_one(&mut self, task: &Task) -> bool {
        match self.service.remove(&task.id).await {
            Ok(()) => {
                if let Some(index) = self.index_of(&task.id) {
                    self.tasks.remove(index);
                }
                self.notify_success("Task deleted successfully");
                true
            }
            Err(e) => {
                self.report_failure("Error deleting task", "Failed to delete task", &e);
                false
            }
        }
    }

    /// Set every task's `completed` flag to `value`, one request at a time.
    ///
    /// Tasks already at `value` are skipped. Returns true only if every
    /// request succeeded; tasks whose request failed keep their old value.
    pub async fn toggle_all(&mut self, value: bool) -> bool {
        let pending: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.completed != value)
            .map(|t| t.id.clone())
            .collect();

        let mut all_successful = true;
        for id in pending {
            let Some(index) = self.index_of(&id) else {
                continue;
            };

            let original = self.tasks[index].completed;
            self.tasks[index].completed = value;
            let snapshot = self.tasks[index].clone();

            if !self.toggle(&snapshot).await {
                if let Some(index) = self.index_of(&id) {
                    self.tasks[index].completed = original;
                }
                all_successful = false;
            }
        }

        all_successful
    }

    /// Delete every task that is completed at call time, one request at a time.
    ///
    /// Returns true only if every deletion succeeded.
    pub async fn clear_completed(&mut self) -> bool {
        let completed: Vec<Task> = self.tasks.iter().filter(|t| t.completed).cloned().collect();

        let mut all_successful = true;
        for task in &completed {
            if !self.delete_one(task).await {
                all_successful = false;
            }
        }

        all_successful
    }

    // ==================== Reporting ====================

    fn notify_success(&self, message: &str) {
        self.notifier
            .notify(Notification::positive(message, self.position));
    }

    fn report_failure(&self, context: &str, message: &str, error: &RemoteError) {
        tracing::error!(kind = %error.kind(), "{}: {}", context, error);
        self.notifier
            .notify(Notification::negative(message, self.position));
    }
}

/// Keep the first occurrence of each identifier.
fn dedup_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut unique: Vec<Task> = Vec::with_capacity(tasks.len());
    for task in tasks {
        if unique.iter().any(|t| t.id == task.id) {
            tracing::warn!(id = %task.id, "Server returned duplicate task, ignoring");
            continue;
        }
        unique.push(task);
    }
    unique
}
