//! Remote task service boundary.
//!
//! The store only talks to the server through [`RemoteTaskService`], with
//! [`HttpTaskService`] as the production implementation. Every response the
//! server sends is wrapped in an envelope carrying a `success` flag; a missing
//! or false flag is treated exactly like a transport failure.

mod error;
mod http;

pub use error::{RemoteError, RemoteErrorKind, RemoteResult};
pub use http::HttpTaskService;

use async_trait::async_trait;
use serde::Deserialize;

use crate::task::{NewTask, Task, TaskId, TaskPatch, TaskUpdate};

/// Trait for task persistence backends.
#[async_trait]
pub trait RemoteTaskService: Send + Sync {
    /// Fetch every task, in server order.
    async fn list(&self) -> RemoteResult<Vec<Task>>;

    /// Create a task and return it with its server-assigned identifier.
    async fn create(&self, draft: &NewTask) -> RemoteResult<Task>;

    /// Apply a partial update and return the fields the server reports back.
    async fn update(&self, id: &TaskId, updates: &TaskUpdate) -> RemoteResult<TaskPatch>;

    /// Delete a task.
    async fn remove(&self, id: &TaskId) -> RemoteResult<()>;
}

/// `GET /tasks` response body.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

/// `POST /tasks` and `PUT /tasks/{id}` response body.
#[derive(Debug, Deserialize)]
pub struct TaskEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub task: Option<T>,
}

/// `DELETE /tasks/{id}` response body.
#[derive(Debug, Deserialize)]
pub struct AckEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
}

fn ensure_success(success: Option<bool>) -> RemoteResult<()> {
    match success {
        Some(true) => Ok(()),
        _ => Err(RemoteError::Unsuccessful),
    }
}

impl ListEnvelope {
    /// A successful envelope without a `tasks` field is an empty list.
    pub fn into_tasks(self) -> RemoteResult<Vec<Task>> {
        ensure_success(self.success)?;
        Ok(self.tasks.unwrap_or_default())
    }
}

impl TaskEnvelope<Task> {
    pub fn into_task(self) -> RemoteResult<Task> {
        ensure_success(self.success)?;
        self.task
            .ok_or_else(|| RemoteError::Malformed("No task returned".to_string()))
    }
}

impl TaskEnvelope<TaskPatch> {
    /// A successful envelope without a `task` field changes nothing locally.
    pub fn into_patch(self) -> RemoteResult<TaskPatch> {
        ensure_success(self.success)?;
        Ok(self.task.unwrap_or_default())
    }
}

impl AckEnvelope {
    pub fn into_ack(self) -> RemoteResult<()> {
        ensure_success(self.success)
    }
}
