//! reqwest-backed task service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{
    AckEnvelope, ListEnvelope, RemoteError, RemoteResult, RemoteTaskService, TaskEnvelope,
};
use crate::settings::ClientSettings;
use crate::task::{NewTask, Task, TaskId, TaskPatch, TaskUpdate};

/// HTTP client for the `/tasks` REST resource.
pub struct HttpTaskService {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpTaskService {
    /// Create a client with no timeout and no authentication.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
        }
    }

    /// Build a client from loaded settings.
    ///
    /// A request timeout is only applied when one is configured.
    pub fn from_settings(settings: &ClientSettings) -> RemoteResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Check the status line and decode the JSON envelope.
    async fn read_envelope<T: DeserializeOwned>(resp: Response) -> RemoteResult<T> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            RemoteError::Malformed(format!("Failed to parse response: {}, body: {}", e, text))
        })
    }
}

#[async_trait]
impl RemoteTaskService for HttpTaskService {
    async fn list(&self) -> RemoteResult<Vec<Task>> {
        tracing::debug!(url = %self.tasks_url(), "Listing tasks");

        let resp = self.authorize(self.client.get(self.tasks_url())).send().await?;
        let envelope: ListEnvelope = Self::read_envelope(resp).await?;
        envelope.into_tasks()
    }

    async fn create(&self, draft: &NewTask) -> RemoteResult<Task> {
        tracing::debug!(title = %draft.title, "Creating task");

        let resp = self
            .authorize(self.client.post(self.tasks_url()))
            .json(draft)
            .send()
            .await?;
        let envelope: TaskEnvelope<Task> = Self::read_envelope(resp).await?;
        envelope.into_task()
    }

    async fn update(&self, id: &TaskId, updates: &TaskUpdate) -> RemoteResult<TaskPatch> {
        tracing::debug!(id = %id, "Updating task");

        let resp = self
            .authorize(self.client.put(self.task_url(id)))
            .json(updates)
            .send()
            .await?;
        let envelope: TaskEnvelope<TaskPatch> = Self::read_envelope(resp).await?;
        envelope.into_patch()
    }

    async fn remove(&self, id: &TaskId) -> RemoteResult<()> {
        tracing::debug!(id = %id, "Deleting task");

        let resp = self
            .authorize(self.client.delete(self.task_url(id)))
            .send()
            .await?;
        let envelope: AckEnvelope = Self::read_envelope(resp).await?;
        envelope.into_ack()
    }
}
