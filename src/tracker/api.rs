//! Task-tracker API surface consumed by the submission pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
}

/// A created task, identified by a string id.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTask {
    pub id: String,
}

/// Black-box task-tracking service.
///
/// Implemented over HTTP by [`ClickUpClient`](super::ClickUpClient) and by
/// in-memory mocks in tests.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Create a task in the given list.
    async fn create_task(&self, list_id: &str, task: &NewTask) -> Result<CreatedTask, TrackerError>;

    /// Replace a task's description.
    async fn update_description(&self, task_id: &str, description: &str)
    -> Result<(), TrackerError>;

    /// Add a default assignee to a task.
    async fn add_assignee(&self, task_id: &str, assignee_id: &str) -> Result<(), TrackerError>;

    /// Fetch a file from `source_url` and upload it to the task as binary
    /// form data under `file_name`.
    async fn upload_attachment(
        &self,
        task_id: &str,
        file_name: &str,
        source_url: &str,
    ) -> Result<(), TrackerError>;
}
