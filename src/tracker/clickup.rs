//! ClickUp HTTP client — implements [`TrackerApi`] against the v2 REST API.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};

use crate::error::TrackerError;

use super::api::{CreatedTask, NewTask, TrackerApi};

/// ClickUp v2 API client.
pub struct ClickUpClient {
    base_url: String,
    token: SecretString,
    client: reqwest::Client,
}

impl ClickUpClient {
    pub fn new(base_url: String, token: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Map a non-success response into a [`TrackerError::Api`].
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, TrackerError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TrackerError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl TrackerApi for ClickUpClient {
    async fn create_task(&self, list_id: &str, task: &NewTask) -> Result<CreatedTask, TrackerError> {
        let resp = self
            .client
            .post(self.api_url(&format!("list/{list_id}/task")))
            .header(AUTHORIZATION, self.token.expose_secret())
            .json(task)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;

        let created: CreatedTask = resp
            .json()
            .await
            .map_err(|e| TrackerError::InvalidResponse(format!("create-task body: {e}")))?;
        if created.id.is_empty() {
            return Err(TrackerError::InvalidResponse(
                "create-task response had an empty id".into(),
            ));
        }
        Ok(created)
    }

    async fn update_description(
        &self,
        task_id: &str,
        description: &str,
    ) -> Result<(), TrackerError> {
        let resp = self
            .client
            .put(self.api_url(&format!("task/{task_id}")))
            .header(AUTHORIZATION, self.token.expose_secret())
            .json(&serde_json::json!({ "description": description }))
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn add_assignee(&self, task_id: &str, assignee_id: &str) -> Result<(), TrackerError> {
        let resp = self
            .client
            .put(self.api_url(&format!("task/{task_id}")))
            .header(AUTHORIZATION, self.token.expose_secret())
            .json(&serde_json::json!({ "assignees": { "add": [assignee_id] } }))
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn upload_attachment(
        &self,
        task_id: &str,
        file_name: &str,
        source_url: &str,
    ) -> Result<(), TrackerError> {
        // Fetch the file from the platform CDN, then re-upload as form data.
        let file_resp = self.client.get(source_url).send().await?;
        let file_resp = Self::check_status(file_resp).await?;
        let bytes = file_resp.bytes().await?;

        let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("attachment", part);

        let resp = self
            .client
            .post(self.api_url(&format!("task/{task_id}/attachment")))
            .header(AUTHORIZATION, self.token.expose_secret())
            .multipart(form)
            .send()
            .await?;
        Self::check_status(resp).await?;

        tracing::debug!(task_id, file_name, "Attachment uploaded");
        Ok(())
    }
}
