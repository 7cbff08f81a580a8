//! `/tasks` resource.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::http::{HttpError, HttpRequest};
use crate::model::{CreateTaskPayload, Task};
use crate::ports::HttpTransport;

const TASKS_ENDPOINT: &str = "/tasks";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    status_id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeveloperBody<'a> {
    developer_id: &'a str,
}

/// Reads and writes tasks.
#[derive(Clone)]
pub struct TaskService {
    http: Arc<dyn HttpTransport>,
}

impl TaskService {
    /// Creates the service over a transport.
    #[must_use]
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// `GET /tasks`. A response without a body is an empty list.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode errors.
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, HttpError> {
        let response = self.http.send(HttpRequest::get(TASKS_ENDPOINT)).await?;
        Ok(response.json()?.unwrap_or_default())
    }

    /// `POST /tasks`. Returns the created task when the backend echoes it.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors.
    pub async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Option<Task>, HttpError> {
        let request = HttpRequest::post(TASKS_ENDPOINT).with_json(payload)?;
        let response = self.http.send(request).await?;
        let created = response.data.and_then(|data| serde_json::from_value::<Task>(data).ok());
        debug!(created = ?created.as_ref().map(|t| &t.task_id), "task created");
        Ok(created)
    }

    /// `PATCH /tasks/{id}/status`.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors.
    pub async fn update_task_status(&self, task_id: &str, status_id: u32) -> Result<(), HttpError> {
        let request = HttpRequest::patch(format!("{TASKS_ENDPOINT}/{task_id}/status"))
            .with_json(&StatusBody { status_id })?;
        self.http.send(request).await?;
        Ok(())
    }

    /// `PATCH /tasks/{id}/developer`.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors.
    pub async fn update_task_developer(&self, task_id: &str, developer_id: &str) -> Result<(), HttpError> {
        let request = HttpRequest::patch(format!("{TASKS_ENDPOINT}/{task_id}/developer"))
            .with_json(&DeveloperBody { developer_id })?;
        self.http.send(request).await?;
        Ok(())
    }

    /// `DELETE /tasks/{id}/developer`.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors.
    pub async fn unassign_task_developer(&self, task_id: &str) -> Result<(), HttpError> {
        self.http.send(HttpRequest::delete(format!("{TASKS_ENDPOINT}/{task_id}/developer"))).await?;
        Ok(())
    }
}
