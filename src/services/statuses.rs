//! `/statuses` resource.

use std::sync::Arc;

use crate::http::{HttpError, HttpRequest};
use crate::model::Status;
use crate::ports::HttpTransport;

const STATUSES_ENDPOINT: &str = "/statuses";

/// Reads the status reference list.
#[derive(Clone)]
pub struct StatusService {
    http: Arc<dyn HttpTransport>,
}

impl StatusService {
    /// Creates the service over a transport.
    #[must_use]
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// `GET /statuses`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode errors.
    pub async fn get_all_statuses(&self) -> Result<Vec<Status>, HttpError> {
        let response = self.http.send(HttpRequest::get(STATUSES_ENDPOINT)).await?;
        Ok(response.json()?.unwrap_or_default())
    }
}
