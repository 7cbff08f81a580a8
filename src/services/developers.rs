//! `/developers` resource.

use std::sync::Arc;

use crate::http::{HttpError, HttpRequest};
use crate::model::Developer;
use crate::ports::HttpTransport;

const DEVELOPERS_ENDPOINT: &str = "/developers";

/// Reads developers, optionally pre-filtered by skill on the server.
#[derive(Clone)]
pub struct DeveloperService {
    http: Arc<dyn HttpTransport>,
}

impl DeveloperService {
    /// Creates the service over a transport.
    #[must_use]
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// `GET /developers[?skill=1,2]`. The `skill` parameter is only sent
    /// when `skill_ids` is non-empty.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode errors.
    pub async fn get_developers(&self, skill_ids: &[u32]) -> Result<Vec<Developer>, HttpError> {
        let mut request = HttpRequest::get(DEVELOPERS_ENDPOINT);
        if !skill_ids.is_empty() {
            let joined = skill_ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
            request = request.with_param("skill", joined);
        }
        let response = self.http.send(request).await?;
        Ok(response.json()?.unwrap_or_default())
    }
}
