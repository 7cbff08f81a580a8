//! `/skills` resource.

use std::sync::Arc;

use crate::http::{HttpError, HttpRequest};
use crate::model::Skill;
use crate::ports::HttpTransport;

const SKILLS_ENDPOINT: &str = "/skills";

/// Reads the skill reference list.
#[derive(Clone)]
pub struct SkillService {
    http: Arc<dyn HttpTransport>,
}

impl SkillService {
    /// Creates the service over a transport.
    #[must_use]
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// `GET /skills`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decode errors.
    pub async fn get_skills(&self) -> Result<Vec<Skill>, HttpError> {
        let response = self.http.send(HttpRequest::get(SKILLS_ENDPOINT)).await?;
        Ok(response.json()?.unwrap_or_default())
    }
}
