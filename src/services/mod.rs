//! Typed wrappers around the backend's REST resources.
//!
//! Each service owns a handle to the shared [`HttpTransport`] and knows one
//! resource's paths and payloads. Services do no caching; see
//! [`crate::query`] for that.

pub mod developers;
pub mod skills;
pub mod statuses;
pub mod tasks;

use std::sync::Arc;

pub use developers::DeveloperService;
pub use skills::SkillService;
pub use statuses::StatusService;
pub use tasks::TaskService;

use crate::ports::HttpTransport;

/// All resource services over one transport.
#[derive(Clone)]
pub struct Services {
    /// `/tasks`
    pub tasks: TaskService,
    /// `/statuses`
    pub statuses: StatusService,
    /// `/developers`
    pub developers: DeveloperService,
    /// `/skills`
    pub skills: SkillService,
}

impl Services {
    /// Builds every service over the same transport.
    #[must_use]
    pub fn new(http: &Arc<dyn HttpTransport>) -> Self {
        Self {
            tasks: TaskService::new(Arc::clone(http)),
            statuses: StatusService::new(Arc::clone(http)),
            developers: DeveloperService::new(Arc::clone(http)),
            skills: SkillService::new(Arc::clone(http)),
        }
    }
}
