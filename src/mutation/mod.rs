//! Optimistic edits of a single task field.
//!
//! Both managers follow the same discipline:
//!
//! 1. The new selection is applied locally and patched into the cached task
//!    list before the write is sent.
//! 2. A failed write restores the previous selection and the cached list,
//!    and publishes an error message.
//! 3. Once the write settles, the task list is invalidated so the next read
//!    reconciles with the server.
//!
//! Each manager tracks one in-flight task id. Starting a change on another
//! task while one is pending replaces the id; settling only clears it when it
//! still names the settling task.

pub mod assignee;
pub mod status;

use std::collections::HashMap;

use tracing::warn;

pub use assignee::{PendingAssigneeChange, TaskAssigneeManager, UNASSIGNED};
pub use status::{PendingStatusChange, TaskStatusManager, STATUS_NOT_AVAILABLE};

use crate::error::normalize_error;
use crate::http::HttpError;
use crate::model::{update_task, Task};
use crate::query::{QueryCache, QueryKey};

/// Local selections, pending key and last error for one manager.
#[derive(Debug, Default)]
pub(crate) struct Selections {
    values: HashMap<String, String>,
    pending_task_id: Option<String>,
    error: Option<String>,
}

impl Selections {
    /// Rebuilds the mapping from confirmed task values.
    pub(crate) fn reset(&mut self, tasks: &[Task], confirmed: impl Fn(&Task) -> String) {
        self.values = tasks.iter().map(|task| (task.task_id.clone(), confirmed(task))).collect();
    }

    pub(crate) fn get(&self, task_id: &str) -> Option<&str> {
        self.values.get(task_id).map(String::as_str)
    }

    pub(crate) fn select(&mut self, task_id: &str, value: impl Into<String>) {
        self.values.insert(task_id.to_string(), value.into());
    }

    /// Clears the last error and marks `task_id` in flight.
    pub(crate) fn start(&mut self, task_id: &str) {
        self.error = None;
        self.pending_task_id = Some(task_id.to_string());
    }

    /// Publishes an error without touching the in-flight key.
    pub(crate) fn report(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Applies the outcome of a write for `task_id`.
    pub(crate) fn settle(
        &mut self,
        task_id: &str,
        previous: &str,
        result: Result<(), HttpError>,
        fallback: &str,
    ) -> Result<(), String> {
        if self.pending_task_id.as_deref() == Some(task_id) {
            self.pending_task_id = None;
        }
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                let message = normalize_error(&err, fallback);
                warn!(task_id, error = %message, "rolling back optimistic change");
                self.select(task_id, previous);
                self.report(message.clone());
                Err(message)
            }
        }
    }

    pub(crate) fn pending_task_id(&self) -> Option<&str> {
        self.pending_task_id.as_deref()
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Patches one task in the cached list, returning the list as it was.
///
/// Returns `None` when nothing is cached, in which case there is nothing to
/// roll back either.
pub(crate) fn patch_cached_task(
    cache: &QueryCache,
    task_id: &str,
    update: impl FnOnce(&mut Task),
) -> Option<Vec<Task>> {
    let previous: Vec<Task> = cache.get(QueryKey::Tasks)?;
    let mut patched = previous.clone();
    if update_task(&mut patched, task_id, update) {
        cache.set(QueryKey::Tasks, &patched);
    }
    Some(previous)
}

/// Restores the cached list on failure and invalidates it either way.
pub(crate) fn settle_cache(cache: &QueryCache, snapshot: Option<Vec<Task>>, failed: bool) {
    if failed {
        if let Some(previous) = snapshot {
            cache.set(QueryKey::Tasks, &previous);
        }
    }
    cache.invalidate(QueryKey::Tasks);
}
