//! Optimistic status changes.

use std::sync::Arc;

use super::{patch_cached_task, settle_cache, Selections};
use crate::http::HttpError;
use crate::model::{Status, Task};
use crate::query::QueryCache;
use crate::services::TaskService;

/// Published when the selected value does not match a known status.
pub const STATUS_NOT_AVAILABLE: &str = "Selected status is not available.";

const STATUS_UPDATE_FAILED: &str = "Failed to update task status.";

fn confirmed_status(task: &Task) -> String {
    task.status.as_ref().map(|status| status.status_id.to_string()).unwrap_or_default()
}

/// A status write that has been applied locally but not yet confirmed.
#[derive(Debug)]
#[must_use = "a pending change must be settled"]
pub struct PendingStatusChange {
    /// Task being changed.
    pub task_id: String,
    /// Status being written.
    pub status: Status,
    previous: String,
    snapshot: Option<Vec<Task>>,
}

/// Holds per-task status selections and drives optimistic writes.
///
/// Values are status ids rendered as strings, the way a select control
/// reports them; `""` means no status.
pub struct TaskStatusManager {
    service: TaskService,
    cache: Arc<QueryCache>,
    statuses: Vec<Status>,
    selections: Selections,
}

impl TaskStatusManager {
    /// Creates a manager seeded from `tasks`.
    #[must_use]
    pub fn new(service: TaskService, cache: Arc<QueryCache>, tasks: &[Task], statuses: Vec<Status>) -> Self {
        let mut manager = Self { service, cache, statuses, selections: Selections::default() };
        manager.sync_tasks(tasks);
        manager
    }

    /// Re-seeds local selections from a freshly loaded task list.
    pub fn sync_tasks(&mut self, tasks: &[Task]) {
        self.selections.reset(tasks, confirmed_status);
    }

    /// Replaces the list of valid statuses.
    pub fn set_statuses(&mut self, statuses: Vec<Status>) {
        self.statuses = statuses;
    }

    /// Displayed status id for `task`.
    #[must_use]
    pub fn value_for(&self, task: &Task) -> String {
        self.selections
            .get(&task.task_id)
            .map_or_else(|| confirmed_status(task), str::to_string)
    }

    /// Task whose write is in flight.
    #[must_use]
    pub fn pending_task_id(&self) -> Option<&str> {
        self.selections.pending_task_id()
    }

    /// Whether any write is in flight.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.pending_task_id().is_some()
    }

    /// Last published error.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.selections.error()
    }

    /// Applies a selection locally and returns the write to perform, if any.
    ///
    /// Returns `None` when the value is unchanged, is the placeholder, or
    /// does not name a known status (which publishes
    /// [`STATUS_NOT_AVAILABLE`]).
    pub fn begin_change(&mut self, task: &Task, raw: &str) -> Option<PendingStatusChange> {
        let previous = self.value_for(task);
        if raw == previous {
            return None;
        }

        if raw.is_empty() {
            self.selections.select(&task.task_id, previous);
            return None;
        }

        let Some(status) = self.statuses.iter().find(|status| status.status_id.to_string() == raw).cloned()
        else {
            self.selections.select(&task.task_id, previous);
            self.selections.report(STATUS_NOT_AVAILABLE);
            return None;
        };

        self.selections.start(&task.task_id);
        self.selections.select(&task.task_id, raw);
        let applied = status.clone();
        let snapshot = patch_cached_task(&self.cache, &task.task_id, |cached| cached.status = Some(applied));

        Some(PendingStatusChange { task_id: task.task_id.clone(), status, previous, snapshot })
    }

    /// Applies the outcome of a write started by [`begin_change`](Self::begin_change).
    ///
    /// # Errors
    ///
    /// Returns the published message when the write failed.
    pub fn settle(&mut self, change: PendingStatusChange, result: Result<(), HttpError>) -> Result<(), String> {
        settle_cache(&self.cache, change.snapshot, result.is_err());
        self.selections.settle(&change.task_id, &change.previous, result, STATUS_UPDATE_FAILED)
    }

    /// Handles a selection end to end: local update, write, settle.
    pub async fn on_change(&mut self, task: &Task, raw: &str) {
        let Some(change) = self.begin_change(task, raw) else {
            return;
        };
        let result = self.service.update_task_status(&change.task_id, change.status.status_id).await;
        let _ = self.settle(change, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Clock;
    use crate::query::QueryKey;
    use crate::test_support::{no_content, server_error, status, task, Backend};
    use serde_json::json;

    fn open_task() -> Task {
        Task { status: Some(status(1, "Open")), ..task("t-1", "Write docs") }
    }

    fn manager(backend: &Backend, tasks: &[Task]) -> TaskStatusManager {
        let cache = Arc::new(QueryCache::new(Arc::clone(&backend.clock) as Arc<dyn Clock>));
        cache.set(QueryKey::Tasks, &tasks.to_vec());
        TaskStatusManager::new(
            TaskService::new(backend.ctx.http.clone()),
            cache,
            tasks,
            vec![status(1, "Open"), status(2, "In progress")],
        )
    }

    #[test]
    fn initial_value_is_server_status_or_empty() {
        let backend = Backend::new(vec![]);
        let bare = task("t-2", "No status");
        let manager = manager(&backend, &[open_task(), bare.clone()]);
        assert_eq!(manager.value_for(&open_task()), "1");
        assert_eq!(manager.value_for(&bare), "");
        // Tasks the manager was never told about fall back to their own status.
        let unseen = Task { status: Some(status(2, "In progress")), ..task("t-9", "Late") };
        assert_eq!(manager.value_for(&unseen), "2");
    }

    #[test]
    fn unknown_status_never_writes() {
        let backend = Backend::new(vec![]);
        let mut manager = manager(&backend, &[open_task()]);

        assert!(manager.begin_change(&open_task(), "42").is_none());
        assert_eq!(manager.value_for(&open_task()), "1");
        assert_eq!(manager.error(), Some(STATUS_NOT_AVAILABLE));
        assert!(backend.requests().is_empty());
    }

    #[test]
    fn same_value_and_placeholder_are_no_ops() {
        let backend = Backend::new(vec![]);
        let mut manager = manager(&backend, &[open_task()]);
        assert!(manager.begin_change(&open_task(), "1").is_none());
        assert!(manager.begin_change(&open_task(), "").is_none());
        assert_eq!(manager.value_for(&open_task()), "1");
        assert!(manager.error().is_none());
    }

    #[tokio::test]
    async fn success_shows_new_value_immediately_and_keeps_it() {
        let backend = Backend::new(vec![no_content()]);
        let mut manager = manager(&backend, &[open_task()]);

        let change = manager.begin_change(&open_task(), "2").unwrap();
        assert_eq!(manager.value_for(&open_task()), "2");
        assert_eq!(manager.pending_task_id(), Some("t-1"));
        assert!(manager.is_updating());

        let cached: Vec<Task> = manager.cache.get(QueryKey::Tasks).unwrap();
        assert_eq!(cached[0].status.as_ref().unwrap().status_id, 2);

        let result = manager.service.update_task_status("t-1", change.status.status_id).await;
        assert!(manager.settle(change, result).is_ok());
        assert_eq!(manager.value_for(&open_task()), "2");
        assert!(!manager.is_updating());
        assert!(manager.error().is_none());
        assert_eq!(
            backend.requests()[0],
            json!({"method": "PATCH", "path": "/tasks/t-1/status", "body": {"statusId": 2}})
        );
    }

    #[tokio::test]
    async fn failure_reverts_with_error_message() {
        let backend = Backend::new(vec![server_error()]);
        let mut manager = manager(&backend, &[open_task()]);

        manager.on_change(&open_task(), "2").await;

        assert_eq!(manager.value_for(&open_task()), "1");
        assert_eq!(manager.error(), Some("500 Internal Server Error"));
        assert!(manager.pending_task_id().is_none());
        let cached: Vec<Task> = manager.cache.get(QueryKey::Tasks).unwrap();
        assert_eq!(cached[0].status.as_ref().unwrap().status_id, 1);
        assert!(!manager.cache.is_fresh(QueryKey::Tasks));
    }

    #[test]
    fn transport_failure_is_returned_and_published() {
        let backend = Backend::new(vec![]);
        let mut manager = manager(&backend, &[open_task()]);
        let change = manager.begin_change(&open_task(), "2").unwrap();
        let err = HttpError::Transport { message: "connection reset".into() };

        let message = manager.settle(change, Err(err)).unwrap_err();
        assert_eq!(message, "request failed: connection reset");
        assert_eq!(manager.error(), Some(message.as_str()));
    }

    #[test]
    fn settling_an_older_change_keeps_newer_pending_id() {
        let backend = Backend::new(vec![]);
        let other = Task { status: Some(status(1, "Open")), ..task("t-2", "Other") };
        let mut manager = manager(&backend, &[open_task(), other.clone()]);

        let first = manager.begin_change(&open_task(), "2").unwrap();
        let second = manager.begin_change(&other, "2").unwrap();
        assert_eq!(manager.pending_task_id(), Some("t-2"));

        manager.settle(first, Ok(())).unwrap();
        assert_eq!(manager.pending_task_id(), Some("t-2"));
        manager.settle(second, Ok(())).unwrap();
        assert!(!manager.is_updating());
    }

    #[tokio::test]
    async fn new_change_clears_previous_error() {
        let backend = Backend::new(vec![no_content()]);
        let mut manager = manager(&backend, &[open_task()]);
        let _ = manager.begin_change(&open_task(), "99");
        assert!(manager.error().is_some());

        manager.on_change(&open_task(), "2").await;
        assert!(manager.error().is_none());
    }

    #[test]
    fn sync_tasks_reseeds_from_server_values() {
        let backend = Backend::new(vec![]);
        let mut manager = manager(&backend, &[open_task()]);
        let _pending = manager.begin_change(&open_task(), "2");
        let reloaded = Task { status: Some(status(2, "In progress")), ..open_task() };
        manager.sync_tasks(&[reloaded.clone()]);
        assert_eq!(manager.value_for(&reloaded), "2");
    }
}
