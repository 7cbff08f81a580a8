//! Optimistic developer assignment.

use std::sync::Arc;

use super::{patch_cached_task, settle_cache, Selections};
use crate::http::HttpError;
use crate::model::{Developer, Task};
use crate::query::QueryCache;
use crate::services::TaskService;

/// Selection value that removes the assigned developer.
pub const UNASSIGNED: &str = "unassigned";

const ASSIGNEE_UPDATE_FAILED: &str = "Failed to update assignee.";

fn confirmed_assignee(task: &Task) -> String {
    task.developer
        .as_ref()
        .map_or_else(|| UNASSIGNED.to_string(), |developer| developer.developer_id.clone())
}

/// An assignment applied locally but not yet confirmed.
#[derive(Debug)]
#[must_use = "a pending change must be settled"]
pub struct PendingAssigneeChange {
    /// Task being changed.
    pub task_id: String,
    /// Developer id being written, or [`UNASSIGNED`].
    pub developer_id: String,
    previous: String,
    snapshot: Option<Vec<Task>>,
}

impl PendingAssigneeChange {
    /// Whether this change removes the developer.
    #[must_use]
    pub fn is_unassign(&self) -> bool {
        self.developer_id == UNASSIGNED
    }
}

/// Holds per-task assignee selections and drives optimistic writes.
pub struct TaskAssigneeManager {
    service: TaskService,
    cache: Arc<QueryCache>,
    developers: Vec<Developer>,
    selections: Selections,
}

impl TaskAssigneeManager {
    /// Creates a manager seeded from `tasks`.
    #[must_use]
    pub fn new(service: TaskService, cache: Arc<QueryCache>, tasks: &[Task], developers: Vec<Developer>) -> Self {
        let mut manager = Self { service, cache, developers, selections: Selections::default() };
        manager.sync_tasks(tasks);
        manager
    }

    /// Re-seeds local selections from a freshly loaded task list.
    pub fn sync_tasks(&mut self, tasks: &[Task]) {
        self.selections.reset(tasks, confirmed_assignee);
    }

    /// Replaces the developer list used to fill in cached tasks.
    pub fn set_developers(&mut self, developers: Vec<Developer>) {
        self.developers = developers;
    }

    /// Displayed developer id for `task`, or [`UNASSIGNED`].
    #[must_use]
    pub fn value_for(&self, task: &Task) -> String {
        self.selections
            .get(&task.task_id)
            .map_or_else(|| confirmed_assignee(task), str::to_string)
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
    pub fn begin_change(&mut self, task: &Task, raw: &str) -> Option<PendingAssigneeChange> {
        let previous = self.value_for(task);
        if raw == previous {
            return None;
        }

        if raw.is_empty() {
            self.selections.select(&task.task_id, previous);
            return None;
        }

        self.selections.start(&task.task_id);
        self.selections.select(&task.task_id, raw);

        let developer = (raw != UNASSIGNED).then(|| self.developer_record(raw));
        let snapshot = patch_cached_task(&self.cache, &task.task_id, |cached| cached.developer = developer);

        Some(PendingAssigneeChange {
            task_id: task.task_id.clone(),
            developer_id: raw.to_string(),
            previous,
            snapshot,
        })
    }

    /// Applies the outcome of a write started by [`begin_change`](Self::begin_change).
    ///
    /// # Errors
    ///
    /// Returns the published message when the write failed.
    pub fn settle(&mut self, change: PendingAssigneeChange, result: Result<(), HttpError>) -> Result<(), String> {
        settle_cache(&self.cache, change.snapshot, result.is_err());
        self.selections.settle(&change.task_id, &change.previous, result, ASSIGNEE_UPDATE_FAILED)
    }

    /// Handles a selection end to end.
    pub async fn on_change(&mut self, task: &Task, raw: &str) {
        let Some(change) = self.begin_change(task, raw) else {
            return;
        };
        let result = if change.is_unassign() {
            self.service.unassign_task_developer(&change.task_id).await
        } else {
            self.service.update_task_developer(&change.task_id, &change.developer_id).await
        };
        let _ = self.settle(change, result);
    }

    fn developer_record(&self, developer_id: &str) -> Developer {
        self.developers
            .iter()
            .find(|developer| developer.developer_id == developer_id)
            .cloned()
            .unwrap_or_else(|| Developer {
                developer_id: developer_id.to_string(),
                developer_name: developer_id.to_string(),
                skills: None,
            })
    }
}
