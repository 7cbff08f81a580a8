//! The task list panel.

use super::row::{RowContext, TaskRowView};
use crate::error::normalize_error;
use crate::model::Task;
use crate::query::Query;

/// Heading shown above the list.
pub const PANEL_TITLE: &str = "Task List";

/// What the panel body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// The task list is loading.
    Loading,
    /// The task list failed to load.
    Error(String),
    /// Loaded, but there are no tasks.
    Empty,
    /// One entry per task.
    Rows(Vec<TaskRowView>),
}

/// Picks the panel body for a task read.
#[must_use]
pub fn panel_content(tasks: &Query<Task>, ctx: &RowContext<'_>) -> PanelContent {
    if tasks.is_loading {
        return PanelContent::Loading;
    }
    if let Some(error) = &tasks.error {
        return PanelContent::Error(normalize_error(error, "Unknown error"));
    }
    if tasks.data.is_empty() {
        return PanelContent::Empty;
    }
    PanelContent::Rows(tasks.data.iter().map(|task| TaskRowView::build(task, ctx)).collect())
}

/// Renders the whole panel, including any mutation error banners.
#[must_use]
pub fn render_panel(tasks: &Query<Task>, ctx: &RowContext<'_>) -> String {
    let mut out = vec![PANEL_TITLE.to_string(), "=".repeat(PANEL_TITLE.len())];

    for error in [ctx.status.error(), ctx.assignee.error()].into_iter().flatten() {
        out.push(format!("! {error}"));
    }

    match panel_content(tasks, ctx) {
        PanelContent::Loading => out.push("Loading tasks...".into()),
        PanelContent::Error(message) => out.push(format!("Unable to load tasks: {message}")),
        PanelContent::Empty => {
            out.push("No tasks yet".into());
            out.push("Create your first task to start tracking progress and assignments.".into());
        }
        PanelContent::Rows(rows) => {
            for row in rows {
                out.push(String::new());
                out.push(row.render());
            }
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{TaskAssigneeManager, TaskStatusManager};
    use crate::query::QueryCache;
    use crate::services::TaskService;
    use crate::test_support::{task, Backend};
    use std::sync::Arc;

    fn render(tasks: &Query<Task>) -> String {
        let backend = Backend::new(vec![]);
        let cache = Arc::new(QueryCache::new(backend.ctx.clock.clone()));
        let service = TaskService::new(backend.ctx.http.clone());
        let status = TaskStatusManager::new(service.clone(), Arc::clone(&cache), &tasks.data, Vec::new());
        let assignee = TaskAssigneeManager::new(service, cache, &tasks.data, Vec::new());
        let ctx = RowContext {
            statuses: &[],
            developers: &[],
            statuses_loading: false,
            developers_loading: false,
            status: &status,
            assignee: &assignee,
        };
        render_panel(tasks, &ctx)
    }

    #[test]
    fn loading_wins_over_everything() {
        assert!(render(&Query::loading()).contains("Loading tasks..."));
    }

    #[test]
    fn error_state_names_the_failure() {
        let out = render(&Query::failed(Vec::new(), "500 Internal Server Error"));
        assert!(out.contains("Unable to load tasks: 500 Internal Server Error"));
    }

    #[test]
    fn empty_state() {
        assert!(render(&Query::ready(Vec::new())).contains("No tasks yet"));
    }

    #[test]
    fn rows_are_listed_in_order() {
        let out = render(&Query::ready(vec![task("t-1", "First"), task("t-2", "Second")]));
        let first = out.find("First").unwrap();
        let second = out.find("Second").unwrap();
        assert!(first < second);
        assert!(out.starts_with("Task List\n========="));
    }
}
