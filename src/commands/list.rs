//! `taskboard list` command.

use std::sync::Arc;

use crate::context::ServiceContext;
use crate::model::Task;
use crate::mutation::{TaskAssigneeManager, TaskStatusManager};
use crate::query::{Query, QueryClient, QueryKey};
use crate::services::TaskService;
use crate::view::{render_panel, RowContext};

/// Execute the `list` command.
///
/// Loads tasks together with statuses and developers and renders the task
/// panel. Read failures are shown inline rather than failing the command.
///
/// # Errors
///
/// Never fails today; the signature matches the other handlers.
pub async fn execute(ctx: &ServiceContext) -> Result<String, String> {
    let client = super::query_client(ctx);
    Ok(render(ctx, &client).await)
}

/// Loads everything the panel needs and renders it.
///
/// Reads run one after another so recorded cassettes replay in order.
async fn render(ctx: &ServiceContext, client: &QueryClient) -> String {
    let service = TaskService::new(Arc::clone(&ctx.http));
    let mut status = TaskStatusManager::new(service.clone(), client.cache().clone(), &[], Vec::new());
    let mut assignee = TaskAssigneeManager::new(service, client.cache().clone(), &[], Vec::new());

    if let Some(panel) = loading_panel(client, &status, &assignee) {
        eprintln!("{panel}");
    }

    let tasks = client.tasks().await;
    let statuses = client.statuses().await;
    let developers = client.developers().await;
    status.set_statuses(statuses.data.clone());
    status.sync_tasks(&tasks.data);
    assignee.set_developers(developers.data.clone());
    assignee.sync_tasks(&tasks.data);

    let row_ctx = RowContext {
        statuses: &statuses.data,
        developers: &developers.data,
        statuses_loading: statuses.is_loading,
        developers_loading: developers.is_loading,
        status: &status,
        assignee: &assignee,
    };
    let mut out = render_panel(&tasks, &row_ctx);
    for error in [statuses.error, developers.error].into_iter().flatten() {
        out.push_str(&format!("\n! {error}"));
    }
    out
}

/// The panel as it looks before the task list has been read, or `None`
/// when cached tasks can be shown right away.
fn loading_panel(
    client: &QueryClient,
    status: &TaskStatusManager,
    assignee: &TaskAssigneeManager,
) -> Option<String> {
    let pending: Query<Task> = client.peek(QueryKey::Tasks);
    if !pending.is_loading {
        return None;
    }
    let row_ctx = RowContext {
        statuses: &[],
        developers: &[],
        statuses_loading: true,
        developers_loading: true,
        status,
        assignee,
    };
    Some(render_panel(&pending, &row_ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::query_client;
    use crate::test_support::{ok, server_error, Backend};
    use serde_json::json;

    #[tokio::test]
    async fn lists_tasks_with_controls() {
        let backend = Backend::new(vec![
            ok(json!([{
                "taskId": "t-1",
                "title": "Write docs",
                "skills": [{"skillId": 1, "skillName": "Writing"}],
                "status": {"statusId": 1, "statusName": "Open"}
            }])),
            ok(json!([{"statusId": 1, "statusName": "Open"}])),
            ok(json!([{"developerId": "d-1", "developerName": "Ada", "skills": [{"skillId": 1, "skillName": "Writing"}]}])),
        ]);
        let out = execute(&backend.ctx).await.unwrap();
        assert!(out.contains("Write docs"));
        assert!(out.contains("Required skills: Writing"));
        assert!(out.contains("Status: Open"));
        assert!(out.contains("Assignee: Unassigned"));
    }

    #[tokio::test]
    async fn loading_panel_only_before_first_read() {
        let backend = Backend::new(vec![ok(json!([]))]);
        let client = query_client(&backend.ctx);
        let service = TaskService::new(backend.ctx.http.clone());
        let status = TaskStatusManager::new(service.clone(), client.cache().clone(), &[], Vec::new());
        let assignee = TaskAssigneeManager::new(service, client.cache().clone(), &[], Vec::new());

        let panel = loading_panel(&client, &status, &assignee).unwrap();
        assert_eq!(panel, "Task List\n=========\nLoading tasks...");

        client.tasks().await;
        assert!(loading_panel(&client, &status, &assignee).is_none());
    }

    #[tokio::test]
    async fn failed_task_read_is_shown_inline() {
        let backend = Backend::new(vec![server_error(), ok(json!([])), ok(json!([]))]);
        let out = execute(&backend.ctx).await.unwrap();
        assert!(out.contains("Unable to load tasks: 500 Internal Server Error"));
    }
}
