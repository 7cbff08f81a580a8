//! `taskboard set-status` command.

use std::sync::Arc;

use super::{loaded_tasks, query_client, require_task};
use crate::context::ServiceContext;
use crate::model::find_task;
use crate::mutation::TaskStatusManager;
use crate::services::TaskService;

/// Execute the `set-status` command.
///
/// Applies the change through the optimistic status manager, then reloads
/// the task list and reports the status the server now holds.
///
/// # Errors
///
/// Returns an error string if tasks cannot be loaded, the task does not
/// exist, the status is unknown, or the write fails.
pub async fn execute(ctx: &ServiceContext, task_id: &str, status_id: &str) -> Result<String, String> {
    let client = query_client(ctx);
    let tasks = loaded_tasks(client.tasks().await)?;
    let task = require_task(&tasks, task_id)?;

    let statuses = client.statuses().await;
    if let (Some(error), true) = (&statuses.error, statuses.data.is_empty()) {
        return Err(error.clone());
    }

    let service = TaskService::new(Arc::clone(&ctx.http));
    let mut manager = TaskStatusManager::new(service, Arc::clone(client.cache()), &tasks, statuses.data);
    manager.on_change(&task, status_id).await;
    if let Some(error) = manager.error() {
        return Err(error.to_string());
    }

    let reloaded = loaded_tasks(client.tasks().await)?;
    manager.sync_tasks(&reloaded);
    let current = find_task(&reloaded, task_id).unwrap_or(&task);
    let name = current.status.as_ref().map_or("none", |status| status.status_name.as_str());
    Ok(format!("{} [{}]\n  Status: {name}", current.title, current.task_id))
}
