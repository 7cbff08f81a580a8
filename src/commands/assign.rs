//! `taskboard assign` command.

use std::sync::Arc;

use super::{loaded_tasks, query_client, require_task};
use crate::context::ServiceContext;
use crate::model::{assignable_developers, find_task};
use crate::mutation::{TaskAssigneeManager, UNASSIGNED};
use crate::services::TaskService;
use crate::view::assignee_options;

/// Execute the `assign` command.
///
/// Only developers whose skills cover the task's required skills (or the
/// task's current developer, or `unassigned`) may be chosen.
///
/// # Errors
///
/// Returns an error string if tasks cannot be loaded, the task does not
/// exist, the developer does not qualify, or the write fails.
pub async fn execute(ctx: &ServiceContext, task_id: &str, developer_id: &str) -> Result<String, String> {
    let client = query_client(ctx);
    let tasks = loaded_tasks(client.tasks().await)?;
    let task = require_task(&tasks, task_id)?;

    let developers = client.developers().await;
    if developer_id != UNASSIGNED {
        if let (Some(error), true) = (&developers.error, developers.data.is_empty()) {
            return Err(error.clone());
        }
        let qualified = assignable_developers(&developers.data, &task.skills);
        let offered = assignee_options(&qualified, task.developer.as_ref());
        if !offered.iter().any(|option| option.value == developer_id) {
            return Err(format!("Developer not available for this task: {developer_id}"));
        }
    }

    let service = TaskService::new(Arc::clone(&ctx.http));
    let mut manager = TaskAssigneeManager::new(service, Arc::clone(client.cache()), &tasks, developers.data);
    manager.on_change(&task, developer_id).await;
    if let Some(error) = manager.error() {
        return Err(error.to_string());
    }

    let reloaded = loaded_tasks(client.tasks().await)?;
    manager.sync_tasks(&reloaded);
    let current = find_task(&reloaded, task_id).unwrap_or(&task);
    let name = current.developer.as_ref().map_or("Unassigned", |developer| developer.developer_name.as_str());
    Ok(format!("{} [{}]\n  Assignee: {name}", current.title, current.task_id))
}
