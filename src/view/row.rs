//! One task in the list.

use super::controls::{SelectControl, SelectOption};
use crate::model::{assignable_developers, Developer, Skill, Status, Task};
use crate::mutation::{TaskAssigneeManager, TaskStatusManager, UNASSIGNED};

/// Comma-joined skill names, or `N/A` when there are none.
#[must_use]
pub fn format_skills(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "N/A".to_string();
    }
    skills.iter().map(|skill| skill.skill_name.as_str()).collect::<Vec<_>>().join(", ")
}

/// Status options: placeholder, the task's own status when the list lacks
/// it, then every known status.
#[must_use]
pub fn status_options(statuses: &[Status], current: Option<&Status>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption::new("", "Select status")];
    if let Some(current) = current {
        if !statuses.iter().any(|status| status.status_id == current.status_id) {
            options.push(SelectOption::new(current.status_id.to_string(), &current.status_name));
        }
    }
    options.extend(
        statuses.iter().map(|status| SelectOption::new(status.status_id.to_string(), &status.status_name)),
    );
    options
}

/// Assignee options: `Unassigned`, the task's own developer when the list
/// lacks it, then the given developers.
#[must_use]
pub fn assignee_options(developers: &[&Developer], current: Option<&Developer>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption::new(UNASSIGNED, "Unassigned")];
    if let Some(current) = current {
        if !developers.iter().any(|developer| developer.developer_id == current.developer_id) {
            options.push(SelectOption::new(&current.developer_id, &current.developer_name));
        }
    }
    options.extend(
        developers
            .iter()
            .map(|developer| SelectOption::new(&developer.developer_id, &developer.developer_name)),
    );
    options
}

/// Shared inputs for rendering rows.
pub struct RowContext<'a> {
    /// Known statuses.
    pub statuses: &'a [Status],
    /// Known developers.
    pub developers: &'a [Developer],
    /// Statuses are still loading.
    pub statuses_loading: bool,
    /// Developers are still loading.
    pub developers_loading: bool,
    /// Status selections.
    pub status: &'a TaskStatusManager,
    /// Assignee selections.
    pub assignee: &'a TaskAssigneeManager,
}

/// Render-ready state of one task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    /// Task id.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// Required skills, formatted.
    pub skills: String,
    /// Status drop-down.
    pub status: SelectControl,
    /// Assignee drop-down, limited to qualified developers.
    pub assignee: SelectControl,
    /// A write for this task is in flight.
    pub busy: bool,
}

impl TaskRowView {
    /// Derives the row for `task`.
    #[must_use]
    pub fn build(task: &Task, ctx: &RowContext<'_>) -> Self {
        let status_busy = ctx.status.pending_task_id() == Some(task.task_id.as_str());
        let assignee_busy = ctx.assignee.pending_task_id() == Some(task.task_id.as_str());
        let qualified = assignable_developers(ctx.developers, &task.skills);

        Self {
            task_id: task.task_id.clone(),
            title: task.title.clone(),
            skills: format_skills(&task.skills),
            status: SelectControl {
                label: "Status".into(),
                id: format!("status-{}", task.task_id),
                value: ctx.status.value_for(task),
                options: status_options(ctx.statuses, task.status.as_ref()),
                disabled: ctx.statuses.is_empty() || ctx.statuses_loading || status_busy,
            },
            assignee: SelectControl {
                label: "Assignee".into(),
                id: format!("assignee-{}", task.task_id),
                value: ctx.assignee.value_for(task),
                options: assignee_options(&qualified, task.developer.as_ref()),
                disabled: ctx.developers_loading || assignee_busy,
            },
            busy: status_busy || assignee_busy,
        }
    }

    /// Multi-line text rendering.
    #[must_use]
    pub fn render(&self) -> String {
        let marker = if self.busy { " [updating]" } else { "" };
        format!(
            "{}{marker}\n  Task ID: {}\n  Required skills: {}\n  {}\n  {}",
            self.title, self.task_id, self.skills, self.status, self.assignee
        )
    }
}
