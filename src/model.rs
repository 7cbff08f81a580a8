//! Wire types for the task backend and the rules derived from them.
//!
//! All types serialize as camelCase JSON to match the REST API.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A skill that tasks can require and developers can have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Unique skill identifier.
    pub skill_id: u32,
    /// Display name.
    pub skill_name: String,
}

/// A workflow status a task can be in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Unique status identifier.
    pub status_id: u32,
    /// Display name.
    pub status_name: String,
}

/// A developer that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    /// Unique developer identifier.
    pub developer_id: String,
    /// Display name.
    pub developer_name: String,
    /// Skills this developer has, when the backend reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
}

/// A task as returned by `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// Skills required to work on the task.
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Current status, if one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Assigned developer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<Developer>,
    /// Nested subtasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Task>>,
}

/// Body of `POST /tasks`. Subtasks use the same shape without a parent id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    /// Trimmed title.
    pub title: String,
    /// Required skill ids; omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<u32>>,
    /// Nested subtasks; omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<CreateTaskPayload>>,
    /// Parent task to attach the new task to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
}

/// Returns the developers whose skills cover every skill the task requires.
///
/// A task without required skills can be assigned to anyone.
#[must_use]
pub fn assignable_developers<'a>(developers: &'a [Developer], required: &[Skill]) -> Vec<&'a Developer> {
    let required: HashSet<u32> = required.iter().map(|skill| skill.skill_id).collect();
    if required.is_empty() {
        return developers.iter().collect();
    }

    developers
        .iter()
        .filter(|developer| {
            let owned: HashSet<u32> = developer
                .skills
                .iter()
                .flatten()
                .map(|skill| skill.skill_id)
                .collect();
            required.is_subset(&owned)
        })
        .collect()
}

/// Finds a task by id anywhere in the tree, depth first.
#[must_use]
pub fn find_task<'a>(tasks: &'a [Task], task_id: &str) -> Option<&'a Task> {
    let mut stack: Vec<&Task> = tasks.iter().rev().collect();
    while let Some(task) = stack.pop() {
        if task.task_id == task_id {
            return Some(task);
        }
        if let Some(subtasks) = &task.subtasks {
            stack.extend(subtasks.iter().rev());
        }
    }
    None
}

/// Applies `update` to the task with the given id. Returns whether it was found.
pub fn update_task(tasks: &mut [Task], task_id: &str, update: impl FnOnce(&mut Task)) -> bool {
    let mut stack: Vec<&mut Task> = tasks.iter_mut().collect();
    while let Some(task) = stack.pop() {
        if task.task_id == task_id {
            update(task);
            return true;
        }
        if let Some(subtasks) = task.subtasks.as_mut() {
            stack.extend(subtasks.iter_mut());
        }
    }
    false
}
