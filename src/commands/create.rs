//! `taskboard create` command.

use std::path::PathBuf;
use std::sync::Arc;

use super::query_client;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::form::{FormError, NodePath, TaskForm, TaskFormValues, TitleRules};
use crate::model::Skill;
use crate::services::TaskService;
use crate::view::render_form;

/// Where the new task's fields come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single task from `--title` and `--skill` flags.
    Flags {
        /// Task title.
        title: String,
        /// Required skill ids.
        skills: Vec<u32>,
    },
    /// A YAML or JSON document describing a task tree.
    File(PathBuf),
}

impl Source {
    fn values(&self) -> Result<TaskFormValues, String> {
        match self {
            Self::Flags { title, skills } => {
                Ok(TaskFormValues { title: title.clone(), skills: skills.clone(), subtasks: Vec::new() })
            }
            Self::File(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
                serde_yaml::from_str(&content).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
            }
        }
    }
}

/// Execute the `create` command.
///
/// Fills the form the same way a user would, waits for async validation,
/// and submits the whole tree as one request.
///
/// # Errors
///
/// Returns an error string if the input cannot be read, a skill id is
/// unknown, validation fails, or the backend rejects the task.
pub async fn execute(ctx: &ServiceContext, config: &AppConfig, source: &Source) -> Result<String, String> {
    let values = source.values()?;
    let client = query_client(ctx);
    let skills = client.skills().await;
    if skills.error.is_none() {
        check_skills(&values, &skills.data)?;
    }

    let mut form = TaskForm::new(TitleRules::standard(config.min_title_length));
    form.seed(&values).map_err(|e| e.to_string())?;

    let service = TaskService::new(Arc::clone(&ctx.http));
    match form.submit(&service).await {
        Ok(created) => {
            let mut out = render_form(&form, &skills);
            if let Some(task) = created {
                out.push_str(&format!("\nCreated task {}", task.task_id));
            }
            Ok(out)
        }
        Err(FormError::Invalid) => Err(validation_report(&form)),
        Err(err) => Err(err.to_string()),
    }
}

/// Rejects skill ids the backend does not know.
fn check_skills(values: &TaskFormValues, known: &[Skill]) -> Result<(), String> {
    let mut stack = vec![values];
    while let Some(node) = stack.pop() {
        if let Some(unknown) = node.skills.iter().find(|id| !known.iter().any(|skill| skill.skill_id == **id)) {
            return Err(format!("Unknown skill id: {unknown}"));
        }
        stack.extend(&node.subtasks);
    }
    Ok(())
}

fn validation_report(form: &TaskForm) -> String {
    let mut lines = vec!["Task is not valid:".to_string()];
    for (path, _) in form.tree().walk() {
        let errors = form.field_errors(&path).unwrap_or_default();
        if !errors.is_empty() {
            lines.push(format!("  {}: {}", describe(&path), errors.join(", ")));
        }
    }
    lines.join("\n")
}

fn describe(path: &NodePath) -> String {
    if path.is_root() {
        "title".to_string()
    } else {
        format!("{path}.title")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ok, server_error, Backend};
    use serde_json::json;

    fn config(min_title_length: usize) -> AppConfig {
        AppConfig { min_title_length, ..AppConfig::from_lookup(|_| None) }
    }

    fn skills() -> serde_json::Value {
        ok(json!([{"skillId": 1, "skillName": "Rust"}, {"skillId": 2, "skillName": "SQL"}]))
    }

    #[tokio::test(start_paused = true)]
    async fn creates_task_from_flags() {
        let backend = Backend::new(vec![skills(), ok(json!({"taskId": "t-9", "title": "Ship", "skills": []}))]);
        let source = Source::Flags { title: " Ship ".into(), skills: vec![2] };

        let out = execute(&backend.ctx, &config(1), &source).await.unwrap();
        assert!(out.contains("Task created successfully."));
        assert!(out.ends_with("Created task t-9"));
        assert_eq!(backend.requests()[1]["body"], json!({"title": "Ship", "skills": [2]}));
    }

    #[tokio::test(start_paused = true)]
    async fn creates_nested_tree_from_file() {
        let dir = std::env::temp_dir().join(format!("taskboard_create_from_file_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("task.yaml");
        std::fs::write(&path, "title: A\nsubtasks:\n  - title: B\n    skills: [1]\n").unwrap();

        let backend = Backend::new(vec![skills(), ok(json!(null))]);
        execute(&backend.ctx, &config(1), &Source::File(path)).await.unwrap();
        assert_eq!(
            backend.requests()[1]["body"],
            json!({"title": "A", "subtasks": [{"title": "B", "skills": [1]}]})
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test(start_paused = true)]
    async fn short_title_is_reported_per_field() {
        let backend = Backend::new(vec![skills()]);
        let source = Source::Flags { title: "Tiny".into(), skills: vec![] };
        let err = execute(&backend.ctx, &config(10), &source).await.unwrap_err();
        assert_eq!(err, "Task is not valid:\n  title: Must include at least 10 characters");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn async_rule_blocks_submission() {
        let backend = Backend::new(vec![skills()]);
        let source = Source::Flags { title: "an error".into(), skills: vec![] };
        let err = execute(&backend.ctx, &config(1), &source).await.unwrap_err();
        assert!(err.contains(r#"No "error" allowed in task title"#));
    }

    #[tokio::test]
    async fn unknown_skill_is_rejected() {
        let backend = Backend::new(vec![skills()]);
        let source = Source::Flags { title: "Ship".into(), skills: vec![5] };
        let err = execute(&backend.ctx, &config(1), &source).await.unwrap_err();
        assert_eq!(err, "Unknown skill id: 5");
    }

    #[tokio::test(start_paused = true)]
    async fn backend_failure_is_returned() {
        let backend = Backend::new(vec![skills(), server_error()]);
        let source = Source::Flags { title: "Ship".into(), skills: vec![] };
        let err = execute(&backend.ctx, &config(1), &source).await.unwrap_err();
        assert_eq!(err, "500 Internal Server Error");
    }
}
