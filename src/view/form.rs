//! Text rendering of the create-task form.

use super::controls::SkillPill;
use crate::form::{TaskForm, MAX_SUBTASK_DEPTH};
use crate::model::Skill;
use crate::query::Query;

/// Pills for every known skill, marking the ones chosen at `selected`.
#[must_use]
pub fn skill_pills(available: &[Skill], selected: &[u32], disabled: bool) -> Vec<SkillPill> {
    available
        .iter()
        .map(|skill| SkillPill {
            label: skill.skill_name.clone(),
            selected: selected.contains(&skill.skill_id),
            disabled,
        })
        .collect()
}

/// Renders every form section, indented by depth, followed by the
/// submission footer.
#[must_use]
pub fn render_form(form: &TaskForm, skills: &Query<Skill>) -> String {
    let disabled = form.is_submitting();
    let mut out = vec!["Create Task".to_string()];

    for (path, id) in form.tree().walk() {
        let indent = "  ".repeat(path.depth());
        let node = form.tree().node(id);
        let heading = if path.is_root() { "Task".to_string() } else { format!("Subtask {path}") };
        out.push(format!("{indent}{heading}"));
        out.push(format!("{indent}  Title: {}", node.title));

        let meta = form.meta(&path).ok();
        if let Some(meta) = meta {
            if meta.touched && !meta.is_valid() {
                out.push(format!("{indent}  ! {}", meta.errors().join(", ")));
            }
            if meta.validating {
                out.push(format!("{indent}  Validating..."));
            }
        }

        out.push(format!("{indent}  Skills:"));
        if skills.is_loading {
            out.push(format!("{indent}    Loading skills..."));
        } else if let Some(error) = &skills.error {
            out.push(format!("{indent}    ! {error}"));
        } else if skills.data.is_empty() {
            out.push(format!("{indent}    No skills available right now."));
        }
        for pill in skill_pills(&skills.data, &node.skills, disabled) {
            out.push(format!("{indent}    {pill}"));
        }

        if path.depth() >= MAX_SUBTASK_DEPTH {
            out.push(format!("{indent}  Maximum depth of {MAX_SUBTASK_DEPTH} reached."));
        }
    }

    out.push(footer(form));
    out.join("\n")
}

fn footer(form: &TaskForm) -> String {
    if form.is_submitting() {
        return "Submitting...".to_string();
    }
    if let Some(error) = form.submission_error() {
        return format!("! {error}");
    }
    if form.is_success() {
        return "Task created successfully.".to_string();
    }
    if form.can_submit() {
        "Ready to create task.".to_string()
    } else {
        "Create task (disabled)".to_string()
    }
}
