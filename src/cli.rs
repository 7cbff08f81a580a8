//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `taskboard`.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Browse, edit and create tasks on a task board backend")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every task with its status and assignee.
    List,
    /// Change a task's status.
    SetStatus {
        /// Task to update.
        task_id: String,
        /// Status id to set.
        status_id: String,
    },
    /// Assign a developer to a task, or `unassigned` to clear it.
    Assign {
        /// Task to update.
        task_id: String,
        /// Developer id, or `unassigned`.
        developer_id: String,
    },
    /// Create a task, optionally with nested subtasks.
    Create {
        /// Title of a single task.
        #[arg(long, required_unless_present = "from", conflicts_with = "from")]
        title: Option<String>,
        /// Required skill id (repeatable).
        #[arg(long = "skill", value_name = "SKILL_ID", conflicts_with = "from")]
        skills: Vec<u32>,
        /// YAML or JSON file describing the task tree.
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
    },
    /// List task statuses.
    Statuses,
    /// List skills.
    Skills,
    /// List developers, optionally only those with the given skills.
    Developers {
        /// Skill id to require (repeatable).
        #[arg(long = "skill", value_name = "SKILL_ID")]
        skills: Vec<u32>,
    },
}
