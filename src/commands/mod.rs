//! Command dispatch and handlers.

pub mod assign;
pub mod create;
pub mod list;
pub mod reference;
pub mod set_status;

use std::sync::Arc;

use tracing::debug;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::model::{find_task, Task};
use crate::query::{Query, QueryCache, QueryClient};
use crate::services::Services;

/// Dispatch a parsed command to its handler.
///
/// `TASKBOARD_REPLAY` serves every port interaction from a cassette;
/// otherwise `TASKBOARD_RECORD` records live interactions to per-port
/// cassette files below that directory.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the selected
/// command handler fails.
pub async fn dispatch(command: &Command, config: &AppConfig) -> Result<(), String> {
    if let Some(path) = &config.replay_path {
        debug!(cassette = %path.display(), "replaying");
        let ctx = ServiceContext::replaying(path)?;
        return dispatch_with_context(command, &ctx, config).await;
    }

    let (ctx, session) = if let Some(dir) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording_at(dir, config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(config), None)
    };

    let result = dispatch_with_context(command, &ctx, config).await;

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context and print its output.
async fn dispatch_with_context(command: &Command, ctx: &ServiceContext, config: &AppConfig) -> Result<(), String> {
    let output = match command {
        Command::List => list::execute(ctx).await,
        Command::SetStatus { task_id, status_id } => set_status::execute(ctx, task_id, status_id).await,
        Command::Assign { task_id, developer_id } => assign::execute(ctx, task_id, developer_id).await,
        Command::Create { title, skills, from } => {
            let source = match (from, title) {
                (Some(path), _) => create::Source::File(path.clone()),
                (None, Some(title)) => create::Source::Flags { title: title.clone(), skills: skills.clone() },
                (None, None) => return Err("either --title or --from is required".to_string()),
            };
            create::execute(ctx, config, &source).await
        }
        Command::Statuses => reference::statuses(ctx).await,
        Command::Skills => reference::skills(ctx).await,
        Command::Developers { skills } => reference::developers(ctx, skills).await,
    }?;
    println!("{output}");
    Ok(())
}

/// A query client with a fresh cache over the context's ports.
pub(crate) fn query_client(ctx: &ServiceContext) -> QueryClient {
    let cache = Arc::new(QueryCache::new(Arc::clone(&ctx.clock)));
    QueryClient::new(cache, Services::new(&ctx.http))
}

/// Unwraps a task read, turning a failed load into a command error.
pub(crate) fn loaded_tasks(query: Query<Task>) -> Result<Vec<Task>, String> {
    match query.error {
        Some(error) => Err(format!("Unable to load tasks: {error}")),
        None => Ok(query.data),
    }
}

/// Finds `task_id` anywhere in the task tree.
pub(crate) fn require_task(tasks: &[Task], task_id: &str) -> Result<Task, String> {
    find_task(tasks, task_id).cloned().ok_or_else(|| format!("Task not found: {task_id}"))
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
