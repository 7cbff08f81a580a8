//! Core library entry for the `taskboard` CLI.
//!
//! A thin client over a REST task backend: cached reads, optimistic status
//! and assignee edits, and a recursive create-task form. External
//! boundaries (HTTP and the clock) are ports with live, recording and
//! replaying adapters.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod form;
pub mod http;
pub mod model;
pub mod mutation;
pub mod ports;
pub mod query;
pub mod services;
pub mod view;

#[cfg(test)]
mod test_support;

use clap::Parser;

use crate::config::AppConfig;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    let config = AppConfig::from_env();
    commands::dispatch(&cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::run;

    #[tokio::test]
    async fn run_errors_on_unknown_subcommand() {
        let result = run(["taskboard", "unknown"]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn run_errors_on_missing_arguments() {
        let err = run(["taskboard", "set-status", "t-1"]).await.unwrap_err();
        assert!(err.contains("STATUS_ID"));
    }
}
