//! Runtime configuration resolved from the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Deployment environment, selecting the default backend URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development backend.
    Development,
    /// User acceptance testing.
    Uat,
    /// Production.
    Production,
}

impl Environment {
    /// Parses a mode string. Anything unrecognized is development.
    #[must_use]
    pub fn from_mode(mode: &str) -> Self {
        match mode.trim().to_lowercase().as_str() {
            "uat" => Self::Uat,
            "production" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Backend URL used when no explicit override is set.
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost:3000",
            Self::Uat | Self::Production => "https://example.com",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Uat => "uat",
            Self::Production => "production",
        };
        f.write_str(name)
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Active environment.
    pub env: Environment,
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    /// Minimum number of non-whitespace title characters.
    pub min_title_length: usize,
    /// Directory to record cassettes into (`TASKBOARD_RECORD`).
    pub record_dir: Option<PathBuf>,
    /// Cassette to replay instead of the live backend (`TASKBOARD_REPLAY`).
    pub replay_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = lookup("TASKBOARD_MODE")
            .map_or(Environment::Development, |mode| Environment::from_mode(&mode));

        let base_url = lookup("TASKBOARD_BASE_URL")
            .map(|url| strip_trailing_slash(&url).to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| env.default_base_url().to_string());

        let min_title_length = lookup("TASKBOARD_MIN_TITLE_LENGTH")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(1);

        Self {
            env,
            base_url,
            min_title_length,
            record_dir: lookup("TASKBOARD_RECORD").filter(|v| !v.is_empty()).map(PathBuf::from),
            replay_path: lookup("TASKBOARD_REPLAY").filter(|v| !v.is_empty()).map(PathBuf::from),
        }
    }
}

fn strip_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}
