//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path panic if called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the HTTP port cassette file.
    pub http: Option<PathBuf>,
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the HTTP port.
    pub http: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where every port is unconfigured.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Load one cassette file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        Ok(CassetteReplayer::new(&Cassette::load(path)?))
    }

    /// Load all configured per-port cassette files.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            http: self.http.as_deref().map(Self::load_port_cassette).transpose()?,
            clock: self.clock.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn loads_only_configured_ports() {
        let dir = std::env::temp_dir().join(format!("taskboard_cassette_config_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let http_path = dir.join("http.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&http_path, "http", "");
        recorder.record(
            "http",
            "send",
            json!({"method": "GET", "path": "/skills"}),
            json!({"Ok": {"status": 200, "data": [{"skillId": 1, "skillName": "Rust"}]}}),
        );
        recorder.finish().unwrap();

        let config = CassetteConfig { http: Some(http_path), ..CassetteConfig::default() };
        let mut replayers = config.load_all().unwrap();

        let http = replayers.http.as_mut().unwrap();
        let interaction = http.next_interaction("http", "send");
        assert_eq!(interaction.output["Ok"]["status"], 200);
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_error() {
        let config = CassetteConfig {
            clock: Some(PathBuf::from("/nonexistent/clock.cassette.yaml")),
            ..CassetteConfig::default()
        };
        assert!(config.load_all().is_err());
    }

    #[test]
    fn nothing_configured_loads_nothing() {
        let replayers = CassetteConfig::panic_on_unspecified().load_all().unwrap();
        assert!(replayers.http.is_none());
        assert!(replayers.clock.is_none());
    }
}
