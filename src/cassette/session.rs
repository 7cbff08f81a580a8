//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Owns one recorder per port for the duration of a command.
///
/// Cassettes are written to a timestamped directory below the chosen root,
/// one `<port>.cassette.yaml` file per port.
pub struct RecordingSession {
    /// Recorder for HTTP interactions.
    pub http: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock interactions.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates `<root>/<timestamp>/` and a recorder for each port.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path, base_url: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"), base_url)))
        };

        Ok(Self { http: make_recorder("http"), clock: make_recorder("clock"), output_dir })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every port's cassette and returns the output directory.
    ///
    /// All adapters holding a recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.http, "http")?;
        finish_one(self.clock, "clock")?;

        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_cassette_per_port() {
        let root = std::env::temp_dir().join(format!("taskboard_session_test_{}", std::process::id()));
        let session = RecordingSession::new(&root, "http://localhost:3000").unwrap();
        assert!(session.output_dir().exists());

        let dir = session.finish().unwrap();
        assert!(dir.join("http.cassette.yaml").exists());
        assert!(dir.join("clock.cassette.yaml").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn finish_fails_while_a_recorder_is_shared() {
        let root = std::env::temp_dir().join(format!("taskboard_session_shared_test_{}", std::process::id()));
        let session = RecordingSession::new(&root, "").unwrap();
        let _held = Arc::clone(&session.http);

        let err = session.finish().unwrap_err();
        assert!(err.contains("still has references"));

        let _ = std::fs::remove_dir_all(&root);
    }
}
