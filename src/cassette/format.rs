//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`"http"` or `"clock"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Backend base URL the interactions were recorded against.
    #[serde(default)]
    pub base_url: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a cassette YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_round_trip_keeps_http_exchanges() {
        let cassette = Cassette {
            name: "list-tasks".into(),
            recorded_at: Utc::now(),
            base_url: "http://localhost:3000".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "http".into(),
                method: "send".into(),
                input: json!({"method": "GET", "path": "/tasks"}),
                output: json!({"Ok": {"status": 200, "data": []}}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        let back: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(cassette, back);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(std::path::Path::new("/nonexistent/taskboard.cassette.yaml"))
            .unwrap_err();
        assert!(err.contains("Failed to read cassette file"));
    }
}
