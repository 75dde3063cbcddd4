//! Agent configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tedgo_sdk::NodeTimeouts;

/// Settings for one interactive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Node base URL (e.g., "http://localhost:8080")
    pub node_url: String,
    /// Append-only interaction log
    pub history_file: PathBuf,
    /// JSON array of operations waiting to be resent
    pub pending_file: PathBuf,
    pub timeouts: NodeTimeouts,
    /// Pause between consecutive resubmissions
    pub retry_pause_ms: u64,
    /// Lines shown by `hist`
    pub history_display: usize,
    /// Lines shown at startup
    pub history_startup: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            node_url: "http://localhost:8080".to_owned(),
            history_file: PathBuf::from("tedgo_history.txt"),
            pending_file: PathBuf::from("tedgo_pending_tx.json"),
            timeouts: NodeTimeouts::default(),
            retry_pause_ms: 500,
            history_display: 30,
            history_startup: 5,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            node_url: lookup("TEDGO_NODE_URL").unwrap_or(defaults.node_url),
            history_file: lookup("TEDGO_HISTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_file),
            pending_file: lookup("TEDGO_PENDING_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.pending_file),
            timeouts: NodeTimeouts {
                fetch_ms: number("TEDGO_FETCH_TIMEOUT_MS", defaults.timeouts.fetch_ms),
                submit_ms: number("TEDGO_SUBMIT_TIMEOUT_MS", defaults.timeouts.submit_ms),
            },
            retry_pause_ms: number("TEDGO_RETRY_PAUSE_MS", defaults.retry_pause_ms),
            history_display: number("TEDGO_HISTORY_DISPLAY", defaults.history_display as u64)
                as usize,
            history_startup: number("TEDGO_HISTORY_STARTUP", defaults.history_startup as u64)
                as usize,
        }
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_lookup_gives_defaults() {
        assert_eq!(AgentConfig::from_lookup(|_| None), AgentConfig::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TEDGO_NODE_URL", "http://node:9000"),
            ("TEDGO_PENDING_FILE", "/tmp/p.json"),
            ("TEDGO_SUBMIT_TIMEOUT_MS", "12000"),
            ("TEDGO_RETRY_PAUSE_MS", " 0 "),
            ("TEDGO_HISTORY_DISPLAY", "10"),
        ]
        .into_iter()
        .collect();

        let config = AgentConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.node_url, "http://node:9000");
        assert_eq!(config.pending_file, PathBuf::from("/tmp/p.json"));
        assert_eq!(config.timeouts.submit_ms, 12_000);
        assert_eq!(config.timeouts.fetch_ms, 6_000);
        assert_eq!(config.retry_pause(), Duration::ZERO);
        assert_eq!(config.history_display, 10);
        assert_eq!(config.history_startup, 5);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = AgentConfig::from_lookup(|k| {
            (k == "TEDGO_FETCH_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert_eq!(config.timeouts.fetch_ms, 6_000);
    }
}
