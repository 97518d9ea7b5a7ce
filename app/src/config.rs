//! Configuration for the application.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Simulated backend latency in milliseconds
    pub latency_ms: u64,
    /// Log filter directive, e.g. `info` or `accesstrack=debug`
    pub log_filter: String,
    /// AI assist configuration
    pub assist: AssistConfig,
}

/// Configuration of the best-effort assist collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistConfig {
    /// API key; assist is disabled when absent
    pub api_key: Option<String>,
    /// Override of the API base URL, if any
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration from process environment variables
    ///
    /// Recognized variables: `ACCESSTRACK_LATENCY_MS`, `ACCESSTRACK_LOG`,
    /// `ASSIST_API_KEY`, `ASSIST_API_URL`. Unset or unparseable values fall
    /// back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Exists so tests can inject variables without mutating the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let latency_ms = lookup("ACCESSTRACK_LATENCY_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);
        let log_filter = lookup("ACCESSTRACK_LOG").unwrap_or_else(|| "info".to_string());
        let assist = AssistConfig {
            api_key: lookup("ASSIST_API_KEY"),
            api_url: lookup("ASSIST_API_URL"),
        };

        Self {
            latency_ms,
            log_filter,
            assist,
        }
    }

    /// Simulated backend latency as a [`Duration`]
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
