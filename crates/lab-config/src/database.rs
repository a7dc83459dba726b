//! libSQL database location and busy-retry tuning.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".labdesk/labdesk.db".to_string()
}

const fn default_busy_retries() -> u32 {
    4
}

const fn default_busy_base_delay_ms() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the database file, or `":memory:"`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Attempts (including the first) when the database reports it is busy.
    #[serde(default = "default_busy_retries")]
    pub busy_retries: u32,

    /// Initial backoff between busy retries, doubled on each attempt.
    #[serde(default = "default_busy_base_delay_ms")]
    pub busy_base_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_retries: default_busy_retries(),
            busy_base_delay_ms: default_busy_base_delay_ms(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
