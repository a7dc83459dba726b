//! Metrics and ranking defaults.

use serde::{Deserialize, Serialize};

/// Radar ceiling used when a caller does not pass one.
const fn default_full_mark() -> f64 {
    150.0
}

const fn default_top_n() -> u32 {
    5
}

const fn default_recent_limit() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_full_mark")]
    pub full_mark: f64,

    /// Size of the "high citations" list on the dashboard.
    #[serde(default = "default_top_n")]
    pub top_n: u32,

    /// Size of the "recent submissions" list on the dashboard.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            full_mark: default_full_mark(),
            top_n: default_top_n(),
            recent_limit: default_recent_limit(),
        }
    }
}
