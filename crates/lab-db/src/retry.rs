//! Busy/locked retry logic.
//!
//! A second process writing the same database file makes BEGIN fail with
//! `SQLITE_BUSY` ("database is locked"). Those errors clear once the other
//! writer commits, so they are retried with capped exponential backoff.
//! Everything else (constraint violations, bad SQL) fails immediately.

use std::time::Duration;

use lab_config::DatabaseConfig;

/// Configuration for retry behavior on busy/locked errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Build from the `[database]` config section.
    #[must_use]
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_attempts: config.busy_retries.max(1),
            base_delay: Duration::from_millis(config.busy_base_delay_ms),
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Detect transient lock contention.
///
/// The predicate is intentionally narrow to avoid retrying genuine
/// SQL or constraint errors.
pub fn is_transient_busy_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked") || msg.contains("database is busy") || msg.contains("SQLITE_BUSY")
}
