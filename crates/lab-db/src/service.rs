//! Service layer orchestrating repository calls, audit, and notification.
//!
//! `LabService` wraps `LabDb` (raw database access), the notification
//! collaborator, and the metrics defaults. All repo methods are implemented
//! as `impl LabService` blocks under `repos/`.

use std::sync::Arc;

use lab_config::{LabConfig, MetricsConfig};

use crate::LabDb;
use crate::error::DatabaseError;
use crate::notify::{Notifier, TracingNotifier};
use crate::retry::RetryConfig;

/// Orchestrates database mutations with audit trail and notification.
///
/// Every mutation method follows this protocol:
/// 1. Begin transaction
/// 2. Check existence, ownership, and state
/// 3. Execute SQL
/// 4. Append audit entry (inside transaction)
/// 5. Commit transaction
/// 6. Dispatch notifications (decisions only, never rolled back)
pub struct LabService {
    db: LabDb,
    notifier: Arc<dyn Notifier>,
    metrics: MetricsConfig,
}

impl LabService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = LabDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &LabConfig) -> Result<Self, DatabaseError> {
        let db = LabDb::open_local_with(
            &config.database.path,
            RetryConfig::from_config(&config.database),
        )
        .await?;
        Ok(Self {
            db,
            notifier: Arc::new(TracingNotifier),
            metrics: config.metrics.clone(),
        })
    }

    /// Create from an existing `LabDb` with the tracing notifier and default
    /// metrics settings.
    #[must_use]
    pub fn from_db(db: LabDb) -> Self {
        Self {
            db,
            notifier: Arc::new(TracingNotifier),
            metrics: MetricsConfig::default(),
        }
    }

    /// Replace the notification collaborator.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the metrics defaults.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &LabDb {
        &self.db
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    #[must_use]
    pub const fn metrics_config(&self) -> &MetricsConfig {
        &self.metrics
    }
}
