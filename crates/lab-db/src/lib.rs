//! # lab-db
//!
//! libSQL persistence and the research metrics engine for labdesk.
//!
//! Handles all relational state: research submissions, citation and download
//! trend rows, the survey tree, reviews, collaborators, and the audit trail.
//! On top of that storage it runs the four engine components: the trend store
//! accessor, metrics aggregation, ranking, and the approval state machine.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) for native FTS5 and a
//! local embedded database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod notify;
pub mod repos;
pub mod retry;
pub mod service;
pub mod test_support;
pub mod updates;

use std::ops::Deref;

use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};
use retry::{RetryConfig, is_transient_busy_error};
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle for all labdesk state operations.
///
/// Wraps a libSQL database and a single connection. All repo work goes
/// through [`LabDb::begin`] (writes plus their audit entry) or
/// [`LabDb::snapshot`] (consistent multi-read); both serialize on the shared
/// connection so one caller never observes another's uncommitted rows.
pub struct LabDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    txn_lock: Mutex<()>,
    retry: RetryConfig,
}

/// An open transaction holding the connection-level lock.
///
/// Derefs to [`libsql::Connection`] so repo read helpers accept either a
/// plain connection or a transaction. Dropping without [`Txn::commit`] rolls
/// back.
pub struct Txn<'a> {
    tx: libsql::Transaction,
    _guard: MutexGuard<'a, ()>,
}

impl Deref for Txn<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl Txn<'_> {
    /// Commit and release the lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the COMMIT fails.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Lock mode requested at BEGIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxnMode {
    /// `BEGIN IMMEDIATE`: take the write lock up front.
    Write,
    /// `BEGIN DEFERRED`: read snapshot.
    Read,
}

impl TxnMode {
    /// `TransactionBehavior` is not `Copy`, so each BEGIN attempt builds its own.
    const fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Write => TransactionBehavior::Immediate,
            Self::Read => TransactionBehavior::Deferred,
        }
    }
}

impl LabDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_local_with(path, RetryConfig::default()).await
    }

    /// Open a local database with explicit busy-retry tuning.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local_with(path: &str, retry: RetryConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let lab_db = Self {
            db,
            conn,
            txn_lock: Mutex::new(()),
            retry,
        };
        lab_db.run_migrations().await?;
        tracing::debug!(path, "opened labdesk database");
        Ok(lab_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Begin a write transaction, waiting for any other transaction on this
    /// connection to finish first.
    ///
    /// The write lock is taken at BEGIN (`IMMEDIATE`), so a status read made
    /// inside the transaction cannot go stale before the UPDATE lands.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if BEGIN keeps failing after retries.
    pub async fn begin(&self) -> Result<Txn<'_>, DatabaseError> {
        self.begin_with(TxnMode::Write).await
    }

    /// Begin a read-only snapshot for multi-read aggregation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if BEGIN keeps failing after retries.
    pub async fn snapshot(&self) -> Result<Txn<'_>, DatabaseError> {
        self.begin_with(TxnMode::Read).await
    }

    async fn begin_with(&self, mode: TxnMode) -> Result<Txn<'_>, DatabaseError> {
        let guard = self.txn_lock.lock().await;
        let mut attempt = 1;
        loop {
            match self.conn.transaction_with_behavior(mode.behavior()).await {
                Ok(tx) => return Ok(Txn { tx, _guard: guard }),
                Err(e) if attempt < self.retry.max_attempts && is_transient_busy_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::debug!(attempt, ?delay, error = %e, "database busy on BEGIN; retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"res-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
