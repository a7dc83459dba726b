//! Collaborator join rows. Only counted by the metrics engine.

use chrono::Utc;

use lab_core::entities::Collaborator;
use lab_core::enums::{AuditAction, EntityType};
use lab_core::errors::CoreError;
use lab_core::identity::Actor;

use crate::error::DatabaseError;
use crate::helpers::{ensure_exists, parse_datetime, query_count};
use crate::repos::research::require_research;
use crate::service::LabService;

pub(crate) async fn read_collaborator_count(
    conn: &libsql::Connection,
    research_id: &str,
) -> Result<u64, DatabaseError> {
    query_count(
        conn,
        "SELECT COUNT(*) FROM collaborators WHERE research_id = ?1",
        [research_id],
    )
    .await
}

impl LabService {
    /// Add `user_id` as a collaborator. Adding an existing collaborator is a
    /// no-op that returns the original row.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown research item, or
    /// `CoreError::Forbidden` unless the actor owns the item or is an admin.
    pub async fn add_collaborator(
        &self,
        actor: &Actor,
        research_id: &str,
        user_id: &str,
    ) -> Result<Collaborator, DatabaseError> {
        let now = Utc::now();
        let tx = self.db().begin().await?;
        let research = require_research(&tx, research_id).await?;
        if !actor.is_admin() && !research.is_owned_by(&actor.user_id) {
            return Err(CoreError::Forbidden {
                actor: actor.user_id.clone(),
                reason: format!("cannot add collaborators to {research_id}"),
            }
            .into());
        }

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO collaborators (research_id, user_id, joined_at)
                 VALUES (?1, ?2, ?3)",
                libsql::params![research_id, user_id, now.to_rfc3339()],
            )
            .await?;
        if inserted > 0 {
            let entity_id = format!("{research_id}:{user_id}");
            self.audit(
                &tx,
                &actor.user_id,
                EntityType::Collaborator,
                &entity_id,
                AuditAction::Joined,
                None,
            )
            .await?;
        }

        let mut rows = tx
            .query(
                "SELECT joined_at FROM collaborators WHERE research_id = ?1 AND user_id = ?2",
                [research_id, user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let joined_at = parse_datetime(&row.get::<String>(0)?)?;
        drop(rows);
        tx.commit().await?;

        Ok(Collaborator {
            research_id: research_id.to_string(),
            user_id: user_id.to_string(),
            joined_at,
        })
    }

    /// Number of collaborators on a research item.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) for an unknown research item.
    pub async fn count_collaborators(&self, research_id: &str) -> Result<u64, DatabaseError> {
        let tx = self.db().snapshot().await?;
        ensure_exists(&tx, EntityType::Research, research_id).await?;
        let count = read_collaborator_count(&tx, research_id).await?;
        tx.commit().await?;
        Ok(count)
    }
}
