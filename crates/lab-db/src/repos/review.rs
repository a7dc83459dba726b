//! Review repository.

use chrono::Utc;

use lab_core::entities::Review;
use lab_core::enums::{AuditAction, EntityType};
use lab_core::errors::CoreError;
use lab_core::identity::Actor;
use lab_core::ids::PREFIX_REVIEW;

use crate::error::DatabaseError;
use crate::helpers::{ensure_exists, parse_datetime};
use crate::service::LabService;

fn row_to_review(row: &libsql::Row) -> Result<Review, DatabaseError> {
    Ok(Review {
        id: row.get::<String>(0)?,
        research_id: row.get::<String>(1)?,
        reviewer_id: row.get::<String>(2)?,
        body: row.get::<String>(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl LabService {
    /// Add a review to a research item.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty body, or
    /// `CoreError::NotFound` for an unknown research item.
    pub async fn add_review(
        &self,
        actor: &Actor,
        research_id: &str,
        body: &str,
    ) -> Result<Review, DatabaseError> {
        if body.trim().is_empty() {
            return Err(CoreError::Validation("review body must not be empty".into()).into());
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_REVIEW).await?;

        let tx = self.db().begin().await?;
        ensure_exists(&tx, EntityType::Research, research_id).await?;
        tx.execute(
            "INSERT INTO reviews (id, research_id, reviewer_id, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                id.as_str(),
                research_id,
                actor.user_id.as_str(),
                body,
                now.to_rfc3339()
            ],
        )
        .await?;
        self.audit(&tx, &actor.user_id, EntityType::Review, &id, AuditAction::Reviewed, None)
            .await?;
        tx.commit().await?;

        Ok(Review {
            id,
            research_id: research_id.to_string(),
            reviewer_id: actor.user_id.clone(),
            body: body.to_string(),
            created_at: now,
        })
    }

    /// Reviews for a research item, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) for an unknown research item.
    pub async fn list_reviews(&self, research_id: &str) -> Result<Vec<Review>, DatabaseError> {
        let tx = self.db().snapshot().await?;
        ensure_exists(&tx, EntityType::Research, research_id).await?;
        let mut rows = tx
            .query(
                "SELECT id, research_id, reviewer_id, body, created_at FROM reviews
                 WHERE research_id = ?1 ORDER BY created_at, rowid",
                [research_id],
            )
            .await?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next().await? {
            reviews.push(row_to_review(&row)?);
        }
        drop(rows);
        tx.commit().await?;
        Ok(reviews)
    }
}
