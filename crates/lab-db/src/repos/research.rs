//! Research submission repository: CRUD, FTS, submission, and view counting.
//!
//! Status changes after submission live in `approval.rs`.

use chrono::Utc;

use lab_core::audit_detail::StatusChangedDetail;
use lab_core::entities::ResearchSubmission;
use lab_core::enums::{AuditAction, EntityType, ResearchStatus};
use lab_core::errors::CoreError;
use lab_core::identity::Actor;
use lab_core::ids::PREFIX_RESEARCH;

use crate::error::DatabaseError;
use crate::helpers::{get_count, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, query_count};
use crate::service::LabService;
use crate::updates::research::ResearchUpdate;

pub(crate) const RESEARCH_COLUMNS: &str =
    "id, owner_id, title, abstract, status, publication_date, views, created_at, updated_at";

pub(crate) fn row_to_research(row: &libsql::Row) -> Result<ResearchSubmission, DatabaseError> {
    Ok(ResearchSubmission {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        title: row.get::<String>(2)?,
        abstract_text: get_opt_string(row, 3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        publication_date: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        views: get_count(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

pub(crate) async fn read_research(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<ResearchSubmission>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {RESEARCH_COLUMNS} FROM research_submissions WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_research(&row)?)),
        None => Ok(None),
    }
}

/// Like [`read_research`] but a missing row is `CoreError::NotFound`.
pub(crate) async fn require_research(
    conn: &libsql::Connection,
    id: &str,
) -> Result<ResearchSubmission, DatabaseError> {
    read_research(conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found(EntityType::Research, id).into())
}

/// Newest first. `status = None` lists every status.
pub(crate) async fn read_research_list(
    conn: &libsql::Connection,
    status: Option<ResearchStatus>,
    limit: Option<u32>,
) -> Result<Vec<ResearchSubmission>, DatabaseError> {
    let limit_clause = limit.map(|l| format!("LIMIT {l}")).unwrap_or_default();
    let mut rows = match status {
        Some(status) => {
            conn.query(
                &format!(
                    "SELECT {RESEARCH_COLUMNS} FROM research_submissions WHERE status = ?1
                     ORDER BY created_at DESC, rowid DESC {limit_clause}"
                ),
                [status.as_str()],
            )
            .await?
        }
        None => {
            conn.query(
                &format!(
                    "SELECT {RESEARCH_COLUMNS} FROM research_submissions
                     ORDER BY created_at DESC, rowid DESC {limit_clause}"
                ),
                (),
            )
            .await?
        }
    };

    let mut items = Vec::new();
    while let Some(row) = rows.next().await? {
        items.push(row_to_research(&row)?);
    }
    Ok(items)
}

pub(crate) async fn read_count_by_status(
    conn: &libsql::Connection,
    status: ResearchStatus,
) -> Result<u64, DatabaseError> {
    query_count(
        conn,
        "SELECT COUNT(*) FROM research_submissions WHERE status = ?1",
        [status.as_str()],
    )
    .await
}

fn ensure_owner(actor: &Actor, research: &ResearchSubmission) -> Result<(), CoreError> {
    if research.is_owned_by(&actor.user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            actor: actor.user_id.clone(),
            reason: format!("not the owner of {}", research.id),
        })
    }
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    Ok(())
}

impl LabService {
    /// Create a research submission owned by `actor` in `DEVELOPMENT`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` (wrapped) for an empty title, or
    /// `DatabaseError` if the INSERT fails.
    pub async fn create_research(
        &self,
        actor: &Actor,
        title: &str,
        abstract_text: Option<&str>,
    ) -> Result<ResearchSubmission, DatabaseError> {
        validate_title(title)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_RESEARCH).await?;

        let tx = self.db().begin().await?;
        tx.execute(
            "INSERT INTO research_submissions (id, owner_id, title, abstract, status, views, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'DEVELOPMENT', 0, ?5, ?5)",
            libsql::params![
                id.as_str(),
                actor.user_id.as_str(),
                title,
                abstract_text,
                now.to_rfc3339()
            ],
        )
        .await?;
        self.audit(&tx, &actor.user_id, EntityType::Research, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        tracing::debug!(research_id = %id, owner = %actor.user_id, "created research");
        Ok(ResearchSubmission {
            id,
            owner_id: actor.user_id.clone(),
            title: title.to_string(),
            abstract_text: abstract_text.map(String::from),
            status: ResearchStatus::Development,
            publication_date: None,
            views: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a research submission by ID.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the submission does not exist.
    pub async fn get_research(&self, id: &str) -> Result<ResearchSubmission, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let research = require_research(&tx, id).await?;
        tx.commit().await?;
        Ok(research)
    }

    /// Update content fields of a submission the actor owns.
    ///
    /// Only allowed while the submission is `DEVELOPMENT` or `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound`, `CoreError::Forbidden` for a non-owner,
    /// or `CoreError::Validation` once a decision has been made.
    pub async fn update_research(
        &self,
        actor: &Actor,
        research_id: &str,
        update: ResearchUpdate,
    ) -> Result<ResearchSubmission, DatabaseError> {
        if let Some(ref title) = update.title {
            validate_title(title)?;
        }

        let tx = self.db().begin().await?;
        let current = require_research(&tx, research_id).await?;
        ensure_owner(actor, &current)?;
        if !current.status.is_editable() {
            return Err(CoreError::Validation(format!(
                "research {research_id} is {} and can no longer be edited",
                current.status
            ))
            .into());
        }
        if update.is_empty() {
            tx.commit().await?;
            return Ok(current);
        }

        let now = Utc::now();
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref title) = update.title {
            params.push(libsql::Value::Text(title.clone()));
            sets.push(format!("title = ?{}", params.len()));
        }
        if let Some(ref abstract_text) = update.abstract_text {
            match abstract_text {
                Some(a) => params.push(libsql::Value::Text(a.clone())),
                None => params.push(libsql::Value::Null),
            }
            sets.push(format!("abstract = ?{}", params.len()));
        }
        params.push(libsql::Value::Text(now.to_rfc3339()));
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(libsql::Value::Text(research_id.to_string()));
        let sql = format!(
            "UPDATE research_submissions SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );

        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        let detail = serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?;
        self.audit(
            &tx,
            &actor.user_id,
            EntityType::Research,
            research_id,
            AuditAction::Updated,
            Some(detail),
        )
        .await?;
        let updated = require_research(&tx, research_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Submit a draft for review: `DEVELOPMENT -> PENDING`, owner only.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound`, `CoreError::Forbidden`, or
    /// `CoreError::InvalidTransition` if the submission is past `DEVELOPMENT`.
    pub async fn submit_research(
        &self,
        actor: &Actor,
        research_id: &str,
    ) -> Result<ResearchSubmission, DatabaseError> {
        let tx = self.db().begin().await?;
        let current = require_research(&tx, research_id).await?;
        ensure_owner(actor, &current)?;
        if !current.status.can_transition_to(ResearchStatus::Pending) {
            return Err(CoreError::invalid_transition(
                EntityType::Research,
                research_id,
                current.status,
                ResearchStatus::Pending,
            )
            .into());
        }

        let now = Utc::now();
        tx.execute(
            "UPDATE research_submissions SET status = 'PENDING', updated_at = ?1
             WHERE id = ?2 AND status = 'DEVELOPMENT'",
            libsql::params![now.to_rfc3339(), research_id],
        )
        .await?;
        let detail = serde_json::to_value(StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: ResearchStatus::Pending.as_str().to_string(),
            reason: None,
        })
        .map_err(|e| DatabaseError::Other(e.into()))?;
        self.audit(
            &tx,
            &actor.user_id,
            EntityType::Research,
            research_id,
            AuditAction::StatusChanged,
            Some(detail),
        )
        .await?;
        let updated = require_research(&tx, research_id).await?;
        tx.commit().await?;

        tracing::info!(research_id, "research submitted for review");
        Ok(updated)
    }

    /// Increment the view counter and return the new count.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the submission does not exist.
    pub async fn record_view(&self, research_id: &str) -> Result<u64, DatabaseError> {
        let tx = self.db().begin().await?;
        let changed = tx
            .execute(
                "UPDATE research_submissions SET views = views + 1 WHERE id = ?1",
                [research_id],
            )
            .await?;
        if changed == 0 {
            return Err(CoreError::not_found(EntityType::Research, research_id).into());
        }
        let views = query_count(
            &tx,
            "SELECT views FROM research_submissions WHERE id = ?1",
            [research_id],
        )
        .await?;
        tx.commit().await?;
        Ok(views)
    }

    /// List submissions, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_research(
        &self,
        status: Option<ResearchStatus>,
        limit: u32,
    ) -> Result<Vec<ResearchSubmission>, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let items = read_research_list(&tx, status, Some(limit)).await?;
        tx.commit().await?;
        Ok(items)
    }

    /// FTS5 search across title and abstract, best match first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails (including malformed FTS syntax).
    pub async fn search_research(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ResearchSubmission>, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let mut rows = tx
            .query(
                "SELECT r.id, r.owner_id, r.title, r.abstract, r.status, r.publication_date,
                        r.views, r.created_at, r.updated_at
                 FROM research_fts
                 JOIN research_submissions r ON r.rowid = research_fts.rowid
                 WHERE research_fts MATCH ?1
                 ORDER BY rank LIMIT ?2",
                libsql::params![query, i64::from(limit)],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_research(&row)?);
        }
        drop(rows);
        tx.commit().await?;
        Ok(items)
    }

    /// Number of submissions currently in `status`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_by_status(&self, status: ResearchStatus) -> Result<u64, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let count = read_count_by_status(&tx, status).await?;
        tx.commit().await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{
        create_approved_research, create_pending_research, create_test_research, owner,
        set_created_at, test_service,
    };
    use crate::updates::research::ResearchUpdateBuilder;

    #[tokio::test]
    async fn create_starts_in_development() {
        let svc = test_service().await;
        let research = svc
            .create_research(&owner(), "Coral bleaching", Some("Reef survey 2024"))
            .await
            .unwrap();

        assert!(research.id.starts_with("res-"));
        assert_eq!(research.status, ResearchStatus::Development);
        assert_eq!(research.publication_date, None);
        assert_eq!(research.views, 0);

        let fetched = svc.get_research(&research.id).await.unwrap();
        assert_eq!(fetched.title, "Coral bleaching");
        assert_eq!(fetched.abstract_text.as_deref(), Some("Reef survey 2024"));
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let svc = test_service().await;
        let err = svc.create_research(&owner(), "   ", None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_research("res-missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn owner_can_edit_pending() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "Draft title").await;

        let updated = svc
            .update_research(
                &owner(),
                &research.id,
                ResearchUpdateBuilder::new()
                    .title("Final title")
                    .abstract_text(Some("Now with abstract".into()))
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Final title");
        assert_eq!(updated.abstract_text.as_deref(), Some("Now with abstract"));
        assert_eq!(updated.status, ResearchStatus::Pending);
    }

    #[tokio::test]
    async fn non_owner_cannot_edit() {
        let svc = test_service().await;
        let research = create_test_research(&svc, "Mine").await;
        let err = svc
            .update_research(
                &Actor::researcher("usr-other"),
                &research.id,
                ResearchUpdateBuilder::new().title("Theirs").build(),
            )
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn decided_research_is_read_only() {
        let svc = test_service().await;
        let research = create_approved_research(&svc, "Locked").await;
        let err = svc
            .update_research(
                &owner(),
                &research.id,
                ResearchUpdateBuilder::new().title("Sneaky edit").build(),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn submit_is_one_directional() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "Once").await;
        assert_eq!(research.status, ResearchStatus::Pending);

        let err = svc.submit_research(&owner(), &research.id).await.unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn record_view_increments() {
        let svc = test_service().await;
        let research = create_test_research(&svc, "Popular").await;
        assert_eq!(svc.record_view(&research.id).await.unwrap(), 1);
        assert_eq!(svc.record_view(&research.id).await.unwrap(), 2);
        assert!(svc.record_view("res-missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_newest_first_with_status_filter() {
        let svc = test_service().await;
        let old = create_test_research(&svc, "Old").await;
        let new = create_pending_research(&svc, "New").await;
        set_created_at(&svc, &old.id, "2023-01-01T00:00:00+00:00").await;
        set_created_at(&svc, &new.id, "2024-01-01T00:00:00+00:00").await;

        let all = svc.list_research(None, 10).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![new.id.as_str(), old.id.as_str()]);

        let pending = svc
            .list_research(Some(ResearchStatus::Pending), 10)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, new.id);

        assert_eq!(svc.list_research(None, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fts_search_finds_title_and_abstract() {
        let svc = test_service().await;
        svc.create_research(&owner(), "Glacier retreat in the Andes", None)
            .await
            .unwrap();
        svc.create_research(&owner(), "Urban heat islands", Some("Measuring glaciers of concrete"))
            .await
            .unwrap();
        svc.create_research(&owner(), "Protein folding", None)
            .await
            .unwrap();

        let results = svc.search_research("glacier", 10).await.unwrap();
        assert_eq!(results.len(), 2, "porter stemming matches glacier/glaciers");
    }

    #[tokio::test]
    async fn count_by_status_tracks_transitions() {
        let svc = test_service().await;
        create_test_research(&svc, "Draft").await;
        create_pending_research(&svc, "Waiting").await;
        create_approved_research(&svc, "Done").await;

        assert_eq!(svc.count_by_status(ResearchStatus::Development).await.unwrap(), 1);
        assert_eq!(svc.count_by_status(ResearchStatus::Pending).await.unwrap(), 1);
        assert_eq!(svc.count_by_status(ResearchStatus::Approved).await.unwrap(), 1);
        assert_eq!(svc.count_by_status(ResearchStatus::Disapproved).await.unwrap(), 0);
    }
}
