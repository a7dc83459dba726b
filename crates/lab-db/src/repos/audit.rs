//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation. Supports dynamic
//! filtering.

use chrono::Utc;
use lab_core::entities::AuditEntry;
use lab_core::enums::{AuditAction, EntityType};
use lab_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::LabService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get::<String>(0)?,
        actor_id: get_opt_string(row, 1)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get::<String>(3)?,
        action: parse_enum(&row.get::<String>(4)?)?,
        detail: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

pub(crate) async fn insert_audit(
    conn: &libsql::Connection,
    entry: &AuditEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO audit_trail (id, actor_id, entity_type, entity_id, action, detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        libsql::params![
            entry.id.as_str(),
            entry.actor_id.as_deref(),
            entry.entity_type.as_str(),
            entry.entity_id.as_str(),
            entry.action.as_str(),
            entry.detail.as_ref().map(std::string::ToString::to_string).as_deref(),
            entry.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

impl LabService {
    /// Build and insert an audit entry on an open transaction.
    pub(crate) async fn audit(
        &self,
        conn: &libsql::Connection,
        actor_id: &str,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        let entry = AuditEntry {
            id: self.db().generate_id(PREFIX_AUDIT).await?,
            actor_id: Some(actor_id.to_string()),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            detail,
            created_at: Utc::now(),
        };
        insert_audit(conn, &entry).await
    }

    /// Append a caller-built audit entry in its own transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        let tx = self.db().begin().await?;
        insert_audit(&tx, entry).await?;
        tx.commit().await
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref aid) = filter.actor_id {
            params.push(libsql::Value::Text(aid.clone()));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, actor_id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let tx = self.db().snapshot().await?;
        let mut rows = tx.query(&sql, libsql::params_from_iter(params)).await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        drop(rows);
        tx.commit().await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use lab_core::audit_detail::StatusChangedDetail;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{create_pending_research, test_service};

    #[tokio::test]
    async fn append_and_query_by_entity() {
        let svc = test_service().await;
        let entry = AuditEntry {
            id: svc.db().generate_id(PREFIX_AUDIT).await.unwrap(),
            actor_id: Some("usr-ext".into()),
            entity_type: EntityType::Review,
            entity_id: "rev-00000001".into(),
            action: AuditAction::Reviewed,
            detail: None,
            created_at: Utc::now(),
        };
        svc.append_audit(&entry).await.unwrap();

        let found = svc
            .query_audit(&AuditFilter {
                entity_id: Some("rev-00000001".into()),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].actor_id.as_deref(), Some("usr-ext"));
        assert_eq!(found[0].action, AuditAction::Reviewed);
    }

    #[tokio::test]
    async fn submit_writes_status_changed_detail() {
        let svc = test_service().await;
        let research = create_pending_research(&svc, "Audited").await;

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(research.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        let detail: StatusChangedDetail =
            serde_json::from_value(entries[0].detail.clone().unwrap()).unwrap();
        assert_eq!(detail.from, "DEVELOPMENT");
        assert_eq!(detail.to, "PENDING");
    }

    #[tokio::test]
    async fn limit_and_newest_first() {
        let svc = test_service().await;
        create_pending_research(&svc, "One").await;
        create_pending_research(&svc, "Two").await;

        let entries = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::Research),
                limit: Some(3),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, AuditAction::StatusChanged);
        assert!(entries[0].created_at >= entries[2].created_at);
    }
}
