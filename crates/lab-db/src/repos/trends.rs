//! Trend Store Accessor: append-only citation and download rows.
//!
//! Rows are read in storage order (year, month descending) and normalized to
//! ascending chronological order before leaving this module. Aggregation
//! never sees the native order.

use chrono::Utc;

use lab_core::audit_detail::RecordedDetail;
use lab_core::entities::{CitationEvent, DownloadEvent};
use lab_core::enums::{AuditAction, EntityType};
use lab_core::errors::CoreError;
use lab_core::identity::Actor;
use lab_core::ids::{PREFIX_CITATION, PREFIX_DOWNLOAD};
use lab_core::responses::TrendSnapshot;

use crate::error::DatabaseError;
use crate::helpers::{ensure_exists, get_count, get_i32, get_u32, parse_datetime};
use crate::repos::research::require_research;
use crate::service::LabService;

#[derive(Debug, Clone, Copy)]
enum TrendKind {
    Citations,
    Downloads,
}

impl TrendKind {
    const fn table(self) -> &'static str {
        match self {
            Self::Citations => "citation_trends",
            Self::Downloads => "download_trends",
        }
    }

    const fn column(self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::Downloads => "downloads",
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Citations => PREFIX_CITATION,
            Self::Downloads => PREFIX_DOWNLOAD,
        }
    }

    const fn entity(self) -> EntityType {
        match self {
            Self::Citations => EntityType::CitationTrend,
            Self::Downloads => EntityType::DownloadTrend,
        }
    }
}

/// One parsed row: (id, month, year, count, created_at).
type TrendRow = (String, u32, i32, u64, chrono::DateTime<Utc>);

fn parse_trend_row(row: &libsql::Row) -> Result<TrendRow, DatabaseError> {
    Ok((
        row.get::<String>(0)?,
        get_u32(row, 1)?,
        get_i32(row, 2)?,
        get_count(row, 3)?,
        parse_datetime(&row.get::<String>(4)?)?,
    ))
}

/// Read one kind of trend row, oldest bucket first.
///
/// Rows that fail to parse are skipped with a warning rather than failing
/// the whole read.
async fn read_trend_rows(
    conn: &libsql::Connection,
    kind: TrendKind,
    research_id: &str,
) -> Result<Vec<TrendRow>, DatabaseError> {
    let sql = format!(
        "SELECT id, month, year, {column}, created_at FROM {table}
         WHERE research_id = ?1
         ORDER BY year DESC, month DESC, created_at DESC, rowid DESC",
        column = kind.column(),
        table = kind.table(),
    );
    let mut rows = conn.query(&sql, [research_id]).await?;

    let mut parsed = Vec::new();
    while let Some(row) = rows.next().await? {
        match parse_trend_row(&row) {
            Ok(r) => parsed.push(r),
            Err(e) => {
                tracing::warn!(research_id, kind = kind.column(), error = %e, "skipping malformed trend row");
            }
        }
    }
    parsed.reverse();
    Ok(parsed)
}

/// Read both trend kinds for a research item, ascending by (year, month).
///
/// Does not check that the research item exists.
pub(crate) async fn read_trends(
    conn: &libsql::Connection,
    research_id: &str,
) -> Result<TrendSnapshot, DatabaseError> {
    let citations = read_trend_rows(conn, TrendKind::Citations, research_id)
        .await?
        .into_iter()
        .map(|(id, month, year, citations, created_at)| CitationEvent {
            id,
            research_id: research_id.to_string(),
            month,
            year,
            citations,
            created_at,
        })
        .collect();
    let downloads = read_trend_rows(conn, TrendKind::Downloads, research_id)
        .await?
        .into_iter()
        .map(|(id, month, year, downloads, created_at)| DownloadEvent {
            id,
            research_id: research_id.to_string(),
            month,
            year,
            downloads,
            created_at,
        })
        .collect();

    Ok(TrendSnapshot {
        citations,
        downloads,
    })
}

fn validate_bucket(month: u32, count: u64) -> Result<i64, CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    i64::try_from(count).map_err(|_| CoreError::Validation(format!("count {count} is too large")))
}

impl LabService {
    async fn record_trend(
        &self,
        kind: TrendKind,
        actor: &Actor,
        research_id: &str,
        month: u32,
        year: i32,
        count: u64,
    ) -> Result<(String, chrono::DateTime<Utc>), DatabaseError> {
        let stored = validate_bucket(month, count)?;
        let now = Utc::now();
        let id = self.db().generate_id(kind.prefix()).await?;

        let tx = self.db().begin().await?;
        ensure_exists(&tx, EntityType::Research, research_id).await?;
        tx.execute(
            &format!(
                "INSERT INTO {table} (id, research_id, month, year, {column}, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                table = kind.table(),
                column = kind.column(),
            ),
            libsql::params![
                id.as_str(),
                research_id,
                i64::from(month),
                i64::from(year),
                stored,
                now.to_rfc3339()
            ],
        )
        .await?;
        let detail = serde_json::to_value(RecordedDetail { month, year, count })
            .map_err(|e| DatabaseError::Other(e.into()))?;
        self.audit(&tx, &actor.user_id, kind.entity(), &id, AuditAction::Recorded, Some(detail))
            .await?;
        tx.commit().await?;

        tracing::info!(research_id, kind = kind.column(), month, year, count, "recorded trend row");
        Ok((id, now))
    }

    /// Append one citation row for a (month, year) bucket.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a month outside 1..=12, or
    /// `CoreError::NotFound` for an unknown research item.
    pub async fn record_citations(
        &self,
        actor: &Actor,
        research_id: &str,
        month: u32,
        year: i32,
        citations: u64,
    ) -> Result<CitationEvent, DatabaseError> {
        let (id, created_at) = self
            .record_trend(TrendKind::Citations, actor, research_id, month, year, citations)
            .await?;
        Ok(CitationEvent {
            id,
            research_id: research_id.to_string(),
            month,
            year,
            citations,
            created_at,
        })
    }

    /// Append one download row for a (month, year) bucket.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a month outside 1..=12, or
    /// `CoreError::NotFound` for an unknown research item.
    pub async fn record_downloads(
        &self,
        actor: &Actor,
        research_id: &str,
        month: u32,
        year: i32,
        downloads: u64,
    ) -> Result<DownloadEvent, DatabaseError> {
        let (id, created_at) = self
            .record_trend(TrendKind::Downloads, actor, research_id, month, year, downloads)
            .await?;
        Ok(DownloadEvent {
            id,
            research_id: research_id.to_string(),
            month,
            year,
            downloads,
            created_at,
        })
    }

    /// All trend rows for a research item, ascending by (year, month).
    ///
    /// Empty lists when nothing has been recorded yet.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the research item does not exist.
    pub async fn list_trends(&self, research_id: &str) -> Result<TrendSnapshot, DatabaseError> {
        let tx = self.db().snapshot().await?;
        require_research(&tx, research_id).await?;
        let trends = read_trends(&tx, research_id).await?;
        tx.commit().await?;
        tracing::debug!(
            research_id,
            citations = trends.citations.len(),
            downloads = trends.downloads.len(),
            "listed trends"
        );
        Ok(trends)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{admin, create_test_research, test_service};

    #[tokio::test]
    async fn list_is_ascending_whatever_the_insert_order() {
        let svc = test_service().await;
        let research = create_test_research(&svc, "Trends").await;

        for (month, year) in [(3, 2024), (11, 2023), (1, 2024), (3, 2024)] {
            svc.record_citations(&admin(), &research.id, month, year, 1)
                .await
                .unwrap();
        }
        svc.record_downloads(&admin(), &research.id, 2, 2024, 7)
            .await
            .unwrap();

        let trends = svc.list_trends(&research.id).await.unwrap();
        let buckets: Vec<(i32, u32)> = trends.citations.iter().map(|c| (c.year, c.month)).collect();
        assert_eq!(buckets, vec![(2023, 11), (2024, 1), (2024, 3), (2024, 3)]);
        assert_eq!(trends.downloads.len(), 1);
        assert_eq!(trends.downloads[0].downloads, 7);
    }

    #[tokio::test]
    async fn no_rows_is_empty_not_error() {
        let svc = test_service().await;
        let research = create_test_research(&svc, "Quiet").await;
        let trends = svc.list_trends(&research.id).await.unwrap();
        assert_eq!(trends, TrendSnapshot::default());
    }

    #[tokio::test]
    async fn unknown_research_is_not_found() {
        let svc = test_service().await;
        assert!(svc.list_trends("res-missing").await.unwrap_err().is_not_found());
        assert!(
            svc.record_citations(&admin(), "res-missing", 1, 2024, 1)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn month_out_of_range_is_validation() {
        let svc = test_service().await;
        let research = create_test_research(&svc, "Bad month").await;
        for month in [0, 13] {
            let err = svc
                .record_downloads(&admin(), &research.id, month, 2024, 1)
                .await
                .unwrap_err();
            assert!(err.is_validation(), "month {month}");
        }
    }
}
