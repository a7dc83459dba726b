//! Metrics Aggregator entry points.
//!
//! Reads run inside one snapshot so a concurrent trend write is seen either
//! entirely or not at all. Folding is delegated to `lab-metrics`.

use lab_core::responses::{MetricsSummary, PublicationHistogram};
use lab_metrics::{MetricsInput, monthly_histogram, summarize};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::collaborator::read_collaborator_count;
use crate::repos::research::require_research;
use crate::repos::survey::read_survey_tree;
use crate::repos::trends::read_trends;
use crate::service::LabService;

/// `created_at` of every submission created during `year`.
pub(crate) async fn read_created_in_year(
    conn: &libsql::Connection,
    year: i32,
) -> Result<Vec<chrono::DateTime<chrono::Utc>>, DatabaseError> {
    let from = format!("{year:04}-01-01");
    let to = format!("{:04}-01-01", year.saturating_add(1));
    let mut rows = conn
        .query(
            "SELECT created_at FROM research_submissions
             WHERE created_at >= ?1 AND created_at < ?2",
            [from.as_str(), to.as_str()],
        )
        .await?;

    let mut created = Vec::new();
    while let Some(row) = rows.next().await? {
        created.push(parse_datetime(&row.get::<String>(0)?)?);
    }
    Ok(created)
}

pub(crate) async fn read_histogram(
    conn: &libsql::Connection,
    year: i32,
) -> Result<PublicationHistogram, DatabaseError> {
    let created = read_created_in_year(conn, year).await?;
    Ok(monthly_histogram(year, created))
}

impl LabService {
    /// Summarize one research item using the configured radar ceiling.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the research item does not
    /// exist. Missing trends or surveys are not errors.
    pub async fn compute_metrics(&self, research_id: &str) -> Result<MetricsSummary, DatabaseError> {
        self.compute_metrics_with(research_id, self.metrics_config().full_mark)
            .await
    }

    /// Summarize one research item against an explicit `full_mark`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown research item, or
    /// `CoreError::Validation` if `full_mark` is not a positive number.
    pub async fn compute_metrics_with(
        &self,
        research_id: &str,
        full_mark: f64,
    ) -> Result<MetricsSummary, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let research = require_research(&tx, research_id).await?;
        let trends = read_trends(&tx, research_id).await?;
        let surveys = read_survey_tree(&tx, research_id).await?;
        let collaborators = read_collaborator_count(&tx, research_id).await?;
        tx.commit().await?;

        let summary = summarize(
            MetricsInput {
                research: &research,
                trends: &trends,
                surveys: &surveys,
                collaborators,
            },
            full_mark,
        )?;
        tracing::debug!(
            research_id,
            citation_buckets = summary.citation_series.len(),
            download_buckets = summary.download_series.len(),
            total_responses = summary.total_responses,
            "computed metrics"
        );
        Ok(summary)
    }

    /// Submissions created per calendar month of `year`, all 12 months present.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn publication_histogram(&self, year: i32) -> Result<PublicationHistogram, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let histogram = read_histogram(&tx, year).await?;
        tx.commit().await?;
        Ok(histogram)
    }
}
