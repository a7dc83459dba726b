//! Per-paper metrics summary.

use lab_core::entities::{ResearchSubmission, Survey};
use lab_core::errors::CoreError;
use lab_core::responses::{MetricsSummary, TrendSnapshot};

use crate::impact::impact_vector;
use crate::survey::count_responses;
use crate::trend::{
    bucket_total, citation_buckets, citation_points, download_buckets, download_points,
};

/// Rows read for one research item inside a single snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput<'a> {
    pub research: &'a ResearchSubmission,
    pub trends: &'a TrendSnapshot,
    pub surveys: &'a [Survey],
    pub collaborators: u64,
}

/// Fold one research item's trends and survey tree into a `MetricsSummary`.
///
/// Missing data degrades to empty series and zero totals.
///
/// # Errors
///
/// Returns `CoreError::Validation` if `full_mark` is not positive.
pub fn summarize(input: MetricsInput<'_>, full_mark: f64) -> Result<MetricsSummary, CoreError> {
    let citations = citation_buckets(&input.trends.citations);
    let downloads = download_buckets(&input.trends.downloads);
    let total_citations = bucket_total(&citations);
    let total_downloads = bucket_total(&downloads);
    let views = input.research.views;

    Ok(MetricsSummary {
        research_id: input.research.id.clone(),
        citation_series: citation_points(&citations),
        download_series: download_points(&downloads),
        total_citations,
        total_downloads,
        total_responses: count_responses(input.surveys),
        views,
        collaborators: input.collaborators,
        impact: impact_vector(total_citations, total_downloads, views, full_mark)?,
    })
}
