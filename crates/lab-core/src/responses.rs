//! Payloads handed to presentation surfaces.
//!
//! These are plain data: chart series, summaries, and the dashboard overview.
//! Rendering is the caller's concern.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CitationEvent, DownloadEvent, ResearchSubmission};
use crate::enums::ImpactSubject;

/// Raw trend rows for one research item, ascending by (year, month).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrendSnapshot {
    pub citations: Vec<CitationEvent>,
    pub downloads: Vec<DownloadEvent>,
}

/// One bucket of the citation series, labelled `"<Month> <Year>"`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CitationPoint {
    pub label: String,
    pub citations: u64,
}

/// One bucket of the download series, labelled `"<Month> <Year>"`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DownloadPoint {
    pub label: String,
    pub downloads: u64,
}

/// One axis of the radar-style impact vector.
///
/// `value` is the raw total; `ratio` is `value / full_mark` and is not
/// clamped, so it exceeds `1.0` once the total passes the ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImpactAxis {
    pub subject: ImpactSubject,
    pub value: f64,
    pub full_mark: f64,
    pub ratio: f64,
}

/// Everything the paper dashboard needs for one research item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetricsSummary {
    pub research_id: String,
    pub citation_series: Vec<CitationPoint>,
    pub download_series: Vec<DownloadPoint>,
    pub total_citations: u64,
    pub total_downloads: u64,
    pub total_responses: u64,
    pub views: u64,
    pub collaborators: u64,
    pub impact: Vec<ImpactAxis>,
}

/// Papers created in one calendar month, named `"Jan"` … `"Dec"`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MonthlyCount {
    pub name: String,
    pub papers: u64,
}

/// Organization-wide submissions per month for one year. Always 12 entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PublicationHistogram {
    pub year: i32,
    pub months: Vec<MonthlyCount>,
}

/// Input contract for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardOverview {
    pub published: u64,
    pub pending: Vec<ResearchSubmission>,
    pub active_surveys: u64,
    pub recent: Vec<ResearchSubmission>,
    pub high_citations: Vec<ResearchSubmission>,
    pub paper_histogram: PublicationHistogram,
}
