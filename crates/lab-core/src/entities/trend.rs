use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Citations recorded for one research item in one (month, year) bucket.
///
/// Rows are append-only; several rows may share a bucket.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CitationEvent {
    pub id: String,
    pub research_id: String,
    pub month: u32,
    pub year: i32,
    pub citations: u64,
    pub created_at: DateTime<Utc>,
}

/// Downloads recorded for one research item in one (month, year) bucket.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DownloadEvent {
    pub id: String,
    pub research_id: String,
    pub month: u32,
    pub year: i32,
    pub downloads: u64,
    pub created_at: DateTime<Utc>,
}
