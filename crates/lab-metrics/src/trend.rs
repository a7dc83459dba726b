//! Trend bucket folding.
//!
//! Trend rows are a sparse event log: only buckets with at least one row
//! appear in a series, and gaps between months are not zero-filled. Several
//! rows for the same (month, year) are summed.

use std::collections::BTreeMap;

use lab_core::entities::{CitationEvent, DownloadEvent};
use lab_core::responses::{CitationPoint, DownloadPoint};

/// Full English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name for a 1-based month, or `None` outside 1..=12.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(idx).copied()
}

/// Series label for a bucket, e.g. `"January 2024"`.
#[must_use]
pub fn bucket_label(month: u32, year: i32) -> Option<String> {
    month_name(month).map(|name| format!("{name} {year}"))
}

/// A summed (year, month) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub year: i32,
    pub month: u32,
    pub total: u64,
}

impl Bucket {
    fn label(self) -> String {
        bucket_label(self.month, self.year).unwrap_or_default()
    }
}

/// Fold `(month, year, count)` rows into ascending buckets.
///
/// Rows with a month outside 1..=12 are skipped and logged; they contribute
/// to neither the series nor the totals.
pub fn fold_buckets<I>(rows: I, kind: &str) -> Vec<Bucket>
where
    I: IntoIterator<Item = (u32, i32, u64)>,
{
    let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for (month, year, count) in rows {
        if month_name(month).is_none() {
            tracing::warn!(kind, month, year, "skipping trend row with invalid month");
            continue;
        }
        let slot = buckets.entry((year, month)).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    tracing::debug!(kind, buckets = buckets.len(), "folded trend rows");
    buckets
        .into_iter()
        .map(|((year, month), total)| Bucket { year, month, total })
        .collect()
}

/// Sum of all bucket totals.
#[must_use]
pub fn bucket_total(buckets: &[Bucket]) -> u64 {
    buckets.iter().fold(0u64, |acc, b| acc.saturating_add(b.total))
}

pub fn citation_buckets(events: &[CitationEvent]) -> Vec<Bucket> {
    fold_buckets(
        events.iter().map(|e| (e.month, e.year, e.citations)),
        "citations",
    )
}

pub fn download_buckets(events: &[DownloadEvent]) -> Vec<Bucket> {
    fold_buckets(
        events.iter().map(|e| (e.month, e.year, e.downloads)),
        "downloads",
    )
}

#[must_use]
pub fn citation_points(buckets: &[Bucket]) -> Vec<CitationPoint> {
    buckets
        .iter()
        .map(|b| CitationPoint {
            label: b.label(),
            citations: b.total,
        })
        .collect()
}

#[must_use]
pub fn download_points(buckets: &[Bucket]) -> Vec<DownloadPoint> {
    buckets
        .iter()
        .map(|b| DownloadPoint {
            label: b.label(),
            downloads: b.total,
        })
        .collect()
}

/// Citation series, one point per recorded bucket, oldest first.
pub fn citation_series(events: &[CitationEvent]) -> Vec<CitationPoint> {
    citation_points(&citation_buckets(events))
}

/// Download series, one point per recorded bucket, oldest first.
pub fn download_series(events: &[DownloadEvent]) -> Vec<DownloadPoint> {
    download_points(&download_buckets(events))
}
