//! Top-N ranking by related-record count.

use std::cmp::Ordering;

use lab_core::entities::ResearchSubmission;

fn by_count_then_age(a: &(ResearchSubmission, u64), b: &(ResearchSubmission, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| a.0.created_at.cmp(&b.0.created_at))
        .then_with(|| a.0.id.cmp(&b.0.id))
}

/// Order `(submission, count)` pairs and keep the first `n`.
///
/// Descending by count; equal counts fall back to the older submission
/// first (`created_at` ascending), then to `id` ascending, so the result
/// never depends on input order. Fewer than `n` items returns all of them;
/// an empty corpus returns an empty list.
#[must_use]
pub fn rank_by_count(mut scored: Vec<(ResearchSubmission, u64)>, n: usize) -> Vec<ResearchSubmission> {
    scored.sort_by(by_count_then_age);
    scored.truncate(n);
    tracing::debug!(kept = scored.len(), limit = n, "ranked research items");
    scored.into_iter().map(|(research, _)| research).collect()
}
