//! # lab-metrics
//!
//! Pure aggregation over labdesk data. Nothing here touches storage: callers
//! (the `lab-db` service layer) read a consistent snapshot and hand the rows
//! in, and get chart-ready payloads back.
//!
//! Ordering contracts, per function:
//! - [`trend::citation_series`] / [`trend::download_series`] return buckets in
//!   ascending chronological order regardless of input order.
//! - [`histogram::monthly_histogram`] always returns January..December.
//! - [`ranking::rank_by_count`] returns descending by count, ties broken by
//!   `created_at` ascending, then `id` ascending.

pub mod histogram;
pub mod impact;
pub mod ranking;
pub mod summary;
pub mod survey;
pub mod trend;

pub use histogram::monthly_histogram;
pub use impact::impact_vector;
pub use ranking::rank_by_count;
pub use summary::{MetricsInput, summarize};
pub use survey::count_responses;
pub use trend::{citation_series, download_series};
