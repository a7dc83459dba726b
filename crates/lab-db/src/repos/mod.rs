//! Repository modules implementing storage and engine operations for labdesk.
//!
//! Each module adds methods to `LabService` via `impl LabService` blocks.
//! Free `read_*` functions take a `&libsql::Connection` so multi-read
//! operations can run them inside one snapshot.

pub mod approval;
pub mod audit;
pub mod collaborator;
pub mod dashboard;
pub mod metrics;
pub mod ranking;
pub mod research;
pub mod review;
pub mod survey;
pub mod trends;
