//! # lab-core
//!
//! Core types, ID prefixes, and error types for labdesk.
//!
//! This crate provides the foundational types shared across all labdesk crates:
//! - Entity structs for research submissions, trend events, and the survey tree
//! - Status enums with state machine transitions
//! - Explicit actor identity passed into every mutating operation
//! - Cross-cutting error types
//! - Metrics and dashboard payloads handed to presentation surfaces
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;
