//! Cross-cutting error types for labdesk.
//!
//! This module defines errors that can originate from any crate in the system.
//! Storage errors (`DatabaseError`) and configuration errors (`ConfigError`)
//! live in their respective crates and wrap `CoreError` where the domain
//! kind must reach the caller unchanged.

use thiserror::Error;

/// Errors that can be raised by any labdesk crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// The acting user may not perform this mutation.
    #[error("Forbidden for {actor}: {reason}")]
    Forbidden { actor: String, reason: String },

    /// Data failed validation (range, format, uniqueness).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Nested data could not be folded into an aggregate.
    #[error("Aggregation error: {0}")]
    Aggregation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a `NotFound` on the given entity kind.
    #[must_use]
    pub fn not_found(entity_type: impl ToString, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    /// Shorthand for an `InvalidTransition` between two displayable states.
    #[must_use]
    pub fn invalid_transition(
        entity_type: impl ToString,
        id: impl Into<String>,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidTransition {
            entity_type: entity_type.to_string(),
            id: id.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
