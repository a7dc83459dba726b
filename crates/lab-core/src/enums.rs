//! Status enums, entity types, and actions for labdesk.
//!
//! Research statuses serialize in `SCREAMING_SNAKE_CASE` to match the values
//! stored by the portal (`"APPROVED"`); every other enum uses `snake_case`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ResearchStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a research submission.
///
/// ```text
/// DEVELOPMENT → PENDING → APPROVED ⇄ DISAPPROVED
///                       → DISAPPROVED
/// ```
///
/// A decision state never returns to `PENDING` or `DEVELOPMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResearchStatus {
    Development,
    Pending,
    Approved,
    Disapproved,
}

impl ResearchStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Development => &[Self::Pending],
            Self::Pending => &[Self::Approved, Self::Disapproved],
            Self::Approved => &[Self::Disapproved],
            Self::Disapproved => &[Self::Approved],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Content fields may only change before a decision is made.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Development | Self::Pending)
    }

    #[must_use]
    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Approved | Self::Disapproved)
    }

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "DEVELOPMENT",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Disapproved => "DISAPPROVED",
        }
    }
}

impl fmt::Display for ResearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// An administrator's verdict on a submission.
///
/// Restricting `decide` to this type keeps `DEVELOPMENT`/`PENDING` out of
/// the decision path at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Disapproved,
}

impl Decision {
    #[must_use]
    pub const fn status(self) -> ResearchStatus {
        match self {
            Self::Approved => ResearchStatus::Approved,
            Self::Disapproved => ResearchStatus::Disapproved,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.status().as_str()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RankingMetric
// ---------------------------------------------------------------------------

/// Related-record collection used to rank research items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    /// Number of citation-trend rows (not the summed citation count).
    Citations,
    /// Number of reviews.
    Reviews,
}

impl RankingMetric {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::Reviews => "reviews",
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SurveyStatus
// ---------------------------------------------------------------------------

/// Status of a survey.
///
/// ```text
/// active → closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Active,
    Closed,
}

impl SurveyStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Closed],
            Self::Closed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActorRole
// ---------------------------------------------------------------------------

/// Role asserted by the external auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Researcher,
}

impl ActorRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Researcher => "researcher",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ImpactSubject
// ---------------------------------------------------------------------------

/// Named axis of the impact metric vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImpactSubject {
    Citations,
    Downloads,
    Views,
}

impl ImpactSubject {
    /// Axes in radar order.
    pub const ALL: [Self; 3] = [Self::Citations, Self::Downloads, Self::Views];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citations => "citations",
            Self::Downloads => "downloads",
            Self::Views => "views",
        }
    }
}

impl fmt::Display for ImpactSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    Recorded,
    Reviewed,
    Joined,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Recorded => "recorded",
            Self::Reviewed => "reviewed",
            Self::Joined => "joined",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Research,
    CitationTrend,
    DownloadTrend,
    Survey,
    SurveyForm,
    Question,
    Choice,
    Review,
    Collaborator,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::CitationTrend => "citation_trend",
            Self::DownloadTrend => "download_trend",
            Self::Survey => "survey",
            Self::SurveyForm => "survey_form",
            Self::Question => "question",
            Self::Choice => "choice",
            Self::Review => "review",
            Self::Collaborator => "collaborator",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
