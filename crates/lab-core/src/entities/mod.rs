//! Entity structs for all labdesk domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `lab-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod audit;
mod collaborator;
mod notification;
mod research;
mod review;
mod survey;
mod trend;

pub use audit::AuditEntry;
pub use collaborator::Collaborator;
pub use notification::Notification;
pub use research::ResearchSubmission;
pub use review::Review;
pub use survey::{Choice, Question, Survey, SurveyForm};
pub use trend::{CitationEvent, DownloadEvent};
