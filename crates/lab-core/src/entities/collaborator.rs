use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Join row between a research submission and a contributing user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Collaborator {
    pub research_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}
