use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub research_id: String,
    pub reviewer_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
