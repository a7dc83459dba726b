use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Message handed to the notification collaborator after a decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Notification {
    pub recipient_id: String,
    pub title: String,
    pub body: String,
}
