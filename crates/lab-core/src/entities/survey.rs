use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SurveyStatus;

/// A survey attached to a research item. Root of the survey tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    pub research_id: String,
    pub creator_id: String,
    pub title: String,
    pub description: Option<String>,
    pub label: String,
    pub status: SurveyStatus,
    pub created_at: DateTime<Utc>,
    pub forms: Vec<SurveyForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SurveyForm {
    pub id: String,
    pub survey_id: String,
    pub title: String,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub form_id: String,
    pub prompt: String,
    pub position: u32,
    pub choices: Vec<Choice>,
}

/// Leaf of the survey tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub question_id: String,
    pub label: String,
    pub position: u32,
}
