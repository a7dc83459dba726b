//! Research submission content update builder.
//!
//! Only content fields are here. Status and publication date change through
//! `submit_research` and `decide`.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<Option<String>>,
}

impl ResearchUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.abstract_text.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ResearchUpdateBuilder(ResearchUpdate);

impl ResearchUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ResearchUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    /// Set or clear (`None`) the abstract.
    #[must_use]
    pub fn abstract_text(mut self, abstract_text: Option<String>) -> Self {
        self.0.abstract_text = Some(abstract_text);
        self
    }

    #[must_use]
    pub fn build(self) -> ResearchUpdate {
        self.0
    }
}
