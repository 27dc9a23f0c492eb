//! The result of a session.

use crate::{ChatEntry, Result, SurveyQuestion};
use serde::{Deserialize, Serialize};

/// Entries and survey answers produced by one session (or one batch
/// lane).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentOutput {
    /// Entries appended to the real transcript, in turn order.
    #[serde(default, alias = "chat_entry")]
    pub chat_entries: Vec<ChatEntry>,
    /// One record per fired survey question.
    #[serde(default, alias = "survey_question")]
    pub survey_questions: Vec<SurveyQuestion>,
}

impl ExperimentOutput {
    /// Create an empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an output from JSON.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Encode the output as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
