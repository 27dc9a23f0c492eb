//! Survey questions: their configuration and their recorded answers.

use crate::ChatEntry;
use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Trigger value meaning "ask when the session is ending".
pub const AT_END: i64 = -1;

/// When a survey question fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrigger", into = "RawTrigger")]
pub enum Trigger {
    /// Fire at every transcript length.
    Always,
    /// Fire at the listed transcript lengths; [`AT_END`] fires once the
    /// end type reports the session as over.
    Iterations(BTreeSet<i64>),
}

impl Trigger {
    /// Fire at the given transcript lengths.
    pub fn at(iterations: impl IntoIterator<Item = i64>) -> Self {
        Self::Iterations(iterations.into_iter().collect())
    }

    /// Fire only when the session is ending.
    pub fn at_end() -> Self {
        Self::at([AT_END])
    }

    /// Whether the trigger fires at transcript length `length`.
    pub fn fires(&self, length: usize, ending: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Iterations(set) => {
                i64::try_from(length).is_ok_and(|length| set.contains(&length))
                    || (ending && set.contains(&AT_END))
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTrigger {
    Keyword(String),
    One(i64),
    Many(Vec<i64>),
}

impl TryFrom<RawTrigger> for Trigger {
    type Error = String;

    fn try_from(raw: RawTrigger) -> Result<Self, Self::Error> {
        match raw {
            RawTrigger::Keyword(word) if word.eq_ignore_ascii_case("always") => Ok(Self::Always),
            RawTrigger::Keyword(word) => Err(format!("unknown survey trigger {word:?}")),
            RawTrigger::One(length) => Ok(Self::at([length])),
            RawTrigger::Many(lengths) => Ok(Self::at(lengths)),
        }
    }
}

impl From<Trigger> for RawTrigger {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Always => Self::Keyword("always".into()),
            Trigger::Iterations(set) => Self::Many(set.into_iter().collect()),
        }
    }
}

/// A survey question definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub id: CompactString,
    /// The prompt shown to every participant.
    pub question: String,
    /// When the question fires.
    pub iterations: Trigger,
}

impl Question {
    /// Create a question definition.
    pub fn new(id: impl Into<CompactString>, question: impl Into<String>, iterations: Trigger) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            iterations,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CompactString, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(CompactString),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Number(id) => id.to_compact_string(),
    })
}

/// The answers collected for one firing of a survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    /// Identifier of the question definition.
    pub question_id: CompactString,
    /// The question text.
    pub question_content: String,
    /// Transcript length at which the question fired.
    pub iteration: usize,
    /// Every non-empty answer, in participant order.
    #[serde(default, alias = "chat_entry")]
    pub responses: Vec<ChatEntry>,
}

impl SurveyQuestion {
    /// Open a record for `question` fired at `iteration`.
    pub fn new(question: &Question, iteration: usize) -> Self {
        Self {
            question_id: question.id.clone(),
            question_content: question.question.clone(),
            iteration,
            responses: Vec::new(),
        }
    }
}
