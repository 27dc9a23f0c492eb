//! Chat entries and transcripts.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Display name of the system pseudo-participant.
pub const SYSTEM_NAME: &str = "System";

/// A single chat room: entries in the order they were appended.
pub type Transcript = Vec<ChatEntry>;

/// One transcript per batch lane.
pub type BatchTranscript = Vec<Transcript>;

/// Author of a chat entry.
///
/// Participants are referenced by their position in the experiment's
/// person list, the display name is carried along for readability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    /// The system pseudo-participant, author of survey prompts.
    System,
    /// A participant of the experiment.
    Person {
        /// Position in the experiment's person list.
        index: usize,
        /// Display name.
        name: CompactString,
    },
}

impl Entity {
    /// Reference the participant at `index`.
    pub fn person(index: usize, name: impl Into<CompactString>) -> Self {
        Self::Person {
            index,
            name: name.into(),
        }
    }

    /// Display name of the author.
    pub fn name(&self) -> &str {
        match self {
            Self::System => SYSTEM_NAME,
            Self::Person { name, .. } => name,
        }
    }

    /// Participant index, `None` for the system.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::System => None,
            Self::Person { index, .. } => Some(*index),
        }
    }

    /// Whether this is the system pseudo-participant.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

/// The record of one turn's output.
///
/// Entries are never mutated once they are part of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Who produced the entry.
    pub entity: Entity,
    /// What was fed to the generator, kept for auditing only.
    #[serde(default)]
    pub prompt: Value,
    /// The produced text.
    pub answer: String,
    /// Embedding from the mind of the agent who generated this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_embedding: Option<Value>,
    /// Informational wall-clock timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl ChatEntry {
    /// Create a new entry.
    pub fn new(entity: Entity, prompt: impl Into<Value>, answer: impl Into<String>) -> Self {
        Self {
            entity,
            prompt: prompt.into(),
            answer: answer.into(),
            original_embedding: None,
            time: None,
        }
    }

    /// A system-authored entry, used to inject survey prompts.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Entity::System, Value::Null, content)
    }

    /// Attach a timestamp.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Attach the generator's embedding.
    pub fn with_embedding(mut self, embedding: impl Into<Value>) -> Self {
        self.original_embedding = Some(embedding.into());
        self
    }
}

impl fmt::Display for ChatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(time) = &self.time {
            write!(f, "[{time}] ")?;
        }

        let name = self.entity.name();
        let prefixed = self
            .answer
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with(": "));
        if prefixed {
            f.write_str(&self.answer)
        } else {
            write!(f, "{name}: {}", self.answer)
        }
    }
}
