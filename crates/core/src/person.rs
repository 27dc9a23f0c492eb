//! Participant capabilities.
//!
//! The session engine never knows how an answer is produced. A human, a
//! script and a language model all look the same from here: given the
//! scenario and the transcript so far, return the next entry or pass.

use crate::{ChatEntry, Entity, Transcript};
use compact_str::CompactString;
use serde_json::Value;

/// Anything that can take part in a session.
pub trait Participant {
    /// Display name.
    fn name(&self) -> &str;
}

/// Context handed to a person for one turn.
#[derive(Debug, Clone)]
pub struct Turn<'a> {
    /// The experiment scenario.
    pub scenario: &'a str,
    /// Read-only transcript, possibly ending with a survey prompt.
    pub transcript: &'a [ChatEntry],
    /// The entity the produced entry must be attributed to.
    pub speaker: Entity,
}

impl<'a> Turn<'a> {
    /// Create a turn context.
    pub fn new(scenario: &'a str, transcript: &'a [ChatEntry], speaker: Entity) -> Self {
        Self {
            scenario,
            transcript,
            speaker,
        }
    }

    /// Replace the speaker's display name, keeping its index.
    pub fn named(mut self, name: impl Into<CompactString>) -> Self {
        if let Entity::Person { name: current, .. } = &mut self.speaker {
            *current = name.into();
        }
        self
    }

    /// Build an entry attributed to the speaker.
    pub fn reply(&self, prompt: impl Into<Value>, answer: impl Into<String>) -> ChatEntry {
        ChatEntry::new(self.speaker.clone(), prompt, answer)
    }
}

/// A single-transcript participant.
pub trait Person: Participant {
    /// Produce the entry for this turn, or `None` to pass.
    ///
    /// Must tolerate an empty transcript and one that ends with a
    /// system-authored survey prompt.
    fn generate_answer(&mut self, turn: Turn<'_>) -> anyhow::Result<Option<ChatEntry>>;
}

/// Context handed to a batched person for one turn across all lanes.
#[derive(Debug, Clone)]
pub struct BatchTurn<'a> {
    /// The experiment scenario.
    pub scenario: &'a str,
    /// One read-only transcript per lane.
    pub lanes: &'a [Transcript],
    /// The entity produced entries must be attributed to.
    pub speaker: Entity,
}

impl<'a> BatchTurn<'a> {
    /// Create a batched turn context.
    pub fn new(scenario: &'a str, lanes: &'a [Transcript], speaker: Entity) -> Self {
        Self {
            scenario,
            lanes,
            speaker,
        }
    }

    /// Number of lanes.
    pub fn width(&self) -> usize {
        self.lanes.len()
    }

    /// The single-lane view of lane `lane`.
    pub fn lane(&self, lane: usize) -> Option<Turn<'a>> {
        let transcript = self.lanes.get(lane)?;
        Some(Turn::new(self.scenario, transcript, self.speaker.clone()))
    }
}

/// A participant that answers for every lane of a batched session at once.
pub trait BatchedPerson: Participant {
    /// How many lanes this person serves.
    fn batch_count(&self) -> usize;

    /// Serve `batch_count` lanes from now on.
    ///
    /// Persons with a fixed width refuse any other count.
    fn set_batch_count(&mut self, batch_count: usize) -> anyhow::Result<()> {
        if batch_count != self.batch_count() {
            anyhow::bail!(
                "{} serves a fixed {} lanes",
                self.name(),
                self.batch_count()
            );
        }
        Ok(())
    }

    /// Produce one result per lane, in lane order.
    fn generate_answer(&mut self, turn: BatchTurn<'_>)
    -> anyhow::Result<Vec<Option<ChatEntry>>>;
}
