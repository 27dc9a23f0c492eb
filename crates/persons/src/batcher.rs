//! Batch adapter for single-lane persons.

use ccore::{BatchTurn, BatchedPerson, ChatEntry, Error, Participant, Person, Result};
use compact_str::CompactString;

/// Serves lane `i` of a batched session with person `i`.
pub struct AutoBatch {
    tag: CompactString,
    persons: Vec<Box<dyn Person>>,
}

impl AutoBatch {
    /// Wrap one person per lane under a shared tag.
    pub fn new(tag: impl Into<CompactString>, persons: Vec<Box<dyn Person>>) -> Result<Self> {
        let tag = tag.into();
        if persons.is_empty() {
            return Err(Error::config(format!("batch person '{tag}' has no lanes")));
        }
        Ok(Self { tag, persons })
    }

    /// Display names of the per-lane persons.
    pub fn names(&self) -> Vec<&str> {
        self.persons.iter().map(|p| p.name()).collect()
    }
}

impl Participant for AutoBatch {
    fn name(&self) -> &str {
        &self.tag
    }
}

impl BatchedPerson for AutoBatch {
    fn batch_count(&self) -> usize {
        self.persons.len()
    }

    fn generate_answer(
        &mut self,
        turn: BatchTurn<'_>,
    ) -> anyhow::Result<Vec<Option<ChatEntry>>> {
        let mut entries = Vec::with_capacity(self.persons.len());
        for (lane, person) in self.persons.iter_mut().enumerate() {
            let Some(lane_turn) = turn.lane(lane) else {
                break;
            };
            let lane_turn = lane_turn.named(person.name());
            entries.push(person.generate_answer(lane_turn)?);
        }
        Ok(entries)
    }
}
