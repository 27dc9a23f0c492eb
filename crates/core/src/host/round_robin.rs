//! Round-robin host.

use super::{Host, check_roster};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cycles through the participants with a fixed stride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobin {
    persons: usize,
    current: usize,
    skip: usize,
}

impl RoundRobin {
    /// Registry key.
    pub const NAME: &'static str = "round_robin";

    /// Create a host cycling with stride 1.
    pub fn new(persons: usize, start_person_index: usize) -> Result<Self> {
        Self::with_skip(persons, start_person_index, 1)
    }

    /// Create a host advancing `skip` participants per turn.
    pub fn with_skip(persons: usize, start_person_index: usize, skip: usize) -> Result<Self> {
        check_roster(persons, start_person_index)?;
        Ok(Self {
            persons,
            current: start_person_index,
            skip,
        })
    }

    /// Restore a host from [`Host::snapshot`] output.
    pub fn restore(state: Value) -> Result<Self> {
        let host: Self = serde_json::from_value(state)?;
        check_roster(host.persons, host.current)
            .map_err(|e| Error::config(format!("invalid round robin state: {e}")))?;
        Ok(host)
    }

    /// The configured stride.
    pub fn skip(&self) -> usize {
        self.skip
    }
}

impl Host for RoundRobin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn persons(&self) -> usize {
        self.persons
    }

    fn current(&self) -> usize {
        self.current
    }

    fn next_speaker(&mut self) -> usize {
        let speaker = self.current;
        self.current = (self.current + self.skip % self.persons) % self.persons;
        tracing::debug!(speaker, next = self.current, "round robin turn");
        speaker
    }

    fn snapshot(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
