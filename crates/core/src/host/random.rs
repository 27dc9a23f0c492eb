//! Random host.

use super::{Host, check_roster};
use crate::{Error, Result};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Draws the next speaker uniformly, with replacement.
///
/// The generator is seeded and the number of draws is tracked, so a
/// restored host continues the exact same sequence.
#[derive(Debug, Clone)]
pub struct RandomHost {
    state: State,
    rng: StdRng,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct State {
    persons: usize,
    current: usize,
    seed: u64,
    draws: u64,
}

impl RandomHost {
    /// Registry key.
    pub const NAME: &'static str = "random";

    /// Create a random host; a missing seed is drawn from the thread rng.
    pub fn new(persons: usize, start_person_index: usize, seed: Option<u64>) -> Result<Self> {
        check_roster(persons, start_person_index)?;
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            state: State {
                persons,
                current: start_person_index,
                seed,
                draws: 0,
            },
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Restore a host from [`Host::snapshot`] output.
    pub fn restore(state: Value) -> Result<Self> {
        let state: State = serde_json::from_value(state)?;
        check_roster(state.persons, state.current)
            .map_err(|e| Error::config(format!("invalid random host state: {e}")))?;

        let mut rng = StdRng::seed_from_u64(state.seed);
        for _ in 0..state.draws {
            let _ = rng.random_range(0..state.persons);
        }
        Ok(Self { state, rng })
    }

    /// The seed driving the draws.
    pub fn seed(&self) -> u64 {
        self.state.seed
    }
}

impl Host for RandomHost {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn persons(&self) -> usize {
        self.state.persons
    }

    fn current(&self) -> usize {
        self.state.current
    }

    fn next_speaker(&mut self) -> usize {
        let speaker = self.state.current;
        self.state.current = self.rng.random_range(0..self.state.persons);
        self.state.draws += 1;
        tracing::debug!(speaker, next = self.state.current, "random turn");
        speaker
    }

    fn snapshot(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.state)?)
    }
}
