//! Turn-scheduling policies.

use crate::{Error, Result};
pub use {random::RandomHost, round_robin::RoundRobin};
use serde_json::Value;

mod random;
mod round_robin;

/// Picks who speaks next.
///
/// Hosts work on participant indices into the experiment's person list
/// and never return an index outside of it.
pub trait Host {
    /// Registry key of the policy.
    fn name(&self) -> &'static str;

    /// Number of participants the host schedules over.
    fn persons(&self) -> usize;

    /// The participant whose turn it is.
    fn current(&self) -> usize;

    /// Return the current participant and move the cursor to the next
    /// speaker.
    fn next_speaker(&mut self) -> usize;

    /// Serialize the scheduler state.
    fn snapshot(&self) -> Result<Value>;
}

/// Validate a roster size and a start index.
pub(crate) fn check_roster(persons: usize, start_person_index: usize) -> Result<()> {
    if persons == 0 {
        return Err(Error::config("host needs at least one person"));
    }
    if start_person_index >= persons {
        return Err(Error::config(format!(
            "start person index {start_person_index} out of range for {persons} persons"
        )));
    }
    Ok(())
}
