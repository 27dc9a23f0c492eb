//! Read-only session view for end types.

use crate::Transcript;

/// What an [`EndType`](crate::EndType) may look at.
///
/// A single room is a session with exactly one lane.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    lanes: &'a [Transcript],
    persons: usize,
}

impl<'a> Session<'a> {
    /// View of a single-transcript session.
    pub fn single(transcript: &'a Transcript, persons: usize) -> Self {
        Self {
            lanes: std::slice::from_ref(transcript),
            persons,
        }
    }

    /// View of a batched session.
    pub fn batch(lanes: &'a [Transcript], persons: usize) -> Self {
        Self { lanes, persons }
    }

    /// All lanes of the session.
    pub fn lanes(&self) -> &'a [Transcript] {
        self.lanes
    }

    /// Number of configured participants.
    pub fn persons(&self) -> usize {
        self.persons
    }

    /// Length of the shortest lane.
    pub fn session_length(&self) -> usize {
        self.lanes.iter().map(Vec::len).min().unwrap_or(0)
    }
}
