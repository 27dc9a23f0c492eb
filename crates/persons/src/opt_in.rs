//! Persons that decide for themselves whether to speak.

use ccore::{ChatEntry, Participant, Person, Turn};

/// Decides whether a person answers on a turn.
pub trait Gate {
    /// Whether to generate an answer for `turn`.
    fn should_generate_answer(&mut self, turn: &Turn<'_>) -> anyhow::Result<bool>;
}

impl<F> Gate for F
where
    F: FnMut(&Turn<'_>) -> bool,
{
    fn should_generate_answer(&mut self, turn: &Turn<'_>) -> anyhow::Result<bool> {
        Ok(self(turn))
    }
}

/// Opens on the first turn, on survey prompts, and whenever the last
/// entry mentions the speaker by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Addressed;

impl Gate for Addressed {
    fn should_generate_answer(&mut self, turn: &Turn<'_>) -> anyhow::Result<bool> {
        let Some(last) = turn.transcript.last() else {
            return Ok(true);
        };
        Ok(last.entity.is_system() || last.answer.contains(turn.speaker.name()))
    }
}

/// Wraps a person behind a [`Gate`]; a closed gate passes the turn.
pub struct OptIn<P, G> {
    person: P,
    gate: G,
}

impl<P: Person, G: Gate> OptIn<P, G> {
    /// Let `gate` decide when `person` speaks.
    pub fn new(person: P, gate: G) -> Self {
        Self { person, gate }
    }

    /// The wrapped person.
    pub fn into_inner(self) -> P {
        self.person
    }
}

impl<P: Person, G> Participant for OptIn<P, G> {
    fn name(&self) -> &str {
        self.person.name()
    }
}

impl<P: Person, G: Gate> Person for OptIn<P, G> {
    fn generate_answer(&mut self, turn: Turn<'_>) -> anyhow::Result<Option<ChatEntry>> {
        if !self.gate.should_generate_answer(&turn)? {
            tracing::debug!("{} holds back", self.person.name());
            return Ok(None);
        }
        self.person.generate_answer(turn)
    }
}
