//! Core abstractions for turn-based multi-agent sessions.
//!
//! A session is driven by three pluggable pieces: [`Host`] picks the next
//! speaker, a [`Person`] (or [`BatchedPerson`]) produces a [`ChatEntry`],
//! and an [`EndType`] decides when the session is over. The orchestration
//! loop itself lives in the runtime crate.

pub use {
    end::{EndType, MessageCount, Unanimity, Verdict},
    entry::{BatchTranscript, ChatEntry, Entity, SYSTEM_NAME, Transcript},
    error::{Aborted, Error, Result},
    host::{Host, RandomHost, RoundRobin},
    output::ExperimentOutput,
    person::{BatchTurn, BatchedPerson, Participant, Person, Turn},
    session::Session,
    survey::{AT_END, Question, SurveyQuestion, Trigger},
};

pub mod end;
mod entry;
mod error;
pub mod host;
mod output;
mod person;
mod session;
mod survey;
