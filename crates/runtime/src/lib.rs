//! Colloquy runtime: the session orchestration loop.
//!
//! An [`Experiment`] owns the persons, the host, the end type, the
//! scenario and the survey questions. A [`SessionRoom`] borrows it and
//! drives a single transcript; a [`BatchSessionRoom`] drives one
//! transcript per lane of a [`BatchExperiment`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ccore::{MessageCount, RoundRobin};
//! use persons::Scripted;
//! use runtime::Experiment;
//!
//! let persons: Vec<Box<dyn ccore::Person>> = vec![
//!     Box::new(Scripted::says("alice", ["hi"])),
//!     Box::new(Scripted::says("bob", ["hello"])),
//! ];
//! let mut experiment = Experiment::new(
//!     persons,
//!     Box::new(RoundRobin::new(2, 0)?),
//!     Box::new(MessageCount::new(2)),
//!     "Two neighbours meet.",
//!     Vec::new(),
//! )?;
//! let output = experiment.run(None)?;
//! ```

pub use {
    batch::BatchSessionRoom,
    config::{ComponentConfig, ExperimentConfig, Loaded, PersonConfig, RoomConfig},
    experiment::{BatchExperiment, Experiment},
    registry::{Params, Registry},
    room::SessionRoom,
    scope::SurveyScope,
    snapshot::{ComponentState, RoomKind, Snapshot},
};

mod batch;
pub mod config;
mod experiment;
pub mod registry;
mod room;
mod scope;
mod snapshot;
