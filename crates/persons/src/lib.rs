//! Participants for colloquy sessions.
//!
//! - [`Scripted`] replays a fixed script, useful for tests and dry runs.
//! - [`AutoBatch`] turns one person per lane into a batched person.
//! - [`BackendPerson`] asks a named text [`Generator`] held by
//!   [`Backends`].
//! - [`OptIn`] lets a [`Gate`] decide when the wrapped person speaks.

pub use {
    backend::{Backends, Generator},
    batcher::AutoBatch,
    model::BackendPerson,
    opt_in::{Addressed, Gate, OptIn},
    scripted::Scripted,
};

mod backend;
mod batcher;
mod model;
mod opt_in;
mod scripted;
