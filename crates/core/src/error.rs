//! Error taxonomy of the session engine.

use compact_str::CompactString;
use std::fmt::Debug;

/// Result alias with the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running a session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid setup, detected at construction time.
    #[error("configuration error: {0}")]
    Config(String),

    /// A collaborator broke the turn protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// A participant failed to generate an answer.
    #[error("{person} failed to generate an answer: {source}")]
    Generation {
        /// Name of the failing participant.
        person: CompactString,
        /// The originating failure.
        #[source]
        source: anyhow::Error,
    },

    /// Reading or writing a snapshot failed.
    #[error("snapshot i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding state failed.
    #[error("snapshot encoding: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build a protocol violation.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Wrap a participant failure.
    pub fn generation(person: impl Into<CompactString>, source: anyhow::Error) -> Self {
        Self::Generation {
            person: person.into(),
            source,
        }
    }
}

/// A run that failed, together with the output produced before the
/// failure.
#[derive(Debug, thiserror::Error)]
#[error("session aborted: {source}")]
pub struct Aborted<T: Debug> {
    /// Why the run stopped.
    #[source]
    pub source: Error,
    /// Output accumulated up to the failure.
    pub partial: T,
}
