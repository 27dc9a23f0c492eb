//! Termination predicates.
//!
//! An [`EndType`] is asked once per loop iteration whether the session is
//! over. Implementations keep their state private and must answer the
//! same way when asked twice about the same session state.

use crate::{Result, Session};
pub use {
    iteration::MessageCount,
    unanimity::{Unanimity, Verdict},
};
use serde_json::Value;

mod iteration;
mod unanimity;

/// Decides whether a session should stop.
pub trait EndType {
    /// Registry key of the predicate.
    fn name(&self) -> &'static str;

    /// Whether the session has ended.
    fn did_end(&mut self, session: &Session<'_>) -> Result<bool>;

    /// Serialize the predicate state.
    fn snapshot(&self) -> Result<Value>;
}
