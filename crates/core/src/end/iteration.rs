//! End type based on the number of messages.

use super::EndType;
use crate::{Result, Session};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Add, AddAssign};

/// Ends once the session reaches `max_num_msgs` entries.
///
/// `current_msg_num` only takes part in additive composition, it has no
/// effect on [`EndType::did_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCount {
    /// Number of messages after which the session ends.
    pub max_num_msgs: usize,
    /// Starting iteration, summed up when counts are added.
    #[serde(default)]
    pub current_msg_num: usize,
}

impl MessageCount {
    /// Registry key.
    pub const NAME: &'static str = "iteration";

    /// End after `max_num_msgs` messages.
    pub fn new(max_num_msgs: usize) -> Self {
        Self {
            max_num_msgs,
            current_msg_num: 0,
        }
    }

    /// Set the starting iteration.
    pub fn start_at(mut self, start_iteration: usize) -> Self {
        self.current_msg_num = start_iteration;
        self
    }

    /// Restore from [`EndType::snapshot`] output.
    pub fn restore(state: Value) -> Result<Self> {
        Ok(serde_json::from_value(state)?)
    }
}

impl EndType for MessageCount {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn did_end(&mut self, session: &Session<'_>) -> Result<bool> {
        Ok(session.session_length() >= self.max_num_msgs)
    }

    fn snapshot(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Add for MessageCount {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Add<usize> for MessageCount {
    type Output = Self;

    fn add(mut self, iterations: usize) -> Self {
        self += iterations;
        self
    }
}

impl AddAssign for MessageCount {
    fn add_assign(&mut self, other: Self) {
        self.current_msg_num += other.current_msg_num;
        self.max_num_msgs += other.max_num_msgs;
    }
}

impl AddAssign<usize> for MessageCount {
    fn add_assign(&mut self, iterations: usize) {
        self.current_msg_num += iterations;
    }
}
