//! End type based on unanimous votes.
//!
//! Every main-turn answer is a vote: its first non-blank character is
//! `0` (not guilty) or `1` (guilty). A round closes when the last
//! configured participant speaks; the round is the most recent entry of
//! each participant, i.e. the last `N` entries for `N` participants.

use super::EndType;
use crate::{ChatEntry, Error, Result, Session};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Vote `0`.
    NotGuilty,
    /// Vote `1`.
    Guilty,
}

impl Verdict {
    /// Parse the vote leading an answer.
    pub fn from_vote(answer: &str) -> Result<Self> {
        match answer.trim().chars().next() {
            Some('0') => Ok(Self::NotGuilty),
            Some('1') => Ok(Self::Guilty),
            _ => Err(Error::protocol(format!(
                "votes must start with '0' (not guilty) or '1' (guilty), got {answer:?}"
            ))),
        }
    }
}

/// Ends when the latest complete round is unanimous, or after
/// `max_num_msgs` messages.
///
/// Each lane of a batched session is tracked separately; the session ends
/// once every lane has reached unanimity. A recorded verdict is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unanimity {
    /// Message ceiling.
    pub max_num_msgs: usize,
    #[serde(default)]
    lanes: Vec<LaneVotes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LaneVotes {
    /// Transcript length at the last evaluation.
    evaluated: usize,
    completed_rounds: Vec<Vec<Verdict>>,
    verdict: Option<Verdict>,
}

impl Unanimity {
    /// Registry key.
    pub const NAME: &'static str = "unanimity";

    /// Create the predicate with a message ceiling.
    pub fn new(max_num_msgs: usize) -> Self {
        Self {
            max_num_msgs,
            lanes: Vec::new(),
        }
    }

    /// Restore from [`EndType::snapshot`] output.
    pub fn restore(state: Value) -> Result<Self> {
        Ok(serde_json::from_value(state)?)
    }

    /// Verdict of the first lane, if unanimity was reached.
    pub fn verdict(&self) -> Option<Verdict> {
        self.lanes.first().and_then(|lane| lane.verdict)
    }

    /// Verdict of every tracked lane.
    pub fn verdicts(&self) -> Vec<Option<Verdict>> {
        self.lanes.iter().map(|lane| lane.verdict).collect()
    }

    /// Completed rounds of the first lane.
    pub fn completed_rounds(&self) -> &[Vec<Verdict>] {
        self.lanes
            .first()
            .map(|lane| lane.completed_rounds.as_slice())
            .unwrap_or_default()
    }
}

impl LaneVotes {
    fn observe(&mut self, transcript: &[ChatEntry], persons: usize) -> Result<()> {
        let len = transcript.len();
        if self.verdict.is_some() || len == 0 || len == self.evaluated {
            return Ok(());
        }
        let last = &transcript[len - 1];
        let vote = Verdict::from_vote(&last.answer)?;
        self.evaluated = len;
        tracing::debug!(?vote, author = last.entity.name(), "processing vote");

        let closes_round = persons > 0 && last.entity.index() == Some(persons - 1);
        if !closes_round || len < persons {
            return Ok(());
        }

        let round = transcript[len - persons..]
            .iter()
            .map(|entry| Verdict::from_vote(&entry.answer))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(?round, "completed round");

        if round.iter().all(|v| *v == round[0]) {
            tracing::info!(verdict = ?round[0], "unanimity reached");
            self.verdict = Some(round[0]);
        }
        self.completed_rounds.push(round);
        Ok(())
    }
}

impl EndType for Unanimity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn did_end(&mut self, session: &Session<'_>) -> Result<bool> {
        let lanes = session.lanes();
        if self.lanes.len() < lanes.len() {
            self.lanes.resize_with(lanes.len(), LaneVotes::default);
        }

        for (votes, transcript) in self.lanes.iter_mut().zip(lanes) {
            votes.observe(transcript, session.persons())?;
        }

        let unanimous = !lanes.is_empty()
            && self.lanes[..lanes.len()]
                .iter()
                .all(|lane| lane.verdict.is_some());
        Ok(unanimous || session.session_length() >= self.max_num_msgs)
    }

    fn snapshot(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
