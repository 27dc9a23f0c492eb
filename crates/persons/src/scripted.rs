//! A person that says exactly what it was told to.

use ccore::{ChatEntry, Participant, Person, Turn};
use compact_str::CompactString;

/// Replays a script line by line.
///
/// A `None` line passes the turn. Asking for more lines than the script
/// holds is a generation failure.
#[derive(Debug, Clone)]
pub struct Scripted {
    name: CompactString,
    things_to_say: Vec<Option<String>>,
    cursor: usize,
}

impl Scripted {
    /// Registry key.
    pub const NAME: &'static str = "scripted";

    /// Create a scripted person; `None` lines pass the turn.
    pub fn new(
        name: impl Into<CompactString>,
        things_to_say: impl IntoIterator<Item = Option<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            things_to_say: things_to_say.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Create a scripted person that speaks on every turn.
    pub fn says<S: Into<String>>(
        name: impl Into<CompactString>,
        lines: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(name, lines.into_iter().map(|line| Some(line.into())))
    }

    /// Number of lines not yet said.
    pub fn remaining(&self) -> usize {
        self.things_to_say.len().saturating_sub(self.cursor)
    }
}

impl Participant for Scripted {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Person for Scripted {
    fn generate_answer(&mut self, turn: Turn<'_>) -> anyhow::Result<Option<ChatEntry>> {
        let Some(line) = self.things_to_say.get(self.cursor) else {
            anyhow::bail!("{} has nothing left to say", self.name);
        };
        self.cursor += 1;
        Ok(line.as_ref().map(|line| turn.reply("no_prompt", line.as_str())))
    }
}
