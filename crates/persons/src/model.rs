//! A person backed by a text generator.

use crate::{Backends, Generator};
use ccore::{ChatEntry, Error, Participant, Person, Result, Turn};
use compact_str::CompactString;
use std::{fmt::Write, sync::Arc};

/// Renders the session into a plain prompt and lets a [`Generator`]
/// continue it. A blank completion passes the turn.
pub struct BackendPerson {
    name: CompactString,
    background_story: String,
    generator: Arc<dyn Generator>,
}

impl BackendPerson {
    /// Registry key.
    pub const NAME: &'static str = "backend";

    /// Create a person speaking through `generator`.
    pub fn new(
        name: impl Into<CompactString>,
        background_story: impl Into<String>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            name: name.into(),
            background_story: background_story.into(),
            generator,
        }
    }

    /// Create a person using the backend registered as `backend`.
    pub fn from_backends(
        name: impl Into<CompactString>,
        background_story: impl Into<String>,
        backends: &Backends,
        backend: &str,
    ) -> Result<Self> {
        let generator = backends
            .get(backend)
            .ok_or_else(|| Error::config(format!("backend '{backend}' is not loaded")))?;
        Ok(Self::new(name, background_story, generator))
    }

    /// Build the prompt for a turn.
    pub fn prompt(&self, turn: &Turn<'_>) -> String {
        let mut prompt = format!("The experiment scenario is: {}\n", turn.scenario);
        if !self.background_story.is_empty() {
            let _ = writeln!(prompt, "Your background story: {}", self.background_story);
        }
        for entry in turn.transcript {
            let _ = writeln!(prompt, "{}: {}", entry.entity.name(), entry.answer);
        }
        let _ = write!(prompt, "{}:", self.name);
        prompt
    }
}

impl Participant for BackendPerson {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Person for BackendPerson {
    fn generate_answer(&mut self, turn: Turn<'_>) -> anyhow::Result<Option<ChatEntry>> {
        let prompt = self.prompt(&turn);
        let answer = self.generator.generate(&prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        Ok(Some(turn.reply(prompt.as_str(), answer).with_time(time)))
    }
}
