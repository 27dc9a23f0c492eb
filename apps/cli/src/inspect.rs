//! Inspect command

use crate::run::render;
use anyhow::{Context, Result};
use clap::Args;
use runtime::Snapshot;
use std::path::PathBuf;

/// Inspect command arguments
#[derive(Debug, Args)]
pub struct InspectCmd {
    /// The snapshot written by `colloquy run --save`
    pub snapshot: PathBuf,

    /// Also print the host and end type state
    #[arg(short, long)]
    pub state: bool,
}

impl InspectCmd {
    /// Print the snapshot
    pub fn run(&self) -> Result<()> {
        let snapshot = Snapshot::load(&self.snapshot)
            .with_context(|| format!("failed to load snapshot {}", self.snapshot.display()))?;
        print!("{}", describe(&snapshot, self.state)?);
        Ok(())
    }
}

/// Human readable summary of a snapshot.
pub fn describe(snapshot: &Snapshot, state: bool) -> Result<String> {
    let mut described = format!(
        "{:?} session with {} lane(s)\nscenario: {}\npersons: {}\nhost: {}\nend type: {}\n",
        snapshot.kind,
        snapshot.lanes.len(),
        snapshot.scenario,
        snapshot.persons.join(", "),
        snapshot.host.class,
        snapshot.end_type.class,
    );
    if state {
        described.push_str(&format!(
            "host state: {}\nend type state: {}\n",
            serde_json::to_string(&snapshot.host.state)?,
            serde_json::to_string(&snapshot.end_type.state)?
        ));
    }
    described.push('\n');
    described.push_str(&render(&snapshot.outputs));
    Ok(described)
}
