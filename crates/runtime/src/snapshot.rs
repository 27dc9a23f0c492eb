//! Persisted session state.

use ccore::{EndType, Error, ExperimentOutput, Host, Question, Result, Transcript};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Serialized state of a host or an end type, keyed by its registry
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentState {
    /// Registry key used to restore the component.
    pub class: CompactString,
    /// Component specific state.
    pub state: Value,
}

impl ComponentState {
    /// Capture a host.
    pub fn host(host: &dyn Host) -> Result<Self> {
        Ok(Self {
            class: host.name().into(),
            state: host.snapshot()?,
        })
    }

    /// Capture an end type.
    pub fn end_type(end_type: &dyn EndType) -> Result<Self> {
        Ok(Self {
            class: end_type.name().into(),
            state: end_type.snapshot()?,
        })
    }
}

/// Which room produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// A single-transcript room.
    Base,
    /// A batched room.
    Batch,
}

/// Everything needed to inspect or resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: RoomKind,
    pub scenario: String,
    /// Participant names, in experiment order.
    pub persons: Vec<CompactString>,
    #[serde(default)]
    pub survey_questions: Vec<Question>,
    pub host: ComponentState,
    pub end_type: ComponentState,
    /// One transcript per lane; a single room has exactly one.
    pub lanes: Vec<Transcript>,
    /// One output per lane.
    pub outputs: Vec<ExperimentOutput>,
}

impl Snapshot {
    /// Write the snapshot as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        tracing::info!("saved session snapshot to {}", path.display());
        Ok(())
    }

    /// Read a snapshot written by [`Snapshot::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        if snapshot.lanes.is_empty() || snapshot.lanes.len() != snapshot.outputs.len() {
            return Err(Error::config(format!(
                "snapshot {} has {} lanes and {} outputs",
                path.display(),
                snapshot.lanes.len(),
                snapshot.outputs.len()
            )));
        }
        Ok(snapshot)
    }

    /// Fail unless the snapshot was taken by a room of `kind`.
    pub(crate) fn expect_kind(&self, kind: RoomKind) -> Result<()> {
        if self.kind != kind {
            return Err(Error::config(format!(
                "snapshot was taken by a {:?} room, not a {kind:?} room",
                self.kind
            )));
        }
        Ok(())
    }
}
