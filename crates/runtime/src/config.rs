//! Experiment files.
//!
//! An experiment file lists the persons, the session room, the host, the
//! end type and the scenario with its survey questions. JSON files use
//! the camelCase keys of the original experiment format; TOML files may
//! use snake_case ones.
//!
//! ```json
//! {
//!   "persons": [{ "class": "scripted", "name": "alice", "things_to_say": ["hi"] }],
//!   "sessionRoom": "base",
//!   "host": { "class": "round_robin", "start_person_index": 0 },
//!   "endType": { "class": "iteration", "max_num_msgs": 1 },
//!   "experiment": { "scenario": "A quiet bar.", "survey_questions": [] }
//! }
//! ```

use crate::{
    BatchExperiment, BatchSessionRoom, Experiment, Params, Registry, SessionRoom, Snapshot,
};
use anyhow::{Context, Result};
use ccore::{Aborted, BatchedPerson, Error, ExperimentOutput, Person, Question};
use compact_str::CompactString;
use persons::Backends;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A parsed experiment file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Participants, in speaking order.
    pub persons: Vec<PersonConfig>,
    /// Room kind, single by default.
    #[serde(rename = "sessionRoom", alias = "session_room", default)]
    pub session_room: RoomConfig,
    /// Scheduling policy.
    pub host: ComponentConfig,
    /// Termination predicate.
    #[serde(rename = "endType", alias = "end_type")]
    pub end_type: ComponentConfig,
    /// Scenario and survey questions.
    pub experiment: ExperimentSection,
}

/// A host or end type entry: a registry key plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub class: CompactString,
    #[serde(flatten)]
    pub params: Params,
}

/// A person entry.
///
/// In batch rooms a single-lane class may list `lanes`: one override map
/// per lane, merged over the shared parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonConfig {
    pub class: CompactString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lanes: Option<Vec<Params>>,
    #[serde(flatten)]
    pub params: Params,
}

impl PersonConfig {
    /// The `name` parameter, falling back to the class.
    pub fn name(&self) -> &str {
        self.params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&self.class)
    }
}

/// The `experiment` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSection {
    pub scenario: String,
    #[serde(default)]
    pub survey_questions: Vec<Question>,
}

/// Which session room runs the experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRoom", into = "RawRoom")]
pub enum RoomConfig {
    /// A single transcript.
    #[default]
    Base,
    /// One transcript per lane. A configured size must match the
    /// persons' batch count.
    Batch { batch_size: Option<usize> },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRoom {
    Name(String),
    Table {
        #[serde(alias = "name")]
        class: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        batch_size: Option<usize>,
    },
}

impl TryFrom<RawRoom> for RoomConfig {
    type Error = String;

    fn try_from(raw: RawRoom) -> std::result::Result<Self, Self::Error> {
        let (class, batch_size) = match raw {
            RawRoom::Name(class) => (class, None),
            RawRoom::Table { class, batch_size } => (class, batch_size),
        };
        let key = class.to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "base" | "session_room" | "sessionroom" if batch_size.is_none() => Ok(Self::Base),
            "base" | "session_room" | "sessionroom" => {
                Err("a base session room takes no batch_size".into())
            }
            "batch" | "batch_session_room" | "batchsessionroom" => Ok(Self::Batch { batch_size }),
            _ => Err(format!("unknown session room {class:?}")),
        }
    }
}

impl From<RoomConfig> for RawRoom {
    fn from(room: RoomConfig) -> Self {
        match room {
            RoomConfig::Base => Self::Name("base".into()),
            RoomConfig::Batch { batch_size: None } => Self::Name("batch".into()),
            RoomConfig::Batch { batch_size } => Self::Table {
                class: "batch".into(),
                batch_size,
            },
        }
    }
}

impl ExperimentConfig {
    /// Parse a JSON experiment.
    pub fn from_json(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source).context("invalid experiment json")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML experiment.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("invalid experiment toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Read an experiment file, picking the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&source),
            _ => Self::from_json(&source),
        };
        parsed.with_context(|| format!("failed to load experiment {}", path.display()))
    }

    fn validate(&self) -> ccore::Result<()> {
        if self.persons.is_empty() {
            return Err(Error::config("no persons"));
        }
        if self.experiment.scenario.trim().is_empty() {
            return Err(Error::config("no scenario given"));
        }
        Ok(())
    }

    /// Build the experiment with components from `registry`.
    ///
    /// Backend persons take their generators from `backends`.
    pub fn build(&self, registry: &Registry, backends: &Backends) -> Result<Loaded> {
        let questions = self.experiment.survey_questions.clone();
        let scenario = self.experiment.scenario.clone();
        let end_type = registry.build_end_type(&self.end_type.class, &self.end_type.params)?;
        let host = registry.build_host(&self.host.class, &self.host.params, self.persons.len())?;

        let loaded = match self.session_room {
            RoomConfig::Base => {
                let persons = self
                    .persons
                    .iter()
                    .map(|person| self.single(person, registry, backends))
                    .collect::<ccore::Result<Vec<_>>>()?;
                Loaded::Single(Experiment::new(persons, host, end_type, scenario, questions)?)
            }
            RoomConfig::Batch { batch_size } => {
                let persons = self
                    .persons
                    .iter()
                    .map(|person| self.batched(person, registry, backends))
                    .collect::<ccore::Result<Vec<_>>>()?;
                let experiment = Experiment::new(persons, host, end_type, scenario, questions)?;
                let width = experiment.batch_count();
                if let Some(size) = batch_size.filter(|&size| size != width) {
                    return Err(Error::config(format!(
                        "batch_size {size} does not match the persons' batch count {width}"
                    ))
                    .into());
                }
                Loaded::Batch(experiment)
            }
        };
        tracing::info!(
            persons = self.persons.len(),
            host = %self.host.class,
            end_type = %self.end_type.class,
            "loaded experiment"
        );
        Ok(loaded)
    }

    fn single(
        &self,
        person: &PersonConfig,
        registry: &Registry,
        backends: &Backends,
    ) -> ccore::Result<Box<dyn Person>> {
        if person.lanes.is_some() || registry.is_batched(&person.class) {
            return Err(Error::config(format!(
                "{} is batched but the session room is not",
                person.name()
            )));
        }
        registry.build_person(&person.class, &person.params, backends)
    }

    fn batched(
        &self,
        person: &PersonConfig,
        registry: &Registry,
        backends: &Backends,
    ) -> ccore::Result<Box<dyn BatchedPerson>> {
        match &person.lanes {
            Some(lanes) => registry.build_auto_batch(
                &person.class,
                person.name(),
                &person.params,
                lanes,
                backends,
            ),
            None if registry.is_batched(&person.class) => {
                registry.build_batched(&person.class, &person.params, backends)
            }
            None => Err(Error::config(format!(
                "{} must be a batched class or list its lanes",
                person.name()
            ))),
        }
    }
}

/// A built experiment, ready to run in the room its file asked for.
pub enum Loaded {
    Single(Experiment),
    Batch(BatchExperiment),
}

/// Result of running a [`Loaded`] experiment: one output per lane.
pub type Outcome =
    std::result::Result<Vec<ExperimentOutput>, Aborted<Vec<ExperimentOutput>>>;

impl Loaded {
    /// Run a fresh session.
    pub fn run(&mut self, save_session: Option<&Path>) -> Outcome {
        match self {
            Self::Single(experiment) => single_lane(experiment.run(save_session)),
            Self::Batch(experiment) => experiment.run(save_session),
        }
    }

    /// Continue the session captured in `snapshot`.
    pub fn resume(
        &mut self,
        snapshot: Snapshot,
        registry: &Registry,
        save_session: Option<&Path>,
    ) -> Outcome {
        let aborted = |source: Error| -> Aborted<Vec<ExperimentOutput>> {
            Aborted {
                source,
                partial: Vec::new(),
            }
        };
        match self {
            Self::Single(experiment) => {
                let room = SessionRoom::resume(experiment, snapshot, registry).map_err(aborted)?;
                single_lane(room.run(save_session))
            }
            Self::Batch(experiment) => {
                BatchSessionRoom::resume(experiment, snapshot, registry)
                    .map_err(aborted)?
                    .run(save_session)
            }
        }
    }
}

fn single_lane(
    outcome: std::result::Result<ExperimentOutput, Aborted<ExperimentOutput>>,
) -> Outcome {
    outcome.map(|output| vec![output]).map_err(|aborted| Aborted {
        source: aborted.source,
        partial: vec![aborted.partial],
    })
}
