//! Experiment: everything a session room needs to run.

use crate::{BatchSessionRoom, Registry, SessionRoom, Snapshot};
use ccore::{
    Aborted, BatchedPerson, EndType, Error, ExperimentOutput, Host, Participant, Person, Question,
    Result, RoundRobin, Unanimity,
};
use compact_str::CompactString;
use std::path::Path;

/// Persons, scheduling policy, end type, scenario and survey questions of
/// one experiment.
///
/// The experiment owns its parts for its whole lifetime; session rooms
/// only borrow it.
pub struct Experiment<P: ?Sized + Participant = dyn Person> {
    pub(crate) persons: Vec<Box<P>>,
    pub(crate) host: Box<dyn Host>,
    pub(crate) end_type: Box<dyn EndType>,
    pub(crate) scenario: String,
    pub(crate) survey_questions: Vec<Question>,
}

/// An experiment over batched persons, run by a [`BatchSessionRoom`].
pub type BatchExperiment = Experiment<dyn BatchedPerson>;

impl<P: ?Sized + Participant> Experiment<P> {
    /// Assemble an experiment.
    ///
    /// Fails if there are no persons or the host schedules over a
    /// different number of persons.
    pub fn new(
        persons: Vec<Box<P>>,
        host: Box<dyn Host>,
        end_type: Box<dyn EndType>,
        scenario: impl Into<String>,
        survey_questions: Vec<Question>,
    ) -> Result<Self> {
        if persons.is_empty() {
            return Err(Error::config("an experiment needs at least one person"));
        }
        if host.persons() != persons.len() {
            return Err(Error::config(format!(
                "host schedules {} persons but the experiment has {}",
                host.persons(),
                persons.len()
            )));
        }
        if end_type.name() == Unanimity::NAME && host.name() != RoundRobin::NAME {
            tracing::warn!(
                host = host.name(),
                "unanimity rounds close on the last person's turn, \
                 which a non round-robin host may never align with"
            );
        }

        Ok(Self {
            persons,
            host,
            end_type,
            scenario: scenario.into(),
            survey_questions,
        })
    }

    /// The participants, in configured order.
    pub fn persons(&self) -> &[Box<P>] {
        &self.persons
    }

    /// Display names of the participants.
    pub fn names(&self) -> Vec<CompactString> {
        self.persons
            .iter()
            .map(|p| CompactString::from(p.name()))
            .collect()
    }

    /// The scheduling policy.
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// The termination predicate.
    pub fn end_type(&self) -> &dyn EndType {
        self.end_type.as_ref()
    }

    /// The experiment scenario.
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Survey question definitions, in declaration order.
    pub fn survey_questions(&self) -> &[Question] {
        &self.survey_questions
    }

    /// Whether any survey question is configured.
    pub fn has_survey_questions(&self) -> bool {
        !self.survey_questions.is_empty()
    }

    /// Take over host, end type, scenario and survey questions from a
    /// snapshot taken with the same persons.
    pub(crate) fn restore(&mut self, snapshot: &Snapshot, registry: &Registry) -> Result<()> {
        let names = self.names();
        if snapshot.persons != names {
            return Err(Error::config(format!(
                "snapshot persons {:?} do not match experiment persons {names:?}",
                snapshot.persons
            )));
        }

        let host = registry.restore_host(&snapshot.host)?;
        if host.persons() != self.persons.len() {
            return Err(Error::config("snapshot host does not match the persons"));
        }
        self.host = host;
        self.end_type = registry.restore_end_type(&snapshot.end_type)?;
        self.scenario = snapshot.scenario.clone();
        self.survey_questions = snapshot.survey_questions.clone();
        Ok(())
    }
}

impl Experiment {
    /// Run a fresh session, optionally saving a snapshot afterwards.
    pub fn run(
        &mut self,
        save_session: Option<&Path>,
    ) -> std::result::Result<ExperimentOutput, Aborted<ExperimentOutput>> {
        SessionRoom::new(self).run(save_session)
    }
}

impl BatchExperiment {
    /// Batch width of the first person.
    pub fn batch_count(&self) -> usize {
        self.persons.first().map_or(0, |p| p.batch_count())
    }

    /// Run a fresh batched session, optionally saving a snapshot
    /// afterwards.
    pub fn run(
        &mut self,
        save_session: Option<&Path>,
    ) -> std::result::Result<Vec<ExperimentOutput>, Aborted<Vec<ExperimentOutput>>> {
        match BatchSessionRoom::new(self) {
            Ok(room) => room.run(save_session),
            Err(source) => Err(Aborted {
                source,
                partial: Vec::new(),
            }),
        }
    }
}
