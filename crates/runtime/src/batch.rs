//! Batched session room: one host and one end type over many lanes.

use crate::{
    BatchExperiment, ComponentState, Registry, RoomKind, Snapshot, SurveyScope,
    room::check_author,
};
use ccore::{
    Aborted, BatchTurn, BatchedPerson, ChatEntry, Entity, Error, ExperimentOutput, Result,
    Session, SurveyQuestion, Transcript,
};
use std::path::Path;

/// Drives `B` independent transcripts with a single scheduling and a
/// single termination decision per iteration.
///
/// The session length is the length of the shortest lane.
pub struct BatchSessionRoom<'e> {
    experiment: &'e mut BatchExperiment,
    lanes: Vec<Transcript>,
    outputs: Vec<ExperimentOutput>,
}

impl<'e> BatchSessionRoom<'e> {
    /// Open a fresh room as wide as the persons' batch count.
    pub fn new(experiment: &'e mut BatchExperiment) -> Result<Self> {
        let width = batch_width(&experiment.persons)?;
        tracing::debug!(width, "opened batch session room");
        Ok(Self {
            experiment,
            lanes: vec![Transcript::new(); width],
            outputs: vec![ExperimentOutput::new(); width],
        })
    }

    /// Rebuild a room from a batch snapshot.
    pub fn resume(
        experiment: &'e mut BatchExperiment,
        snapshot: Snapshot,
        registry: &Registry,
    ) -> Result<Self> {
        snapshot.expect_kind(RoomKind::Batch)?;
        let width = batch_width(&experiment.persons)?;
        if snapshot.lanes.len() != snapshot.outputs.len() || snapshot.lanes.len() != width {
            return Err(Error::config(format!(
                "snapshot holds {} lanes and {} outputs for persons serving {width} lanes",
                snapshot.lanes.len(),
                snapshot.outputs.len()
            )));
        }
        experiment.restore(&snapshot, registry)?;

        let room = Self {
            experiment,
            lanes: snapshot.lanes,
            outputs: snapshot.outputs,
        };
        tracing::info!(
            width = room.lanes.len(),
            length = room.session_length(),
            "resumed batch session room"
        );
        Ok(room)
    }

    /// The experiment this room runs.
    pub fn experiment(&self) -> &BatchExperiment {
        &*self.experiment
    }

    /// Number of lanes.
    pub fn batch_size(&self) -> usize {
        self.lanes.len()
    }

    /// Grow the room to `batch_size` lanes by appending empty ones.
    ///
    /// Every person is asked to serve the new width first; if one refuses
    /// the persons are set back and the room keeps its lanes. Setting the
    /// current size is a no-op; shrinking is rejected.
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<()> {
        let current = self.lanes.len();
        if batch_size < current {
            return Err(Error::config(format!(
                "cannot shrink batch from {current} to {batch_size} lanes"
            )));
        }
        if batch_size == current {
            return Ok(());
        }

        let persons = &mut self.experiment.persons;
        if let Err(err) = grow_persons(persons, batch_size) {
            for person in persons.iter_mut() {
                if person.batch_count() == current {
                    continue;
                }
                if let Err(undo) = person.set_batch_count(current) {
                    tracing::warn!(
                        "{} could not go back to {current} lanes: {undo}",
                        person.name()
                    );
                }
            }
            return Err(err);
        }

        tracing::info!(from = current, to = batch_size, "growing batch");
        self.lanes.resize_with(batch_size, Transcript::new);
        self.outputs.resize_with(batch_size, ExperimentOutput::new);
        Ok(())
    }

    /// The real transcripts, one per lane.
    pub fn lanes(&self) -> &[Transcript] {
        &self.lanes
    }

    /// Outputs accumulated so far, one per lane.
    pub fn outputs(&self) -> &[ExperimentOutput] {
        &self.outputs
    }

    /// Length of the shortest lane.
    pub fn session_length(&self) -> usize {
        self.session().session_length()
    }

    fn session(&self) -> Session<'_> {
        Session::batch(&self.lanes, self.experiment.persons.len())
    }

    /// Ask the end type whether the session is over on every lane.
    pub fn did_end(&mut self) -> Result<bool> {
        let session = Session::batch(&self.lanes, self.experiment.persons.len());
        let ended = self.experiment.end_type.did_end(&session)?;
        tracing::debug!(
            end_type = self.experiment.end_type.name(),
            length = session.session_length(),
            ended,
            "evaluated end type"
        );
        Ok(ended)
    }

    /// Let the host pick a speaker and append its entry on every lane
    /// it answered for.
    pub fn iterate(&mut self) -> Result<()> {
        let experiment = &mut *self.experiment;
        let index = experiment.host.next_speaker();
        let person = experiment
            .persons
            .get_mut(index)
            .ok_or_else(|| Error::protocol(format!("host picked unknown person {index}")))?;

        let turn = BatchTurn::new(
            &experiment.scenario,
            &self.lanes,
            Entity::person(index, person.name()),
        );
        let results = answer(&mut **person, turn)?;
        for entry in results.iter().flatten() {
            check_author(entry, index, person.name())?;
        }

        for (lane, result) in results.into_iter().enumerate() {
            let Some(entry) = result else {
                tracing::warn!(lane, "{} passed the turn", person.name());
                continue;
            };
            tracing::info!(lane, "{}: {}", entry.entity.name(), entry.answer);
            self.lanes[lane].push(entry.clone());
            self.outputs[lane].chat_entries.push(entry);
        }
        Ok(())
    }

    /// Ask every survey question that fires at the current session
    /// length, on all lanes at once.
    pub fn ask_survey_questions_if_needed(&mut self, ending: bool) -> Result<()> {
        let length = self.session_length();
        let experiment = &mut *self.experiment;

        for question in &experiment.survey_questions {
            if !question.iterations.fires(length, ending) {
                continue;
            }
            tracing::info!(
                question = %question.id,
                length,
                lanes = self.lanes.len(),
                "asking survey question"
            );

            for output in &mut self.outputs {
                output
                    .survey_questions
                    .push(SurveyQuestion::new(question, length));
            }
            let scope = SurveyScope::open(
                &mut self.lanes,
                ChatEntry::system(question.question.as_str()),
            );
            for (index, person) in experiment.persons.iter_mut().enumerate() {
                let turn = BatchTurn::new(
                    &experiment.scenario,
                    scope.lanes(),
                    Entity::person(index, person.name()),
                );
                let results = answer(&mut **person, turn)?;
                for entry in results.iter().flatten() {
                    check_author(entry, index, person.name())?;
                }
                for (output, result) in self.outputs.iter_mut().zip(results) {
                    let Some(entry) = result else {
                        continue;
                    };
                    if let Some(record) = output.survey_questions.last_mut() {
                        record.responses.push(entry);
                    }
                }
            }
        }
        Ok(())
    }

    /// Capture the room state.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let experiment = &*self.experiment;
        Ok(Snapshot {
            kind: RoomKind::Batch,
            scenario: experiment.scenario.clone(),
            persons: experiment.names(),
            survey_questions: experiment.survey_questions.clone(),
            host: ComponentState::host(experiment.host())?,
            end_type: ComponentState::end_type(experiment.end_type())?,
            lanes: self.lanes.clone(),
            outputs: self.outputs.clone(),
        })
    }

    /// Run the session to its end, returning one output per lane.
    pub fn run(
        mut self,
        save_session: Option<&Path>,
    ) -> std::result::Result<Vec<ExperimentOutput>, Aborted<Vec<ExperimentOutput>>> {
        tracing::info!(
            persons = self.experiment.persons.len(),
            lanes = self.lanes.len(),
            "starting batch session: {}",
            self.experiment.scenario
        );

        let finished = self.drive().and_then(|()| match save_session {
            Some(path) => self.snapshot()?.save(path),
            None => Ok(()),
        });
        if let Err(source) = finished {
            tracing::error!("batch session aborted: {source}");
            return Err(Aborted {
                source,
                partial: self.outputs,
            });
        }

        tracing::info!(
            lanes = self.outputs.len(),
            length = self.session_length(),
            "batch session finished"
        );
        Ok(self.outputs)
    }

    fn drive(&mut self) -> Result<()> {
        let mut ended = self.did_end()?;
        while !ended {
            self.ask_survey_questions_if_needed(false)?;
            self.iterate()?;
            ended = self.did_end()?;
        }
        self.ask_survey_questions_if_needed(true)
    }
}

/// Shared batch width of `persons`.
fn batch_width(persons: &[Box<dyn BatchedPerson>]) -> Result<usize> {
    let Some(first) = persons.first() else {
        return Err(Error::config("a batch experiment needs at least one person"));
    };
    let width = first.batch_count();
    if width == 0 {
        return Err(Error::config(format!("{} serves no lanes", first.name())));
    }
    if let Some(other) = persons.iter().find(|p| p.batch_count() != width) {
        return Err(Error::config(format!(
            "{} serves {} lanes but {} serves {width}",
            other.name(),
            other.batch_count(),
            first.name()
        )));
    }
    Ok(width)
}

/// Ask every person to serve `batch_size` lanes.
fn grow_persons(persons: &mut [Box<dyn BatchedPerson>], batch_size: usize) -> Result<()> {
    for person in persons.iter_mut() {
        person.set_batch_count(batch_size).map_err(|source| {
            Error::config(format!(
                "{} cannot serve {batch_size} lanes: {source}",
                person.name()
            ))
        })?;
    }
    let width = batch_width(persons)?;
    if width != batch_size {
        return Err(Error::config(format!(
            "persons serve {width} lanes after growing to {batch_size}"
        )));
    }
    Ok(())
}

/// Run one batched generation and check it answered every lane.
fn answer(
    person: &mut dyn BatchedPerson,
    turn: BatchTurn<'_>,
) -> Result<Vec<Option<ChatEntry>>> {
    let width = turn.width();
    let results = person
        .generate_answer(turn)
        .map_err(|source| Error::generation(person.name(), source))?;
    if results.len() != width {
        return Err(Error::protocol(format!(
            "{} returned {} results for {width} lanes",
            person.name(),
            results.len()
        )));
    }
    Ok(results)
}
