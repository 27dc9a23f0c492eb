//! Single-transcript session room.

use crate::{ComponentState, Experiment, Registry, RoomKind, Snapshot, SurveyScope};
use ccore::{
    Aborted, ChatEntry, Entity, Error, ExperimentOutput, Result, Session, SurveyQuestion,
    Transcript, Turn,
};
use std::path::Path;

/// Drives one transcript through survey, turn and termination phases
/// until the end type reports the session as over.
pub struct SessionRoom<'e> {
    experiment: &'e mut Experiment,
    transcript: Transcript,
    output: ExperimentOutput,
}

impl<'e> SessionRoom<'e> {
    /// Open a fresh room over `experiment`.
    pub fn new(experiment: &'e mut Experiment) -> Self {
        Self {
            experiment,
            transcript: Transcript::new(),
            output: ExperimentOutput::new(),
        }
    }

    /// Rebuild a room from a snapshot.
    ///
    /// The experiment's persons must match the snapshot by name and
    /// count; its host, end type, scenario and survey questions are
    /// replaced by the snapshot's.
    pub fn resume(
        experiment: &'e mut Experiment,
        snapshot: Snapshot,
        registry: &Registry,
    ) -> Result<Self> {
        snapshot.expect_kind(RoomKind::Base)?;
        if snapshot.lanes.len() != 1 || snapshot.outputs.len() != 1 {
            return Err(Error::config(
                "a single room snapshot must hold exactly one transcript",
            ));
        }
        experiment.restore(&snapshot, registry)?;

        let Snapshot { lanes, outputs, .. } = snapshot;
        let room = Self {
            experiment,
            transcript: lanes.into_iter().next().unwrap_or_default(),
            output: outputs.into_iter().next().unwrap_or_default(),
        };
        tracing::info!(length = room.transcript.len(), "resumed session room");
        Ok(room)
    }

    /// The experiment this room runs.
    pub fn experiment(&self) -> &Experiment {
        &*self.experiment
    }

    /// The real transcript.
    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    /// Output accumulated so far.
    pub fn output(&self) -> &ExperimentOutput {
        &self.output
    }

    /// Length of the real transcript.
    pub fn session_length(&self) -> usize {
        self.transcript.len()
    }

    /// Ask the end type whether the session is over.
    pub fn did_end(&mut self) -> Result<bool> {
        let session = Session::single(&self.transcript, self.experiment.persons.len());
        let ended = self.experiment.end_type.did_end(&session)?;
        tracing::debug!(
            end_type = self.experiment.end_type.name(),
            length = session.session_length(),
            ended,
            "evaluated end type"
        );
        Ok(ended)
    }

    /// Let the host pick a speaker and append its entry, if any.
    pub fn iterate(&mut self) -> Result<()> {
        let experiment = &mut *self.experiment;
        let index = experiment.host.next_speaker();
        let person = experiment
            .persons
            .get_mut(index)
            .ok_or_else(|| Error::protocol(format!("host picked unknown person {index}")))?;

        let speaker = Entity::person(index, person.name());
        let turn = Turn::new(&experiment.scenario, &self.transcript, speaker);
        let generated = person
            .generate_answer(turn)
            .map_err(|source| Error::generation(person.name(), source))?;

        let Some(entry) = generated else {
            tracing::debug!("{} passed the turn", person.name());
            return Ok(());
        };
        check_author(&entry, index, person.name())?;
        tracing::info!("{}: {}", entry.entity.name(), entry.answer);
        self.transcript.push(entry.clone());
        self.output.chat_entries.push(entry);
        Ok(())
    }

    /// Ask every survey question that fires at the current length.
    ///
    /// `ending` is the end type decision for the current state; questions
    /// triggered at [`ccore::AT_END`] only fire when it is set.
    pub fn ask_survey_questions_if_needed(&mut self, ending: bool) -> Result<()> {
        let length = self.transcript.len();
        let experiment = &mut *self.experiment;

        for question in &experiment.survey_questions {
            if !question.iterations.fires(length, ending) {
                continue;
            }
            tracing::info!(
                question = %question.id,
                length,
                "asking survey question"
            );

            self.output
                .survey_questions
                .push(SurveyQuestion::new(question, length));
            let scope = SurveyScope::open(
                std::slice::from_mut(&mut self.transcript),
                ChatEntry::system(question.question.as_str()),
            );
            for (index, person) in experiment.persons.iter_mut().enumerate() {
                let speaker = Entity::person(index, person.name());
                let turn = Turn::new(&experiment.scenario, &scope.lanes()[0], speaker);
                let answer = person
                    .generate_answer(turn)
                    .map_err(|source| Error::generation(person.name(), source))?;
                let Some(answer) = answer else {
                    continue;
                };
                check_author(&answer, index, person.name())?;
                if let Some(record) = self.output.survey_questions.last_mut() {
                    record.responses.push(answer);
                }
            }
        }
        Ok(())
    }

    /// Capture the room state.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let experiment = &*self.experiment;
        Ok(Snapshot {
            kind: RoomKind::Base,
            scenario: experiment.scenario.clone(),
            persons: experiment.names(),
            survey_questions: experiment.survey_questions.clone(),
            host: ComponentState::host(experiment.host())?,
            end_type: ComponentState::end_type(experiment.end_type())?,
            lanes: vec![self.transcript.clone()],
            outputs: vec![self.output.clone()],
        })
    }

    /// Run the session to its end.
    ///
    /// With `save_session` set, a snapshot is written once the session
    /// is over. A failure hands back the output produced so far.
    pub fn run(
        mut self,
        save_session: Option<&Path>,
    ) -> std::result::Result<ExperimentOutput, Aborted<ExperimentOutput>> {
        tracing::info!(
            persons = self.experiment.persons.len(),
            "starting session: {}",
            self.experiment.scenario
        );

        let finished = self.drive().and_then(|()| match save_session {
            Some(path) => self.snapshot()?.save(path),
            None => Ok(()),
        });
        if let Err(source) = finished {
            tracing::error!("session aborted: {source}");
            return Err(Aborted {
                source,
                partial: self.output,
            });
        }

        tracing::info!(
            entries = self.output.chat_entries.len(),
            surveys = self.output.survey_questions.len(),
            "session finished"
        );
        Ok(self.output)
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

/// Fail unless `entry` is attributed to the participant at `speaker`.
pub(crate) fn check_author(entry: &ChatEntry, speaker: usize, person: &str) -> Result<()> {
    if entry.entity.index() != Some(speaker) {
        return Err(Error::protocol(format!(
            "{person} produced an entry attributed to {}",
            entry.entity.name()
        )));
    }
    Ok(())
}
