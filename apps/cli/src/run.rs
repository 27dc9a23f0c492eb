//! Run command

use anyhow::{Context, Result};
use ccore::ExperimentOutput;
use clap::Args;
use persons::Backends;
use runtime::{ExperimentConfig, Registry, Snapshot};
use std::{fs, path::PathBuf};

/// Run command arguments
#[derive(Debug, Args)]
pub struct RunCmd {
    /// The experiment file (JSON, or TOML with a .toml extension)
    pub experiment: PathBuf,

    /// Write a session snapshot here once the run is over
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Write the experiment output as JSON instead of printing transcripts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Continue the session stored in this snapshot
    #[arg(short, long)]
    pub resume: Option<PathBuf>,
}

impl RunCmd {
    /// Run the experiment
    pub fn run(&self) -> Result<()> {
        let config = ExperimentConfig::load(&self.experiment)?;
        let registry = Registry::default();
        let backends = Backends::new();
        let mut loaded = config.build(&registry, &backends)?;

        let save = self.save.as_deref();
        let outcome = match &self.resume {
            Some(path) => {
                let snapshot = Snapshot::load(path)
                    .with_context(|| format!("failed to load snapshot {}", path.display()))?;
                loaded.resume(snapshot, &registry, save)
            }
            None => loaded.run(save),
        };
        backends.shutdown();

        match outcome {
            Ok(outputs) => self.report(&outputs),
            Err(aborted) => {
                self.report(&aborted.partial)?;
                Err(aborted.source).context("experiment aborted")
            }
        }
    }

    fn report(&self, outputs: &[ExperimentOutput]) -> Result<()> {
        let Some(path) = &self.output else {
            print!("{}", render(outputs));
            return Ok(());
        };

        let json = match outputs {
            [output] => serde_json::to_string_pretty(output)?,
            lanes => serde_json::to_string_pretty(lanes)?,
        };
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("wrote experiment output to {}", path.display());
        Ok(())
    }
}

/// Render outputs as plain transcripts, one block per lane.
pub fn render(outputs: &[ExperimentOutput]) -> String {
    let mut rendered = String::new();
    for (lane, output) in outputs.iter().enumerate() {
        if outputs.len() > 1 {
            rendered.push_str(&format!("== lane {lane} ==\n"));
        }
        for entry in &output.chat_entries {
            rendered.push_str(&format!("{entry}\n"));
        }
        for survey in &output.survey_questions {
            rendered.push_str(&format!(
                "-- survey {} at {}: {}\n",
                survey.question_id, survey.iteration, survey.question_content
            ));
            for response in &survey.responses {
                rendered.push_str(&format!("   {response}\n"));
            }
        }
    }
    rendered
}
