//! Tests for the command line interface.

use ccore::ExperimentOutput;
use clap::Parser;
use colloquy_cli::{App, Command, RunCmd, describe};
use runtime::Snapshot;
use std::fs;

const EXPERIMENT: &str = r#"{
  "persons": [
    { "class": "scripted", "name": "alice", "things_to_say": ["hello", "yes"] },
    { "class": "scripted", "name": "bob", "things_to_say": ["hi", "no"] }
  ],
  "host": { "class": "round_robin" },
  "endType": { "class": "iteration", "max_num_msgs": 2 },
  "experiment": {
    "scenario": "Two neighbours meet.",
    "survey_questions": [{ "id": "end", "question": "Done?", "iterations": [-1] }]
  }
}"#;

#[test]
fn parses_run_arguments() {
    let app = App::try_parse_from([
        "colloquy", "-vv", "run", "exp.json", "--save", "s.json", "-o", "out.json",
    ])
    .unwrap();
    assert_eq!(app.verbose, 2);
    let Command::Run(run) = app.command else {
        panic!("expected the run command");
    };
    assert_eq!(run.experiment.to_str(), Some("exp.json"));
    assert_eq!(run.save.as_deref().and_then(|p| p.to_str()), Some("s.json"));
    assert_eq!(run.output.as_deref().and_then(|p| p.to_str()), Some("out.json"));
    assert!(run.resume.is_none());
}

#[test]
fn parses_inspect_arguments() {
    let app = App::try_parse_from(["colloquy", "inspect", "s.json", "--state"]).unwrap();
    let Command::Inspect(inspect) = app.command else {
        panic!("expected the inspect command");
    };
    assert!(inspect.state);
}

#[test]
fn run_requires_an_experiment() {
    assert!(App::try_parse_from(["colloquy", "run"]).is_err());
}

#[test]
fn runs_and_saves_an_experiment() {
    let dir = tempfile::tempdir().unwrap();
    let experiment = dir.path().join("experiment.json");
    let snapshot = dir.path().join("snapshot.json");
    let output = dir.path().join("output.json");
    fs::write(&experiment, EXPERIMENT).unwrap();

    RunCmd {
        experiment,
        save: Some(snapshot.clone()),
        output: Some(output.clone()),
        resume: None,
    }
    .run()
    .unwrap();

    let written = ExperimentOutput::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written.chat_entries.len(), 2);
    assert_eq!(written.survey_questions.len(), 1);
    assert_eq!(written.survey_questions[0].responses.len(), 2);

    let snapshot = Snapshot::load(&snapshot).unwrap();
    let described = describe(&snapshot, true).unwrap();
    assert!(described.contains("scenario: Two neighbours meet."));
    assert!(described.contains("persons: alice, bob"));
    assert!(described.contains("alice: hello"));
    assert!(described.contains("-- survey end at 2: Done?"));
    assert!(described.contains("host state:"));
}

#[test]
fn failing_run_still_writes_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let experiment = dir.path().join("experiment.json");
    let output = dir.path().join("output.json");
    fs::write(
        &experiment,
        EXPERIMENT.replace(r#"["hi", "no"]"#, "[]"),
    )
    .unwrap();

    let err = RunCmd {
        experiment,
        save: None,
        output: Some(output.clone()),
        resume: None,
    }
    .run()
    .unwrap_err();
    assert!(format!("{err:#}").contains("bob"));

    let written = ExperimentOutput::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written.chat_entries.len(), 1);
}
