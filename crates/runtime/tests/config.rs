//! Tests for experiment file loading.

use ccore::Trigger;
use colloquy_runtime::{ExperimentConfig, Loaded, Registry, RoomConfig};
use persons::Backends;
use std::io::Write;

const BASE: &str = r#"{
  "persons": [
    { "class": "fake_person", "name": "alice", "things_to_say": ["hello", "fine"] },
    { "class": "fake_person", "name": "bob", "things_to_say": ["hi", null] }
  ],
  "sessionRoom": { "name": "SessionRoom" },
  "host": { "class": "Round Robin Host", "start_person_index": 0 },
  "endType": { "class": "iteration", "max_num_msgs": 2 },
  "experiment": {
    "scenario": "Two neighbours meet.",
    "survey_questions": [
      { "id": 1, "question": "How do you feel?", "iterations": [-1] }
    ]
  }
}"#;

const BATCH: &str = r#"{
  "persons": [
    {
      "class": "scripted",
      "name": "alice",
      "lanes": [{ "things_to_say": ["a0"] }, { "things_to_say": ["a1"] }]
    }
  ],
  "sessionRoom": { "name": "batch", "batch_size": 2 },
  "host": { "class": "round_robin" },
  "endType": { "class": "iteration", "max_num_msgs": 1 },
  "experiment": { "scenario": "Two rooms." }
}"#;

const TOML: &str = r#"
session_room = "base"

[[persons]]
class = "scripted"
name = "alice"
things_to_say = ["hello"]

[[persons]]
class = "scripted"
name = "bob"
things_to_say = ["hi"]

[host]
class = "round_robin"

[end_type]
class = "iteration"
max_num_msgs = 2

[experiment]
scenario = "Two neighbours meet."

[[experiment.survey_questions]]
id = "start"
question = "Ready?"
iterations = "Always"
"#;

fn build(config: &ExperimentConfig) -> Loaded {
    config
        .build(&Registry::default(), &Backends::new())
        .unwrap()
}

#[test]
fn parses_the_original_json_layout() {
    let config = ExperimentConfig::from_json(BASE).unwrap();
    assert_eq!(config.persons.len(), 2);
    assert_eq!(config.persons[1].name(), "bob");
    assert_eq!(config.session_room, RoomConfig::Base);
    assert_eq!(config.host.class, "Round Robin Host");
    assert_eq!(config.end_type.params["max_num_msgs"], 2);
    assert_eq!(config.experiment.survey_questions[0].id, "1");
    assert_eq!(
        config.experiment.survey_questions[0].iterations,
        Trigger::at_end()
    );
}

#[test]
fn runs_a_loaded_experiment() {
    let config = ExperimentConfig::from_json(BASE).unwrap();
    let mut loaded = build(&config);
    assert!(matches!(loaded, Loaded::Single(_)));

    let outputs = loaded.run(None).unwrap();
    assert_eq!(outputs.len(), 1);
    let answers: Vec<_> = outputs[0]
        .chat_entries
        .iter()
        .map(|e| e.answer.as_str())
        .collect();
    assert_eq!(answers, vec!["hello", "hi"]);

    let surveys = &outputs[0].survey_questions;
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0].iteration, 2);
    assert_eq!(surveys[0].responses.len(), 1);
    assert_eq!(surveys[0].responses[0].answer, "fine");
}

#[test]
fn batch_lanes_are_auto_batched() {
    let config = ExperimentConfig::from_json(BATCH).unwrap();
    assert_eq!(
        config.session_room,
        RoomConfig::Batch {
            batch_size: Some(2)
        }
    );
    let mut loaded = build(&config);
    let Loaded::Batch(experiment) = &loaded else {
        panic!("expected a batch experiment");
    };
    assert_eq!(experiment.batch_count(), 2);

    let outputs = loaded.run(None).unwrap();
    let answers: Vec<_> = outputs
        .iter()
        .map(|o| o.chat_entries[0].answer.as_str())
        .collect();
    assert_eq!(answers, vec!["a0", "a1"]);
}

#[test]
fn batch_size_must_match_the_lanes() {
    let source = BATCH.replace("\"batch_size\": 2", "\"batch_size\": 3");
    let config = ExperimentConfig::from_json(&source).unwrap();
    let err = config
        .build(&Registry::default(), &Backends::new())
        .err()
        .unwrap();
    assert!(err.to_string().contains("batch_size 3"));
}

#[test]
fn lanes_need_a_batch_room() {
    let source = BATCH.replace(r#"{ "name": "batch", "batch_size": 2 }"#, r#""base""#);
    let config = ExperimentConfig::from_json(&source).unwrap();
    assert!(
        config
            .build(&Registry::default(), &Backends::new())
            .is_err()
    );
}

#[test]
fn single_persons_need_lanes_in_a_batch_room() {
    let source = BASE.replace(r#"{ "name": "SessionRoom" }"#, r#""batch""#);
    let config = ExperimentConfig::from_json(&source).unwrap();
    let err = config
        .build(&Registry::default(), &Backends::new())
        .err()
        .unwrap();
    assert!(err.to_string().contains("alice"));
}

#[test]
fn missing_sections_are_rejected() {
    let no_host = BASE.replace(
        r#""host": { "class": "Round Robin Host", "start_person_index": 0 },"#,
        "",
    );
    assert!(ExperimentConfig::from_json(&no_host).is_err());

    let no_scenario = BASE.replace("Two neighbours meet.", " ");
    assert!(ExperimentConfig::from_json(&no_scenario).is_err());

    let unknown_room = BASE.replace("SessionRoom", "ballroom");
    assert!(ExperimentConfig::from_json(&unknown_room).is_err());
}

#[test]
fn unknown_host_class_is_reported() {
    let source = BASE.replace("Round Robin Host", "town_crier");
    let config = ExperimentConfig::from_json(&source).unwrap();
    let err = config
        .build(&Registry::default(), &Backends::new())
        .err()
        .unwrap();
    assert!(err.to_string().contains("town_crier"));
}

#[test]
fn loads_toml_by_extension() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(TOML.as_bytes()).unwrap();

    let config = ExperimentConfig::load(file.path()).unwrap();
    assert_eq!(config.persons.len(), 2);
    assert_eq!(
        config.experiment.survey_questions[0].iterations,
        Trigger::Always
    );
}

#[test]
fn loads_json_by_default() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(BASE.as_bytes()).unwrap();
    let config = ExperimentConfig::load(file.path()).unwrap();
    assert_eq!(config.persons[0].name(), "alice");
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.json");
    let err = ExperimentConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("nowhere.json"));
}
