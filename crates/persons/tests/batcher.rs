//! Tests for the auto-batch adapter.

use ccore::{BatchTurn, BatchedPerson, ChatEntry, Entity, Error, Participant, Person, Transcript};
use colloquy_persons::{AutoBatch, Scripted};

fn lanes(width: usize) -> Vec<Transcript> {
    vec![Vec::new(); width]
}

#[test]
fn serves_each_lane_with_its_person() {
    let persons: Vec<Box<dyn Person>> = vec![
        Box::new(Scripted::says("alice", ["a1"])),
        Box::new(Scripted::says("amy", ["a2"])),
    ];
    let mut batch = AutoBatch::new("a", persons).unwrap();
    assert_eq!(batch.batch_count(), 2);
    assert_eq!(batch.name(), "a");
    assert_eq!(batch.names(), vec!["alice", "amy"]);

    let lanes = lanes(2);
    let entries = batch
        .generate_answer(BatchTurn::new("scenario", &lanes, Entity::person(3, "a")))
        .unwrap();
    assert_eq!(entries.len(), 2);

    let first = entries[0].as_ref().unwrap();
    let second = entries[1].as_ref().unwrap();
    assert_eq!(first.answer, "a1");
    assert_eq!(first.entity, Entity::person(3, "alice"));
    assert_eq!(second.entity, Entity::person(3, "amy"));
}

#[test]
fn passing_lane_yields_none() {
    let persons: Vec<Box<dyn Person>> = vec![
        Box::new(Scripted::new("alice", [None])),
        Box::new(Scripted::says("amy", ["hi"])),
    ];
    let mut batch = AutoBatch::new("a", persons).unwrap();
    let lanes = lanes(2);
    let entries: Vec<Option<ChatEntry>> = batch
        .generate_answer(BatchTurn::new("scenario", &lanes, Entity::person(0, "a")))
        .unwrap();
    assert!(entries[0].is_none());
    assert_eq!(entries[1].as_ref().unwrap().answer, "hi");
}

#[test]
fn fewer_lanes_than_persons_yields_fewer_results() {
    let persons: Vec<Box<dyn Person>> = vec![
        Box::new(Scripted::says("alice", ["a1"])),
        Box::new(Scripted::says("amy", ["a2"])),
    ];
    let mut batch = AutoBatch::new("a", persons).unwrap();
    let lanes = lanes(1);
    let entries = batch
        .generate_answer(BatchTurn::new("scenario", &lanes, Entity::person(0, "a")))
        .unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn empty_batch_is_config_error() {
    assert!(matches!(AutoBatch::new("a", Vec::new()), Err(Error::Config(_))));
}
