//! Tests for gated persons.

use ccore::{ChatEntry, Entity, Participant, Person, Turn};
use colloquy_persons::{Addressed, OptIn, Scripted};

fn turn<'a>(transcript: &'a [ChatEntry]) -> Turn<'a> {
    Turn::new("a quiet bar", transcript, Entity::person(1, "bob"))
}

#[test]
fn addressed_speaks_when_mentioned() {
    let mut bob = OptIn::new(Scripted::says("bob", ["hello", "yes?"]), Addressed);
    assert_eq!(bob.name(), "bob");

    let first = bob.generate_answer(turn(&[])).unwrap().unwrap();
    assert_eq!(first.answer, "hello");

    let chatter = vec![ChatEntry::new(Entity::person(0, "alice"), "", "nice weather")];
    assert!(bob.generate_answer(turn(&chatter)).unwrap().is_none());

    let called = vec![ChatEntry::new(Entity::person(0, "alice"), "", "what about you, bob")];
    assert_eq!(bob.generate_answer(turn(&called)).unwrap().unwrap().answer, "yes?");
    assert_eq!(bob.into_inner().remaining(), 0);
}

#[test]
fn addressed_answers_survey_prompts() {
    let mut bob = OptIn::new(Scripted::says("bob", ["fine"]), Addressed);
    let surveyed = vec![ChatEntry::system("How do you feel?")];
    assert_eq!(bob.generate_answer(turn(&surveyed)).unwrap().unwrap().answer, "fine");
}

#[test]
fn closure_gates_hold_back_without_consuming_the_script() {
    let mut turns = 0;
    let gate = move |_: &Turn<'_>| {
        turns += 1;
        turns % 2 == 0
    };
    let mut bob = OptIn::new(Scripted::says("bob", ["one", "two"]), gate);

    let answers: Vec<_> = (0..4)
        .map(|_| {
            bob.generate_answer(turn(&[]))
                .unwrap()
                .map(|entry| entry.answer)
        })
        .collect();
    assert_eq!(
        answers,
        vec![None, Some("one".to_owned()), None, Some("two".to_owned())]
    );
}
