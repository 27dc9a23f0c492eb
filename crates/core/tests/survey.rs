//! Tests for survey triggers and records.

use colloquy_core::{AT_END, ExperimentOutput, Question, SurveyQuestion, Trigger};

#[test]
fn trigger_fires_at_listed_lengths() {
    let trigger = Trigger::at([1, 3]);
    assert!(!trigger.fires(0, false));
    assert!(trigger.fires(1, false));
    assert!(!trigger.fires(2, false));
    assert!(trigger.fires(3, true));
}

#[test]
fn trigger_at_end_needs_ending_session() {
    let trigger = Trigger::at_end();
    assert!(!trigger.fires(5, false));
    assert!(trigger.fires(5, true));
}

#[test]
fn trigger_always_fires() {
    assert!(Trigger::Always.fires(0, false));
    assert!(Trigger::Always.fires(42, true));
}

#[test]
fn trigger_parses_sentinels() {
    let always: Trigger = serde_json::from_str(r#""Always""#).unwrap();
    assert_eq!(always, Trigger::Always);

    let list: Trigger = serde_json::from_str("[2, -1]").unwrap();
    assert_eq!(list, Trigger::at([2, AT_END]));

    let single: Trigger = serde_json::from_str("4").unwrap();
    assert_eq!(single, Trigger::at([4]));

    assert!(serde_json::from_str::<Trigger>(r#""sometimes""#).is_err());
}

#[test]
fn question_accepts_numeric_id() {
    let question: Question =
        serde_json::from_str(r#"{"id": 7, "question": "Guilty?", "iterations": [1]}"#).unwrap();
    assert_eq!(question.id, "7");
    assert_eq!(question.iterations, Trigger::at([1]));
}

#[test]
fn survey_record_starts_empty() {
    let question = Question::new("q1", "How do you feel?", Trigger::Always);
    let record = SurveyQuestion::new(&question, 3);
    assert_eq!(record.question_id, "q1");
    assert_eq!(record.question_content, "How do you feel?");
    assert_eq!(record.iteration, 3);
    assert!(record.responses.is_empty());
}

#[test]
fn output_accepts_legacy_field_names() {
    let json = r#"{
        "chat_entry": [{"entity": {"kind": "system"}, "answer": "hello"}],
        "survey_question": []
    }"#;
    let output = ExperimentOutput::from_json(json).unwrap();
    assert_eq!(output.chat_entries.len(), 1);
    assert!(output.survey_questions.is_empty());
}
