//! Tests for the termination predicates.

use colloquy_core::{
    ChatEntry, EndType, Entity, Error, MessageCount, Session, Transcript, Unanimity, Verdict,
};

fn votes(answers: &[&str], persons: usize) -> Transcript {
    answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let index = i % persons;
            ChatEntry::new(Entity::person(index, format!("juror-{index}")), "", *answer)
        })
        .collect()
}

#[test]
fn message_count_is_monotonic() {
    let mut end = MessageCount::new(4);
    for len in 0..10 {
        let transcript = votes(&vec!["anything"; len], 2);
        let ended = end.did_end(&Session::single(&transcript, 2)).unwrap();
        assert_eq!(ended, len >= 4, "length {len}");
    }
}

#[test]
fn message_count_ignores_start_iteration() {
    let mut end = MessageCount::new(2).start_at(10);
    let transcript = votes(&["a"], 1);
    assert!(!end.did_end(&Session::single(&transcript, 1)).unwrap());
}

#[test]
fn message_count_uses_shortest_lane() {
    let mut end = MessageCount::new(2);
    let lanes = vec![votes(&["a", "b", "c"], 1), votes(&["a"], 1)];
    assert!(!end.did_end(&Session::batch(&lanes, 1)).unwrap());
}

#[test]
fn message_count_addition() {
    let a = MessageCount::new(3).start_at(1);
    let b = MessageCount::new(4).start_at(2);
    assert_eq!(a + b, MessageCount::new(7).start_at(3));
    assert_eq!(a + 5, MessageCount::new(3).start_at(6));

    let mut c = a;
    c += b;
    c += 1;
    assert_eq!(c, MessageCount::new(7).start_at(4));
}

#[test]
fn unanimity_waits_for_a_unanimous_round() {
    let mut end = Unanimity::new(100);

    let first = votes(&["1 guilty", "1 guilty", "0 not guilty"], 3);
    assert!(!end.did_end(&Session::single(&first, 3)).unwrap());
    assert_eq!(end.completed_rounds().len(), 1);

    let second = votes(
        &["1 guilty", "1 guilty", "0 not guilty", "1 sure", "1 yes", "1 ok"],
        3,
    );
    assert!(end.did_end(&Session::single(&second, 3)).unwrap());
    assert_eq!(end.verdict(), Some(Verdict::Guilty));
}

#[test]
fn unanimity_needs_last_person_to_close_round() {
    let mut end = Unanimity::new(100);
    let transcript: Transcript = (0..3)
        .map(|_| ChatEntry::new(Entity::person(0, "juror-0"), "", "1"))
        .collect();
    assert!(!end.did_end(&Session::single(&transcript, 3)).unwrap());
    assert!(end.completed_rounds().is_empty());
}

#[test]
fn unanimity_is_sticky() {
    let mut end = Unanimity::new(100);
    let transcript = votes(&["0", "0"], 2);
    assert!(end.did_end(&Session::single(&transcript, 2)).unwrap());
    assert!(end.did_end(&Session::single(&transcript, 2)).unwrap());

    let longer = votes(&["0", "0", "1"], 2);
    assert!(end.did_end(&Session::single(&longer, 2)).unwrap());
    assert_eq!(end.verdict(), Some(Verdict::NotGuilty));
}

#[test]
fn unanimity_repeated_calls_count_round_once() {
    let mut end = Unanimity::new(100);
    let transcript = votes(&["1", "0"], 2);
    for _ in 0..3 {
        assert!(!end.did_end(&Session::single(&transcript, 2)).unwrap());
    }
    assert_eq!(end.completed_rounds().len(), 1);
}

#[test]
fn unanimity_falls_back_to_max_messages() {
    let mut end = Unanimity::new(4);
    let transcript = votes(&["1", "0", "1", "0"], 2);
    assert!(end.did_end(&Session::single(&transcript, 2)).unwrap());
    assert_eq!(end.verdict(), None);
}

#[test]
fn unanimity_empty_transcript_only_checks_ceiling() {
    let empty = Transcript::new();
    assert!(!Unanimity::new(1).did_end(&Session::single(&empty, 2)).unwrap());
    assert!(Unanimity::new(0).did_end(&Session::single(&empty, 2)).unwrap());
}

#[test]
fn unanimity_rejects_invalid_vote() {
    let mut end = Unanimity::new(10);
    let transcript = votes(&["maybe"], 2);
    let err = end.did_end(&Session::single(&transcript, 2)).unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[test]
fn vote_parsing_trims_leading_space() {
    assert_eq!(Verdict::from_vote("  1 because").unwrap(), Verdict::Guilty);
    assert_eq!(Verdict::from_vote("0").unwrap(), Verdict::NotGuilty);
    assert!(Verdict::from_vote("").is_err());
}

#[test]
fn unanimity_batch_requires_every_lane() {
    let mut end = Unanimity::new(100);
    let lanes = vec![votes(&["1", "1"], 2), votes(&["1", "0"], 2)];
    assert!(!end.did_end(&Session::batch(&lanes, 2)).unwrap());
    assert_eq!(end.verdicts(), vec![Some(Verdict::Guilty), None]);

    let lanes = vec![votes(&["1", "1"], 2), votes(&["1", "0", "0", "0"], 2)];
    assert!(end.did_end(&Session::batch(&lanes, 2)).unwrap());
}

#[test]
fn unanimity_snapshot_roundtrip_keeps_verdict() {
    let mut end = Unanimity::new(10);
    let transcript = votes(&["1", "1"], 2);
    end.did_end(&Session::single(&transcript, 2)).unwrap();

    let mut restored = Unanimity::restore(end.snapshot().unwrap()).unwrap();
    assert_eq!(restored, end);
    assert!(restored.did_end(&Session::single(&transcript, 2)).unwrap());
}
