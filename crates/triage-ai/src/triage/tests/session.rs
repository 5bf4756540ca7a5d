use std::sync::Arc;

use super::common::*;
use crate::triage::domain::QuestionId;
use crate::triage::questions::QuestionBank;
use crate::triage::session::{CompletionPolicy, SessionError, TriageSession};

fn standard_session() -> TriageSession {
    TriageSession::new(Arc::new(QuestionBank::standard()), Vec::new())
}

#[test]
fn next_question_walks_the_active_set_in_order() {
    let mut session = standard_session();

    let first = session.next_question().expect("first question");
    assert_eq!(first.id, QuestionId::new("q1"));

    session
        .record_answer(first.id, no())
        .expect("answer records");

    let second = session.next_question().expect("second question");
    assert_eq!(second.id, QuestionId::new("q2"));
}

#[test]
fn unknown_question_is_rejected() {
    let mut session = standard_session();
    match session.record_answer(QuestionId::new("q99"), yes()) {
        Err(SessionError::UnknownQuestion(id)) => assert_eq!(id, QuestionId::new("q99")),
        other => panic!("expected unknown question error, got {other:?}"),
    }
}

#[test]
fn answers_are_write_once() {
    let mut session = standard_session();
    session
        .record_answer(QuestionId::new("q1"), no())
        .expect("first answer records");

    match session.record_answer(QuestionId::new("q1"), yes()) {
        Err(SessionError::DuplicateAnswer(id)) => assert_eq!(id, QuestionId::new("q1")),
        other => panic!("expected duplicate answer error, got {other:?}"),
    }
}

#[test]
fn follow_up_answer_cannot_be_recorded_before_its_trigger() {
    let mut session = standard_session();
    match session.record_answer(QuestionId::new("q1_followup"), yes()) {
        Err(SessionError::UnknownQuestion(_)) => {}
        other => panic!("expected unknown question error, got {other:?}"),
    }
}

#[test]
fn completion_revalidates_after_follow_up_growth() {
    let mut session = standard_session();

    // Answer the whole base set, triggering the chest-pain follow-up on q1.
    session
        .record_answer(QuestionId::new("q1"), yes())
        .expect("q1");
    for id in ["q2", "q3", "q4", "q5"] {
        session
            .record_answer(QuestionId::new(id), no())
            .expect("base answer");
    }

    assert!(!session.is_complete());
    let pending = session.next_question().expect("follow-up pending");
    assert_eq!(pending.id, QuestionId::new("q1_followup"));

    session
        .record_answer(pending.id, no())
        .expect("follow-up answer");
    assert!(session.is_complete());
    assert!(session.next_question().is_none());
    session.ready_for_assessment().expect("session finalizable");
}

#[test]
fn incomplete_session_cannot_be_finalized() {
    let mut session = standard_session();
    session
        .record_answer(QuestionId::new("q1"), no())
        .expect("answer records");

    match session.ready_for_assessment() {
        Err(SessionError::QuestionnaireIncomplete) => {}
        other => panic!("expected incomplete questionnaire, got {other:?}"),
    }
}

#[test]
fn minimum_answers_policy_gates_finalization() {
    let bank = Arc::new(flat_bank(&[1.0]));
    let mut session = TriageSession::new(bank.clone(), Vec::new());
    session
        .record_answer(QuestionId::new("b1"), yes())
        .expect("answer records");

    // Complete, but below the default two-answer floor.
    assert!(session.is_complete());
    match session.ready_for_assessment() {
        Err(SessionError::MinimumAnswersNotMet { answered, required }) => {
            assert_eq!(answered, 1);
            assert_eq!(required, 2);
        }
        other => panic!("expected minimum answers error, got {other:?}"),
    }

    let mut relaxed = TriageSession::with_policy(
        bank,
        Vec::new(),
        CompletionPolicy { minimum_answers: 1 },
    );
    relaxed
        .record_answer(QuestionId::new("b1"), yes())
        .expect("answer records");
    relaxed.ready_for_assessment().expect("policy satisfied");
}

#[test]
fn history_tags_expand_the_session_question_set() {
    let session = TriageSession::new(
        Arc::new(QuestionBank::standard()),
        vec![tag("heart_disease")],
    );
    let active = session.active_questions();
    assert_eq!(active.len(), 7);
    assert!(active
        .iter()
        .any(|question| question.id == QuestionId::new("hd1")));
}
