mod common;

use common::fixture;
use jiff::Timestamp;
use nurtura_core::models::{AnswerBucket, AssessmentStatus, QuestionAnswer, Response};
use nurtura_engine::tracker;
use uuid::Uuid;

fn stored_answer(response_id: Uuid, question_id: Uuid, score: u32) -> QuestionAnswer {
    QuestionAnswer {
        id: Uuid::new_v4(),
        response_id,
        question_id,
        raw_answer: "yes".to_string(),
        translated_answer: None,
        answer_bucket: AnswerBucket::Yes,
        score,
        answered_at: Timestamp::now(),
    }
}

#[test]
fn progress_counts_only_applicable_questions() {
    let fx = fixture();
    let response_id = Uuid::new_v4();
    let answers = vec![stored_answer(response_id, fx.q_joint_1, 3)];

    let progress = tracker::evaluate(&fx.catalog, fx.section_joint_attention, 36, &answers);
    assert_eq!(progress.answered, 1);
    assert_eq!(progress.applicable, 2);
    assert!(!progress.complete());
}

#[test]
fn answers_outside_the_current_window_do_not_count() {
    let fx = fixture();
    let response_id = Uuid::new_v4();
    // Peer Play's only question opens at 24 months; at 12 the section has
    // no applicable questions, so even an answered question cannot
    // complete it.
    let answers = vec![stored_answer(response_id, fx.q_peer_1, 4)];

    let progress = tracker::evaluate(&fx.catalog, fx.section_peer_play, 12, &answers);
    assert_eq!(progress.applicable, 0);
    assert_eq!(progress.answered, 0);
    assert!(!progress.complete());
}

#[test]
fn completion_finalizes_the_response_with_totals() {
    let fx = fixture();
    let now = Timestamp::now();
    let mut response = Response::new(Uuid::new_v4(), fx.section_joint_attention, now);
    let answers = vec![
        stored_answer(response.id, fx.q_joint_1, 3),
        stored_answer(response.id, fx.q_joint_2, 4),
    ];

    let transitioned = tracker::apply_progress(&fx.catalog, &mut response, 36, &answers, now);
    assert!(transitioned);
    assert_eq!(response.status, AssessmentStatus::Completed);
    assert_eq!(response.total_score, Some(7));
    assert_eq!(response.max_possible_score, Some(8));
    assert_eq!(response.completed_at, Some(now));

    // A second evaluation of an already-completed response is a no-op.
    let again = tracker::apply_progress(&fx.catalog, &mut response, 36, &answers, Timestamp::now());
    assert!(!again);
    assert_eq!(response.completed_at, Some(now));
}

#[test]
fn partial_answers_move_the_response_to_in_progress() {
    let fx = fixture();
    let now = Timestamp::now();
    let mut response = Response::new(Uuid::new_v4(), fx.section_joint_attention, now);
    assert_eq!(response.status, AssessmentStatus::NotStarted);

    let answers = vec![stored_answer(response.id, fx.q_joint_1, 2)];
    let transitioned = tracker::apply_progress(&fx.catalog, &mut response, 36, &answers, now);
    assert!(!transitioned);
    assert_eq!(response.status, AssessmentStatus::InProgress);
    assert_eq!(response.total_score, None);
    assert_eq!(response.max_possible_score, None);
}

#[test]
fn processing_recovers_to_in_progress_on_the_next_answer() {
    let fx = fixture();
    let now = Timestamp::now();
    let mut response = Response::new(Uuid::new_v4(), fx.section_joint_attention, now);
    response.status = AssessmentStatus::Processing;

    let answers = vec![stored_answer(response.id, fx.q_joint_1, 2)];
    tracker::apply_progress(&fx.catalog, &mut response, 36, &answers, now);
    assert_eq!(response.status, AssessmentStatus::InProgress);
}
