//! Section completion tracking.
//!
//! Invoked after every answer write. Completeness is always re-evaluated
//! against the *current* applicability set — a child's age can change
//! between starting a section and finishing it.

use jiff::Timestamp;
use tracing::info;

use nurtura_catalog::{Catalog, scoring};
use nurtura_core::models::{AssessmentStatus, QuestionAnswer, Response};

/// Progress of one section's response against the current applicability
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    pub answered: usize,
    pub applicable: usize,
}

impl SectionProgress {
    /// Complete iff there is at least one applicable question and each
    /// one has an answer. A zero-applicable-question section can never
    /// complete through answers — the pool-level not-applicable path
    /// covers it.
    pub fn complete(&self) -> bool {
        self.applicable > 0 && self.answered >= self.applicable
    }
}

/// Count answered questions among the currently-applicable set. Answers
/// to questions that have aged out of the window no longer count toward
/// completion.
pub fn evaluate(
    catalog: &Catalog,
    section_id: uuid::Uuid,
    age_months: i32,
    answers: &[QuestionAnswer],
) -> SectionProgress {
    let applicable = catalog.applicable_questions(section_id, age_months);
    let answered = applicable
        .iter()
        .filter(|question| answers.iter().any(|a| a.question_id == question.id))
        .count();
    SectionProgress {
        answered,
        applicable: applicable.len(),
    }
}

/// Apply an answer-write's effect to the response.
///
/// When the section is now complete, finalize in one step: stamp
/// `completed_at` and set the totals from the answers, so a COMPLETED
/// response always carries its scores. Otherwise recover NOT_STARTED /
/// PROCESSING to IN_PROGRESS once any answer exists.
///
/// Returns `true` when this call transitioned the response to COMPLETED.
pub fn apply_progress(
    catalog: &Catalog,
    response: &mut Response,
    age_months: i32,
    answers: &[QuestionAnswer],
    now: Timestamp,
) -> bool {
    let progress = evaluate(catalog, response.section_id, age_months, answers);

    if progress.complete() && response.status != AssessmentStatus::Completed {
        let totals = scoring::response_totals(catalog, answers);
        response.status = AssessmentStatus::Completed;
        response.total_score = Some(totals.total_score);
        response.max_possible_score = Some(totals.max_possible_score);
        response.completed_at = Some(now);
        response.updated_at = now;
        info!(
            response_id = %response.id,
            section_id = %response.section_id,
            total_score = totals.total_score,
            max_possible_score = totals.max_possible_score,
            "response completed"
        );
        return true;
    }

    if !answers.is_empty()
        && matches!(
            response.status,
            AssessmentStatus::NotStarted | AssessmentStatus::Processing
        )
    {
        response.status = AssessmentStatus::InProgress;
        response.updated_at = now;
    }
    false
}
