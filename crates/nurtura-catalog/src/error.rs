use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown question: {0}")]
    UnknownQuestion(Uuid),

    #[error("question {question_id} does not belong to section {section_id}")]
    QuestionNotInSection {
        question_id: Uuid,
        section_id: Uuid,
    },

    #[error("score {score} for question {question_id} exceeds max {max_score}")]
    ScoreOutOfRange {
        question_id: Uuid,
        score: u32,
        max_score: u32,
    },
}
