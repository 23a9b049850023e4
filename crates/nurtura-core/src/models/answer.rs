use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Normalized category for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum AnswerBucket {
    Yes,
    Sometimes,
    No,
    NotObserved,
}

/// Immutable answer to an assessment question. At most one per
/// (response, question) — enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionAnswer {
    pub id: Uuid,
    pub response_id: Uuid,
    pub question_id: Uuid,
    /// What the parent actually said or selected.
    pub raw_answer: String,
    /// English translation when the answer was given in another language.
    pub translated_answer: Option<String>,
    pub answer_bucket: AnswerBucket,
    /// Numeric score derived at answer time (0 up to the question's max).
    pub score: u32,
    pub answered_at: jiff::Timestamp,
}

impl QuestionAnswer {
    /// The answer text to surface to the narrative generator:
    /// translated when available, raw otherwise.
    pub fn display_answer(&self) -> &str {
        self.translated_answer.as_deref().unwrap_or(&self.raw_answer)
    }
}

/// Input payload for recording a single answer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAnswer {
    pub question_id: Uuid,
    pub raw_answer: String,
    pub translated_answer: Option<String>,
    pub answer_bucket: AnswerBucket,
    pub score: u32,
}
