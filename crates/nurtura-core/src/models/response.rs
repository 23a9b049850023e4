use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle of one (child, section) assessment session.
///
/// `Processing` marks a submission whose AI mapping is in flight or failed;
/// it is recoverable back to `InProgress` on the next successful answer
/// write. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum AssessmentStatus {
    NotStarted,
    Processing,
    InProgress,
    Completed,
}

/// One assessment session for a (child, section) pair — unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Response {
    pub id: Uuid,
    pub child_id: Uuid,
    pub section_id: Uuid,
    pub status: AssessmentStatus,
    /// Sum of answer scores. Null until the section completes.
    pub total_score: Option<u32>,
    /// Sum of the max achievable score over *answered* questions. Null
    /// until the section completes.
    pub max_possible_score: Option<u32>,
    pub completed_at: Option<jiff::Timestamp>,
    pub assessment_language: String,
    /// Most recent raw conversation artifact, overwritten on resume.
    pub last_conversation_id: Option<Uuid>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Response {
    pub fn new(child_id: Uuid, section_id: Uuid, now: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            child_id,
            section_id,
            status: AssessmentStatus::NotStarted,
            total_score: None,
            max_possible_score: None,
            completed_at: None,
            assessment_language: "ENGLISH".to_string(),
            last_conversation_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
