use thiserror::Error;
use uuid::Uuid;

use nurtura_core::models::{
    Child, ConversationLog, FinalReport, PoolSummary, QuestionAnswer, Response,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists: {key}")]
    AlreadyExists { key: String },

    #[error("record not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence seam for the cascade engine.
///
/// Implementations must uphold the uniqueness constraints the engine's
/// idempotency leans on: one response per (child, section), one answer
/// per (response, question), one pool summary per (child, pool), one
/// final report per child. The `insert_*` methods fail with
/// [`StoreError::AlreadyExists`] on conflict — the existence pre-checks
/// in the orchestrator are race-prone optimizations, never the source of
/// truth.
pub trait Store: Send + Sync {
    async fn child(&self, child_id: Uuid) -> Result<Option<Child>, StoreError>;

    async fn response(
        &self,
        child_id: Uuid,
        section_id: Uuid,
    ) -> Result<Option<Response>, StoreError>;

    /// Responses that exist for the child among the given sections.
    async fn responses_for_sections(
        &self,
        child_id: Uuid,
        section_ids: &[Uuid],
    ) -> Result<Vec<Response>, StoreError>;

    async fn insert_response(&self, response: &Response) -> Result<(), StoreError>;

    async fn update_response(&self, response: &Response) -> Result<(), StoreError>;

    async fn answers(&self, response_id: Uuid) -> Result<Vec<QuestionAnswer>, StoreError>;

    async fn insert_answer(&self, answer: &QuestionAnswer) -> Result<(), StoreError>;

    async fn insert_conversation_log(&self, log: &ConversationLog) -> Result<(), StoreError>;

    async fn pool_summary(
        &self,
        child_id: Uuid,
        pool_id: Uuid,
    ) -> Result<Option<PoolSummary>, StoreError>;

    async fn pool_summaries(&self, child_id: Uuid) -> Result<Vec<PoolSummary>, StoreError>;

    async fn insert_pool_summary(&self, summary: &PoolSummary) -> Result<(), StoreError>;

    async fn delete_pool_summary(&self, child_id: Uuid, pool_id: Uuid) -> Result<(), StoreError>;

    async fn final_report(&self, child_id: Uuid) -> Result<Option<FinalReport>, StoreError>;

    async fn final_report_by_id(&self, report_id: Uuid)
    -> Result<Option<FinalReport>, StoreError>;

    async fn insert_final_report(&self, report: &FinalReport) -> Result<(), StoreError>;

    /// Persist review stamps on an existing report.
    async fn update_final_report(&self, report: &FinalReport) -> Result<(), StoreError>;

    async fn delete_final_report(&self, child_id: Uuid) -> Result<(), StoreError>;
}
