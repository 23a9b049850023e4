use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Raw conversation data from an assessment submission.
/// Immutable — logs are never updated, only created.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConversationLog {
    pub id: Uuid,
    pub response_id: Uuid,
    pub conversation: serde_json::Value,
    pub created_at: jiff::Timestamp,
}
