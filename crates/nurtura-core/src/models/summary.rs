use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// AI-generated narrative summary for a completed assessment pool.
/// At most one per (child, pool) — enforced by the store. Immutable once
/// created except for the explicit regenerate path, which deletes and
/// recreates it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PoolSummary {
    pub id: Uuid,
    pub child_id: Uuid,
    pub pool_id: Uuid,
    /// Denormalized pool title for display without a catalog lookup.
    pub pool_title: String,
    pub summary_content: serde_json::Value,
    pub total_sections: u32,
    pub completed_sections: u32,
    pub total_score: u32,
    pub max_possible_score: u32,
    /// Set when the pool had no applicable sections at the child's age.
    /// Not-applicable summaries carry zero scores and are excluded from
    /// the concern-index weighting.
    pub not_applicable: bool,
    pub generated_at: jiff::Timestamp,
}
