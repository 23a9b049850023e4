use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Comprehensive AI-generated final report combining all pool summaries.
/// At most one per child, with a two-stage review workflow (doctor, then
/// head of department).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalReport {
    pub id: Uuid,
    pub child_id: Uuid,
    pub overall_summary: serde_json::Value,
    pub total_pools: u32,
    pub completed_pools: u32,
    pub overall_score: u32,
    pub overall_max_score: u32,
    /// Autism Concerns Index — weighted percentage aggregate over the
    /// applicable pools. Null when every pool was excluded from weighting.
    pub concern_index: Option<f64>,
    pub concern_band: Option<ConcernBand>,
    pub doctor_reviewed_at: Option<jiff::Timestamp>,
    pub doctor_notes: Option<String>,
    pub hod_reviewed_at: Option<jiff::Timestamp>,
    pub hod_notes: Option<String>,
    pub generated_at: jiff::Timestamp,
}

impl FinalReport {
    /// Review stage, derived from the sign-off timestamps — never stored
    /// separately, so it cannot drift.
    pub fn stage(&self) -> ReviewStage {
        match (self.doctor_reviewed_at, self.hod_reviewed_at) {
            (None, _) => ReviewStage::Generated,
            (Some(_), None) => ReviewStage::DoctorReviewed,
            (Some(_), Some(_)) => ReviewStage::HodReviewed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ReviewStage {
    Generated,
    DoctorReviewed,
    HodReviewed,
}

/// Interpretation band for the Autism Concerns Index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ConcernBand {
    Low,
    Moderate,
    High,
}

impl ConcernBand {
    /// `< 31` Low, `31 ≤ x < 61` Moderate, `≥ 61` High.
    pub fn from_index(index: f64) -> Self {
        if index < 31.0 {
            ConcernBand::Low
        } else if index < 61.0 {
            ConcernBand::Moderate
        } else {
            ConcernBand::High
        }
    }
}

/// Capability of the caller reading a report, supplied by the RBAC
/// boundary. The engine enforces report visibility against it but never
/// derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ViewerCapability {
    Doctor,
    DepartmentHead,
    Other,
}
