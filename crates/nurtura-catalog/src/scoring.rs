//! Score aggregation: per-response totals, per-pool rollups, and the
//! weighted Autism Concerns Index (ACI).

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use nurtura_core::models::{ConcernBand, QuestionAnswer, Response};

use crate::catalog::{Catalog, Question};

/// Computed totals for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTotals {
    pub total_score: u32,
    pub max_possible_score: u32,
}

/// Sum a response's answer scores and the max achievable score over the
/// *answered* questions only.
///
/// Unanswered-but-applicable questions do not inflate the denominator
/// before natural completion; once the section is COMPLETED the answered
/// and applicable sets coincide. Changing this changes clinical scores.
pub fn response_totals(catalog: &Catalog, answers: &[QuestionAnswer]) -> ResponseTotals {
    let mut totals = ResponseTotals {
        total_score: 0,
        max_possible_score: 0,
    };
    for answer in answers {
        totals.total_score += answer.score;
        totals.max_possible_score += catalog
            .question(answer.question_id)
            .map_or(Question::DEFAULT_MAX_SCORE, |q| q.max_score);
    }
    totals
}

/// Rolled-up scores for a pool, over the completed responses of its
/// applicable sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTotals {
    pub total_score: u32,
    pub max_possible_score: u32,
}

pub fn pool_totals(responses: &[Response]) -> PoolTotals {
    let mut totals = PoolTotals {
        total_score: 0,
        max_possible_score: 0,
    };
    for response in responses {
        totals.total_score += response.total_score.unwrap_or(0);
        totals.max_possible_score += response.max_possible_score.unwrap_or(0);
    }
    totals
}

/// One pool's input to the concern-index calculation, read back from its
/// persisted summary.
#[derive(Debug, Clone, Copy)]
pub struct PoolContribution {
    pub pool_id: Uuid,
    /// Configured weight (percentage points).
    pub weight: u32,
    pub total_score: u32,
    pub max_possible_score: u32,
}

/// The Autism Concerns Index and its interpretation band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConcernIndex {
    pub value: f64,
    pub band: ConcernBand,
}

/// Weighted percentage aggregate over the applicable pools.
///
/// Pools with a zero max score — not-applicable pools included — are
/// excluded from both the numerator and the weight-renormalization
/// denominator; they must not silently count as zero concern. The
/// remaining configured weights are renormalized to sum to one. Returns
/// `None` when every pool is excluded.
pub fn concern_index(contributions: &[PoolContribution]) -> Option<ConcernIndex> {
    let scored: Vec<&PoolContribution> = contributions
        .iter()
        .filter(|c| c.max_possible_score > 0)
        .collect();

    let weight_sum: u32 = scored.iter().map(|c| c.weight).sum();
    if weight_sum == 0 {
        return None;
    }

    let value: f64 = scored
        .iter()
        .map(|c| {
            let pool_pct =
                f64::from(c.total_score) / f64::from(c.max_possible_score) * 100.0;
            pool_pct * (f64::from(c.weight) / f64::from(weight_sum))
        })
        .sum();

    Some(ConcernIndex {
        value,
        band: ConcernBand::from_index(value),
    })
}
