//! Generation payload assembly.
//!
//! Builds the structured context sent to the text generator for pool
//! summaries and final reports. The final-report payload carries the
//! child's age in months and gender only — no name, no date of birth.
//! That PHI-minimization contract with the generation collaborator must
//! hold for every payload built here.

use serde_json::{Value, json};

use nurtura_catalog::{Catalog, Pool, Section};
use nurtura_core::models::{Gender, PoolSummary, QuestionAnswer, Response};

/// Response shape requested for a pool summary.
pub const POOL_SUMMARY_SCHEMA_HINT: &str = r#"{
  "summary": "comprehensive paragraph for this developmental area",
  "key_findings": ["finding"],
  "areas_of_concern": ["concern with severity"],
  "strengths": ["strength"]
}"#;

/// Response shape requested for a final report.
pub const FINAL_REPORT_SCHEMA_HINT: &str = r#"{
  "overall_assessment": "comprehensive summary paragraph",
  "key_findings": ["finding"],
  "developmental_insights": {
    "cognitive": "analysis",
    "social_emotional": "analysis",
    "physical": "analysis",
    "language": "analysis"
  },
  "recommendations": ["recommendation"],
  "areas_of_concern": ["concern with severity"],
  "strengths": ["strength"],
  "next_steps": ["step"],
  "confidence_level": "high|medium|low",
  "notes": "additional clinical notes"
}"#;

/// One completed section with its response and answers, ready for
/// context assembly.
pub struct SectionContext<'a> {
    pub section: &'a Section,
    pub response: &'a Response,
    pub answers: Vec<QuestionAnswer>,
}

/// Context for a pool whose applicable sections are all complete.
///
/// Each answer carries the question text, the translated-or-raw answer,
/// its bucket, and its score, so the narrative can quote the parent's
/// actual observations.
pub fn pool_summary_payload(
    catalog: &Catalog,
    pool: &Pool,
    sections: &[SectionContext<'_>],
) -> Value {
    let section_values: Vec<Value> = sections
        .iter()
        .map(|ctx| {
            let answers: Vec<Value> = ctx
                .answers
                .iter()
                .map(|answer| {
                    json!({
                        "question": catalog
                            .question(answer.question_id)
                            .map(|q| q.text.as_str())
                            .unwrap_or_default(),
                        "answer": answer.display_answer(),
                        "answer_bucket": answer.answer_bucket,
                        "score": answer.score,
                    })
                })
                .collect();
            json!({
                "section_id": ctx.section.id,
                "section_title": ctx.section.title,
                "section_description": ctx.section.description,
                "total_score": ctx.response.total_score,
                "max_possible_score": ctx.response.max_possible_score,
                "answers": answers,
            })
        })
        .collect();

    json!({
        "pool_id": pool.id,
        "pool_title": pool.title,
        "pool_description": pool.description,
        "not_applicable": false,
        "sections": section_values,
    })
}

/// Context for a pool with no applicable sections at the child's age.
///
/// Goes through the same generation call as a regular pool so the
/// narrative wording stays consistent across summaries.
pub fn not_applicable_payload(pool: &Pool) -> Value {
    json!({
        "pool_id": pool.id,
        "pool_title": pool.title,
        "pool_description": pool.description,
        "not_applicable": true,
        "sections": [],
    })
}

/// Context for the final report: pool summaries plus the minimal child
/// facts the narrative needs. Age and gender only.
pub fn final_report_payload(
    age_months: i32,
    gender: Gender,
    summaries: &[&PoolSummary],
) -> Value {
    let pool_values: Vec<Value> = summaries
        .iter()
        .map(|summary| {
            json!({
                "pool_title": summary.pool_title,
                "summary": summary.summary_content,
                "score_earned": summary.total_score,
                "max_possible_score": summary.max_possible_score,
                "not_applicable": summary.not_applicable,
            })
        })
        .collect();

    json!({
        "child": {
            "age_months": age_months,
            "gender": gender,
        },
        "pool_summaries": pool_values,
    })
}
