//! S3 key/path conventions.
//!
//! Pure string functions — no AWS SDK dependency. These define the canonical
//! layout of objects in the nurtura assessment bucket.

use uuid::Uuid;

pub fn child(id: Uuid) -> String {
    format!("children/{id}.json")
}

pub fn response(child_id: Uuid, section_id: Uuid) -> String {
    format!("responses/{child_id}/{section_id}.json")
}

pub fn answer(response_id: Uuid, question_id: Uuid) -> String {
    format!("answers/{response_id}/{question_id}.json")
}

pub fn answers_prefix(response_id: Uuid) -> String {
    format!("answers/{response_id}/")
}

pub fn conversation_log(id: Uuid) -> String {
    format!("conversations/{id}.json")
}

pub fn pool_summary(child_id: Uuid, pool_id: Uuid) -> String {
    format!("summaries/{child_id}/{pool_id}.json")
}

pub fn pool_summaries_prefix(child_id: Uuid) -> String {
    format!("summaries/{child_id}/")
}

pub fn final_report(child_id: Uuid) -> String {
    format!("reports/{child_id}.json")
}

pub const REPORTS_PREFIX: &str = "reports/";

pub const CATALOG: &str = "_catalog/assessment.json";
