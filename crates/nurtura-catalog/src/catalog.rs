use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::applicability;
use crate::error::CatalogError;

/// Weighted top-level grouping of assessment sections.
///
/// Pools are created by configuration, rarely mutated, and never deleted
/// in normal operation (soft-deactivated via `active`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pool {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: u32,
    pub active: bool,
    /// Percentage contribution to the overall concern index.
    pub weight: u32,
}

/// A themed group of questions within a pool; the unit of response
/// completion.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Section {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: u32,
    pub active: bool,
}

/// Single assessment question configuration.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: Uuid,
    pub section_id: Uuid,
    /// Stable machine key, set at authoring time. Anything downstream that
    /// needs a field name for this question uses the key — never a name
    /// derived from the mutable display text.
    pub key: String,
    pub text: String,
    pub min_age_months: i32,
    pub max_age_months: i32,
    /// Maximum achievable score for one answer.
    pub max_score: u32,
    pub position: u32,
}

impl Question {
    pub const DEFAULT_MAX_SCORE: u32 = 4;
}

/// The tenant-wide assessment catalog: every pool, section, and question.
///
/// Read-only configuration shared by all children. Lookups here are pure;
/// the same (catalog, age) pair always yields the same applicability set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub pools: Vec<Pool>,
    pub sections: Vec<Section>,
    pub questions: Vec<Question>,
}

impl Catalog {
    pub fn new(mut pools: Vec<Pool>, mut sections: Vec<Section>, mut questions: Vec<Question>) -> Self {
        pools.sort_by_key(|p| p.position);
        sections.sort_by_key(|s| s.position);
        questions.sort_by_key(|q| q.position);
        Self {
            pools,
            sections,
            questions,
        }
    }

    pub fn pool(&self, id: Uuid) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id == id)
    }

    pub fn section(&self, id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn question(&self, id: Uuid) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn active_pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.iter().filter(|p| p.active)
    }

    /// Active sections belonging to a pool, in position order.
    pub fn sections_in_pool(&self, pool_id: Uuid) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |s| s.pool_id == pool_id && s.active)
    }

    pub fn questions_in_section(&self, section_id: Uuid) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.section_id == section_id)
    }

    /// Questions in a section whose age window contains `age_months`.
    pub fn applicable_questions(&self, section_id: Uuid, age_months: i32) -> Vec<&Question> {
        self.questions_in_section(section_id)
            .filter(|q| applicability::applicable(q, age_months))
            .collect()
    }

    /// A section is applicable iff it contains at least one applicable
    /// question.
    pub fn section_applicable(&self, section_id: Uuid, age_months: i32) -> bool {
        self.questions_in_section(section_id)
            .any(|q| applicability::applicable(q, age_months))
    }

    /// Active sections of a pool that are applicable at the given age.
    pub fn applicable_sections(&self, pool_id: Uuid, age_months: i32) -> Vec<&Section> {
        self.sections_in_pool(pool_id)
            .filter(|s| self.section_applicable(s.id, age_months))
            .collect()
    }

    /// A pool is applicable iff it contains at least one applicable section.
    pub fn pool_applicable(&self, pool_id: Uuid, age_months: i32) -> bool {
        self.sections_in_pool(pool_id)
            .any(|s| self.section_applicable(s.id, age_months))
    }

    /// Active pools that are applicable at the given age.
    pub fn applicable_pools(&self, age_months: i32) -> Vec<&Pool> {
        self.active_pools()
            .filter(|p| self.pool_applicable(p.id, age_months))
            .collect()
    }

    /// Validate an incoming answer against the catalog: the question must
    /// exist, belong to the section, and the score must not exceed the
    /// question's maximum.
    pub fn validate_answer(
        &self,
        section_id: Uuid,
        question_id: Uuid,
        score: u32,
    ) -> Result<(), CatalogError> {
        let question = self
            .question(question_id)
            .ok_or(CatalogError::UnknownQuestion(question_id))?;

        if question.section_id != section_id {
            return Err(CatalogError::QuestionNotInSection {
                question_id,
                section_id,
            });
        }

        if score > question.max_score {
            return Err(CatalogError::ScoreOutOfRange {
                question_id,
                score,
                max_score: question.max_score,
            });
        }

        Ok(())
    }
}
