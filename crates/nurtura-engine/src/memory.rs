//! In-memory [`Store`] backed by mutex-guarded maps.
//!
//! Enforces the same uniqueness constraints as the production store and
//! is the reference implementation the engine tests run against.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use nurtura_core::models::{
    Child, ConversationLog, FinalReport, PoolSummary, QuestionAnswer, Response,
};

use crate::store::{Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    children: HashMap<Uuid, Child>,
    /// Keyed by (child_id, section_id) — one response per pair.
    responses: HashMap<(Uuid, Uuid), Response>,
    /// Keyed by (response_id, question_id) — one answer per pair.
    answers: HashMap<(Uuid, Uuid), QuestionAnswer>,
    conversations: HashMap<Uuid, ConversationLog>,
    /// Keyed by (child_id, pool_id) — one summary per pair.
    summaries: HashMap<(Uuid, Uuid), PoolSummary>,
    /// Keyed by child_id — one report per child.
    reports: HashMap<Uuid, FinalReport>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a child record. Children are managed by the clinical service,
    /// not the engine, so this sits outside the [`Store`] trait.
    pub fn put_child(&self, child: Child) {
        self.inner.lock().unwrap().children.insert(child.id, child);
    }
}

impl Store for MemoryStore {
    async fn child(&self, child_id: Uuid) -> Result<Option<Child>, StoreError> {
        Ok(self.inner.lock().unwrap().children.get(&child_id).cloned())
    }

    async fn response(
        &self,
        child_id: Uuid,
        section_id: Uuid,
    ) -> Result<Option<Response>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .responses
            .get(&(child_id, section_id))
            .cloned())
    }

    async fn responses_for_sections(
        &self,
        child_id: Uuid,
        section_ids: &[Uuid],
    ) -> Result<Vec<Response>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(section_ids
            .iter()
            .filter_map(|section_id| inner.responses.get(&(child_id, *section_id)).cloned())
            .collect())
    }

    async fn insert_response(&self, response: &Response) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (response.child_id, response.section_id);
        if inner.responses.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                key: format!("response {}/{}", key.0, key.1),
            });
        }
        inner.responses.insert(key, response.clone());
        Ok(())
    }

    async fn update_response(&self, response: &Response) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (response.child_id, response.section_id);
        if !inner.responses.contains_key(&key) {
            return Err(StoreError::NotFound {
                key: format!("response {}/{}", key.0, key.1),
            });
        }
        inner.responses.insert(key, response.clone());
        Ok(())
    }

    async fn answers(&self, response_id: Uuid) -> Result<Vec<QuestionAnswer>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut answers: Vec<QuestionAnswer> = inner
            .answers
            .values()
            .filter(|a| a.response_id == response_id)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.answered_at);
        Ok(answers)
    }

    async fn insert_answer(&self, answer: &QuestionAnswer) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (answer.response_id, answer.question_id);
        if inner.answers.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                key: format!("answer {}/{}", key.0, key.1),
            });
        }
        inner.answers.insert(key, answer.clone());
        Ok(())
    }

    async fn insert_conversation_log(&self, log: &ConversationLog) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .conversations
            .insert(log.id, log.clone());
        Ok(())
    }

    async fn pool_summary(
        &self,
        child_id: Uuid,
        pool_id: Uuid,
    ) -> Result<Option<PoolSummary>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .summaries
            .get(&(child_id, pool_id))
            .cloned())
    }

    async fn pool_summaries(&self, child_id: Uuid) -> Result<Vec<PoolSummary>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .summaries
            .values()
            .filter(|s| s.child_id == child_id)
            .cloned()
            .collect())
    }

    async fn insert_pool_summary(&self, summary: &PoolSummary) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (summary.child_id, summary.pool_id);
        if inner.summaries.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                key: format!("pool summary {}/{}", key.0, key.1),
            });
        }
        inner.summaries.insert(key, summary.clone());
        Ok(())
    }

    async fn delete_pool_summary(&self, child_id: Uuid, pool_id: Uuid) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .summaries
            .remove(&(child_id, pool_id));
        Ok(())
    }

    async fn final_report(&self, child_id: Uuid) -> Result<Option<FinalReport>, StoreError> {
        Ok(self.inner.lock().unwrap().reports.get(&child_id).cloned())
    }

    async fn final_report_by_id(
        &self,
        report_id: Uuid,
    ) -> Result<Option<FinalReport>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.reports.values().find(|r| r.id == report_id).cloned())
    }

    async fn insert_final_report(&self, report: &FinalReport) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.reports.contains_key(&report.child_id) {
            return Err(StoreError::AlreadyExists {
                key: format!("final report {}", report.child_id),
            });
        }
        inner.reports.insert(report.child_id, report.clone());
        Ok(())
    }

    async fn update_final_report(&self, report: &FinalReport) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.reports.contains_key(&report.child_id) {
            return Err(StoreError::NotFound {
                key: format!("final report {}", report.child_id),
            });
        }
        inner.reports.insert(report.child_id, report.clone());
        Ok(())
    }

    async fn delete_final_report(&self, child_id: Uuid) -> Result<(), StoreError> {
        self.inner.lock().unwrap().reports.remove(&child_id);
        Ok(())
    }
}
