//! S3-backed implementation of the engine's [`Store`] seam.
//!
//! Every record is one JSON object at a canonical key, so the uniqueness
//! constraints the engine relies on reduce to `If-None-Match: *`
//! conditional creates on those keys.

use aws_sdk_s3::Client;
use tracing::debug;
use uuid::Uuid;

use nurtura_catalog::Catalog;
use nurtura_core::keys;
use nurtura_core::models::{
    Child, ConversationLog, FinalReport, PoolSummary, QuestionAnswer, Response,
};
use nurtura_engine::store::{Store, StoreError};

use crate::error::StorageError;
use crate::state;

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            bucket: bucket.into(),
        }
    }

    /// Persist a child record. Children are managed by the clinical
    /// service, not the engine, so this sits outside the [`Store`] trait.
    pub async fn put_child(&self, child: &Child) -> Result<(), StorageError> {
        state::save_state(&self.client, &self.bucket, &keys::child(child.id), child).await
    }

    /// Load the tenant-wide assessment catalog.
    pub async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        state::load_state(&self.client, &self.bucket, keys::CATALOG).await
    }

    /// Persist the tenant-wide assessment catalog (configuration tooling
    /// only; the engine treats the catalog as read-only).
    pub async fn save_catalog(&self, catalog: &Catalog) -> Result<(), StorageError> {
        state::save_state(&self.client, &self.bucket, keys::CATALOG, catalog).await
    }

    async fn load_optional<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match state::load_state(&self.client, &self.bucket, key).await {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(into_store_error(e)),
        }
    }

    async fn load_all_under<T: serde::de::DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<T>, StoreError> {
        let keys = crate::objects::list_objects(&self.client, &self.bucket, prefix)
            .await
            .map_err(into_store_error)?;
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            match state::load_state(&self.client, &self.bucket, &key).await {
                Ok(value) => records.push(value),
                // Deleted between list and get; skip.
                Err(StorageError::NotFound { .. }) => {
                    debug!(key = %key, "object vanished between list and get");
                }
                Err(e) => return Err(into_store_error(e)),
            }
        }
        Ok(records)
    }
}

fn into_store_error(e: StorageError) -> StoreError {
    match e {
        StorageError::NotFound { key } => StoreError::NotFound { key },
        StorageError::AlreadyExists { key } => StoreError::AlreadyExists { key },
        StorageError::Serialization(e) => StoreError::Serialization(e),
        other => StoreError::Backend(other.to_string()),
    }
}

impl Store for S3Store {
    async fn child(&self, child_id: Uuid) -> Result<Option<Child>, StoreError> {
        self.load_optional(&keys::child(child_id)).await
    }

    async fn response(
        &self,
        child_id: Uuid,
        section_id: Uuid,
    ) -> Result<Option<Response>, StoreError> {
        self.load_optional(&keys::response(child_id, section_id)).await
    }

    async fn responses_for_sections(
        &self,
        child_id: Uuid,
        section_ids: &[Uuid],
    ) -> Result<Vec<Response>, StoreError> {
        let mut responses = Vec::new();
        for section_id in section_ids {
            if let Some(response) = self.response(child_id, *section_id).await? {
                responses.push(response);
            }
        }
        Ok(responses)
    }

    async fn insert_response(&self, response: &Response) -> Result<(), StoreError> {
        state::create_state(
            &self.client,
            &self.bucket,
            &keys::response(response.child_id, response.section_id),
            response,
        )
        .await
        .map_err(into_store_error)
    }

    async fn update_response(&self, response: &Response) -> Result<(), StoreError> {
        state::save_state(
            &self.client,
            &self.bucket,
            &keys::response(response.child_id, response.section_id),
            response,
        )
        .await
        .map_err(into_store_error)
    }

    async fn answers(&self, response_id: Uuid) -> Result<Vec<QuestionAnswer>, StoreError> {
        let mut answers: Vec<QuestionAnswer> =
            self.load_all_under(&keys::answers_prefix(response_id)).await?;
        answers.sort_by_key(|a| a.answered_at);
        Ok(answers)
    }

    async fn insert_answer(&self, answer: &QuestionAnswer) -> Result<(), StoreError> {
        state::create_state(
            &self.client,
            &self.bucket,
            &keys::answer(answer.response_id, answer.question_id),
            answer,
        )
        .await
        .map_err(into_store_error)
    }

    async fn insert_conversation_log(&self, log: &ConversationLog) -> Result<(), StoreError> {
        state::create_state(
            &self.client,
            &self.bucket,
            &keys::conversation_log(log.id),
            log,
        )
        .await
        .map_err(into_store_error)
    }

    async fn pool_summary(
        &self,
        child_id: Uuid,
        pool_id: Uuid,
    ) -> Result<Option<PoolSummary>, StoreError> {
        self.load_optional(&keys::pool_summary(child_id, pool_id)).await
    }

    async fn pool_summaries(&self, child_id: Uuid) -> Result<Vec<PoolSummary>, StoreError> {
        self.load_all_under(&keys::pool_summaries_prefix(child_id)).await
    }

    async fn insert_pool_summary(&self, summary: &PoolSummary) -> Result<(), StoreError> {
        state::create_state(
            &self.client,
            &self.bucket,
            &keys::pool_summary(summary.child_id, summary.pool_id),
            summary,
        )
        .await
        .map_err(into_store_error)
    }

    async fn delete_pool_summary(&self, child_id: Uuid, pool_id: Uuid) -> Result<(), StoreError> {
        crate::objects::delete_object(
            &self.client,
            &self.bucket,
            &keys::pool_summary(child_id, pool_id),
        )
        .await
        .map_err(into_store_error)
    }

    async fn final_report(&self, child_id: Uuid) -> Result<Option<FinalReport>, StoreError> {
        self.load_optional(&keys::final_report(child_id)).await
    }

    async fn final_report_by_id(
        &self,
        report_id: Uuid,
    ) -> Result<Option<FinalReport>, StoreError> {
        let reports: Vec<FinalReport> = self.load_all_under(keys::REPORTS_PREFIX).await?;
        Ok(reports.into_iter().find(|r| r.id == report_id))
    }

    async fn insert_final_report(&self, report: &FinalReport) -> Result<(), StoreError> {
        state::create_state(
            &self.client,
            &self.bucket,
            &keys::final_report(report.child_id),
            report,
        )
        .await
        .map_err(into_store_error)
    }

    async fn update_final_report(&self, report: &FinalReport) -> Result<(), StoreError> {
        let key = keys::final_report(report.child_id);
        // Review stamping mutates an existing report, never creates one.
        if self.load_optional::<FinalReport>(&key).await?.is_none() {
            return Err(StoreError::NotFound { key });
        }
        state::save_state(&self.client, &self.bucket, &key, report)
            .await
            .map_err(into_store_error)
    }

    async fn delete_final_report(&self, child_id: Uuid) -> Result<(), StoreError> {
        crate::objects::delete_object(
            &self.client,
            &self.bucket,
            &keys::final_report(child_id),
        )
        .await
        .map_err(into_store_error)
    }
}
