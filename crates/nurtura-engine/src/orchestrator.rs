//! Generation orchestration: idempotent, at-most-once pool summaries and
//! final reports, driven by section-completion events.
//!
//! The cascade: an answer write completes a section → the section's pool
//! is checked and summarized → a persisted pool summary triggers the
//! whole-assessment check → the final report is generated once every
//! applicable pool has a summary. Only a *persisted* summary write moves
//! the cascade forward; a lost insert race discards its generated content
//! and stops.

use jiff::Timestamp;
use jiff::civil::Date;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use nurtura_audit::AuditEvent;
use nurtura_catalog::{Catalog, Pool, scoring};
use nurtura_catalog::scoring::PoolContribution;
use nurtura_core::models::{
    AssessmentStatus, ConversationLog, FinalReport, NewAnswer, PoolSummary, QuestionAnswer,
    Response, ReviewStage, ViewerCapability,
};

use crate::claims::{ClaimKey, ClaimRegistry};
use crate::context;
use crate::context::SectionContext;
use crate::error::EngineError;
use crate::generator::{GenerationRequest, TextGenerator};
use crate::parse;
use crate::review;
use crate::store::{Store, StoreError};
use crate::tracker;

/// Outcome of one pool-summary trigger.
#[derive(Debug)]
pub enum PoolOutcome {
    /// A summary already exists for this (child, pool) — idempotent no-op.
    /// Also the losing side of a concurrent generation race.
    AlreadyExists,
    /// Not every applicable section has a completed response yet; the
    /// caller retries on the next completing event.
    NotYetComplete {
        completed_sections: u32,
        total_sections: u32,
    },
    /// A summary was generated and persisted by this call.
    Generated(PoolSummary),
    /// The pool had no applicable sections at the child's age; the
    /// not-applicable summary was persisted by this call.
    NotApplicable(PoolSummary),
}

impl PoolOutcome {
    /// The summary persisted by *this* trigger, if any.
    pub fn persisted(&self) -> Option<&PoolSummary> {
        match self {
            PoolOutcome::Generated(summary) | PoolOutcome::NotApplicable(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Outcome of one final-report trigger.
#[derive(Debug)]
pub enum FinalOutcome {
    AlreadyExists,
    NotYetComplete {
        completed_pools: u32,
        total_pools: u32,
    },
    Generated(FinalReport),
}

/// What a recorded answer set in motion.
#[derive(Debug)]
pub struct AnswerOutcome {
    pub section_complete: bool,
    pub pool: Option<PoolOutcome>,
    pub final_report: Option<FinalOutcome>,
}

/// Result of a backfill sweep over every applicable pool.
#[derive(Debug)]
pub struct BackfillReport {
    pub generated: Vec<PoolSummary>,
    pub skipped: Vec<SkippedPool>,
    pub final_report: Option<FinalReport>,
}

#[derive(Debug)]
pub struct SkippedPool {
    pub pool_id: Uuid,
    pub pool_title: String,
    pub reason: String,
}

/// Per-pool progress plus the final report's review stage.
#[derive(Debug)]
pub struct ReportStatus {
    pub pools: Vec<PoolStatus>,
    pub final_report: Option<FinalReportStatus>,
}

#[derive(Debug)]
pub struct PoolStatus {
    pub pool_id: Uuid,
    pub pool_title: String,
    pub applicable: bool,
    pub total_sections: u32,
    pub completed_sections: u32,
    pub summary_generated: bool,
}

#[derive(Debug)]
pub struct FinalReportStatus {
    pub report_id: Uuid,
    pub stage: ReviewStage,
    pub generated_at: Timestamp,
}

/// The cascade engine. Owns the catalog; the generator and store are
/// injected at construction and shared by reference.
pub struct Orchestrator<G, S> {
    catalog: Catalog,
    generator: G,
    store: S,
    claims: ClaimRegistry,
}

impl<G: TextGenerator, S: Store> Orchestrator<G, S> {
    pub fn new(catalog: Catalog, generator: G, store: S) -> Self {
        Self {
            catalog,
            generator,
            store,
            claims: ClaimRegistry::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn today(&self) -> Date {
        jiff::Zoned::now().date()
    }

    /// Start (or resume) the assessment session for a (child, section)
    /// pair. Idempotent: the existing response is returned when the pair
    /// has already started.
    pub async fn start_response(
        &self,
        child_id: Uuid,
        section_id: Uuid,
    ) -> Result<Response, EngineError> {
        if self.catalog.section(section_id).is_none() {
            return Err(EngineError::UnknownSection(section_id));
        }
        if let Some(existing) = self.store.response(child_id, section_id).await? {
            return Ok(existing);
        }

        let response = Response::new(child_id, section_id, Timestamp::now());
        match self.store.insert_response(&response).await {
            Ok(()) => {
                info!(child_id = %child_id, section_id = %section_id, "response started");
                Ok(response)
            }
            // Lost a concurrent create; the winner's row is the session.
            Err(StoreError::AlreadyExists { .. }) => self
                .store
                .response(child_id, section_id)
                .await?
                .ok_or(EngineError::ResponseNotFound {
                    child_id,
                    section_id,
                }),
            Err(e) => Err(e.into()),
        }
    }

    /// Record one immutable answer, then run the completion cascade.
    pub async fn record_answer(
        &self,
        child_id: Uuid,
        section_id: Uuid,
        new_answer: NewAnswer,
    ) -> Result<AnswerOutcome, EngineError> {
        self.catalog
            .validate_answer(section_id, new_answer.question_id, new_answer.score)?;

        let response = self
            .store
            .response(child_id, section_id)
            .await?
            .ok_or(EngineError::ResponseNotFound {
                child_id,
                section_id,
            })?;

        let answer = QuestionAnswer {
            id: Uuid::new_v4(),
            response_id: response.id,
            question_id: new_answer.question_id,
            raw_answer: new_answer.raw_answer,
            translated_answer: new_answer.translated_answer,
            answer_bucket: new_answer.answer_bucket,
            score: new_answer.score,
            answered_at: Timestamp::now(),
        };
        self.store.insert_answer(&answer).await?;

        self.on_answer_recorded(child_id, section_id).await
    }

    /// Store a raw conversation artifact and point the response at it.
    /// Logs are append-only; the response pointer is overwritten on
    /// resume.
    pub async fn log_conversation(
        &self,
        child_id: Uuid,
        section_id: Uuid,
        conversation: serde_json::Value,
    ) -> Result<ConversationLog, EngineError> {
        let mut response = self
            .store
            .response(child_id, section_id)
            .await?
            .ok_or(EngineError::ResponseNotFound {
                child_id,
                section_id,
            })?;

        let log = ConversationLog {
            id: Uuid::new_v4(),
            response_id: response.id,
            conversation,
            created_at: Timestamp::now(),
        };
        self.store.insert_conversation_log(&log).await?;

        response.last_conversation_id = Some(log.id);
        response.updated_at = log.created_at;
        self.store.update_response(&response).await?;
        Ok(log)
    }

    /// Entry point for "an answer was recorded for child C in section S".
    ///
    /// Re-evaluates completion at the child's current age, finalizes the
    /// response when complete, and runs the pool and whole-assessment
    /// triggers.
    pub async fn on_answer_recorded(
        &self,
        child_id: Uuid,
        section_id: Uuid,
    ) -> Result<AnswerOutcome, EngineError> {
        let child = self
            .store
            .child(child_id)
            .await?
            .ok_or(EngineError::ChildNotFound(child_id))?;
        let age_months = child.age_months(self.today());

        let mut response = self
            .store
            .response(child_id, section_id)
            .await?
            .ok_or(EngineError::ResponseNotFound {
                child_id,
                section_id,
            })?;
        let answers = self.store.answers(response.id).await?;

        let newly_complete = tracker::apply_progress(
            &self.catalog,
            &mut response,
            age_months,
            &answers,
            Timestamp::now(),
        );
        self.store.update_response(&response).await?;

        if !newly_complete {
            return Ok(AnswerOutcome {
                section_complete: response.status == AssessmentStatus::Completed,
                pool: None,
                final_report: None,
            });
        }

        let section = self
            .catalog
            .section(section_id)
            .ok_or(EngineError::UnknownSection(section_id))?;
        let pool_outcome = self
            .check_and_generate_pool_summary(child_id, section.pool_id)
            .await?;

        // Only a summary persisted by this call advances the cascade.
        let final_outcome = match pool_outcome.persisted() {
            Some(_) => Some(self.check_and_generate_final_report(child_id).await?),
            None => None,
        };

        Ok(AnswerOutcome {
            section_complete: true,
            pool: Some(pool_outcome),
            final_report: final_outcome,
        })
    }

    /// Check pool completion for a child and generate its summary when
    /// every applicable section is complete. At most one summary ever
    /// persists per (child, pool); concurrent callers race on the insert
    /// and the loser discards.
    pub async fn check_and_generate_pool_summary(
        &self,
        child_id: Uuid,
        pool_id: Uuid,
    ) -> Result<PoolOutcome, EngineError> {
        let pool = self
            .catalog
            .pool(pool_id)
            .ok_or(EngineError::UnknownPool(pool_id))?;

        if self.store.pool_summary(child_id, pool_id).await?.is_some() {
            info!(child_id = %child_id, pool_id = %pool_id, "pool summary already exists");
            return Ok(PoolOutcome::AlreadyExists);
        }

        let child = self
            .store
            .child(child_id)
            .await?
            .ok_or(EngineError::ChildNotFound(child_id))?;
        let age_months = child.age_months(self.today());

        let sections = self.catalog.applicable_sections(pool_id, age_months);
        if sections.is_empty() {
            return self
                .generate_not_applicable_summary(child_id, pool, age_months)
                .await;
        }

        let section_ids: Vec<Uuid> = sections.iter().map(|s| s.id).collect();
        let responses = self
            .store
            .responses_for_sections(child_id, &section_ids)
            .await?;
        let completed: Vec<Response> = responses
            .into_iter()
            .filter(|r| r.status == AssessmentStatus::Completed)
            .collect();

        let total_sections = sections.len() as u32;
        let completed_sections = completed.len() as u32;
        if completed_sections < total_sections {
            info!(
                child_id = %child_id,
                pool_id = %pool_id,
                progress = %format!("{completed_sections}/{total_sections}"),
                "pool not complete"
            );
            return Ok(PoolOutcome::NotYetComplete {
                completed_sections,
                total_sections,
            });
        }

        info!(child_id = %child_id, pool_id = %pool_id, "generating pool summary");

        let mut section_contexts = Vec::with_capacity(sections.len());
        for section in &sections {
            let Some(response) = completed.iter().find(|r| r.section_id == section.id) else {
                continue;
            };
            let answers = self.store.answers(response.id).await?;
            section_contexts.push(SectionContext {
                section: *section,
                response,
                answers,
            });
        }

        let request = GenerationRequest {
            operation: "pool_summary",
            context: context::pool_summary_payload(&self.catalog, pool, &section_contexts),
            schema_hint: context::POOL_SUMMARY_SCHEMA_HINT,
        };
        let actor = format!("system:pool_summary:{pool_id}");
        let summary_content = self
            .generate_content(&request, &actor, "pool_summary", &pool_id.to_string())
            .await?;

        let totals = scoring::pool_totals(&completed);
        let summary = PoolSummary {
            id: Uuid::new_v4(),
            child_id,
            pool_id,
            pool_title: pool.title.clone(),
            summary_content,
            total_sections,
            completed_sections,
            total_score: totals.total_score,
            max_possible_score: totals.max_possible_score,
            not_applicable: false,
            generated_at: Timestamp::now(),
        };

        match self.persist_pool_summary(summary, &actor).await? {
            Some(summary) => Ok(PoolOutcome::Generated(summary)),
            None => Ok(PoolOutcome::AlreadyExists),
        }
    }

    /// Zero-applicable-section fast path. The synthetic payload goes
    /// through the same generation call so the narrative wording stays
    /// consistent, but a generator failure here falls back to a fixed
    /// payload — a pool that does not apply must never fail to summarize.
    async fn generate_not_applicable_summary(
        &self,
        child_id: Uuid,
        pool: &Pool,
        age_months: i32,
    ) -> Result<PoolOutcome, EngineError> {
        info!(
            child_id = %child_id,
            pool_id = %pool.id,
            age_months,
            "pool has no applicable sections; writing not-applicable summary"
        );

        let request = GenerationRequest {
            operation: "pool_summary",
            context: context::not_applicable_payload(pool),
            schema_hint: context::POOL_SUMMARY_SCHEMA_HINT,
        };
        let actor = format!("system:pool_summary:{}", pool.id);
        let summary_content = match self
            .generate_content(&request, &actor, "pool_summary", &pool.id.to_string())
            .await
        {
            Ok(content) => content,
            Err(EngineError::Generation(e)) => {
                warn!(pool_id = %pool.id, error = %e, "falling back to fixed not-applicable wording");
                fallback_not_applicable_content(pool)
            }
            Err(EngineError::Malformed(e)) => {
                warn!(pool_id = %pool.id, error = %e, "falling back to fixed not-applicable wording");
                fallback_not_applicable_content(pool)
            }
            Err(e) => return Err(e),
        };

        let summary = PoolSummary {
            id: Uuid::new_v4(),
            child_id,
            pool_id: pool.id,
            pool_title: pool.title.clone(),
            summary_content,
            total_sections: 0,
            completed_sections: 0,
            total_score: 0,
            max_possible_score: 0,
            not_applicable: true,
            generated_at: Timestamp::now(),
        };

        match self.persist_pool_summary(summary, &actor).await? {
            Some(summary) => Ok(PoolOutcome::NotApplicable(summary)),
            None => Ok(PoolOutcome::AlreadyExists),
        }
    }

    /// Persist a freshly generated summary. Returns `None` when a
    /// concurrent trigger won the insert race — the loser's content is
    /// discarded, never overwritten onto the winner's.
    async fn persist_pool_summary(
        &self,
        summary: PoolSummary,
        actor: &str,
    ) -> Result<Option<PoolSummary>, EngineError> {
        match self.store.insert_pool_summary(&summary).await {
            Ok(()) => {
                info!(
                    child_id = %summary.child_id,
                    pool_id = %summary.pool_id,
                    summary_id = %summary.id,
                    "pool summary generated"
                );
                AuditEvent::new("persist", "pool_summary", summary.id.to_string(), actor).emit();
                Ok(Some(summary))
            }
            Err(StoreError::AlreadyExists { key }) => {
                debug!(key = %key, "concurrent pool summary won the race; discarding");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether every applicable pool has a summary and generate the
    /// final report when it does. At most one report ever persists per
    /// child.
    pub async fn check_and_generate_final_report(
        &self,
        child_id: Uuid,
    ) -> Result<FinalOutcome, EngineError> {
        if self.store.final_report(child_id).await?.is_some() {
            info!(child_id = %child_id, "final report already exists");
            return Ok(FinalOutcome::AlreadyExists);
        }

        let child = self
            .store
            .child(child_id)
            .await?
            .ok_or(EngineError::ChildNotFound(child_id))?;
        let age_months = child.age_months(self.today());

        let pools = self.catalog.applicable_pools(age_months);
        let total_pools = pools.len() as u32;
        if total_pools == 0 {
            warn!(child_id = %child_id, age_months, "no applicable pools");
            return Ok(FinalOutcome::NotYetComplete {
                completed_pools: 0,
                total_pools: 0,
            });
        }

        let summaries = self.store.pool_summaries(child_id).await?;
        // Pool order drives the narrative order.
        let ordered: Vec<&PoolSummary> = pools
            .iter()
            .filter_map(|pool| summaries.iter().find(|s| s.pool_id == pool.id))
            .collect();

        let completed_pools = ordered.len() as u32;
        if completed_pools < total_pools {
            info!(
                child_id = %child_id,
                progress = %format!("{completed_pools}/{total_pools}"),
                "not all pools have summaries"
            );
            return Ok(FinalOutcome::NotYetComplete {
                completed_pools,
                total_pools,
            });
        }

        info!(child_id = %child_id, "generating final report");

        let request = GenerationRequest {
            operation: "final_report",
            context: context::final_report_payload(age_months, child.gender, &ordered),
            schema_hint: context::FINAL_REPORT_SCHEMA_HINT,
        };
        let actor = format!("system:final_report:{child_id}");
        let overall_summary = self
            .generate_content(&request, &actor, "final_report", &child_id.to_string())
            .await?;

        let contributions: Vec<PoolContribution> = ordered
            .iter()
            .map(|summary| PoolContribution {
                pool_id: summary.pool_id,
                weight: self
                    .catalog
                    .pool(summary.pool_id)
                    .map_or(0, |p| p.weight),
                total_score: summary.total_score,
                max_possible_score: summary.max_possible_score,
            })
            .collect();
        let concern = scoring::concern_index(&contributions);

        let report = FinalReport {
            id: Uuid::new_v4(),
            child_id,
            overall_summary,
            total_pools,
            completed_pools,
            overall_score: ordered.iter().map(|s| s.total_score).sum(),
            overall_max_score: ordered.iter().map(|s| s.max_possible_score).sum(),
            concern_index: concern.map(|c| c.value),
            concern_band: concern.map(|c| c.band),
            doctor_reviewed_at: None,
            doctor_notes: None,
            hod_reviewed_at: None,
            hod_notes: None,
            generated_at: Timestamp::now(),
        };

        match self.store.insert_final_report(&report).await {
            Ok(()) => {
                info!(child_id = %child_id, report_id = %report.id, "final report generated");
                AuditEvent::new("persist", "final_report", report.id.to_string(), actor.as_str())
                    .emit();
                Ok(FinalOutcome::Generated(report))
            }
            Err(StoreError::AlreadyExists { key }) => {
                debug!(key = %key, "concurrent final report won the race; discarding");
                Ok(FinalOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_pool_summary(
        &self,
        child_id: Uuid,
        pool_id: Uuid,
    ) -> Result<Option<PoolSummary>, EngineError> {
        Ok(self.store.pool_summary(child_id, pool_id).await?)
    }

    /// Read the final report, enforcing the review-visibility contract for
    /// the caller's capability.
    pub async fn get_final_report(
        &self,
        child_id: Uuid,
        capability: ViewerCapability,
    ) -> Result<Option<FinalReport>, EngineError> {
        let Some(report) = self.store.final_report(child_id).await? else {
            return Ok(None);
        };
        if !review::visible_to(&report, capability) {
            return Err(EngineError::AccessDenied);
        }
        Ok(Some(report))
    }

    /// Operator-triggered overwrite: delete the existing summary (if any)
    /// under an exclusive claim, then re-run the generation algorithm.
    /// This is the only path that may replace a persisted summary.
    pub async fn regenerate_pool_summary(
        &self,
        child_id: Uuid,
        pool_id: Uuid,
    ) -> Result<PoolSummary, EngineError> {
        let _claim = self
            .claims
            .acquire(ClaimKey::PoolSummary { child_id, pool_id })
            .await;

        if self.store.pool_summary(child_id, pool_id).await?.is_some() {
            self.store.delete_pool_summary(child_id, pool_id).await?;
            AuditEvent::new(
                "regenerate",
                "pool_summary",
                pool_id.to_string(),
                format!("system:pool_summary:{pool_id}"),
            )
            .emit();
        }

        match self.check_and_generate_pool_summary(child_id, pool_id).await? {
            PoolOutcome::Generated(summary) | PoolOutcome::NotApplicable(summary) => Ok(summary),
            PoolOutcome::NotYetComplete {
                completed_sections,
                total_sections,
            } => Err(EngineError::Regeneration(format!(
                "pool is not complete ({completed_sections}/{total_sections} sections)"
            ))),
            PoolOutcome::AlreadyExists => Err(EngineError::Regeneration(
                "a concurrent trigger recreated the summary first".to_string(),
            )),
        }
    }

    /// Operator-triggered overwrite of the final report. The recreated
    /// report starts unreviewed — regeneration resets both sign-offs.
    pub async fn regenerate_final_report(
        &self,
        child_id: Uuid,
    ) -> Result<FinalReport, EngineError> {
        let _claim = self
            .claims
            .acquire(ClaimKey::FinalReport { child_id })
            .await;

        if self.store.final_report(child_id).await?.is_some() {
            self.store.delete_final_report(child_id).await?;
            AuditEvent::new(
                "regenerate",
                "final_report",
                child_id.to_string(),
                format!("system:final_report:{child_id}"),
            )
            .emit();
        }

        match self.check_and_generate_final_report(child_id).await? {
            FinalOutcome::Generated(report) => Ok(report),
            FinalOutcome::NotYetComplete {
                completed_pools,
                total_pools,
            } => Err(EngineError::Regeneration(format!(
                "not all pools have summaries ({completed_pools}/{total_pools})"
            ))),
            FinalOutcome::AlreadyExists => Err(EngineError::Regeneration(
                "a concurrent trigger recreated the report first".to_string(),
            )),
        }
    }

    /// Backfill sweep: attempt every applicable pool, then the final
    /// report. Generation failures are recorded per pool and do not stop
    /// the sweep — used to recover from failed background triggers.
    pub async fn generate_missing_reports(
        &self,
        child_id: Uuid,
    ) -> Result<BackfillReport, EngineError> {
        if self.store.child(child_id).await?.is_none() {
            return Err(EngineError::ChildNotFound(child_id));
        }

        let pools: Vec<(Uuid, String)> = self
            .catalog
            .active_pools()
            .map(|p| (p.id, p.title.clone()))
            .collect();

        let mut generated = Vec::new();
        let mut skipped = Vec::new();

        for (pool_id, pool_title) in pools {
            match self.check_and_generate_pool_summary(child_id, pool_id).await {
                Ok(PoolOutcome::Generated(summary))
                | Ok(PoolOutcome::NotApplicable(summary)) => generated.push(summary),
                Ok(PoolOutcome::AlreadyExists) => skipped.push(SkippedPool {
                    pool_id,
                    pool_title,
                    reason: "summary already exists".to_string(),
                }),
                Ok(PoolOutcome::NotYetComplete {
                    completed_sections,
                    total_sections,
                }) => skipped.push(SkippedPool {
                    pool_id,
                    pool_title,
                    reason: format!("{completed_sections}/{total_sections} sections complete"),
                }),
                Err(e @ (EngineError::Generation(_) | EngineError::Malformed(_))) => {
                    warn!(pool_id = %pool_id, error = %e, "pool summary backfill failed");
                    skipped.push(SkippedPool {
                        pool_id,
                        pool_title,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let final_report = match self.check_and_generate_final_report(child_id).await {
            Ok(FinalOutcome::Generated(report)) => Some(report),
            Ok(_) => None,
            Err(e @ (EngineError::Generation(_) | EngineError::Malformed(_))) => {
                warn!(child_id = %child_id, error = %e, "final report backfill failed");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(BackfillReport {
            generated,
            skipped,
            final_report,
        })
    }

    /// Per-pool completion and summary status, plus the final report's
    /// review stage.
    pub async fn report_status(&self, child_id: Uuid) -> Result<ReportStatus, EngineError> {
        let child = self
            .store
            .child(child_id)
            .await?
            .ok_or(EngineError::ChildNotFound(child_id))?;
        let age_months = child.age_months(self.today());

        let summaries = self.store.pool_summaries(child_id).await?;
        let mut pools = Vec::new();

        for pool in self.catalog.active_pools() {
            let sections = self.catalog.applicable_sections(pool.id, age_months);
            let section_ids: Vec<Uuid> = sections.iter().map(|s| s.id).collect();
            let responses = self
                .store
                .responses_for_sections(child_id, &section_ids)
                .await?;
            let completed_sections = responses
                .iter()
                .filter(|r| r.status == AssessmentStatus::Completed)
                .count() as u32;

            pools.push(PoolStatus {
                pool_id: pool.id,
                pool_title: pool.title.clone(),
                applicable: !sections.is_empty(),
                total_sections: sections.len() as u32,
                completed_sections,
                summary_generated: summaries.iter().any(|s| s.pool_id == pool.id),
            });
        }

        let final_report = self
            .store
            .final_report(child_id)
            .await?
            .map(|report| FinalReportStatus {
                report_id: report.id,
                stage: report.stage(),
                generated_at: report.generated_at,
            });

        Ok(ReportStatus {
            pools,
            final_report,
        })
    }

    /// Doctor sign-off. One-way, exactly once.
    pub async fn mark_doctor_reviewed(
        &self,
        report_id: Uuid,
        reviewer: &str,
        notes: Option<String>,
    ) -> Result<FinalReport, EngineError> {
        let mut report = self
            .store
            .final_report_by_id(report_id)
            .await?
            .ok_or(EngineError::ReportNotFound(report_id))?;

        review::mark_doctor_reviewed(&mut report, Timestamp::now(), notes)?;
        self.store.update_final_report(&report).await?;

        info!(report_id = %report_id, reviewer, "report doctor-reviewed");
        AuditEvent::new("doctor_review", "final_report", report_id.to_string(), reviewer).emit();
        Ok(report)
    }

    /// Department-head sign-off. Requires a prior doctor review; one-way,
    /// exactly once.
    pub async fn mark_hod_reviewed(
        &self,
        report_id: Uuid,
        reviewer: &str,
        notes: Option<String>,
    ) -> Result<FinalReport, EngineError> {
        let mut report = self
            .store
            .final_report_by_id(report_id)
            .await?
            .ok_or(EngineError::ReportNotFound(report_id))?;

        review::mark_hod_reviewed(&mut report, Timestamp::now(), notes)?;
        self.store.update_final_report(&report).await?;

        info!(report_id = %report_id, reviewer, "report HOD-reviewed");
        AuditEvent::new("hod_review", "final_report", report_id.to_string(), reviewer).emit();
        Ok(report)
    }

    /// Invoke the generator and parse its output, auditing the outcome.
    /// The call happens outside any claim or store lock — it is slow,
    /// externally latent, and retryable.
    async fn generate_content(
        &self,
        request: &GenerationRequest,
        actor: &str,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<serde_json::Value, EngineError> {
        let text = match self.generator.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(operation = request.operation, error = %e, "generation failed");
                AuditEvent::new("generate", resource_type, resource_id, actor)
                    .failed(&e)
                    .emit();
                return Err(e.into());
            }
        };

        match parse::parse_payload(&text) {
            Ok(content) => {
                AuditEvent::new("generate", resource_type, resource_id, actor).emit();
                Ok(content)
            }
            Err(e) => {
                warn!(operation = request.operation, error = %e, "generated output unusable");
                AuditEvent::new("generate", resource_type, resource_id, actor)
                    .failed(&e)
                    .emit();
                Err(e.into())
            }
        }
    }
}

fn fallback_not_applicable_content(pool: &Pool) -> serde_json::Value {
    json!({
        "summary": format!(
            "The {} area was not assessed: none of its sections apply at the child's current age.",
            pool.title
        ),
        "key_findings": [],
        "areas_of_concern": [],
        "strengths": [],
    })
}
