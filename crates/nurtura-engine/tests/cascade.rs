mod common;

use common::{FakeGenerator, answer, fixture, seed_child};
use nurtura_core::models::{AssessmentStatus, ConcernBand, ReviewStage};
use nurtura_engine::store::Store;
use nurtura_engine::{EngineError, FinalOutcome, MemoryStore, Orchestrator, PoolOutcome};

#[tokio::test]
async fn answers_cascade_to_pool_summary_and_final_report() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let orch = Orchestrator::new(fx.catalog.clone(), FakeGenerator::new(), store);

    orch.start_response(child_id, fx.section_joint_attention)
        .await
        .unwrap();
    let outcome = orch
        .record_answer(child_id, fx.section_joint_attention, answer(fx.q_joint_1, 3))
        .await
        .unwrap();
    assert!(!outcome.section_complete);
    assert!(outcome.pool.is_none());

    let outcome = orch
        .record_answer(child_id, fx.section_joint_attention, answer(fx.q_joint_2, 4))
        .await
        .unwrap();
    assert!(outcome.section_complete);
    assert!(matches!(
        outcome.pool,
        Some(PoolOutcome::NotYetComplete {
            completed_sections: 1,
            total_sections: 2,
        })
    ));
    assert!(outcome.final_report.is_none());

    let response = orch
        .store()
        .response(child_id, fx.section_joint_attention)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status, AssessmentStatus::Completed);
    assert_eq!(response.total_score, Some(7));
    assert_eq!(response.max_possible_score, Some(8));
    assert!(response.completed_at.is_some());

    orch.start_response(child_id, fx.section_peer_play)
        .await
        .unwrap();
    let outcome = orch
        .record_answer(child_id, fx.section_peer_play, answer(fx.q_peer_1, 2))
        .await
        .unwrap();
    let summary = match outcome.pool {
        Some(PoolOutcome::Generated(summary)) => summary,
        other => panic!("expected generated pool summary, got {other:?}"),
    };
    assert_eq!(summary.completed_sections, 2);
    assert_eq!(summary.total_sections, 2);
    assert_eq!(summary.total_score, 9);
    assert_eq!(summary.max_possible_score, 12);
    assert!(!summary.not_applicable);
    assert!(matches!(
        outcome.final_report,
        Some(FinalOutcome::NotYetComplete {
            completed_pools: 1,
            total_pools: 2,
        })
    ));

    orch.start_response(child_id, fx.section_language)
        .await
        .unwrap();
    let outcome = orch
        .record_answer(child_id, fx.section_language, answer(fx.q_lang_1, 4))
        .await
        .unwrap();
    assert!(matches!(outcome.pool, Some(PoolOutcome::Generated(_))));
    let report = match outcome.final_report {
        Some(FinalOutcome::Generated(report)) => report,
        other => panic!("expected generated final report, got {other:?}"),
    };

    assert_eq!(report.total_pools, 2);
    assert_eq!(report.completed_pools, 2);
    assert_eq!(report.overall_score, 13);
    assert_eq!(report.overall_max_score, 16);
    // Social 9/12 = 75%, Communication 4/4 = 100%, weights 25 and 28.
    let expected = (75.0 * 25.0 + 100.0 * 28.0) / 53.0;
    assert!((report.concern_index.unwrap() - expected).abs() < 1e-9);
    assert_eq!(report.concern_band, Some(ConcernBand::High));
    assert_eq!(report.stage(), ReviewStage::Generated);
}

#[tokio::test]
async fn pool_trigger_is_idempotent() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let orch = Orchestrator::new(fx.catalog.clone(), FakeGenerator::new(), store);

    common::complete_assessment(&orch, &fx, child_id).await;

    let first = orch
        .store()
        .pool_summary(child_id, fx.pool_social)
        .await
        .unwrap()
        .unwrap();
    let calls_before = orch.generator().calls();

    let outcome = orch
        .check_and_generate_pool_summary(child_id, fx.pool_social)
        .await
        .unwrap();
    assert!(matches!(outcome, PoolOutcome::AlreadyExists));

    let second = orch
        .store()
        .pool_summary(child_id, fx.pool_social)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.id, second.id);
    // No second generation call was made for the no-op trigger.
    assert_eq!(orch.generator().calls(), calls_before);
}

#[tokio::test]
async fn zero_applicable_pool_gets_not_applicable_summary() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let orch = Orchestrator::new(fx.catalog.clone(), FakeGenerator::new(), store);

    // School Readiness opens at 72 months; at 36 there is nothing to ask.
    let outcome = orch
        .check_and_generate_pool_summary(child_id, fx.pool_school)
        .await
        .unwrap();
    let summary = match outcome {
        PoolOutcome::NotApplicable(summary) => summary,
        other => panic!("expected not-applicable summary, got {other:?}"),
    };
    assert!(summary.not_applicable);
    assert_eq!(summary.total_score, 0);
    assert_eq!(summary.max_possible_score, 0);
    assert_eq!(summary.total_sections, 0);
    assert_eq!(summary.completed_sections, 0);
}

#[tokio::test]
async fn not_applicable_summary_survives_generator_failure() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let generator = FakeGenerator::new()
        .script_failure("model unavailable");
    let orch = Orchestrator::new(fx.catalog.clone(), generator, store);

    let outcome = orch
        .check_and_generate_pool_summary(child_id, fx.pool_school)
        .await
        .unwrap();
    let summary = match outcome {
        PoolOutcome::NotApplicable(summary) => summary,
        other => panic!("expected not-applicable summary, got {other:?}"),
    };
    assert!(summary.not_applicable);
    assert!(
        orch.store()
            .pool_summary(child_id, fx.pool_school)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn generation_failure_leaves_no_partial_state() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let generator = FakeGenerator::new().script_failure("model overloaded");
    let orch = Orchestrator::new(fx.catalog.clone(), generator, store);

    orch.start_response(child_id, fx.section_joint_attention)
        .await
        .unwrap();
    orch.record_answer(child_id, fx.section_joint_attention, answer(fx.q_joint_1, 3))
        .await
        .unwrap();
    orch.record_answer(child_id, fx.section_joint_attention, answer(fx.q_joint_2, 4))
        .await
        .unwrap();
    orch.start_response(child_id, fx.section_peer_play)
        .await
        .unwrap();

    // Completing the pool triggers generation, which fails.
    let result = orch
        .record_answer(child_id, fx.section_peer_play, answer(fx.q_peer_1, 2))
        .await;
    assert!(matches!(result, Err(EngineError::Generation(_))));

    // The response completion persisted; the summary did not.
    let response = orch
        .store()
        .response(child_id, fx.section_peer_play)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status, AssessmentStatus::Completed);
    assert!(
        orch.store()
            .pool_summary(child_id, fx.pool_social)
            .await
            .unwrap()
            .is_none()
    );

    // The next trigger retries from scratch and succeeds.
    let outcome = orch
        .check_and_generate_pool_summary(child_id, fx.pool_social)
        .await
        .unwrap();
    assert!(matches!(outcome, PoolOutcome::Generated(_)));
}

#[tokio::test]
async fn final_report_context_carries_no_phi() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let orch = Orchestrator::new(fx.catalog.clone(), FakeGenerator::new(), store);

    common::complete_assessment(&orch, &fx, child_id).await;

    let requests = orch.generator().requests.lock().unwrap().clone();
    let final_request = requests
        .iter()
        .find(|r| r.operation == "final_report")
        .expect("final report request");

    let child_context = final_request.context.get("child").expect("child context");
    let keys: Vec<&str> = child_context
        .as_object()
        .unwrap()
        .keys()
        .map(|k| k.as_str())
        .collect();
    assert_eq!(keys, ["age_months", "gender"]);

    let serialized = final_request.context.to_string();
    assert!(!serialized.contains("Amina"));
    assert!(!serialized.contains("Hassan"));
    assert!(!serialized.contains("date_of_birth"));
}

#[tokio::test]
async fn backfill_generates_missing_summaries_and_report() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    // Both pool triggers during the cascade fail, leaving completed
    // sections with no summaries.
    let generator = FakeGenerator::new()
        .script_failure("transient outage")
        .script_failure("transient outage");
    let orch = Orchestrator::new(fx.catalog.clone(), generator, store);

    orch.start_response(child_id, fx.section_joint_attention)
        .await
        .unwrap();
    orch.record_answer(child_id, fx.section_joint_attention, answer(fx.q_joint_1, 3))
        .await
        .unwrap();
    orch.record_answer(child_id, fx.section_joint_attention, answer(fx.q_joint_2, 4))
        .await
        .unwrap();
    orch.start_response(child_id, fx.section_peer_play)
        .await
        .unwrap();
    assert!(
        orch.record_answer(child_id, fx.section_peer_play, answer(fx.q_peer_1, 2))
            .await
            .is_err()
    );
    orch.start_response(child_id, fx.section_language)
        .await
        .unwrap();
    assert!(
        orch.record_answer(child_id, fx.section_language, answer(fx.q_lang_1, 4))
            .await
            .is_err()
    );

    let backfill = orch.generate_missing_reports(child_id).await.unwrap();
    // Social + Communication summaries, plus the not-applicable School
    // Readiness one.
    assert_eq!(backfill.generated.len(), 3);
    assert!(backfill.skipped.is_empty());
    let report = backfill.final_report.expect("final report");
    assert_eq!(report.completed_pools, 2);

    // A second sweep is a no-op.
    let again = orch.generate_missing_reports(child_id).await.unwrap();
    assert!(again.generated.is_empty());
    assert_eq!(again.skipped.len(), 3);
    assert!(again.final_report.is_none());
}

#[tokio::test]
async fn report_status_tracks_the_cascade() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let orch = Orchestrator::new(fx.catalog.clone(), FakeGenerator::new(), store);

    let before = orch.report_status(child_id).await.unwrap();
    assert_eq!(before.pools.len(), 3);
    assert!(before.final_report.is_none());
    assert!(before.pools.iter().all(|p| !p.summary_generated));

    common::complete_assessment(&orch, &fx, child_id).await;

    let after = orch.report_status(child_id).await.unwrap();
    let social = after
        .pools
        .iter()
        .find(|p| p.pool_id == fx.pool_social)
        .unwrap();
    assert!(social.applicable);
    assert_eq!(social.completed_sections, 2);
    assert_eq!(social.total_sections, 2);
    assert!(social.summary_generated);

    let school = after
        .pools
        .iter()
        .find(|p| p.pool_id == fx.pool_school)
        .unwrap();
    assert!(!school.applicable);
    assert!(!school.summary_generated);

    assert_eq!(
        after.final_report.as_ref().map(|f| f.stage),
        Some(ReviewStage::Generated)
    );
}

#[tokio::test]
async fn conversation_log_updates_response_pointer() {
    let fx = fixture();
    let store = MemoryStore::new();
    let child_id = seed_child(&store, 36);
    let orch = Orchestrator::new(fx.catalog.clone(), FakeGenerator::new(), store);

    orch.start_response(child_id, fx.section_joint_attention)
        .await
        .unwrap();
    let log = orch
        .log_conversation(
            child_id,
            fx.section_joint_attention,
            serde_json::json!({"messages": [{"speaker": "bot", "text": "Does she point?"}]}),
        )
        .await
        .unwrap();

    let response = orch
        .store()
        .response(child_id, fx.section_joint_attention)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.last_conversation_id, Some(log.id));
}
