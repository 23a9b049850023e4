//! Shared fixtures: a small assessment catalog, a seeded child, and a
//! scripted generator.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use jiff::{Span, Timestamp, Zoned};
use uuid::Uuid;

use nurtura_catalog::{Catalog, Pool, Question, Section};
use nurtura_core::models::{AnswerBucket, Child, FinalReport, Gender, NewAnswer};
use nurtura_engine::generator::{GenerateError, GenerationRequest, TextGenerator};
use nurtura_engine::memory::MemoryStore;
use nurtura_engine::{FinalOutcome, Orchestrator};

pub const DEFAULT_REPLY: &str =
    r#"{"summary":"ok","key_findings":[],"areas_of_concern":[],"strengths":[]}"#;

/// Fixed catalog ids so tests can address specific pools and sections.
pub struct Fixture {
    pub catalog: Catalog,
    pub pool_social: Uuid,
    pub pool_communication: Uuid,
    pub pool_school: Uuid,
    pub section_joint_attention: Uuid,
    pub section_peer_play: Uuid,
    pub section_language: Uuid,
    pub q_joint_1: Uuid,
    pub q_joint_2: Uuid,
    pub q_peer_1: Uuid,
    pub q_lang_1: Uuid,
}

/// Three pools: Social Interaction (two sections), Communication (one
/// section), and School Readiness, whose only question opens at 72
/// months — not applicable to the 36-month-old fixture child.
pub fn fixture() -> Fixture {
    let pool_social = Uuid::new_v4();
    let pool_communication = Uuid::new_v4();
    let pool_school = Uuid::new_v4();
    let section_joint_attention = Uuid::new_v4();
    let section_peer_play = Uuid::new_v4();
    let section_language = Uuid::new_v4();
    let section_school = Uuid::new_v4();
    let q_joint_1 = Uuid::new_v4();
    let q_joint_2 = Uuid::new_v4();
    let q_peer_1 = Uuid::new_v4();
    let q_lang_1 = Uuid::new_v4();
    let q_school_1 = Uuid::new_v4();

    let pools = vec![
        Pool {
            id: pool_social,
            title: "Social Interaction".to_string(),
            description: None,
            position: 1,
            active: true,
            weight: 25,
        },
        Pool {
            id: pool_communication,
            title: "Communication".to_string(),
            description: None,
            position: 2,
            active: true,
            weight: 28,
        },
        Pool {
            id: pool_school,
            title: "School Readiness".to_string(),
            description: None,
            position: 3,
            active: true,
            weight: 19,
        },
    ];

    let sections = vec![
        Section {
            id: section_joint_attention,
            pool_id: pool_social,
            title: "Joint Attention".to_string(),
            description: None,
            position: 1,
            active: true,
        },
        Section {
            id: section_peer_play,
            pool_id: pool_social,
            title: "Peer Play".to_string(),
            description: None,
            position: 2,
            active: true,
        },
        Section {
            id: section_language,
            pool_id: pool_communication,
            title: "Expressive Language".to_string(),
            description: None,
            position: 3,
            active: true,
        },
        Section {
            id: section_school,
            pool_id: pool_school,
            title: "Classroom Skills".to_string(),
            description: None,
            position: 4,
            active: true,
        },
    ];

    let questions = vec![
        question(q_joint_1, section_joint_attention, "points_to_share", 12, 60),
        question(q_joint_2, section_joint_attention, "responds_to_name", 12, 60),
        question(q_peer_1, section_peer_play, "plays_alongside_peers", 24, 60),
        question(q_lang_1, section_language, "uses_two_word_phrases", 12, 60),
        question(q_school_1, section_school, "follows_group_instructions", 72, 120),
    ];

    Fixture {
        catalog: Catalog::new(pools, sections, questions),
        pool_social,
        pool_communication,
        pool_school,
        section_joint_attention,
        section_peer_play,
        section_language,
        q_joint_1,
        q_joint_2,
        q_peer_1,
        q_lang_1,
    }
}

fn question(id: Uuid, section_id: Uuid, key: &str, min_age: i32, max_age: i32) -> Question {
    Question {
        id,
        section_id,
        key: key.to_string(),
        text: format!("Does the child demonstrate: {key}?"),
        min_age_months: min_age,
        max_age_months: max_age,
        max_score: Question::DEFAULT_MAX_SCORE,
        position: 0,
    }
}

/// Seed a child of the given age in whole months into the store.
pub fn seed_child(store: &MemoryStore, age_months: i32) -> Uuid {
    let today = Zoned::now().date();
    let dob = today
        .checked_sub(Span::new().months(age_months))
        .expect("fixture date of birth");
    let now = Timestamp::now();
    let child = Child {
        id: Uuid::new_v4(),
        first_name: "Amina".to_string(),
        last_name: "Hassan".to_string(),
        date_of_birth: dob,
        gender: Gender::Female,
        created_at: now,
        updated_at: now,
    };
    let id = child.id;
    store.put_child(child);
    id
}

/// Drive the whole cascade for the 36-month fixture child: both Social
/// Interaction sections, then Expressive Language, which completes every
/// applicable pool and produces the final report.
pub async fn complete_assessment(
    orch: &Orchestrator<FakeGenerator, MemoryStore>,
    fx: &Fixture,
    child_id: Uuid,
) -> FinalReport {
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
    orch.record_answer(child_id, fx.section_peer_play, answer(fx.q_peer_1, 2))
        .await
        .unwrap();
    orch.start_response(child_id, fx.section_language)
        .await
        .unwrap();
    let outcome = orch
        .record_answer(child_id, fx.section_language, answer(fx.q_lang_1, 4))
        .await
        .unwrap();
    match outcome.final_report {
        Some(FinalOutcome::Generated(report)) => report,
        other => panic!("expected generated final report, got {other:?}"),
    }
}

pub fn answer(question_id: Uuid, score: u32) -> NewAnswer {
    NewAnswer {
        question_id,
        raw_answer: "Yes, most of the time".to_string(),
        translated_answer: None,
        answer_bucket: AnswerBucket::Yes,
        score,
    }
}

/// Scripted [`TextGenerator`]: replies are consumed front-to-back, then
/// every further call returns [`DEFAULT_REPLY`]. Captures each request so
/// tests can assert on the context that was sent. Yields once per call so
/// concurrent triggers genuinely interleave.
#[derive(Default)]
pub struct FakeGenerator {
    scripts: Mutex<VecDeque<Result<String, String>>>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_reply(self, text: &str) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn script_failure(self, message: &str) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        match self.scripts.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(GenerateError::Invocation(message)),
            None => Ok(DEFAULT_REPLY.to_string()),
        }
    }
}
