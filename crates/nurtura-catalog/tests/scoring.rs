use jiff::Timestamp;
use uuid::Uuid;

use nurtura_catalog::scoring::{self, PoolContribution};
use nurtura_catalog::{Catalog, Pool, Question, Section};
use nurtura_core::models::{AnswerBucket, ConcernBand, QuestionAnswer, Response};

fn catalog_with_three_questions() -> (Catalog, Uuid, Vec<Uuid>) {
    let pool_id = Uuid::new_v4();
    let section_id = Uuid::new_v4();
    let questions: Vec<Question> = (0..3)
        .map(|i| Question {
            id: Uuid::new_v4(),
            section_id,
            key: format!("question_{i}"),
            text: format!("Question {i}?"),
            min_age_months: 0,
            max_age_months: 120,
            max_score: Question::DEFAULT_MAX_SCORE,
            position: i,
        })
        .collect();
    let question_ids = questions.iter().map(|q| q.id).collect();
    let catalog = Catalog::new(
        vec![Pool {
            id: pool_id,
            title: "Social Interaction".to_string(),
            description: None,
            position: 1,
            active: true,
            weight: 25,
        }],
        vec![Section {
            id: section_id,
            pool_id,
            title: "Joint Attention".to_string(),
            description: None,
            position: 1,
            active: true,
        }],
        questions,
    );
    (catalog, section_id, question_ids)
}

fn stored_answer(question_id: Uuid, score: u32) -> QuestionAnswer {
    QuestionAnswer {
        id: Uuid::new_v4(),
        response_id: Uuid::new_v4(),
        question_id,
        raw_answer: "yes".to_string(),
        translated_answer: None,
        answer_bucket: AnswerBucket::Yes,
        score,
        answered_at: Timestamp::now(),
    }
}

#[test]
fn response_totals_count_answered_questions_only() {
    let (catalog, _, question_ids) = catalog_with_three_questions();
    // Two of three questions answered: the denominator is 8, not 12.
    let answers = vec![
        stored_answer(question_ids[0], 3),
        stored_answer(question_ids[1], 1),
    ];

    let totals = scoring::response_totals(&catalog, &answers);
    assert_eq!(totals.total_score, 4);
    assert_eq!(totals.max_possible_score, 8);
}

#[test]
fn pool_totals_sum_finalized_responses() {
    let (_, section_id, _) = catalog_with_three_questions();
    let now = Timestamp::now();

    let mut completed = Response::new(Uuid::new_v4(), section_id, now);
    completed.total_score = Some(9);
    completed.max_possible_score = Some(12);

    // An unfinalized response contributes nothing.
    let unfinalized = Response::new(Uuid::new_v4(), section_id, now);

    let totals = scoring::pool_totals(&[completed, unfinalized]);
    assert_eq!(totals.total_score, 9);
    assert_eq!(totals.max_possible_score, 12);
}

#[test]
fn concern_index_renormalizes_over_scored_pools() {
    let contributions = [
        PoolContribution {
            pool_id: Uuid::new_v4(),
            weight: 25,
            total_score: 80,
            max_possible_score: 100,
        },
        PoolContribution {
            pool_id: Uuid::new_v4(),
            weight: 28,
            total_score: 100,
            max_possible_score: 100,
        },
        // Not applicable: excluded from the numerator and from weight
        // renormalization, never silently counted as zero concern.
        PoolContribution {
            pool_id: Uuid::new_v4(),
            weight: 19,
            total_score: 0,
            max_possible_score: 0,
        },
    ];

    let index = scoring::concern_index(&contributions).unwrap();
    let expected = 80.0 * (25.0 / 53.0) + 100.0 * (28.0 / 53.0);
    assert!((index.value - expected).abs() < 1e-9);
    assert_eq!(index.band, ConcernBand::High);
}

#[test]
fn concern_index_is_none_when_every_pool_is_excluded() {
    let contributions = [PoolContribution {
        pool_id: Uuid::new_v4(),
        weight: 25,
        total_score: 0,
        max_possible_score: 0,
    }];

    assert!(scoring::concern_index(&contributions).is_none());
    assert!(scoring::concern_index(&[]).is_none());
}

#[test]
fn interpretation_bands_split_at_31_and_61() {
    assert_eq!(ConcernBand::from_index(0.0), ConcernBand::Low);
    assert_eq!(ConcernBand::from_index(30.9), ConcernBand::Low);
    assert_eq!(ConcernBand::from_index(31.0), ConcernBand::Moderate);
    assert_eq!(ConcernBand::from_index(60.9), ConcernBand::Moderate);
    assert_eq!(ConcernBand::from_index(61.0), ConcernBand::High);
    assert_eq!(ConcernBand::from_index(100.0), ConcernBand::High);
}
