//! End-to-end sessions through the engine with in-memory stores.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use mathquest_core::config::MathquestConfig;
use mathquest_core::engine::Engine;
use mathquest_core::plan::SessionRequest;
use mathquest_core::store::{MemoryHistoryLog, MemoryScoreStore};
use mathquest_core::topic::{DifficultyLevel, ScoreMap, Topic};

fn engine_with(scores: ScoreMap) -> Engine {
    Engine::new(
        MathquestConfig::default(),
        Box::new(MemoryScoreStore::with_scores(scores)),
        Box::new(MemoryHistoryLog::new()),
    )
}

/// Answer every question correctly on the first try, one second each.
fn perfect_session(engine: &mut Engine, topic: Topic, questions: usize, rng: &mut StdRng) {
    let mut session = engine
        .start_session(&SessionRequest::new([topic], questions), rng)
        .unwrap();
    let generator = engine.generator().clone();
    while let Some(problem) = session.next_problem(&generator, rng).unwrap() {
        let answer = problem.answer().to_string();
        let result = session
            .submit_with_elapsed(&answer, Duration::from_secs(1))
            .unwrap();
        assert!(result.correct);
    }
    let report = engine.finish_session(session).unwrap();
    assert_eq!(report.total as usize, questions);
    assert_eq!(report.score as usize, questions);
}

#[test]
fn stored_score_without_history_is_medium() {
    let engine = engine_with([(Topic::Add, 2.0)].into_iter().collect());
    let levels = engine.levels(&[Topic::Add]);
    assert_eq!(levels[&Topic::Add], DifficultyLevel::Medium);
}

#[test]
fn consistent_success_makes_a_topic_easy() {
    let mut engine = engine_with(ScoreMap::new());
    let mut rng = StdRng::seed_from_u64(2024);

    // Each perfect session moves add by 0.05 * 1 - 0.3 = -0.25.
    for _ in 0..3 {
        perfect_session(&mut engine, Topic::Add, 3, &mut rng);
    }
    assert!((engine.scores()[&Topic::Add] - 0.25).abs() < 1e-9);
    assert_eq!(engine.history().len(), 3);

    // Add history 0.75, 0.5, 0.25: mean 0.5, std ~0.204, current 0.25 < 0.296.
    let standings = engine.standings(&[Topic::Add, Topic::Lcm]);
    assert_eq!(standings[&Topic::Add].level, DifficultyLevel::Easy);
    assert_eq!(standings[&Topic::Add].threshold.samples, 3);
    // Lcm never practised: every snapshot holds 1.0.
    assert_eq!(standings[&Topic::Lcm].level, DifficultyLevel::Medium);
    assert_eq!(standings[&Topic::Lcm].threshold.std_dev, 0.0);
}

#[test]
fn struggling_topic_becomes_hard() {
    let mut engine = engine_with(ScoreMap::new());
    let mut rng = StdRng::seed_from_u64(77);

    // Two good divide sessions, then one where every question fails slowly.
    perfect_session(&mut engine, Topic::Divide, 2, &mut rng);
    perfect_session(&mut engine, Topic::Divide, 2, &mut rng);

    let mut session = engine
        .start_session(&SessionRequest::new([Topic::Divide], 2), &mut rng)
        .unwrap();
    let generator = engine.generator().clone();
    while session.next_problem(&generator, &mut rng).unwrap().is_some() {
        loop {
            let result = session
                .submit_with_elapsed("0 r 0", Duration::from_secs(20))
                .unwrap();
            if result.closed {
                assert!(!result.correct);
                break;
            }
        }
    }
    let report = engine.finish_session(session).unwrap();
    assert_eq!(report.score, 0);
    // 0.05 * 20 + 0.5 * 2 - 0 = 2.0
    let change = report.changes().next().unwrap();
    assert!((change.delta - 2.0).abs() < 1e-9);

    // History 0.75, 0.5, 2.5 and current 2.5 sits above mean + std.
    let levels = engine.levels(&[Topic::Divide]);
    assert_eq!(levels[&Topic::Divide], DifficultyLevel::Hard);
}

#[test]
fn plan_follows_classification() {
    let mut engine = engine_with(ScoreMap::new());
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..3 {
        perfect_session(&mut engine, Topic::Multiply, 3, &mut rng);
    }

    let session = engine
        .start_session(
            &SessionRequest::new([Topic::Multiply, Topic::Hcf], 9),
            &mut rng,
        )
        .unwrap();
    // Multiply is easy and hcf medium, so the hard bucket falls back to both.
    for slot in session.plan().slots() {
        match slot.level {
            DifficultyLevel::Easy => assert_eq!(slot.topic, Topic::Multiply),
            DifficultyLevel::Medium => assert_eq!(slot.topic, Topic::Hcf),
            DifficultyLevel::Hard => {}
        }
    }
    assert_eq!(session.plan().len(), 9);
}
