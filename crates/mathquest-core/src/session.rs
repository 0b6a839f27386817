//! One practice session: the plan, the open question, and what happened so far.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::evaluator::check_text;
use crate::generator::ProblemGenerator;
use crate::plan::QuestionPlan;
use crate::problem::Problem;
use crate::topic::{DifficultyLevel, Topic};
use crate::updater::{PerformanceCounters, QuestionOutcome};

/// A closed question as it appears in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 1-based position in the session.
    pub number: usize,
    pub topic: Topic,
    pub level: DifficultyLevel,
    pub question: String,
    /// The last answer the learner gave.
    pub given: String,
    pub expected: String,
    pub correct: bool,
    pub attempts: u32,
}

/// Result of one graded submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResult {
    pub correct: bool,
    /// Which attempt this was, starting at 1.
    pub attempt: u32,
    pub attempts_left: u32,
    /// The question is finished, either solved or out of attempts.
    pub closed: bool,
    /// Canonical answer, revealed once the question closes.
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug)]
struct OpenQuestion {
    problem: Problem,
    attempts: u32,
    shown_at: Instant,
}

/// Mutable state of a session in progress.
///
/// Problems are handed out one plan slot at a time. Each gets up to
/// `max_attempts` graded submissions; input of the wrong shape is rejected
/// without using one.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    plan: QuestionPlan,
    max_attempts: u32,
    cursor: usize,
    open: Option<OpenQuestion>,
    skipped: usize,
    counters: PerformanceCounters,
    transcript: Vec<TranscriptEntry>,
}

impl Session {
    pub fn new(plan: QuestionPlan, max_attempts: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            plan,
            max_attempts: max_attempts.max(1),
            cursor: 0,
            open: None,
            skipped: 0,
            counters: PerformanceCounters::new(),
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn plan(&self) -> &QuestionPlan {
        &self.plan
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn counters(&self) -> &PerformanceCounters {
        &self.counters
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Slots dropped because no problem could be generated for them.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// 1-based number of the current (or next) question.
    pub fn question_number(&self) -> usize {
        self.cursor + 1
    }

    /// The question waiting for an answer, if any.
    pub fn current(&self) -> Option<&Problem> {
        self.open.as_ref().map(|q| &q.problem)
    }

    /// Attempts left on the open question.
    pub fn attempts_left(&self) -> Option<u32> {
        self.open
            .as_ref()
            .map(|q| self.max_attempts.saturating_sub(q.attempts))
    }

    pub fn is_finished(&self) -> bool {
        self.open.is_none() && self.cursor >= self.plan.len()
    }

    /// Open the next question, or return the one already open.
    ///
    /// Returns `Ok(None)` once the plan is exhausted. If the generator gives
    /// up on a slot the slot is dropped and the error returned; calling again
    /// moves on to the following slot.
    pub fn next_problem<R: Rng + ?Sized>(
        &mut self,
        generator: &ProblemGenerator,
        rng: &mut R,
    ) -> Result<Option<&Problem>, EngineError> {
        if self.open.is_none() {
            let Some(slot) = self.plan.get(self.cursor) else {
                return Ok(None);
            };
            match generator.generate(slot, rng) {
                Ok(problem) => {
                    self.open = Some(OpenQuestion {
                        problem,
                        attempts: 0,
                        shown_at: Instant::now(),
                    });
                }
                Err(e) => {
                    tracing::warn!(slot = self.cursor, error = %e, "dropping plan slot");
                    self.cursor += 1;
                    self.skipped += 1;
                    return Err(e);
                }
            }
        }
        Ok(self.current())
    }

    /// Grade `input` against the open question, timing from when it was shown.
    pub fn submit(&mut self, input: &str) -> Result<AttemptResult, EngineError> {
        let elapsed = self
            .open
            .as_ref()
            .map(|q| q.shown_at.elapsed())
            .ok_or(EngineError::NoActiveQuestion)?;
        self.submit_with_elapsed(input, elapsed)
    }

    /// Grade `input` with an explicit time spent on the question.
    pub fn submit_with_elapsed(
        &mut self,
        input: &str,
        elapsed: Duration,
    ) -> Result<AttemptResult, EngineError> {
        let open = self.open.as_mut().ok_or(EngineError::NoActiveQuestion)?;
        let correct = check_text(&open.problem, input)?;
        open.attempts += 1;

        let attempt = open.attempts;
        let attempts_left = self.max_attempts.saturating_sub(attempt);
        let closed = correct || attempts_left == 0;
        if !closed {
            return Ok(AttemptResult {
                correct,
                attempt,
                attempts_left,
                closed,
                answer: None,
                explanation: None,
            });
        }

        let Some(open) = self.open.take() else {
            return Err(EngineError::NoActiveQuestion);
        };
        let problem = open.problem;
        self.counters.record(&QuestionOutcome {
            topic: problem.topic(),
            correct,
            attempts: attempt,
            elapsed,
        });
        self.transcript.push(TranscriptEntry {
            number: self.transcript.len() + 1,
            topic: problem.topic(),
            level: problem.level(),
            question: problem.render(),
            given: input.trim().to_string(),
            expected: problem.answer_text(),
            correct,
            attempts: attempt,
        });
        self.cursor += 1;
        tracing::debug!(
            topic = %problem.topic(),
            correct,
            attempts = attempt,
            elapsed_secs = elapsed.as_secs_f64(),
            "question closed"
        );

        Ok(AttemptResult {
            correct,
            attempt,
            attempts_left,
            closed,
            answer: Some(problem.answer_text()),
            explanation: problem.explanation(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::plan::{build_plan, SessionRequest};

    fn session(topics: &[Topic], n: usize, seed: u64) -> (Session, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let levels: BTreeMap<Topic, DifficultyLevel> = BTreeMap::new();
        let plan = build_plan(&SessionRequest::new(topics.to_vec(), n), &levels, &mut rng).unwrap();
        (Session::new(plan, 3), rng)
    }

    fn wrong_answer(problem: &Problem) -> &'static str {
        match problem.answer_kind() {
            crate::problem::AnswerKind::QuotientRemainder => "0 r 0",
            crate::problem::AnswerKind::Fraction => "999/1",
            crate::problem::AnswerKind::Factors => "1",
            crate::problem::AnswerKind::Choice => unreachable!(),
            crate::problem::AnswerKind::Integer => "-1",
        }
    }

    #[test]
    fn submit_without_question_fails() {
        let (mut s, _) = session(&[Topic::Add], 1, 1);
        assert!(matches!(s.submit("1"), Err(EngineError::NoActiveQuestion)));
    }

    #[test]
    fn correct_first_try_closes_question() {
        let (mut s, mut rng) = session(&[Topic::Multiply], 2, 3);
        let generator = ProblemGenerator::default();
        let answer = s.next_problem(&generator, &mut rng).unwrap().unwrap().answer().to_string();
        let result = s.submit_with_elapsed(&answer, Duration::from_secs(4)).unwrap();
        assert!(result.correct && result.closed);
        assert_eq!(result.attempt, 1);
        assert!(s.current().is_none());
        let counters = s.counters().get(Topic::Multiply).unwrap();
        assert_eq!(counters.first_try_correct, 1);
        assert_eq!(counters.elapsed_secs, 4.0);
        assert_eq!(s.question_number(), 2);
    }

    #[test]
    fn three_wrong_answers_exhaust_attempts() {
        let (mut s, mut rng) = session(&[Topic::Subtract], 1, 7);
        let generator = ProblemGenerator::default();
        s.next_problem(&generator, &mut rng).unwrap();

        let first = s.submit("-1").unwrap();
        assert!(!first.correct && !first.closed);
        assert_eq!(first.attempts_left, 2);
        assert!(first.answer.is_none());
        assert!(!s.submit("-1").unwrap().closed);
        let last = s.submit("-1").unwrap();
        assert!(last.closed);
        assert_eq!(last.attempts_left, 0);
        assert!(last.answer.is_some());

        assert!(s.is_finished());
        let entry = &s.transcript()[0];
        assert!(!entry.correct);
        assert_eq!(entry.attempts, 3);
        assert_eq!(entry.given, "-1");
    }

    #[test]
    fn shape_errors_do_not_use_attempts() {
        let (mut s, mut rng) = session(&[Topic::Divide], 1, 11);
        let generator = ProblemGenerator::default();
        s.next_problem(&generator, &mut rng).unwrap();
        for _ in 0..5 {
            let err = s.submit("banana").unwrap_err();
            assert!(err.is_recoverable());
        }
        assert_eq!(s.attempts_left(), Some(3));
        assert_eq!(s.counters().total_asked(), 0);
    }

    #[test]
    fn next_problem_is_stable_until_answered() {
        let (mut s, mut rng) = session(&[Topic::Hcf], 2, 13);
        let generator = ProblemGenerator::default();
        let first = s.next_problem(&generator, &mut rng).unwrap().cloned();
        let again = s.next_problem(&generator, &mut rng).unwrap().cloned();
        assert_eq!(first, again);
    }

    #[test]
    fn full_session_runs_to_completion() {
        let topics = [Topic::Add, Topic::Divide, Topic::PrimeFactorization, Topic::Lcm];
        let (mut s, mut rng) = session(&topics, 9, 17);
        let generator = ProblemGenerator::default();
        let mut answered = 0;
        while let Some(problem) = s.next_problem(&generator, &mut rng).unwrap() {
            let problem = problem.clone();
            if answered % 2 == 0 {
                let wrong = wrong_answer(&problem);
                let _ = s.submit_with_elapsed(wrong, Duration::from_secs(1)).unwrap();
            }
            let right = problem.answer().to_string();
            let result = s.submit_with_elapsed(&right, Duration::from_secs(2)).unwrap();
            assert!(result.correct && result.closed);
            answered += 1;
        }
        assert_eq!(answered, 9);
        assert!(s.is_finished());
        assert_eq!(s.counters().total_asked(), 9);
        assert_eq!(s.counters().total_correct(), 9);
        assert_eq!(s.transcript().len(), 9);
    }

    #[test]
    fn exhausted_slot_is_dropped() {
        let (mut s, mut rng) = session(&[Topic::Hcf], 2, 19);
        let generator = ProblemGenerator::new(1);
        let mut dropped = 0;
        let mut shown = 0;
        loop {
            match s.next_problem(&generator, &mut rng) {
                Ok(Some(problem)) => {
                    let answer = problem.answer().to_string();
                    s.submit(&answer).unwrap();
                    shown += 1;
                }
                Ok(None) => break,
                Err(EngineError::GenerationExhausted { .. }) => dropped += 1,
                Err(e) => panic!("unexpected {e}"),
            }
        }
        assert_eq!(dropped + shown, 2);
        assert_eq!(s.skipped(), dropped);
    }
}
