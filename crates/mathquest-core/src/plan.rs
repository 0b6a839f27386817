//! Session planning: how many questions of each level, and on which topics.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::topic::{DifficultyLevel, Topic};

/// One scheduled question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanSlot {
    pub topic: Topic,
    pub level: DifficultyLevel,
}

/// What the learner asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub topics: Vec<Topic>,
    pub question_count: usize,
}

impl SessionRequest {
    pub fn new(topics: impl IntoIterator<Item = Topic>, question_count: usize) -> Self {
        let mut unique = Vec::new();
        for topic in topics {
            if !unique.contains(&topic) {
                unique.push(topic);
            }
        }
        Self {
            topics: unique,
            question_count,
        }
    }

    /// Reject requests that cannot produce a plan.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.topics.is_empty() {
            return Err(EngineError::InvalidSessionRequest(
                "select at least one topic".into(),
            ));
        }
        if self.question_count == 0 {
            return Err(EngineError::InvalidSessionRequest(
                "question count must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// The ordered, shuffled slots for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPlan {
    slots: Vec<PlanSlot>,
}

impl QuestionPlan {
    pub fn slots(&self) -> &[PlanSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PlanSlot> {
        self.slots.get(index).copied()
    }

    /// Number of slots at each level.
    pub fn level_counts(&self) -> BTreeMap<DifficultyLevel, usize> {
        let mut counts: BTreeMap<DifficultyLevel, usize> =
            DifficultyLevel::ALL.iter().map(|&l| (l, 0)).collect();
        for slot in &self.slots {
            *counts.entry(slot.level).or_default() += 1;
        }
        counts
    }
}

/// Split `n` into Easy/Medium/Hard bucket sizes.
///
/// Each bucket gets `n / 3`; the remainder goes one at a time to Easy, then
/// Medium. Buckets never differ by more than one.
pub fn bucket_sizes(n: usize) -> [(DifficultyLevel, usize); 3] {
    let base = n / 3;
    let extra = n % 3;
    let mut sizes = [
        (DifficultyLevel::Easy, base),
        (DifficultyLevel::Medium, base),
        (DifficultyLevel::Hard, base),
    ];
    for (_, size) in sizes.iter_mut().take(extra) {
        *size += 1;
    }
    sizes
}

/// Build the plan for a session.
///
/// Each level's pool is the selected topics classified at that level, or
/// every selected topic when none are. Topics are picked uniformly with
/// repetition, then the whole sequence is shuffled.
pub fn build_plan<R: Rng + ?Sized>(
    request: &SessionRequest,
    levels: &BTreeMap<Topic, DifficultyLevel>,
    rng: &mut R,
) -> Result<QuestionPlan, EngineError> {
    request.validate()?;

    let mut slots = Vec::with_capacity(request.question_count);
    for (level, size) in bucket_sizes(request.question_count) {
        let matching: Vec<Topic> = request
            .topics
            .iter()
            .copied()
            .filter(|t| levels.get(t).copied().unwrap_or(DifficultyLevel::Medium) == level)
            .collect();
        let pool = if matching.is_empty() {
            &request.topics
        } else {
            &matching
        };
        for _ in 0..size {
            let Some(&topic) = pool.choose(rng) else {
                break;
            };
            slots.push(PlanSlot { topic, level });
        }
    }
    slots.shuffle(rng);

    tracing::debug!(
        questions = slots.len(),
        topics = request.topics.len(),
        "built question plan"
    );
    Ok(QuestionPlan { slots })
}
