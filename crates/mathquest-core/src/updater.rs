//! Per-session performance counters and the end-of-session score update.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::topic::{ScoreMap, Topic};

/// Weights of the score delta formula.
///
/// `delta = time × avg_secs + attempts × (avg_attempts − 1) − first_try × first_try_rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_time_weight")]
    pub time: f64,
    #[serde(default = "default_attempts_weight")]
    pub attempts: f64,
    #[serde(default = "default_first_try_weight")]
    pub first_try: f64,
}

fn default_time_weight() -> f64 {
    0.05
}
fn default_attempts_weight() -> f64 {
    0.5
}
fn default_first_try_weight() -> f64 {
    0.3
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            time: default_time_weight(),
            attempts: default_attempts_weight(),
            first_try: default_first_try_weight(),
        }
    }
}

/// What happened on one closed question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionOutcome {
    pub topic: Topic,
    pub correct: bool,
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Counters for one topic within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicCounters {
    pub asked: u32,
    pub correct: u32,
    pub attempts: u32,
    pub elapsed_secs: f64,
    pub first_try_correct: u32,
}

impl TopicCounters {
    pub fn avg_time_secs(&self) -> f64 {
        if self.asked == 0 {
            0.0
        } else {
            self.elapsed_secs / self.asked as f64
        }
    }

    pub fn avg_attempts(&self) -> f64 {
        if self.asked == 0 {
            0.0
        } else {
            self.attempts as f64 / self.asked as f64
        }
    }

    pub fn first_try_rate(&self) -> f64 {
        if self.asked == 0 {
            0.0
        } else {
            self.first_try_correct as f64 / self.asked as f64
        }
    }
}

/// Counters for every topic touched in a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    topics: BTreeMap<Topic, TopicCounters>,
}

impl PerformanceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &QuestionOutcome) {
        let counters = self.topics.entry(outcome.topic).or_default();
        counters.asked += 1;
        counters.attempts += outcome.attempts;
        counters.elapsed_secs += outcome.elapsed.as_secs_f64();
        if outcome.correct {
            counters.correct += 1;
            if outcome.attempts == 1 {
                counters.first_try_correct += 1;
            }
        }
    }

    pub fn get(&self, topic: Topic) -> Option<&TopicCounters> {
        self.topics.get(&topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Topic, &TopicCounters)> {
        self.topics.iter().map(|(&t, c)| (t, c))
    }

    pub fn total_asked(&self) -> u32 {
        self.topics.values().map(|c| c.asked).sum()
    }

    pub fn total_correct(&self) -> u32 {
        self.topics.values().map(|c| c.correct).sum()
    }
}

/// Score change for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub topic: Topic,
    pub old_score: f64,
    pub delta: f64,
    pub new_score: f64,
}

/// Delta for one topic, or `None` if it was never asked.
pub fn score_delta(counters: &TopicCounters, weights: &ScoreWeights) -> Option<f64> {
    if counters.asked == 0 {
        return None;
    }
    Some(
        weights.time * counters.avg_time_secs()
            + weights.attempts * (counters.avg_attempts() - 1.0)
            - weights.first_try * counters.first_try_rate(),
    )
}

/// Apply the session's deltas to `scores` in place. Scores are not clamped.
pub fn apply_updates(
    scores: &mut ScoreMap,
    counters: &PerformanceCounters,
    weights: &ScoreWeights,
) -> Vec<ScoreChange> {
    let mut changes = Vec::new();
    for (topic, topic_counters) in counters.iter() {
        let Some(delta) = score_delta(topic_counters, weights) else {
            continue;
        };
        let old_score = scores
            .get(&topic)
            .copied()
            .unwrap_or_else(|| topic.default_score());
        let new_score = old_score + delta;
        scores.insert(topic, new_score);
        changes.push(ScoreChange {
            topic,
            old_score,
            delta,
            new_score,
        });
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::default_scores;

    fn outcome(topic: Topic, correct: bool, attempts: u32, secs: u64) -> QuestionOutcome {
        QuestionOutcome {
            topic,
            correct,
            attempts,
            elapsed: Duration::from_secs(secs),
        }
    }

    #[test]
    fn perfect_session_delta() {
        let counters = TopicCounters {
            asked: 5,
            correct: 5,
            attempts: 5,
            elapsed_secs: 25.0,
            first_try_correct: 5,
        };
        let delta = score_delta(&counters, &ScoreWeights::default()).unwrap();
        assert!((delta - (-0.05)).abs() < 1e-12, "got {delta}");
    }

    #[test]
    fn unasked_topic_has_no_delta() {
        assert!(score_delta(&TopicCounters::default(), &ScoreWeights::default()).is_none());
    }

    #[test]
    fn record_tracks_first_try() {
        let mut counters = PerformanceCounters::new();
        counters.record(&outcome(Topic::Add, true, 1, 4));
        counters.record(&outcome(Topic::Add, true, 2, 6));
        counters.record(&outcome(Topic::Add, false, 3, 10));
        let add = counters.get(Topic::Add).unwrap();
        assert_eq!(add.asked, 3);
        assert_eq!(add.correct, 2);
        assert_eq!(add.attempts, 6);
        assert_eq!(add.first_try_correct, 1);
        assert!((add.elapsed_secs - 20.0).abs() < 1e-9);
        assert_eq!(counters.total_asked(), 3);
    }

    #[test]
    fn struggling_raises_score() {
        let mut scores = default_scores();
        let mut counters = PerformanceCounters::new();
        counters.record(&outcome(Topic::Lcm, false, 3, 40));
        counters.record(&outcome(Topic::Lcm, true, 3, 30));
        let changes = apply_updates(&mut scores, &counters, &ScoreWeights::default());
        assert_eq!(changes.len(), 1);
        // 0.05 * 35 + 0.5 * 2 - 0 = 2.75
        assert!((changes[0].delta - 2.75).abs() < 1e-9);
        assert!((scores[&Topic::Lcm] - 3.75).abs() < 1e-9);
        // Untouched topics keep their score.
        assert_eq!(scores[&Topic::Add], 1.0);
    }

    #[test]
    fn scores_may_go_negative() {
        let mut scores: ScoreMap = [(Topic::Add, 0.0)].into_iter().collect();
        let mut counters = PerformanceCounters::new();
        counters.record(&outcome(Topic::Add, true, 1, 0));
        apply_updates(&mut scores, &counters, &ScoreWeights::default());
        assert!((scores[&Topic::Add] - (-0.3)).abs() < 1e-12);
    }
}
