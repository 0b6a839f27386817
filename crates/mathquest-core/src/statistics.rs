//! Per-topic thresholds from score history, and level classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::HistoryEntry;
use crate::topic::{DifficultyLevel, ScoreMap, Topic};

/// Mean and population standard deviation of a topic's past scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub mean: f64,
    pub std_dev: f64,
    /// Number of history entries that contributed.
    pub samples: usize,
}

impl Threshold {
    /// Threshold for a topic with no history: centred on the current score.
    pub fn flat(score: f64) -> Self {
        Self {
            mean: score,
            std_dev: 0.0,
            samples: 0,
        }
    }

    /// Easy below `mean - std`, Hard above `mean + std`, Medium otherwise.
    pub fn classify(&self, score: f64) -> DifficultyLevel {
        if score < self.mean - self.std_dev {
            DifficultyLevel::Easy
        } else if score > self.mean + self.std_dev {
            DifficultyLevel::Hard
        } else {
            DifficultyLevel::Medium
        }
    }
}

/// Mean and population standard deviation. `None` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Threshold for every topic in `scores`.
pub fn compute_thresholds(scores: &ScoreMap, history: &[HistoryEntry]) -> BTreeMap<Topic, Threshold> {
    scores
        .iter()
        .map(|(&topic, &score)| {
            let past: Vec<f64> = history
                .iter()
                .filter_map(|entry| entry.scores.get(&topic).copied())
                .collect();
            let threshold = match mean_and_std(&past) {
                Some((mean, std_dev)) => Threshold {
                    mean,
                    std_dev,
                    samples: past.len(),
                },
                None => Threshold::flat(score),
            };
            (topic, threshold)
        })
        .collect()
}

/// Current score, threshold and resulting level for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicStanding {
    pub topic: Topic,
    pub score: f64,
    pub threshold: Threshold,
    pub level: DifficultyLevel,
}

/// Classify each of `topics` against its own history.
///
/// Topics missing from `scores` use their default score.
pub fn classify_topics(
    topics: &[Topic],
    scores: &ScoreMap,
    history: &[HistoryEntry],
) -> BTreeMap<Topic, TopicStanding> {
    let current: ScoreMap = topics
        .iter()
        .map(|&t| (t, scores.get(&t).copied().unwrap_or_else(|| t.default_score())))
        .collect();
    let thresholds = compute_thresholds(&current, history);

    current
        .iter()
        .map(|(&topic, &score)| {
            let threshold = thresholds
                .get(&topic)
                .copied()
                .unwrap_or_else(|| Threshold::flat(score));
            let standing = TopicStanding {
                topic,
                score,
                threshold,
                level: threshold.classify(score),
            };
            (topic, standing)
        })
        .collect()
}

/// Just the levels from [`classify_topics`].
pub fn classify_levels(
    topics: &[Topic],
    scores: &ScoreMap,
    history: &[HistoryEntry],
) -> BTreeMap<Topic, DifficultyLevel> {
    classify_topics(topics, scores, history)
        .into_iter()
        .map(|(topic, standing)| (topic, standing.level))
        .collect()
}
