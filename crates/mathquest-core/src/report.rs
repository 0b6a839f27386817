//! End-of-session report with JSON and plain-text output.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::{percent, Grade};
use crate::session::{Session, TranscriptEntry};
use crate::topic::{ScoreMap, Topic};
use crate::updater::{ScoreChange, TopicCounters};

/// How one topic went during the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic: Topic,
    pub counters: TopicCounters,
    pub change: Option<ScoreChange>,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: f64,
    /// Questions in the plan.
    pub planned: usize,
    /// Questions actually closed.
    pub total: u32,
    /// Questions answered correctly.
    pub score: u32,
    pub percent: f64,
    pub grade: Grade,
    pub topics: Vec<TopicSummary>,
    /// Scores after the update, all topics.
    pub scores: ScoreMap,
    pub transcript: Vec<TranscriptEntry>,
}

impl SessionReport {
    pub fn build(
        session: &Session,
        changes: &[ScoreChange],
        scores: ScoreMap,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let counters = session.counters();
        let total = counters.total_asked();
        let score = counters.total_correct();
        let topics = counters
            .iter()
            .map(|(topic, c)| TopicSummary {
                topic,
                counters: *c,
                change: changes.iter().find(|ch| ch.topic == topic).copied(),
            })
            .collect();
        let duration_secs = (finished_at - session.started_at())
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        Self {
            session_id: session.id(),
            started_at: session.started_at(),
            finished_at,
            duration_secs,
            planned: session.plan().len(),
            total,
            score,
            percent: percent(score, total),
            grade: Grade::from_score(score, total),
            topics,
            scores,
            transcript: session.transcript().to_vec(),
        }
    }

    /// Score changes only.
    pub fn changes(&self) -> impl Iterator<Item = &ScoreChange> {
        self.topics.iter().filter_map(|t| t.change.as_ref())
    }

    /// Short result block: score, percent, grade.
    pub fn summary_text(&self) -> String {
        format!(
            "Score: {}\nTotal Questions: {}\nPercent Marks: {}%\nGrade: {}",
            self.score, self.total, self.percent, self.grade
        )
    }

    /// Transcript followed by the summary and per-topic changes.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "mathquest session {}", self.session_id);
        let _ = writeln!(
            out,
            "{} ({:.0}s)",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.duration_secs
        );
        out.push('\n');

        for entry in &self.transcript {
            let _ = writeln!(
                out,
                "Q{}. [{} / {}] {}",
                entry.number, entry.topic, entry.level, entry.question
            );
            let _ = writeln!(out, "    Your answer: {}", entry.given);
            if entry.correct {
                let _ = writeln!(out, "    Correct on attempt {}", entry.attempts);
            } else {
                let _ = writeln!(out, "    Answered incorrectly, answer: {}", entry.expected);
            }
        }
        out.push('\n');
        out.push_str(&self.summary_text());
        out.push('\n');

        if !self.topics.is_empty() {
            out.push('\n');
            for summary in &self.topics {
                let c = &summary.counters;
                let _ = write!(
                    out,
                    "{}: {}/{} correct, {} first try",
                    summary.topic, c.correct, c.asked, c.first_try_correct
                );
                if let Some(change) = &summary.change {
                    let _ = write!(
                        out,
                        ", score {:.3} -> {:.3} ({:+.3})",
                        change.old_score, change.new_score, change.delta
                    );
                }
                out.push('\n');
            }
        }
        out
    }

    /// Write [`Self::to_text`] to a file.
    pub fn save_text(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_text())
            .with_context(|| format!("failed to write transcript to {}", path.display()))?;
        Ok(())
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
