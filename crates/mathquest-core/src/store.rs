//! Score and history persistence.
//!
//! Both stores are forgiving on read: a missing or corrupt score file yields
//! the default scores, and unreadable history yields no history. Writes
//! report failures to the caller.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::topic::{default_scores, ScoreMap, Topic};

/// Score snapshot recorded at the end of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub question_count: usize,
    pub scores: ScoreMap,
}

impl HistoryEntry {
    pub fn new(scores: ScoreMap, question_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            question_count,
            scores,
        }
    }
}

/// Where the current per-topic scores live.
pub trait ScoreStore {
    /// Load scores, falling back to defaults for anything missing or corrupt.
    fn load(&self) -> ScoreMap;

    fn save(&mut self, scores: &ScoreMap) -> Result<()>;
}

/// Append-only log of past sessions.
pub trait HistoryLog {
    /// Every readable entry, oldest first.
    fn read_all(&self) -> Vec<HistoryEntry>;

    fn append(&mut self, entry: &HistoryEntry) -> Result<()>;
}

// ---------------------------------------------------------------------------
// File-backed stores
// ---------------------------------------------------------------------------

/// Scores kept as a JSON object of topic name to number.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> ScoreMap {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no score file, using defaults");
                return default_scores();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read scores, using defaults");
                return default_scores();
            }
        };
        parse_scores(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "corrupt score file, using defaults");
            default_scores()
        })
    }

    fn save(&mut self, scores: &ScoreMap) -> Result<()> {
        let json = serde_json::to_string_pretty(scores).context("failed to serialize scores")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write scores to {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "saved scores");
        Ok(())
    }
}

/// Overlay the stored values on the defaults. Unknown topics and non-numeric
/// values are skipped.
fn parse_scores(content: &str) -> Result<ScoreMap> {
    let raw: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(content).context("score file is not a JSON object")?;

    let mut scores = default_scores();
    for (key, value) in raw {
        let topic = match key.parse::<Topic>() {
            Ok(topic) => topic,
            Err(e) => {
                tracing::warn!(key = %key, "{e}, ignoring");
                continue;
            }
        };
        match value.as_f64().filter(|v| v.is_finite()) {
            Some(score) => {
                scores.insert(topic, score);
            }
            None => tracing::warn!(topic = %topic, "score is not a number, keeping default"),
        }
    }
    Ok(scores)
}

/// History kept as JSON lines, one entry per session.
#[derive(Debug, Clone)]
pub struct JsonlHistoryLog {
    path: PathBuf,
}

impl JsonlHistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryLog for JsonlHistoryLog {
    fn read_all(&self) -> Vec<HistoryEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read history, treating as empty");
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping malformed history line"
                ),
            }
        }
        entries
    }

    fn append(&mut self, entry: &HistoryEntry) -> Result<()> {
        let line = serde_json::to_string(entry).context("failed to serialize history entry")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

/// Score store that never touches disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: Option<ScoreMap>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the given scores, with defaults filled in for the rest.
    pub fn with_scores(scores: ScoreMap) -> Self {
        let mut all = default_scores();
        all.extend(scores);
        Self { scores: Some(all) }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> ScoreMap {
        self.scores.clone().unwrap_or_else(default_scores)
    }

    fn save(&mut self, scores: &ScoreMap) -> Result<()> {
        self.scores = Some(scores.clone());
        Ok(())
    }
}

/// History log that never touches disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryLog {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }
}

impl HistoryLog for MemoryHistoryLog {
    fn read_all(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    fn append(&mut self, entry: &HistoryEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_score_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScoreStore::new(dir.path().join("scores.json"));
        assert_eq!(store.load(), default_scores());
    }

    #[test]
    fn corrupt_score_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(JsonScoreStore::new(&path).load(), default_scores());

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert_eq!(JsonScoreStore::new(&path).load(), default_scores());
    }

    #[test]
    fn partial_score_file_overlays_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"{"+": 2.0, "lcm": "high", "calculus": 4.0}"#).unwrap();
        let scores = JsonScoreStore::new(&path).load();
        assert_eq!(scores[&Topic::Add], 2.0);
        assert_eq!(scores[&Topic::Lcm], Topic::Lcm.default_score());
        assert_eq!(scores.len(), Topic::ALL.len());
    }

    #[test]
    fn scores_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonScoreStore::new(dir.path().join("nested/scores.json"));
        let mut scores = default_scores();
        scores.insert(Topic::Divide, -0.25);
        store.save(&scores).unwrap();
        assert_eq!(store.load(), scores);
    }

    #[test]
    fn history_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = JsonlHistoryLog::new(dir.path().join("history.jsonl"));
        assert!(log.read_all().is_empty());

        let first = HistoryEntry::new(default_scores(), 5);
        let mut later = default_scores();
        later.insert(Topic::Hcf, 1.7);
        let second = HistoryEntry::new(later, 8);
        log.append(&first).unwrap();
        log.append(&second).unwrap();

        let entries = log.read_all();
        assert_eq!(entries, vec![first, second]);
    }

    #[test]
    fn malformed_history_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let good = HistoryEntry::new(default_scores(), 3);
        let content = format!(
            "garbage\n{}\n\n{{\"id\": 5}}\n",
            serde_json::to_string(&good).unwrap()
        );
        std::fs::write(&path, content).unwrap();
        assert_eq!(JsonlHistoryLog::new(&path).read_all(), vec![good]);
    }

    #[test]
    fn memory_stores() {
        let mut scores = MemoryScoreStore::with_scores([(Topic::Add, 2.0)].into_iter().collect());
        assert_eq!(scores.load()[&Topic::Add], 2.0);
        assert_eq!(scores.load()[&Topic::Lcm], 1.0);
        scores.save(&default_scores()).unwrap();
        assert_eq!(scores.load(), default_scores());

        let mut log = MemoryHistoryLog::new();
        log.append(&HistoryEntry::new(default_scores(), 1)).unwrap();
        assert_eq!(log.read_all().len(), 1);
    }
}
