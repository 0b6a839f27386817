//! The engine: loads scores and history, starts sessions, persists results.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Utc;
use rand::Rng;

use crate::config::MathquestConfig;
use crate::error::EngineError;
use crate::generator::ProblemGenerator;
use crate::plan::{build_plan, SessionRequest};
use crate::report::SessionReport;
use crate::session::Session;
use crate::statistics::{classify_levels, classify_topics, TopicStanding};
use crate::store::{HistoryEntry, HistoryLog, JsonScoreStore, JsonlHistoryLog, ScoreStore};
use crate::topic::{DifficultyLevel, ScoreMap, Topic};
use crate::updater::apply_updates;

/// Owns the stores and the score state between sessions.
///
/// Scores and history are read when the engine is built (or on
/// [`Engine::reload`]) and written once per finished session.
pub struct Engine {
    config: MathquestConfig,
    generator: ProblemGenerator,
    store: Box<dyn ScoreStore>,
    history_log: Box<dyn HistoryLog>,
    scores: ScoreMap,
    history: Vec<HistoryEntry>,
}

impl Engine {
    pub fn new(
        config: MathquestConfig,
        store: Box<dyn ScoreStore>,
        history_log: Box<dyn HistoryLog>,
    ) -> Self {
        let generator = ProblemGenerator::new(config.max_generation_draws);
        let mut engine = Self {
            config,
            generator,
            store,
            history_log,
            scores: ScoreMap::new(),
            history: Vec::new(),
        };
        engine.reload();
        engine
    }

    /// Engine backed by `scores.json` and `history.jsonl` in the data directory.
    pub fn open(config: MathquestConfig) -> Self {
        let store = JsonScoreStore::new(config.scores_path());
        let history = JsonlHistoryLog::new(config.history_path());
        Self::new(config, Box::new(store), Box::new(history))
    }

    /// Re-read scores and history from the stores.
    pub fn reload(&mut self) {
        self.scores = self.store.load();
        self.history = self.history_log.read_all();
        tracing::debug!(history = self.history.len(), "loaded scores and history");
    }

    pub fn config(&self) -> &MathquestConfig {
        &self.config
    }

    pub fn generator(&self) -> &ProblemGenerator {
        &self.generator
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Score, threshold and level for each topic.
    pub fn standings(&self, topics: &[Topic]) -> BTreeMap<Topic, TopicStanding> {
        classify_topics(topics, &self.scores, &self.history)
    }

    pub fn levels(&self, topics: &[Topic]) -> BTreeMap<Topic, DifficultyLevel> {
        classify_levels(topics, &self.scores, &self.history)
    }

    /// Classify the requested topics and plan a session over them.
    pub fn start_session<R: Rng + ?Sized>(
        &self,
        request: &SessionRequest,
        rng: &mut R,
    ) -> Result<Session, EngineError> {
        request.validate()?;
        let levels = self.levels(&request.topics);
        let plan = build_plan(request, &levels, rng)?;
        let session = Session::new(plan, self.config.max_attempts);
        tracing::info!(
            session = %session.id(),
            questions = request.question_count,
            topics = ?request.topics,
            "session started"
        );
        Ok(session)
    }

    /// Fold the session into the scores, save them, and append a history entry.
    ///
    /// A session where no question was closed changes nothing on disk. The
    /// in-memory scores follow the score store as soon as it is written, so a
    /// failed history append leaves them agreeing with disk.
    pub fn finish_session(&mut self, session: Session) -> Result<SessionReport> {
        let mut scores = self.scores.clone();
        let changes = apply_updates(&mut scores, session.counters(), &self.config.weights);
        let asked = session.counters().total_asked();

        if asked > 0 {
            self.store.save(&scores)?;
            self.scores = scores.clone();
            let entry = HistoryEntry::new(scores.clone(), asked as usize);
            self.history_log.append(&entry)?;
            self.history.push(entry);
        } else {
            tracing::info!(session = %session.id(), "no questions answered, nothing saved");
        }

        let report = SessionReport::build(&session, &changes, scores, Utc::now());
        tracing::info!(
            session = %report.session_id,
            score = report.score,
            total = report.total,
            grade = %report.grade,
            "session finished"
        );
        Ok(report)
    }
}
