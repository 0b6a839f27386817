//! mathquest-core: adaptive arithmetic and number-theory practice engine.
//!
//! Scores per topic drive a difficulty level for each session; the planner
//! spreads questions across levels, the generator draws valid problems, and
//! the updater folds performance back into the scores.

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod generator;
pub mod numtheory;
pub mod plan;
pub mod problem;
pub mod report;
pub mod session;
pub mod statistics;
pub mod store;
pub mod topic;
pub mod updater;
