//! Engine error types.
//!
//! Domain failures that a caller is expected to react to. Persistence and
//! configuration failures travel as `anyhow::Error` instead.

use thiserror::Error;

use crate::topic::{DifficultyLevel, Topic};

/// Errors raised by the planning, generation and evaluation steps.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The session request cannot produce a plan (no topics, zero questions).
    #[error("invalid session request: {0}")]
    InvalidSessionRequest(String),

    /// A submitted answer does not have the shape the problem expects.
    #[error("expected {expected}, got '{input}'")]
    InputShape { expected: String, input: String },

    /// Rejection sampling hit the safety cap without a valid draw.
    #[error("could not generate a {level} {topic} problem after {draws} draws")]
    GenerationExhausted {
        topic: Topic,
        level: DifficultyLevel,
        draws: u32,
    },

    /// The session has no open question to answer.
    #[error("no question is waiting for an answer")]
    NoActiveQuestion,
}

impl EngineError {
    /// Build an `InputShape` error from anything printable.
    pub fn input_shape(expected: impl Into<String>, input: impl Into<String>) -> Self {
        EngineError::InputShape {
            expected: expected.into(),
            input: input.into(),
        }
    }

    /// Returns `true` if the caller should re-prompt rather than abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InputShape { .. })
    }
}
