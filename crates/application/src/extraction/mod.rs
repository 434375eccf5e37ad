//! Answer extraction - from free-form model output to structured solutions
//!
//! Model answers arrive in many ad-hoc shapes (`[1, 2]`, `0 -> 1 -> 0`,
//! `{'1', '2'}`, bare comma lists). This module turns them into canonical
//! integer sequences or literal values without ever panicking: every failure
//! is an [`ExtractionError`] that validators turn into a parse-failure
//! verdict.

mod answer;
mod literal;

pub use answer::*;
pub use literal::*;

use thiserror::Error;

/// Why an answer could not be extracted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The `Answer:` marker does not occur in the text
    #[error("invalid answer: no '{}' in answer", ANSWER_MARKER)]
    NoAnswerMarker,

    /// Nothing left after normalization
    #[error("answer is empty")]
    Empty,

    /// A comma-separated token that is not an integer
    #[error("invalid token {0:?}: answer must be a list of integers")]
    InvalidToken(String),

    /// A list literal that does not parse
    #[error("malformed literal: {0}")]
    MalformedLiteral(String),

    /// A literal of the wrong structure
    #[error("unexpected answer shape: {0}")]
    UnexpectedShape(String),
}

impl ExtractionError {
    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            ExtractionError::NoAnswerMarker => "NO_ANSWER_MARKER",
            ExtractionError::Empty => "EMPTY_ANSWER",
            ExtractionError::InvalidToken(_) => "INVALID_TOKEN",
            ExtractionError::MalformedLiteral(_) => "MALFORMED_LITERAL",
            ExtractionError::UnexpectedShape(_) => "UNEXPECTED_SHAPE",
        }
    }
}
