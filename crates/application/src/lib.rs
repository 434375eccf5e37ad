//! Application layer for the NPMM scoring engine
//!
//! This crate turns free-form model answers into verdicts and aggregates
//! them into per-task and per-category metrics.
//!
//! ## Modules
//!
//! - `extraction` - Answer-marker location, format normalization, literal parsing
//! - `validators` - Feasibility checks for the six problem families
//! - `scoring` - Per-record loop, accumulation and group rollup

pub mod extraction;
pub mod scoring;
pub mod validators;

// Re-export commonly used types
pub use extraction::{ExtractionError, Literal, NormalizationRule, ANSWER_MARKER};
pub use scoring::{
    EvaluationReport, GroupReport, GroupReporter, GroupRow, RecordOutcome, ScoreBoard,
    ScoringEngine, ScoringEngineBuilder, ScoringEngineConfig, ScoringError, SubtaskResults,
    TaskAccumulator, TaskStatistics, OVERALL_ROW,
};
pub use validators::{ProblemValidator, ValidationFault, ValidatorConfig};

// Common error types for the application layer
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested task is not handled
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// Scoring failed
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Get process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ApplicationError::InvalidInput(_) | ApplicationError::UnknownTask(_) => 2,
            ApplicationError::Scoring(_) | ApplicationError::Internal(_) => 1,
        }
    }

    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::UnknownTask(_) => "UNKNOWN_TASK",
            ApplicationError::Scoring(err) => err.error_code(),
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<npmm_domain::DomainError> for ApplicationError {
    fn from(err: npmm_domain::DomainError) -> Self {
        match err {
            npmm_domain::DomainError::UnknownTask(name) => ApplicationError::UnknownTask(name),
            other => ApplicationError::InvalidInput(other.to_string()),
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
