//! Error types for the NPMM domain.
//!
//! Everything here describes malformed *input data* (graphs and evaluation
//! records). None of these errors reflect a wrong answer: wrong answers are
//! expressed as [`Verdict::Infeasible`](crate::verdict::Verdict) values.

use crate::graph::VertexId;

/// Top-level domain error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Graph decoding or normalization failed
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Evaluation record is missing or has unusable fields
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Task label does not name a handled problem
    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(_) => "GRAPH_ERROR",
            Self::Record(_) => "RECORD_ERROR",
            Self::UnknownTask(_) => "UNKNOWN_TASK",
        }
    }
}

/// Graph-specific errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// The record carried no graph at all
    #[error("graph is missing")]
    Missing,

    /// A string-encoded graph was not valid JSON
    #[error("graph could not be decoded: {0}")]
    Decode(String),

    /// The top-level value is neither a map nor a list
    #[error("unsupported graph encoding: expected an object or array, got {0}")]
    UnsupportedShape(&'static str),

    /// A key or neighbor could not be read as an integer vertex id
    #[error("invalid vertex id: {0}")]
    InvalidVertex(String),

    /// A vertex maps to something other than a list, set or weight map
    #[error("invalid adjacency for vertex {vertex}: expected a list or map, got {found}")]
    InvalidAdjacency {
        /// Vertex whose adjacency is malformed
        vertex: VertexId,
        /// JSON kind that was found instead
        found: &'static str,
    },
}

/// Record-specific errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// No prediction text on the record
    #[error("record has no prediction")]
    MissingPrediction,

    /// Prediction is present but not a string
    #[error("prediction must be a string, got {0}")]
    InvalidPrediction(&'static str),

    /// `reward_model.ground_truth.ground_truth` is absent
    #[error("record has no ground truth")]
    MissingGroundTruth,

    /// Ground truth could not be read as a number
    #[error("ground truth is not numeric: {0}")]
    InvalidGroundTruth(String),
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
