//! NPMM Domain Types
//!
//! This crate provides the core domain model for the NPMM answer-verification
//! engine: problem graphs, the task taxonomy, validation verdicts and the
//! evaluation records the engine consumes.
//!
//! ## Architecture
//!
//! - **graph**: Canonical graph model normalized from any accepted JSON encoding
//! - **task**: The six handled problem families, scoring direction, categories
//! - **verdict**: Feasible/infeasible outcome of validating one answer
//! - **record**: Evaluation record as produced by the surrounding harness
//! - **errors**: Error types for malformed input data
//!
//! ## Usage
//!
//! ```rust
//! use npmm_domain::{graph::Graph, task::NpTask};
//!
//! let graph = Graph::from_json(r#"{"0": ["1"], "1": ["0"]}"#).unwrap();
//! assert!(graph.is_adjacent(0, 1));
//!
//! let task = NpTask::from_label("npmm-NpGcpD").unwrap();
//! assert_eq!(task, NpTask::GraphColoring);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod graph;
pub mod record;
pub mod task;
pub mod verdict;

// Re-export commonly used types
pub use errors::{DomainError, DomainResult, GraphError, RecordError};
pub use graph::{EdgeWeight, Graph, NeighborSets, VertexId};
pub use record::EvaluationRecord;
pub use task::{Direction, NpTask, TaskGroups};
pub use verdict::{RejectionKind, Verdict, FALLBACK_PENALTY, SIZE_PENALTY};
