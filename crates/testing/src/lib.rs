//! Testing utilities for the NPMM scoring workspace
//!
//! This crate provides:
//! - Graph fixtures in every accepted encoding
//! - A builder for evaluation records
//! - Property-based strategies for random graphs and answers
//!
//! # Examples
//!
//! ```
//! use npmm_testing::{fixtures::*, builders::*};
//! use npmm_domain::NpTask;
//!
//! let record = RecordBuilder::new()
//!     .with_task(NpTask::GraphColoring)
//!     .with_answer("[1, 2, 1]")
//!     .with_ground_truth(2.0)
//!     .with_question(path_json(3))
//!     .build();
//!
//! assert_eq!(record.task(), Some(NpTask::GraphColoring));
//! assert_eq!(record.graph().unwrap().vertex_count(), 3);
//! ```

pub mod builders;
pub mod fixtures;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;

// Re-export testing dependencies for convenience
pub use proptest;
