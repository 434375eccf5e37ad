//! Scoring module - Aggregation of validator verdicts
//!
//! This module drives the per-record validation loop, accumulates per-task
//! success and approximation rates and rolls them up into categories.

mod engine;
mod report;

pub use engine::*;
pub use report::*;
