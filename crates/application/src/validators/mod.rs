//! Per-problem answer validators.
//!
//! Each validator checks the feasibility of one extracted answer against a
//! problem graph and produces a [`Verdict`]. Malformed answers never fail the
//! call: they become infeasible verdicts carrying the problem's penalty.
//! Only graph data the problem cannot work with is reported as a
//! [`ValidationFault`].

mod clique;
mod coloring;
mod hamiltonian;
mod independent_set;
mod minimum_cut;
mod tsp;

pub use clique::MaximumCliqueValidator;
pub use coloring::GraphColoringValidator;
pub use hamiltonian::HamiltonianCycleValidator;
pub use independent_set::IndependentSetValidator;
pub use minimum_cut::MinimumCutValidator;
pub use tsp::TspTourValidator;

use npmm_domain::{Graph, NpTask, Verdict, VertexId, FALLBACK_PENALTY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Validator trait for judging answers to one problem family.
pub trait ProblemValidator: Send + Sync {
    /// Task handled by this validator.
    fn task(&self) -> NpTask;

    /// Validate an answer text against a problem graph.
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault>;
}

/// Configuration for validators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Penalty for weight-based problems whose graph carries no weight
    pub fallback_penalty: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fallback_penalty: FALLBACK_PENALTY,
        }
    }
}

impl ValidatorConfig {
    /// Penalty derived from a graph's total weight.
    pub fn weight_penalty(&self, total_weight: f64) -> f64 {
        if total_weight == 0.0 {
            self.fallback_penalty
        } else {
            total_weight
        }
    }
}

/// Graph data a validator cannot work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFault {
    /// A vertex id that cannot index the answer
    #[error("vertex {vertex} is outside [0, {vertex_count})")]
    VertexOutOfRange {
        /// Offending vertex
        vertex: VertexId,
        /// Number of declared vertices
        vertex_count: usize,
    },

    /// A weight-based problem given an adjacency list instead of a weighted map
    #[error("edge {from} -> {to} carries no weight")]
    MissingWeight {
        /// Vertex the entry is declared under
        from: VertexId,
        /// Listed neighbor
        to: VertexId,
    },
}

/// All built-in validators, one per handled task.
pub fn all_validators() -> Vec<Arc<dyn ProblemValidator>> {
    vec![
        Arc::new(TspTourValidator),
        Arc::new(HamiltonianCycleValidator),
        Arc::new(MaximumCliqueValidator),
        Arc::new(MinimumCutValidator),
        Arc::new(IndependentSetValidator),
        Arc::new(GraphColoringValidator),
    ]
}

/// Render vertex ids as `[a, b, c]`.
pub(crate) fn format_vertices<'a, I>(vertices: I) -> String
where
    I: IntoIterator<Item = &'a VertexId>,
{
    let joined = vertices
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}
