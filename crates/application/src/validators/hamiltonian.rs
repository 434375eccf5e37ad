//! Hamiltonian cycle (`NpHamiltonianCycle`).

use npmm_domain::{Graph, NpTask, Verdict, SIZE_PENALTY};
use std::collections::HashSet;
use tracing::instrument;

use super::{ProblemValidator, ValidationFault, ValidatorConfig};
use crate::extraction::{extract_integers, AnswerScope, ExtractionError};

/// Checks a closed walk over directed adjacency.
///
/// Objective is the walk length including the closing vertex.
pub struct HamiltonianCycleValidator;

impl ProblemValidator for HamiltonianCycleValidator {
    fn task(&self) -> NpTask {
        NpTask::HamiltonianCycle
    }

    #[instrument(skip_all, fields(vertices = graph.vertex_count()))]
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        _config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault> {
        let path = match extract_integers(answer, AnswerScope::ToEnd) {
            Ok(path) => path,
            Err(err @ ExtractionError::NoAnswerMarker) => {
                return Ok(Verdict::parse_failure(SIZE_PENALTY, err.to_string()))
            }
            Err(_) => {
                return Ok(Verdict::parse_failure(
                    SIZE_PENALTY,
                    "path must be a list of integers",
                ))
            }
        };

        let (first, last) = match (path.first(), path.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(Verdict::parse_failure(SIZE_PENALTY, "path cannot be empty")),
        };

        if first != last {
            return Ok(Verdict::violation(
                SIZE_PENALTY,
                format!(
                    "path is not a cycle: start {} and end {} are different",
                    first, last
                ),
            ));
        }

        let mut visited = HashSet::with_capacity(path.len());
        for &vertex in &path[..path.len() - 1] {
            if !visited.insert(vertex) {
                return Ok(Verdict::violation(
                    SIZE_PENALTY,
                    format!("node {} is visited more than once", vertex),
                ));
            }
        }

        for step in path.windows(2) {
            let (current, next) = (step[0], step[1]);
            if !graph.contains(current) {
                return Ok(Verdict::violation(
                    SIZE_PENALTY,
                    format!("node {} is not in adjacency list", current),
                ));
            }
            if !graph.has_arc(current, next) {
                return Ok(Verdict::violation(
                    SIZE_PENALTY,
                    format!("node {} and {} are not connected", current, next),
                ));
            }
        }

        // A single-vertex walk has no steps; its vertex must still exist
        if !graph.contains(first) {
            return Ok(Verdict::violation(
                SIZE_PENALTY,
                format!("node {} is not in adjacency list", first),
            ));
        }

        Ok(Verdict::feasible(
            path.len() as f64,
            format!("path length: {}", path.len()),
        ))
    }
}
