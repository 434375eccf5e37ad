//! Traveling salesman tour (`NpTsp`).

use npmm_domain::{Graph, NpTask, Verdict};
use std::collections::HashSet;
use tracing::instrument;

use super::{ProblemValidator, ValidationFault, ValidatorConfig};
use crate::extraction::{extract_integers, AnswerScope, ExtractionError};

/// Checks a closed tour visiting every city exactly once.
///
/// Objective is the sum of directed distances along the tour. Penalty is the
/// graph's total weight, or the configured fallback if it has none.
pub struct TspTourValidator;

impl ProblemValidator for TspTourValidator {
    fn task(&self) -> NpTask {
        NpTask::Tsp
    }

    #[instrument(skip_all, fields(cities = graph.vertex_count()))]
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault> {
        let penalty = config.weight_penalty(graph.total_weight());

        let path = match extract_integers(answer, AnswerScope::ToEnd) {
            Ok(path) => path,
            Err(err @ ExtractionError::NoAnswerMarker) => {
                return Ok(Verdict::parse_failure(penalty, err.to_string()))
            }
            Err(_) => {
                return Ok(Verdict::parse_failure(
                    penalty,
                    "path must be a list of integers",
                ))
            }
        };

        let (first, last) = match (path.first(), path.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(Verdict::parse_failure(penalty, "path cannot be empty")),
        };

        if first != last {
            return Ok(Verdict::violation(
                penalty,
                format!(
                    "path is not a cycle: start {} and end {} are different",
                    first, last
                ),
            ));
        }

        let cities = graph.vertex_count();
        if path.len() != cities + 1 {
            return Ok(Verdict::violation(
                penalty,
                format!(
                    "path length is incorrect. Expected {} cities in path, but got {}",
                    cities + 1,
                    path.len()
                ),
            ));
        }

        let mut visited = HashSet::with_capacity(cities);
        for &city in &path[..cities] {
            let in_range = usize::try_from(city).is_ok_and(|c| c < cities);
            if !in_range || !visited.insert(city) {
                return Ok(Verdict::violation(
                    penalty,
                    format!(
                        "invalid city: {} (either repeated, negative, or out of range)",
                        city
                    ),
                ));
            }
        }

        let mut total_distance = 0.0;
        for step in path.windows(2) {
            match graph.distance(step[0], step[1]) {
                Some(distance) => total_distance += distance,
                None => {
                    return Ok(Verdict::violation(
                        penalty,
                        format!(
                            "no distance found between cities {} and {}",
                            step[0], step[1]
                        ),
                    ))
                }
            }
        }

        Ok(Verdict::feasible(
            total_distance,
            format!("Total distance: {}", total_distance),
        ))
    }
}
