//! Graph coloring (`NpGcpD`).

use npmm_domain::{Graph, NpTask, Verdict, VertexId};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

use super::{ProblemValidator, ValidationFault, ValidatorConfig};
use crate::extraction::{extract_integers, AnswerScope, ExtractionError};

/// Checks a color sequence indexed by vertex id.
///
/// Objective is the number of distinct colors (minimized). Penalty is
/// `vertex_count + 1`, one more than the worst possible coloring.
pub struct GraphColoringValidator;

impl ProblemValidator for GraphColoringValidator {
    fn task(&self) -> NpTask {
        NpTask::GraphColoring
    }

    #[instrument(skip_all, fields(vertices = graph.vertex_count()))]
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        _config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault> {
        let vertex_count = graph.vertex_count();
        let penalty = (vertex_count + 1) as f64;

        let colors = match extract_integers(answer, AnswerScope::ToEnd) {
            Ok(colors) => colors,
            Err(ExtractionError::Empty) => {
                return Ok(Verdict::parse_failure(penalty, "coloring cannot be empty"))
            }
            Err(err @ ExtractionError::NoAnswerMarker) => {
                return Ok(Verdict::parse_failure(penalty, err.to_string()))
            }
            Err(err) => {
                debug!(error = %err, "Unparseable coloring");
                return Ok(Verdict::parse_failure(
                    penalty,
                    "coloring must be a list of integers",
                ));
            }
        };

        if colors.contains(&-1) {
            return Ok(Verdict::violation(
                penalty,
                "not valid response with -1 in coloring list, coloring must be a list of integers and bigger than 0",
            ));
        }

        if colors.len() != vertex_count {
            return Ok(Verdict::violation(
                penalty,
                format!(
                    "invalid coloring: not all vertices are colored, overall {} vertices, got {} vertices",
                    vertex_count,
                    colors.len()
                ),
            ));
        }

        let color_of = |vertex: VertexId| -> Result<i64, ValidationFault> {
            usize::try_from(vertex)
                .ok()
                .and_then(|index| colors.get(index).copied())
                .ok_or(ValidationFault::VertexOutOfRange {
                    vertex,
                    vertex_count,
                })
        };

        for vertex in graph.vertices() {
            let color = color_of(vertex)?;
            if color <= 0 {
                return Ok(Verdict::violation(
                    penalty,
                    format!(
                        "invalid color: color for node {} is {}, but must be a positive integer.",
                        vertex, color
                    ),
                ));
            }

            for (neighbor, weight) in graph.neighbors(vertex) {
                if !weight.is_edge() {
                    continue;
                }
                if color_of(neighbor)? == color {
                    return Ok(Verdict::violation(
                        penalty,
                        format!(
                            "invalid coloring: node {} and node {} have the same color {}",
                            vertex, neighbor, color
                        ),
                    ));
                }
            }
        }

        let used = colors.iter().collect::<BTreeSet<_>>().len();
        Ok(Verdict::feasible(
            used as f64,
            format!(
                "valid coloring with {} colors, try to use less color to assign",
                used
            ),
        ))
    }
}
