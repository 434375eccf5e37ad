//! Maximum clique (`NpMaximumCliqueProblem`).

use npmm_domain::{Graph, NpTask, Verdict, VertexId, SIZE_PENALTY};
use std::collections::BTreeSet;
use tracing::instrument;

use super::{format_vertices, ProblemValidator, ValidationFault, ValidatorConfig};
use crate::extraction::{answer_tail, parse_literal, AnswerScope};

/// Checks that every listed vertex is adjacent to every other.
///
/// Works on the undirected view of any graph encoding. Objective is the
/// clique size; maximality is not verified.
pub struct MaximumCliqueValidator;

impl ProblemValidator for MaximumCliqueValidator {
    fn task(&self) -> NpTask {
        NpTask::MaximumClique
    }

    #[instrument(skip_all, fields(vertices = graph.vertex_count()))]
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        _config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault> {
        let tail = match answer_tail(answer, AnswerScope::ToEnd) {
            Ok(tail) => tail,
            Err(err) => return Ok(Verdict::parse_failure(SIZE_PENALTY, err.to_string())),
        };

        let literal = match parse_literal(tail) {
            Ok(literal) => literal,
            Err(_) => {
                return Ok(Verdict::parse_failure(
                    SIZE_PENALTY,
                    "invalid format: cannot parse list after 'Answer:'",
                ))
            }
        };

        let Some(items) = literal.as_list() else {
            return Ok(Verdict::parse_failure(
                SIZE_PENALTY,
                "invalid format: answer must be a list like [0, 1, 2]",
            ));
        };

        if items.is_empty() {
            return Ok(Verdict::violation(SIZE_PENALTY, "invalid clique: empty list"));
        }

        let mut clique: Vec<VertexId> = Vec::with_capacity(items.len());
        for item in items {
            match item.as_vertex() {
                Some(vertex) => clique.push(vertex),
                None => {
                    return Ok(Verdict::parse_failure(
                        SIZE_PENALTY,
                        format!("invalid vertex id: {} is not an integer", item),
                    ))
                }
            }
        }

        let members: BTreeSet<VertexId> = clique.iter().copied().collect();
        if members.len() != clique.len() {
            return Ok(Verdict::violation(
                SIZE_PENALTY,
                "invalid clique: duplicated vertices in the list",
            ));
        }

        let neighbors = graph.neighbor_sets();

        let mut missing: Vec<VertexId> = clique
            .iter()
            .copied()
            .filter(|v| !neighbors.contains_key(v))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Ok(Verdict::violation(
                SIZE_PENALTY,
                format!(
                    "invalid vertices (not in graph): {}",
                    format_vertices(&missing)
                ),
            ));
        }

        for &vertex in &clique {
            let adjacent = neighbors.get(&vertex);
            let unconnected: BTreeSet<VertexId> = members
                .iter()
                .copied()
                .filter(|&other| other != vertex)
                .filter(|other| !adjacent.is_some_and(|set| set.contains(other)))
                .collect();
            if !unconnected.is_empty() {
                return Ok(Verdict::violation(
                    SIZE_PENALTY,
                    format!(
                        "invalid clique: vertex {} is not connected to {}",
                        vertex,
                        format_vertices(&unconnected)
                    ),
                ));
            }
        }

        let size = clique.len();
        Ok(Verdict::feasible(
            size as f64,
            format!(
                "valid clique of size {} (note: not necessarily maximum)",
                size
            ),
        ))
    }
}
