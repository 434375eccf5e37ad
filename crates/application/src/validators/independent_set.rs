//! Maximum independent set (`NpMaximumSet`).

use npmm_domain::{Graph, NpTask, Verdict, VertexId, SIZE_PENALTY};
use std::collections::BTreeSet;
use tracing::instrument;

use super::{format_vertices, ProblemValidator, ValidationFault, ValidatorConfig};
use crate::extraction::{answer_tail, parse_integers, parse_literal, AnswerScope};

/// Checks that no two listed vertices are adjacent.
///
/// Only the first line after the marker is read. Objective is the set size.
/// Vertices that could still be added are reported in the message without
/// rejecting the answer.
pub struct IndependentSetValidator;

impl IndependentSetValidator {
    fn parse(tail: &str) -> Result<Vec<VertexId>, Verdict> {
        let unparseable =
            || Verdict::parse_failure(SIZE_PENALTY, "Could not parse the independent set from answer");

        if tail.starts_with('[') && tail.ends_with(']') {
            let literal = parse_literal(tail).map_err(|_| unparseable())?;
            let items = literal.as_list().ok_or_else(|| {
                Verdict::parse_failure(SIZE_PENALTY, "Answer must be a list of vertices")
            })?;
            // Elements that are not vertex ids cannot be in the graph
            items
                .iter()
                .map(|item| {
                    item.as_vertex().ok_or_else(|| {
                        Verdict::violation(
                            SIZE_PENALTY,
                            format!("Nodes not in graph: {}", item),
                        )
                    })
                })
                .collect()
        } else {
            let body: String = tail.chars().filter(|c| !matches!(c, '[' | ']')).collect();
            parse_integers(&body).map_err(|_| unparseable())
        }
    }
}

impl ProblemValidator for IndependentSetValidator {
    fn task(&self) -> NpTask {
        NpTask::MaximumSet
    }

    #[instrument(skip_all, fields(vertices = graph.vertex_count()))]
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        _config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault> {
        let tail = match answer_tail(answer, AnswerScope::FirstLine) {
            Ok(tail) => tail,
            Err(_) => {
                return Ok(Verdict::parse_failure(
                    SIZE_PENALTY,
                    "Invalid answer format: missing 'Answer:' prefix",
                ))
            }
        };

        let set = match Self::parse(tail) {
            Ok(set) => set,
            Err(verdict) => return Ok(verdict),
        };

        let absent: Vec<VertexId> = set.iter().copied().filter(|v| !graph.contains(*v)).collect();
        if !absent.is_empty() {
            let listed = absent
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(Verdict::violation(
                SIZE_PENALTY,
                format!("Nodes not in graph: {}", listed),
            ));
        }

        let members: BTreeSet<VertexId> = set.iter().copied().collect();
        if members.len() != set.len() {
            return Ok(Verdict::violation(
                SIZE_PENALTY,
                "Duplicate nodes found in the set",
            ));
        }

        for (i, &u) in set.iter().enumerate() {
            for &v in &set[i + 1..] {
                if graph.is_adjacent(u, v) {
                    return Ok(Verdict::violation(
                        SIZE_PENALTY,
                        format!(
                            "Nodes {} and {} are adjacent (violates independence)",
                            u, v
                        ),
                    ));
                }
            }
        }

        let neighbors = graph.neighbor_sets();
        let addable: BTreeSet<VertexId> = graph
            .vertices()
            .filter(|v| !members.contains(v))
            .filter(|v| {
                neighbors
                    .get(v)
                    .map_or(true, |adjacent| adjacent.is_disjoint(&members))
            })
            .collect();

        let size = set.len();
        if addable.is_empty() {
            Ok(Verdict::feasible(
                size as f64,
                format!("Valid maximal independent set (size {})", size),
            ))
        } else {
            Ok(Verdict::feasible(
                size as f64,
                format!(
                    "Valid independent set (size {}), but possibly not maximal - could potentially add nodes: {}",
                    size,
                    format_vertices(&addable)
                ),
            ))
        }
    }
}
