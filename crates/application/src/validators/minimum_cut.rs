//! Balanced minimum cut (`NpMinimumCut`).

use npmm_domain::{Graph, NpTask, Verdict, VertexId};
use std::collections::BTreeSet;
use tracing::instrument;

use super::{format_vertices, ProblemValidator, ValidationFault, ValidatorConfig};
use crate::extraction::{answer_tail, parse_literal, AnswerScope, Literal};

/// Checks a two-way balanced partition of the vertex set.
///
/// Objective is the weight of edges crossing the partition (minimized).
/// Penalty is the graph's total weight, or the configured fallback if it has
/// none. Graphs given as adjacency lists are a fault.
pub struct MinimumCutValidator;

fn subset(literal: &Literal) -> Option<BTreeSet<VertexId>> {
    literal
        .as_list()?
        .iter()
        .map(Literal::as_vertex)
        .collect()
}

impl ProblemValidator for MinimumCutValidator {
    fn task(&self) -> NpTask {
        NpTask::MinimumCut
    }

    #[instrument(skip_all, fields(vertices = graph.vertex_count()))]
    fn validate(
        &self,
        graph: &Graph,
        answer: &str,
        config: &ValidatorConfig,
    ) -> Result<Verdict, ValidationFault> {
        if let Some((from, to)) = graph.unweighted_arc() {
            return Err(ValidationFault::MissingWeight { from, to });
        }

        let penalty = config.weight_penalty(graph.total_weight());

        let tail = match answer_tail(answer, AnswerScope::ToEnd) {
            Ok(tail) => tail,
            Err(err) => return Ok(Verdict::parse_failure(penalty, err.to_string())),
        };

        if !(tail.starts_with('[') && tail.ends_with(']')) {
            return Ok(Verdict::parse_failure(
                penalty,
                "answer should be in format [[subset1], [subset2]]",
            ));
        }

        let literal = match parse_literal(tail) {
            Ok(literal) => literal,
            Err(_) => return Ok(Verdict::parse_failure(penalty, "invalid answer format")),
        };

        let (first, second) = match literal.as_list() {
            Some([first, second]) => (first, second),
            _ => {
                return Ok(Verdict::parse_failure(
                    penalty,
                    "answer should contain exactly two subsets",
                ))
            }
        };

        let (Some(first), Some(second)) = (subset(first), subset(second)) else {
            return Ok(Verdict::parse_failure(
                penalty,
                "each subset should be a list of nodes",
            ));
        };

        let common: BTreeSet<VertexId> = first.intersection(&second).copied().collect();
        if !common.is_empty() {
            return Ok(Verdict::violation(
                penalty,
                format!(
                    "subsets are not disjoint: common nodes {}",
                    format_vertices(&common)
                ),
            ));
        }

        let all_vertices = graph.vertex_set();
        let union: BTreeSet<VertexId> = first.union(&second).copied().collect();
        if union != all_vertices {
            let mut errors = Vec::new();
            let missing: BTreeSet<VertexId> = all_vertices.difference(&union).copied().collect();
            if !missing.is_empty() {
                errors.push(format!("missing nodes: {}", format_vertices(&missing)));
            }
            let extra: BTreeSet<VertexId> = union.difference(&all_vertices).copied().collect();
            if !extra.is_empty() {
                errors.push(format!("extra nodes: {}", format_vertices(&extra)));
            }
            return Ok(Verdict::violation(penalty, errors.join("; ")));
        }

        let n = all_vertices.len();
        let diff = first.len().abs_diff(second.len());
        if !(diff == 0 || (n % 2 == 1 && diff == 1)) {
            return Ok(Verdict::violation(
                penalty,
                format!(
                    "balance constraint violated: subset sizes {} and {} for total nodes {}",
                    first.len(),
                    second.len(),
                    n
                ),
            ));
        }

        let cut_weight: f64 = first
            .iter()
            .flat_map(|&u| second.iter().map(move |&v| (u, v)))
            .map(|(u, v)| graph.edge_weight(u, v))
            .sum();

        Ok(Verdict::feasible(
            cut_weight,
            format!("Cut weight: {}", cut_weight),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npmm_domain::RejectionKind;

    fn square() -> Graph {
        Graph::from_json(
            r#"{
                "0": {"1": 1, "3": 4},
                "1": {"0": 1, "2": 2},
                "2": {"1": 2, "3": 3},
                "3": {"2": 3, "0": 4}
            }"#,
        )
        .unwrap()
    }

    fn check(graph: &Graph, answer: &str) -> Verdict {
        MinimumCutValidator
            .validate(graph, answer, &ValidatorConfig::default())
            .unwrap()
    }

    #[test]
    fn test_balanced_partition_accepted() {
        let verdict = check(&square(), "Answer: [[0,1],[2,3]]");
        assert!(verdict.is_feasible());
        // Crossing edges 1-2 and 0-3
        assert_eq!(verdict.objective_value(), 6.0);
    }

    #[test]
    fn test_cut_weight_symmetric() {
        let a = check(&square(), "Answer: [[0,1],[2,3]]");
        let b = check(&square(), "Answer: [[3,2],[1,0]]");
        assert_eq!(a.objective_value(), b.objective_value());
    }

    #[test]
    fn test_unbalanced_rejected() {
        let verdict = check(&square(), "Answer: [[0],[1,2,3]]");
        assert!(verdict.is_invalid());
        assert_eq!(verdict.objective_value(), 10.0);
        assert_eq!(
            verdict.message(),
            "balance constraint violated: subset sizes 1 and 3 for total nodes 4"
        );
    }

    #[test]
    fn test_odd_vertex_count_allows_difference_of_one() {
        let graph = Graph::from_json(r#"{"0": {"1": 1}, "1": {"0": 1, "2": 1}, "2": {"1": 1}}"#)
            .unwrap();
        let verdict = check(&graph, "Answer: [[0], [1, 2]]");
        assert!(verdict.is_feasible());
        assert_eq!(verdict.objective_value(), 1.0);
    }

    #[test]
    fn test_coverage_errors() {
        let verdict = check(&square(), "Answer: [[0,1],[2,7]]");
        assert_eq!(verdict.message(), "missing nodes: [3]; extra nodes: [7]");
        let verdict = check(&square(), "Answer: [[0,1],[1,2,3]]");
        assert_eq!(verdict.message(), "subsets are not disjoint: common nodes [1]");
    }

    #[test]
    fn test_shape_errors() {
        let graph = square();
        for (answer, message) in [
            ("Answer: {0,1},{2,3}", "answer should be in format [[subset1], [subset2]]"),
            ("Answer: [[0,1],[2,3]", "invalid answer format"),
            ("Answer: [[0,1],[2],[3]]", "answer should contain exactly two subsets"),
            ("Answer: [[0,1], 2]", "each subset should be a list of nodes"),
        ] {
            let verdict = check(&graph, answer);
            assert_eq!(verdict.kind(), Some(RejectionKind::ParseFailure), "{}", answer);
            assert_eq!(verdict.message(), message);
        }
    }

    #[test]
    fn test_adjacency_list_graph_is_a_fault() {
        let graph =
            Graph::from_json(r#"{"0": [1, 2], "1": [0, 3], "2": [0, 3], "3": [1, 2]}"#).unwrap();
        for answer in ["Answer: [[0,3],[1,2]]", "no answer here"] {
            let result = MinimumCutValidator.validate(&graph, answer, &ValidatorConfig::default());
            assert_eq!(result, Err(ValidationFault::MissingWeight { from: 0, to: 1 }));
        }
    }

    #[test]
    fn test_fallback_penalty_for_weightless_graph() {
        let graph = Graph::from_json(r#"{"0": {}, "1": {}}"#).unwrap();
        let verdict = check(&graph, "Answer: [[0,1],[]]");
        assert!(verdict.is_invalid());
        assert_eq!(verdict.objective_value(), 1e9);
    }
}
