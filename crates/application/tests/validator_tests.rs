//! Tests for the per-problem validators
//!
//! Worked examples for every problem family plus properties that must hold
//! for arbitrary graphs and answers.

use npmm_application::ScoringEngine;
use npmm_domain::{Graph, NpTask, RejectionKind, Verdict, VertexId};
use npmm_testing::fixtures::*;
use proptest::prelude::*;
use serde_json::json;

fn check(task: NpTask, graph: &Graph, answer: &str) -> Verdict {
    ScoringEngine::default()
        .validate(task, graph, answer)
        .unwrap()
}

fn list(items: &[VertexId]) -> String {
    let items: Vec<String> = items.iter().map(|v| v.to_string()).collect();
    format!("Answer: [{}]", items.join(", "))
}

// ============================================================================
// Worked examples
// ============================================================================

#[test]
fn test_two_coloring_of_an_edge() {
    let graph = Graph::from_value(&json!({"0": ["1"], "1": ["0"]})).unwrap();

    let verdict = check(NpTask::GraphColoring, &graph, "Answer: [1,2]");
    assert!(verdict.is_feasible());
    assert_eq!(verdict.objective_value(), 2.0);

    let verdict = check(NpTask::GraphColoring, &graph, "Answer: [1,1]");
    assert!(verdict.is_invalid());
    assert_eq!(verdict.kind(), Some(RejectionKind::FeasibilityViolation));
    assert_eq!(verdict.objective_value(), 3.0);
}

#[test]
fn test_triangle_tour() {
    let verdict = check(NpTask::Tsp, &tsp_triangle(), "Answer: 0->1->2->0");
    assert!(verdict.is_feasible());
    assert_eq!(verdict.objective_value(), 7.0);
}

#[test]
fn test_directed_hamiltonian_cycle() {
    let graph = Graph::from_value(&json!({"0": [1], "1": [2], "2": [0]})).unwrap();

    let verdict = check(NpTask::HamiltonianCycle, &graph, "Answer: [0,1,2,0]");
    assert!(verdict.is_feasible());
    assert_eq!(verdict.objective_value(), 4.0);

    // Arcs only run one way
    let verdict = check(NpTask::HamiltonianCycle, &graph, "Answer: [0,2,1,0]");
    assert!(verdict.is_invalid());
    assert_eq!(verdict.objective_value(), -1.0);
}

#[test]
fn test_clique_with_missing_edge() {
    let graph = Graph::from_value(&adjacency_json(3, &[(1, 2), (0, 2)])).unwrap();

    let verdict = check(NpTask::MaximumClique, &graph, "Answer: [0,1,2]");
    assert!(verdict.is_invalid());
    assert_eq!(verdict.objective_value(), -1.0);
    assert_eq!(
        verdict.message(),
        "invalid clique: vertex 0 is not connected to [1]"
    );
}

#[test]
fn test_balanced_cut() {
    let graph = weighted_square();

    let verdict = check(NpTask::MinimumCut, &graph, "Answer: [[0,1],[2,3]]");
    assert!(verdict.is_feasible());
    assert_eq!(verdict.objective_value(), 6.0);

    let verdict = check(NpTask::MinimumCut, &graph, "Answer: [[0],[1,2,3]]");
    assert!(verdict.is_invalid());
    assert_eq!(verdict.objective_value(), 10.0);
}

#[test]
fn test_independent_set_on_path() {
    let verdict = check(NpTask::MaximumSet, &path(5), "Answer: [0, 2, 4]");
    assert!(verdict.is_feasible());
    assert_eq!(verdict.objective_value(), 3.0);

    let verdict = check(NpTask::MaximumSet, &path(5), "Answer: [0, 1]");
    assert!(verdict.is_invalid());
}

#[test]
fn test_missing_marker_is_parse_failure_everywhere() {
    let graph = triangle();
    for task in NpTask::ALL {
        let verdict = check(task, &graph, "I think the answer is [0, 1, 2]");
        assert!(verdict.is_invalid(), "{}", task);
        assert_eq!(verdict.kind(), Some(RejectionKind::ParseFailure), "{}", task);
    }
}

#[test]
fn test_answer_formats_are_equivalent() {
    let graph = tsp_triangle();
    for answer in [
        "Answer: [0, 1, 2, 0]",
        "Answer: 0->1->2->0",
        "Answer: 0 -> 1 -> 2 -> 0",
        "Answer: (0, 1, 2, 0)",
        "Answer: 0, 1, 2, 0",
        "Some reasoning.\nAnswer: [0, 1, 2, 0]",
    ] {
        let verdict = check(NpTask::Tsp, &graph, answer);
        assert!(verdict.is_feasible(), "{}", answer);
        assert_eq!(verdict.objective_value(), 7.0, "{}", answer);
    }
}

#[test]
fn test_coloring_vertex_outside_range_is_a_fault() {
    let graph = Graph::from_value(&json!({"0": ["5"], "5": ["0"]})).unwrap();
    let result = ScoringEngine::default().validate(NpTask::GraphColoring, &graph, "Answer: [1, 2]");
    assert!(result.is_err());
}

// ============================================================================
// Properties
// ============================================================================

/// Smallest positive color not used by an already colored neighbor.
fn greedy_coloring(n: usize, edges: &[(usize, usize)]) -> Vec<VertexId> {
    let mut colors: Vec<VertexId> = vec![0; n];
    for vertex in 0..n {
        let taken: Vec<VertexId> = edges
            .iter()
            .filter_map(|&(u, v)| match (u == vertex, v == vertex) {
                (true, _) => Some(colors[v]),
                (_, true) => Some(colors[u]),
                _ => None,
            })
            .collect();
        colors[vertex] = (1..).find(|c| !taken.contains(c)).unwrap_or(1);
    }
    colors
}

fn graph_and_subset(
    max_vertices: usize,
) -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<VertexId>, Vec<VertexId>)> {
    arb_edges(max_vertices).prop_flat_map(|(n, edges)| {
        let ids: Vec<VertexId> = (0..n as VertexId).collect();
        let pair = proptest::sample::subsequence(ids, 0..=n)
            .prop_flat_map(|subset| (Just(subset.clone()), Just(subset).prop_shuffle()));
        (Just(n), Just(edges), pair).prop_map(|(n, edges, (a, b))| (n, edges, a, b))
    })
}

fn weighted_partition(
) -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>, Vec<VertexId>)> {
    (1usize..5).prop_flat_map(|half| {
        let n = half * 2;
        let edge = (0..n, 0..n, 1u32..10)
            .prop_filter("no self-loops", |(u, v, _)| u != v)
            .prop_map(|(u, v, w)| (u, v, w as f64));
        let order: Vec<VertexId> = (0..n as VertexId).collect();
        (
            Just(n),
            proptest::collection::vec(edge, 0..(n * 2)),
            Just(order).prop_shuffle(),
        )
    })
}

proptest! {
    #[test]
    fn greedy_colorings_are_feasible((n, edges) in arb_edges(8)) {
        let graph = Graph::from_value(&adjacency_json(n, &edges)).unwrap();
        let colors = greedy_coloring(n, &edges);

        let verdict = check(NpTask::GraphColoring, &graph, &list(&colors));
        prop_assert!(verdict.is_feasible(), "{}", verdict.message());

        let mut distinct = colors.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(verdict.objective_value(), distinct.len() as f64);
    }

    #[test]
    fn odd_cycles_reject_two_colorings(
        colors in (1usize..5).prop_flat_map(|k| proptest::collection::vec(1i64..=2, 2 * k + 1))
    ) {
        let graph = Graph::from_value(&cycle_json(colors.len())).unwrap();
        let verdict = check(NpTask::GraphColoring, &graph, &list(&colors));
        prop_assert!(verdict.is_invalid());
        prop_assert_eq!(verdict.objective_value(), (colors.len() + 1) as f64);
    }

    #[test]
    fn feasible_hamiltonian_walks_have_no_repeats(
        walk in proptest::collection::vec(0i64..6, 1..8)
    ) {
        let graph = Graph::from_value(&directed_cycle_json(5)).unwrap();
        let mut closed = walk.clone();
        closed.push(walk[0]);

        let verdict = check(NpTask::HamiltonianCycle, &graph, &list(&closed));
        if verdict.is_feasible() {
            let mut visited = closed[..closed.len() - 1].to_vec();
            visited.sort_unstable();
            visited.dedup();
            prop_assert_eq!(visited.len(), closed.len() - 1);
            prop_assert_eq!(verdict.objective_value(), closed.len() as f64);
        } else {
            prop_assert_eq!(verdict.objective_value(), -1.0);
        }
    }

    #[test]
    fn rotations_of_a_directed_cycle_are_hamiltonian(n in 2usize..9, start in 0usize..9) {
        let start = start % n;
        let graph = Graph::from_value(&directed_cycle_json(n)).unwrap();
        let walk: Vec<VertexId> = (0..=n).map(|i| ((start + i) % n) as VertexId).collect();

        let verdict = check(NpTask::HamiltonianCycle, &graph, &list(&walk));
        prop_assert!(verdict.is_feasible(), "{}", verdict.message());
        prop_assert_eq!(verdict.objective_value(), (n + 1) as f64);
    }

    #[test]
    fn tour_length_is_the_sum_of_legs(
        tour in (2usize..8).prop_flat_map(|n| Just((0..n as VertexId).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let n = tour.len();
        let graph = Graph::from_value(&line_metric_json(n)).unwrap();
        let mut closed = tour.clone();
        closed.push(tour[0]);

        let verdict = check(NpTask::Tsp, &graph, &list(&closed));
        prop_assert!(verdict.is_feasible(), "{}", verdict.message());

        let expected: f64 = closed.windows(2).map(|leg| (leg[0] - leg[1]).abs() as f64).sum();
        prop_assert_eq!(verdict.objective_value(), expected);
        prop_assert_eq!(closed.len(), n + 1);
    }

    #[test]
    fn tours_with_repeats_are_rejected(
        tour in proptest::collection::vec(0i64..4, 4)
    ) {
        let graph = Graph::from_value(&line_metric_json(4)).unwrap();
        let mut closed = tour.clone();
        closed.push(tour[0]);

        let mut distinct = tour.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let verdict = check(NpTask::Tsp, &graph, &list(&closed));
        prop_assert_eq!(verdict.is_feasible(), distinct.len() == 4);
    }

    #[test]
    fn clique_verdicts_ignore_order((n, edges, subset, shuffled) in graph_and_subset(7)) {
        let graph = Graph::from_value(&adjacency_json(n, &edges)).unwrap();
        let a = check(NpTask::MaximumClique, &graph, &list(&subset));
        let b = check(NpTask::MaximumClique, &graph, &list(&shuffled));
        prop_assert_eq!(a.is_invalid(), b.is_invalid());
        prop_assert_eq!(a.objective_value(), b.objective_value());
    }

    #[test]
    fn independent_set_verdicts_ignore_order((n, edges, subset, shuffled) in graph_and_subset(7)) {
        let graph = Graph::from_value(&adjacency_json(n, &edges)).unwrap();
        let a = check(NpTask::MaximumSet, &graph, &list(&subset));
        let b = check(NpTask::MaximumSet, &graph, &list(&shuffled));
        prop_assert_eq!(a.is_invalid(), b.is_invalid());
        prop_assert_eq!(a.objective_value(), b.objective_value());

        if a.is_feasible() {
            for (i, &u) in subset.iter().enumerate() {
                for &v in &subset[i + 1..] {
                    prop_assert!(!graph.is_adjacent(u, v));
                }
            }
        }
    }

    #[test]
    fn cut_weight_is_symmetric((n, edges, order) in weighted_partition()) {
        let graph = Graph::from_value(&weighted_json(n, &edges)).unwrap();
        let (left, right) = order.split_at(n / 2);
        let forward = format!("Answer: [{:?}, {:?}]", left, right);
        let backward = format!("Answer: [{:?}, {:?}]", right, left);

        let a = check(NpTask::MinimumCut, &graph, &forward);
        let b = check(NpTask::MinimumCut, &graph, &backward);
        prop_assert!(a.is_feasible(), "{}", a.message());
        prop_assert!(b.is_feasible(), "{}", b.message());
        prop_assert_eq!(a.objective_value(), b.objective_value());

        let crossing: f64 = left
            .iter()
            .flat_map(|&u| { let graph = &graph; right.iter().map(move |&v| graph.edge_weight(u, v)) })
            .sum();
        prop_assert_eq!(a.objective_value(), crossing);
    }

    #[test]
    fn cuts_missing_a_vertex_are_rejected((n, edges, order) in weighted_partition()) {
        let graph = Graph::from_value(&weighted_json(n, &edges)).unwrap();
        let (left, right) = order.split_at(n / 2);
        let answer = format!("Answer: [{:?}, {:?}]", left, &right[1..]);

        let verdict = check(NpTask::MinimumCut, &graph, &answer);
        prop_assert!(verdict.is_invalid());
        prop_assert_eq!(verdict.kind(), Some(RejectionKind::FeasibilityViolation));
    }
}
