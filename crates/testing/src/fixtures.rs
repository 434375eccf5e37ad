//! Graph fixtures and property-test strategies.
//!
//! JSON fixtures use string keys and string neighbor ids, the way problem
//! instances are usually stored. Each `*_json` fixture has a [`Graph`]
//! counterpart built from it.

use npmm_domain::Graph;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

fn graph(value: &Value) -> Graph {
    Graph::from_value(value).expect("fixture graphs are well-formed")
}

/// Undirected adjacency list from an edge list over `n` vertices.
pub fn adjacency_json(n: usize, edges: &[(usize, usize)]) -> Value {
    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for &(u, v) in edges {
        adjacency[u].insert(v);
        adjacency[v].insert(u);
    }
    let map: Map<String, Value> = adjacency
        .into_iter()
        .enumerate()
        .map(|(vertex, neighbors)| {
            let neighbors: Vec<Value> = neighbors
                .into_iter()
                .map(|n| Value::String(n.to_string()))
                .collect();
            (vertex.to_string(), Value::Array(neighbors))
        })
        .collect();
    Value::Object(map)
}

/// Undirected weighted adjacency map from a weighted edge list.
pub fn weighted_json(n: usize, edges: &[(usize, usize, f64)]) -> Value {
    let mut map = Map::new();
    for vertex in 0..n {
        map.insert(vertex.to_string(), json!({}));
    }
    for &(u, v, w) in edges {
        map[&u.to_string()][v.to_string()] = json!(w);
        map[&v.to_string()][u.to_string()] = json!(w);
    }
    Value::Object(map)
}

/// Complete graph on three vertices.
pub fn triangle_json() -> Value {
    adjacency_json(3, &[(0, 1), (1, 2), (0, 2)])
}

pub fn triangle() -> Graph {
    graph(&triangle_json())
}

/// Cycle `0-1-...-(n-1)-0`; odd `n` is not 2-colorable.
pub fn cycle_json(n: usize) -> Value {
    let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    adjacency_json(n, &edges)
}

/// Odd cycle of length five.
pub fn odd_cycle() -> Graph {
    graph(&cycle_json(5))
}

/// Path `0-1-...-(n-1)`.
pub fn path_json(n: usize) -> Value {
    let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
    adjacency_json(n, &edges)
}

pub fn path(n: usize) -> Graph {
    graph(&path_json(n))
}

/// Directed cycle `0 -> 1 -> ... -> (n-1) -> 0` as integer adjacency lists.
pub fn directed_cycle_json(n: usize) -> Value {
    let map: Map<String, Value> = (0..n)
        .map(|i| (i.to_string(), json!([(i + 1) % n])))
        .collect();
    Value::Object(map)
}

/// Distances `0-1 = 1`, `1-2 = 1`, `0-2 = 5`; optimal tour length 7.
pub fn tsp_triangle_json() -> Value {
    weighted_json(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)])
}

pub fn tsp_triangle() -> Graph {
    graph(&tsp_triangle_json())
}

/// Square `0-1-2-3-0` with weights 1, 2, 3, 4; total weight 10.
pub fn weighted_square_json() -> Value {
    weighted_json(
        4,
        &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0)],
    )
}

pub fn weighted_square() -> Graph {
    graph(&weighted_square_json())
}

/// Complete weighted graph where `d(u, v) = |u - v|`.
pub fn line_metric_json(n: usize) -> Value {
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            edges.push((u, v, (v - u) as f64));
        }
    }
    weighted_json(n, &edges)
}

/// Random undirected edge lists over `1..=max_vertices` vertices.
pub fn arb_edges(max_vertices: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_vertices).prop_flat_map(|n| {
        let edge = (0..n, 0..n).prop_filter("no self-loops", |(u, v)| u != v);
        (Just(n), prop::collection::vec(edge, 0..(n * n)))
    })
}

/// Random undirected graphs as JSON adjacency lists.
pub fn arb_graph_json(max_vertices: usize) -> impl Strategy<Value = Value> {
    arb_edges(max_vertices).prop_map(|(n, edges)| adjacency_json(n, &edges))
}
