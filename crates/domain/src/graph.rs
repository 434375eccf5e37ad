//! Canonical graph model.
//!
//! Problem instances arrive as loosely-typed JSON: adjacency lists, adjacency
//! sets (arrays on the wire), weighted adjacency maps, or any of those wrapped
//! in a JSON string. Keys and neighbor ids may be strings or integers.
//! [`Graph::from_value`] normalizes all of them once into integer-keyed
//! adjacency, so validators never coerce representations themselves.
//!
//! The declared adjacency is kept *directed*, exactly as written in the
//! instance. Undirected views ([`Graph::neighbor_sets`],
//! [`Graph::is_adjacent`], [`Graph::edge_weight`]) are derived from it.

use crate::errors::{json_kind, GraphError};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// Vertex identifier after normalization.
pub type VertexId = i64;

/// Weight attached to a declared adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeWeight {
    /// Listed in an adjacency list or set
    Unweighted,
    /// Numeric weight from a weighted adjacency map
    Numeric(f64),
    /// Weight present but not a number; still counts as an edge
    Opaque,
}

impl EdgeWeight {
    /// Whether this entry denotes an edge. A numeric weight of zero does not.
    pub fn is_edge(&self) -> bool {
        match self {
            Self::Numeric(w) => *w != 0.0,
            Self::Unweighted | Self::Opaque => true,
        }
    }

    /// Numeric value of the weight, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(w) => Some(*w),
            Self::Unweighted | Self::Opaque => None,
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Self::Opaque, Self::Numeric),
            Value::Bool(b) => Self::Numeric(if *b { 1.0 } else { 0.0 }),
            _ => Self::Opaque,
        }
    }
}

/// Undirected neighbor sets keyed by vertex.
pub type NeighborSets = BTreeMap<VertexId, BTreeSet<VertexId>>;

/// A problem instance graph in canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adjacency: BTreeMap<VertexId, BTreeMap<VertexId, EdgeWeight>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a JSON graph value.
    ///
    /// Accepts:
    /// - an object mapping vertex keys to neighbor lists or weight maps;
    /// - an array whose position is the vertex id;
    /// - a string containing either of the above as JSON.
    pub fn from_value(value: &Value) -> Result<Self, GraphError> {
        match value {
            Value::String(encoded) => {
                let decoded: Value = serde_json::from_str(encoded)
                    .map_err(|e| GraphError::Decode(e.to_string()))?;
                if decoded.is_string() {
                    return Err(GraphError::UnsupportedShape("string"));
                }
                Self::from_value(&decoded)
            }
            Value::Object(map) => {
                let mut graph = Self::new();
                for (key, adjacency) in map {
                    let vertex = parse_vertex_str(key)?;
                    graph.insert_adjacency(vertex, adjacency)?;
                }
                Ok(graph)
            }
            Value::Array(rows) => {
                let mut graph = Self::new();
                for (index, adjacency) in rows.iter().enumerate() {
                    let vertex = VertexId::try_from(index)
                        .map_err(|_| GraphError::InvalidVertex(index.to_string()))?;
                    graph.insert_adjacency(vertex, adjacency)?;
                }
                Ok(graph)
            }
            Value::Null => Err(GraphError::Missing),
            other => Err(GraphError::UnsupportedShape(json_kind(other))),
        }
    }

    /// Parse a JSON document into a graph.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| GraphError::Decode(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Declare a vertex with no neighbors (no-op if it exists).
    pub fn add_vertex(&mut self, vertex: VertexId) {
        self.adjacency.entry(vertex).or_default();
    }

    /// Declare a directed adjacency entry `from -> to`.
    pub fn add_arc(&mut self, from: VertexId, to: VertexId, weight: EdgeWeight) {
        self.adjacency.entry(from).or_default().insert(to, weight);
    }

    fn insert_adjacency(&mut self, vertex: VertexId, adjacency: &Value) -> Result<(), GraphError> {
        self.add_vertex(vertex);
        match adjacency {
            Value::Array(neighbors) => {
                for neighbor in neighbors {
                    self.add_arc(vertex, parse_vertex(neighbor)?, EdgeWeight::Unweighted);
                }
            }
            Value::Object(weights) => {
                for (neighbor, weight) in weights {
                    self.add_arc(
                        vertex,
                        parse_vertex_str(neighbor)?,
                        EdgeWeight::from_value(weight),
                    );
                }
            }
            Value::Null => {}
            other => {
                return Err(GraphError::InvalidAdjacency {
                    vertex,
                    found: json_kind(other),
                })
            }
        }
        Ok(())
    }

    /// Number of declared vertices (keys of the instance).
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph declares no vertices.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Declared vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Declared vertices as a set.
    pub fn vertex_set(&self) -> BTreeSet<VertexId> {
        self.adjacency.keys().copied().collect()
    }

    /// Whether `vertex` is a declared key.
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// Declared adjacency entries of `vertex`, in ascending neighbor order.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = (VertexId, EdgeWeight)> + '_ {
        self.adjacency
            .get(&vertex)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(v, w)| (*v, *w)))
    }

    /// Directed lookup of the entry declared under `from` for `to`.
    pub fn arc(&self, from: VertexId, to: VertexId) -> Option<EdgeWeight> {
        self.adjacency.get(&from)?.get(&to).copied()
    }

    /// Whether `to` is listed under `from`.
    pub fn has_arc(&self, from: VertexId, to: VertexId) -> bool {
        self.arc(from, to).is_some()
    }

    /// Directed numeric distance `from -> to`.
    pub fn distance(&self, from: VertexId, to: VertexId) -> Option<f64> {
        self.arc(from, to).and_then(|w| w.as_f64())
    }

    /// Undirected adjacency test: an edge declared in either direction.
    pub fn is_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.arc(u, v).is_some_and(|w| w.is_edge()) || self.arc(v, u).is_some_and(|w| w.is_edge())
    }

    /// Undirected numeric weight of `{u, v}`; zero when absent or non-numeric.
    pub fn edge_weight(&self, u: VertexId, v: VertexId) -> f64 {
        self.distance(u, v)
            .or_else(|| self.distance(v, u))
            .unwrap_or(0.0)
    }

    /// Sum of numeric weights, each unordered pair counted once.
    ///
    /// Only entries declared under the smaller endpoint count; a pair listed
    /// solely under its larger endpoint contributes nothing. Self-loops are
    /// ignored.
    pub fn total_weight(&self) -> f64 {
        self.adjacency
            .iter()
            .flat_map(|(&u, entries)| {
                entries
                    .range((Bound::Excluded(u), Bound::Unbounded))
                    .map(|(_, w)| w)
            })
            .filter_map(EdgeWeight::as_f64)
            .sum()
    }

    /// First adjacency entry, in vertex order, that was listed without a
    /// weight.
    pub fn unweighted_arc(&self) -> Option<(VertexId, VertexId)> {
        self.adjacency.iter().find_map(|(&u, entries)| {
            entries
                .iter()
                .find(|(_, w)| matches!(w, EdgeWeight::Unweighted))
                .map(|(&v, _)| (u, v))
        })
    }

    /// Whether any numeric weight was declared.
    pub fn is_weighted(&self) -> bool {
        self.adjacency
            .values()
            .flat_map(|entries| entries.values())
            .any(|w| matches!(w, EdgeWeight::Numeric(_)))
    }

    /// Undirected neighbor sets.
    ///
    /// Vertices that only appear as neighbors get an entry too. Entries whose
    /// numeric weight is zero are not edges.
    pub fn neighbor_sets(&self) -> NeighborSets {
        let mut sets = NeighborSets::new();
        for (&u, entries) in &self.adjacency {
            sets.entry(u).or_default();
            for (&v, weight) in entries {
                sets.entry(v).or_default();
                if weight.is_edge() {
                    sets.entry(u).or_default().insert(v);
                    sets.entry(v).or_default().insert(u);
                }
            }
        }
        sets
    }
}

fn parse_vertex_str(raw: &str) -> Result<VertexId, GraphError> {
    raw.trim()
        .parse::<VertexId>()
        .map_err(|_| GraphError::InvalidVertex(raw.to_string()))
}

fn parse_vertex(value: &Value) -> Result<VertexId, GraphError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as VertexId))
            .ok_or_else(|| GraphError::InvalidVertex(n.to_string())),
        Value::String(s) => parse_vertex_str(s),
        other => Err(GraphError::InvalidVertex(other.to_string())),
    }
}
