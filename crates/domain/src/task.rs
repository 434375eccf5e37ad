//! Task taxonomy: the six handled problem families and their categories.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A handled NP-hard problem family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NpTask {
    /// Traveling salesman tour
    #[serde(rename = "NpTsp")]
    Tsp,
    /// Hamiltonian cycle
    #[serde(rename = "NpHamiltonianCycle")]
    HamiltonianCycle,
    /// Maximum clique
    #[serde(rename = "NpMaximumCliqueProblem")]
    MaximumClique,
    /// Balanced minimum cut (bisection)
    #[serde(rename = "NpMinimumCut")]
    MinimumCut,
    /// Maximum independent set
    #[serde(rename = "NpMaximumSet")]
    MaximumSet,
    /// Graph coloring
    #[serde(rename = "NpGcpD")]
    GraphColoring,
}

impl NpTask {
    /// All handled tasks, in reporting order.
    pub const ALL: [NpTask; 6] = [
        NpTask::Tsp,
        NpTask::HamiltonianCycle,
        NpTask::MaximumClique,
        NpTask::MinimumCut,
        NpTask::MaximumSet,
        NpTask::GraphColoring,
    ];

    /// Canonical task name as it appears in record labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tsp => "NpTsp",
            Self::HamiltonianCycle => "NpHamiltonianCycle",
            Self::MaximumClique => "NpMaximumCliqueProblem",
            Self::MinimumCut => "NpMinimumCut",
            Self::MaximumSet => "NpMaximumSet",
            Self::GraphColoring => "NpGcpD",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tsp => "Traveling Salesman",
            Self::HamiltonianCycle => "Hamiltonian Cycle",
            Self::MaximumClique => "Maximum Clique",
            Self::MinimumCut => "Balanced Minimum Cut",
            Self::MaximumSet => "Maximum Independent Set",
            Self::GraphColoring => "Graph Coloring",
        }
    }

    /// Look up a task by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|task| task.name() == name)
    }

    /// Resolve a record label of the form `<prefix>-<ProblemName>[-...]`.
    ///
    /// The problem name is the segment between the first and second `-`.
    /// Labels without a `-` resolve to `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        label.split('-').nth(1).and_then(Self::from_name)
    }

    /// Which way the objective is scored against ground truth.
    pub fn direction(&self) -> Direction {
        match self {
            Self::GraphColoring | Self::MinimumCut => Direction::Minimize,
            Self::Tsp | Self::HamiltonianCycle | Self::MaximumClique | Self::MaximumSet => {
                Direction::Maximize
            }
        }
    }
}

impl fmt::Display for NpTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NpTask {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| DomainError::UnknownTask(s.to_string()))
    }
}

/// Scoring direction of a task's objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Ratio is `ground_truth / objective`
    Minimize,
    /// Ratio is `objective / ground_truth`
    Maximize,
}

impl Direction {
    /// Approximation ratio of a feasible objective against ground truth.
    ///
    /// A zero denominator gives `Some(1.0)` when the numerator is also zero
    /// and `None` otherwise.
    pub fn ratio(&self, objective: f64, ground_truth: f64) -> Option<f64> {
        let (numerator, denominator) = match self {
            Self::Minimize => (ground_truth, objective),
            Self::Maximize => (objective, ground_truth),
        };
        if denominator == 0.0 {
            return (numerator == 0.0).then_some(1.0);
        }
        Some(numerator / denominator)
    }
}

/// Category → member task names, in reporting order.
///
/// Members are plain names: categories may list tasks that no validator
/// handles, and those simply never accumulate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskGroups(IndexMap<String, Vec<String>>);

impl TaskGroups {
    /// Build from explicit `(category, members)` pairs.
    pub fn new<I, C, T>(groups: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<T>)>,
        C: Into<String>,
        T: Into<String>,
    {
        Self(
            groups
                .into_iter()
                .map(|(category, tasks)| {
                    (category.into(), tasks.into_iter().map(Into::into).collect())
                })
                .collect(),
        )
    }

    /// Iterate categories and their members.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no categories are defined.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Category containing `task`, if any.
    pub fn category_of(&self, task: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == task))
            .map(|(category, _)| category.as_str())
    }
}

impl Default for TaskGroups {
    fn default() -> Self {
        Self::new([
            ("selection", vec!["set-cover", "subset-sum", "knapsack"]),
            ("planning", vec!["NpTsp", "NpHamiltonianCycle"]),
            (
                "graph",
                vec!["NpMaximumCliqueProblem", "NpMaximumSet", "NpGcpD"],
            ),
            ("partition", vec!["NpMinimumCut"]),
            ("schedule", vec!["meeting-schedule"]),
        ])
    }
}
