//! Category rollup and final evaluation report.

use npmm_domain::TaskGroups;
use serde::{Deserialize, Serialize};

use super::engine::{ScoreBoard, SubtaskResults};

/// Name of the row averaging all included categories.
pub const OVERALL_ROW: &str = "Overall";

/// One row of the group report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// Category name, or [`OVERALL_ROW`]
    #[serde(rename = "Task")]
    pub task: String,
    /// Mean success rate
    #[serde(rename = "SR")]
    pub sr: f64,
    /// Mean approximation rate
    #[serde(rename = "AR")]
    pub ar: f64,
    /// Members (or categories, for the overall row) averaged
    pub num_subtasks: usize,
}

/// Category rows in configured order, followed by the overall row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupReport {
    rows: Vec<GroupRow>,
}

impl GroupReport {
    /// All rows, overall last.
    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    /// Category rows only.
    pub fn categories(&self) -> impl Iterator<Item = &GroupRow> {
        self.rows.iter().filter(|row| row.task != OVERALL_ROW)
    }

    /// The overall row, absent when no category had counted members.
    pub fn overall(&self) -> Option<&GroupRow> {
        self.rows.iter().find(|row| row.task == OVERALL_ROW)
    }

    /// Whether no category qualified.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Averages per-task statistics into categories.
pub struct GroupReporter<'a> {
    groups: &'a TaskGroups,
}

impl<'a> GroupReporter<'a> {
    pub fn new(groups: &'a TaskGroups) -> Self {
        Self { groups }
    }

    /// Build the report. Only members with a non-zero count take part;
    /// categories without any are omitted.
    pub fn report(&self, subtasks: &SubtaskResults) -> GroupReport {
        let mut rows = Vec::with_capacity(self.groups.len() + 1);

        for (category, members) in self.groups.iter() {
            let counted: Vec<_> = members
                .iter()
                .filter_map(|name| subtasks.get_by_name(name))
                .filter(|stats| stats.count > 0)
                .collect();

            if counted.is_empty() {
                continue;
            }

            let n = counted.len() as f64;
            rows.push(GroupRow {
                task: category.to_string(),
                sr: counted.iter().map(|s| s.sr).sum::<f64>() / n,
                ar: counted.iter().map(|s| s.ar).sum::<f64>() / n,
                num_subtasks: counted.len(),
            });
        }

        if !rows.is_empty() {
            let n = rows.len() as f64;
            let overall = GroupRow {
                task: OVERALL_ROW.to_string(),
                sr: rows.iter().map(|r| r.sr).sum::<f64>() / n,
                ar: rows.iter().map(|r| r.ar).sum::<f64>() / n,
                num_subtasks: rows.len(),
            };
            rows.push(overall);
        }

        GroupReport { rows }
    }
}

/// Run counters carried alongside the statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records counted towards a task
    pub processed: usize,
    /// Records with unhandled tasks
    pub skipped: usize,
    /// Records counted invalid because of a fault
    pub faulted: usize,
}

/// Everything an evaluation run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Per-task statistics
    pub subtasks: SubtaskResults,
    /// Category and overall rows
    pub groups: GroupReport,
    /// Run counters
    pub summary: RunSummary,
}

impl EvaluationReport {
    pub(crate) fn new(subtasks: SubtaskResults, groups: GroupReport, board: &ScoreBoard) -> Self {
        Self {
            subtasks,
            groups,
            summary: RunSummary {
                processed: board.processed(),
                skipped: board.skipped,
                faulted: board.faulted,
            },
        }
    }
}
