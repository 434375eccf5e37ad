//! One-off answer validation

use std::path::Path;

use anyhow::Result;
use npmm_application::ApplicationError;
use npmm_domain::{Graph, NpTask, RejectionKind, Verdict};
use serde::Serialize;

use crate::commands::CommandContext;
use crate::io;
use crate::output::{colors, Formattable, TableFormatter};

/// Verdict for a single answer as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct VerdictOutput {
    pub task: NpTask,
    pub valid: bool,
    pub objective_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RejectionKind>,
    pub message: String,
}

impl VerdictOutput {
    pub fn new(task: NpTask, verdict: &Verdict) -> Self {
        Self {
            task,
            valid: verdict.is_feasible(),
            objective_value: verdict.objective_value(),
            kind: verdict.kind(),
            message: verdict.message().to_string(),
        }
    }
}

impl Formattable for VerdictOutput {
    fn format_table(&self) -> Result<String> {
        let status = if self.valid {
            colors::success("valid").to_string()
        } else {
            colors::error("invalid").to_string()
        };

        let mut items = vec![
            ("Task", self.task.name().to_string()),
            ("Status", status),
            ("Objective", self.objective_value.to_string()),
        ];
        if let Some(kind) = self.kind {
            let kind = match kind {
                RejectionKind::ParseFailure => "parse failure",
                RejectionKind::FeasibilityViolation => "feasibility violation",
            };
            items.push(("Rejection", kind.to_string()));
        }
        items.push(("Message", self.message.clone()));

        TableFormatter::key_value(items)
    }
}

/// Check one answer against one graph.
pub fn check(ctx: &CommandContext, task: &str, graph: &Path, answer: &str) -> Result<VerdictOutput> {
    let task: NpTask = task.parse().map_err(ApplicationError::from)?;
    let value = io::load_graph(graph)?;
    let graph =
        Graph::from_value(&value).map_err(|e| ApplicationError::InvalidInput(e.to_string()))?;
    let answer = io::read_answer(answer)?;

    let verdict = ctx
        .engine()
        .validate(task, &graph, &answer)
        .map_err(ApplicationError::from)?;

    Ok(VerdictOutput::new(task, &verdict))
}

/// Validate and print the verdict.
pub fn run(ctx: &CommandContext, task: &str, graph: &Path, answer: &str) -> Result<()> {
    let output = check(ctx, task, graph, answer)?;
    println!("{}", output.format(ctx.format)?);
    Ok(())
}
