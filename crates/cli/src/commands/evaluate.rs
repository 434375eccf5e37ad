//! Batch evaluation command

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use npmm_application::{EvaluationReport, ScoringEngine, ScoringEngineConfig};
use serde::Serialize;
use tracing::info;

use crate::commands::CommandContext;
use crate::io::{self, ArtifactPaths};
use crate::output::{colors, rate, Formattable, OutputFormat, TableFormatter};

/// Options for `npmm evaluate`
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    /// Input batch (JSON array or JSON lines)
    pub input: PathBuf,
    /// Worker override
    pub workers: Option<usize>,
    /// Artifact directory override
    pub output_dir: Option<PathBuf>,
    /// Skip writing artifacts
    pub no_write: bool,
}

/// Result of an evaluation run as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct EvaluationOutput {
    pub input: PathBuf,
    pub evaluated_at: DateTime<Utc>,
    pub workers: usize,
    #[serde(flatten)]
    pub report: EvaluationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ArtifactPaths>,
}

impl Formattable for EvaluationOutput {
    fn format_table(&self) -> Result<String> {
        let mut sections = Vec::new();

        if self.report.groups.is_empty() {
            sections.push(colors::warning("No category had any scored records").to_string());
        } else {
            let rows = self
                .report
                .groups
                .rows()
                .iter()
                .map(|row| {
                    vec![
                        row.task.clone(),
                        rate(row.sr),
                        rate(row.ar),
                        row.num_subtasks.to_string(),
                    ]
                })
                .collect();
            sections.push(TableFormatter::simple(
                vec!["Category", "SR", "AR", "Subtasks"],
                rows,
            )?);
        }

        let rows = self
            .report
            .subtasks
            .iter()
            .map(|(task, stats)| {
                vec![
                    task.name().to_string(),
                    rate(stats.sr),
                    rate(stats.ar),
                    stats.count.to_string(),
                ]
            })
            .collect();
        sections.push(TableFormatter::simple(vec!["Task", "SR", "AR", "Count"], rows)?);

        let summary = &self.report.summary;
        sections.push(TableFormatter::key_value(vec![
            ("Processed", summary.processed.to_string()),
            ("Skipped", summary.skipped.to_string()),
            ("Faulted", summary.faulted.to_string()),
            ("Workers", self.workers.to_string()),
        ])?);

        Ok(sections.join("\n\n"))
    }
}

/// Score a batch file and report per-task and per-category metrics.
pub async fn run(ctx: &CommandContext, options: EvaluateOptions) -> Result<()> {
    let mut settings = ctx.config.scoring.clone();
    if let Some(workers) = options.workers {
        settings.workers = workers.max(1);
    }
    let workers = settings.workers;
    let engine = ScoringEngine::new(ScoringEngineConfig::from_settings(&settings));

    if ctx.format == OutputFormat::Table {
        println!("{}", colors::heading("NPMM Evaluation"));
        println!("{}", "=".repeat(60));
        println!("Input: {}", options.input.display().to_string().bold());
        println!();
    }

    let records = io::load_records(&options.input)?;
    info!(
        input = %options.input.display(),
        records = records.len(),
        "Loaded evaluation batch"
    );

    let report = engine.evaluate_concurrent(records).await?;

    let write = ctx.config.output.write_artifacts && !options.no_write;
    let artifacts = if write {
        let directory = options
            .output_dir
            .as_deref()
            .or(ctx.config.output.directory.as_deref());
        Some(io::write_artifacts(&report, &options.input, directory)?)
    } else {
        None
    };

    let output = EvaluationOutput {
        input: options.input,
        evaluated_at: Utc::now(),
        workers,
        report,
        artifacts,
    };

    println!("{}", output.format(ctx.format)?);

    if ctx.format == OutputFormat::Table {
        if let Some(paths) = &output.artifacts {
            println!();
            println!(
                "{} {}",
                colors::success("Wrote"),
                paths.subtask_stats.display()
            );
            println!("{} {}", colors::success("Wrote"), paths.acc.display());
        }
    }

    Ok(())
}
