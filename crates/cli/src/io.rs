//! Reading evaluation batches and writing report artifacts.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use npmm_application::EvaluationReport;
use npmm_domain::EvaluationRecord;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Suffix of the per-task statistics artifact.
pub const SUBTASK_STATS_SUFFIX: &str = "_subtask_stats.json";

/// Suffix of the category report artifact.
pub const ACC_SUFFIX: &str = "_acc.csv";

/// Paths of the two artifacts written for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    /// Per-task `{SR, AR, count}` blob
    pub subtask_stats: PathBuf,
    /// `Task/SR/AR/num_subtasks` rows
    pub acc: PathBuf,
}

/// Load an evaluation batch.
///
/// A file whose content starts with `[` is read as one JSON array. Anything
/// else is read as JSON lines. Elements or lines that are not record objects
/// are skipped with a warning.
pub fn load_records(path: &Path) -> Result<Vec<EvaluationRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        let elements: Vec<Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON array: {}", path.display()))?;
        let total = elements.len();
        let records: Vec<EvaluationRecord> = elements
            .into_iter()
            .enumerate()
            .filter_map(|(position, element)| {
                serde_json::from_value(element)
                    .map_err(|e| warn!(position, error = %e, "Skipping unparseable record"))
                    .ok()
            })
            .collect();
        debug!(records = records.len(), total, "Loaded JSON array");
        return Ok(records);
    }

    let reader = BufReader::new(content.as_bytes());
    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EvaluationRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(line = number + 1, error = %e, "Skipping unparseable record"),
        }
    }
    debug!(records = records.len(), "Loaded JSON lines");
    Ok(records)
}

/// Load a graph file for one-off validation.
pub fn load_graph(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse graph file: {}", path.display()))
}

/// Resolve an answer argument; `@path` reads the answer from a file.
pub fn read_answer(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read answer file: {}", path)),
        None => Ok(arg.to_string()),
    }
}

/// Artifact paths for an input file, placed in `directory` or next to the
/// input.
pub fn artifact_paths(input: &Path, directory: Option<&Path>) -> ArtifactPaths {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    let dir = directory
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    ArtifactPaths {
        subtask_stats: dir.join(format!("{}{}", stem, SUBTASK_STATS_SUFFIX)),
        acc: dir.join(format!("{}{}", stem, ACC_SUFFIX)),
    }
}

/// Write both artifacts for a finished report.
pub fn write_artifacts(
    report: &EvaluationReport,
    input: &Path,
    directory: Option<&Path>,
) -> Result<ArtifactPaths> {
    let paths = artifact_paths(input, directory);

    if let Some(dir) = paths.acc.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    write_json(&paths.subtask_stats, &report.subtasks)?;
    write_csv(&paths.acc, report.groups.rows())?;

    debug!(
        subtask_stats = %paths.subtask_stats.display(),
        acc = %paths.acc.display(),
        "Wrote report artifacts"
    );
    Ok(paths)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    writer.flush()?;
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
    }

    writer.flush()?;
    Ok(())
}
