//! Scoring Engine - routes records to validators and accumulates results
//!
//! The scoring engine validates each record with the validator registered for
//! its task, turns feasible verdicts into approximation ratios against the
//! ground truth and accumulates per-task success and approximation rates.
//! Any fault while processing one record is logged and counted as an invalid
//! answer; the batch always completes.

use crate::scoring::report::{EvaluationReport, GroupReporter};
use crate::validators::{all_validators, ProblemValidator, ValidationFault, ValidatorConfig};
use indexmap::IndexMap;
use npmm_common::config::ScoringConfig;
use npmm_domain::{
    EvaluationRecord, Graph, GraphError, NpTask, RecordError, TaskGroups, Verdict,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Scoring engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringEngineConfig {
    /// Number of blocking workers used by concurrent evaluation
    pub workers: usize,
    /// Configuration passed to every validator
    pub validator: ValidatorConfig,
    /// Category rollup used by the group report
    pub groups: TaskGroups,
}

impl Default for ScoringEngineConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            validator: ValidatorConfig::default(),
            groups: TaskGroups::default(),
        }
    }
}

impl ScoringEngineConfig {
    /// Build from the `scoring` section of the application configuration.
    pub fn from_settings(settings: &ScoringConfig) -> Self {
        Self {
            workers: settings.workers.max(1),
            validator: ValidatorConfig {
                fallback_penalty: settings.fallback_penalty,
            },
            groups: settings.groups.clone(),
        }
    }
}

/// Unexpected fault while scoring one record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Prediction or ground truth unusable
    #[error("invalid record: {0}")]
    Record(#[from] RecordError),

    /// Problem graph unusable
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    /// Graph data the validator cannot work with
    #[error("validation fault: {0}")]
    Fault(#[from] ValidationFault),

    /// No validator registered for the task
    #[error("no validator registered for task {0}")]
    NoValidator(NpTask),

    /// A validator panicked
    #[error("validator for {task} panicked: {message}")]
    ValidatorPanic {
        /// Task being validated
        task: NpTask,
        /// Panic payload, if it was a string
        message: String,
    },

    /// A concurrent worker failed to complete
    #[error("scoring worker failed: {0}")]
    Worker(String),
}

impl ScoringError {
    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            ScoringError::Record(_) => "INVALID_RECORD",
            ScoringError::Graph(_) => "INVALID_GRAPH",
            ScoringError::Fault(_) => "VALIDATION_FAULT",
            ScoringError::NoValidator(_) => "NO_VALIDATOR",
            ScoringError::ValidatorPanic { .. } => "VALIDATOR_PANIC",
            ScoringError::Worker(_) => "WORKER_FAILED",
        }
    }
}

/// Per-task running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskAccumulator {
    /// Records processed
    pub total: usize,
    /// Feasible answers
    pub valid: usize,
    /// Sum of approximation ratios over feasible answers
    pub ar_accum: f64,
}

impl TaskAccumulator {
    /// Count a feasible answer with its ratio.
    pub fn record_valid(&mut self, ratio: f64) {
        self.total += 1;
        self.valid += 1;
        self.ar_accum += ratio;
    }

    /// Count a rejected or faulted answer.
    pub fn record_invalid(&mut self) {
        self.total += 1;
    }

    /// Fold another accumulator for the same task into this one.
    pub fn merge(&mut self, other: &TaskAccumulator) {
        self.total += other.total;
        self.valid += other.valid;
        self.ar_accum += other.ar_accum;
    }

    /// Final rates; zero-count tasks report zeros.
    pub fn statistics(&self) -> TaskStatistics {
        if self.total == 0 {
            return TaskStatistics::default();
        }
        let total = self.total as f64;
        TaskStatistics {
            sr: self.valid as f64 / total,
            ar: self.ar_accum / total,
            count: self.total,
        }
    }
}

/// Success rate, approximation rate and record count of one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatistics {
    /// Success rate
    #[serde(rename = "SR")]
    pub sr: f64,
    /// Approximation rate
    #[serde(rename = "AR")]
    pub ar: f64,
    /// Records processed
    pub count: usize,
}

/// Per-task statistics in reporting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskResults(IndexMap<NpTask, TaskStatistics>);

impl SubtaskResults {
    /// Statistics of one task.
    pub fn get(&self, task: NpTask) -> Option<&TaskStatistics> {
        self.0.get(&task)
    }

    /// Statistics by canonical task name.
    pub fn get_by_name(&self, name: &str) -> Option<&TaskStatistics> {
        NpTask::from_name(name).and_then(|task| self.get(task))
    }

    /// Iterate tasks in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (NpTask, &TaskStatistics)> {
        self.0.iter().map(|(task, stats)| (*task, stats))
    }
}

/// Outcome of scoring one record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Task not handled by this engine
    Skipped,
    /// Validator produced a verdict
    Scored {
        /// Task of the record
        task: NpTask,
        /// The verdict
        verdict: Verdict,
        /// Approximation ratio contributed (zero when infeasible)
        ratio: f64,
    },
    /// Processing failed; counted as invalid
    Faulted {
        /// Task of the record
        task: NpTask,
        /// What went wrong
        error: ScoringError,
    },
}

/// Accumulated state of an evaluation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    tasks: HashMap<NpTask, TaskAccumulator>,
    /// Records with unhandled tasks
    pub skipped: usize,
    /// Records counted invalid because of a fault
    pub faulted: usize,
}

impl ScoreBoard {
    /// Create an empty score board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one record outcome.
    pub fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::Scored { task, verdict, ratio } => {
                let acc = self.tasks.entry(*task).or_default();
                if verdict.is_feasible() {
                    acc.record_valid(*ratio);
                } else {
                    acc.record_invalid();
                }
            }
            RecordOutcome::Faulted { task, .. } => {
                self.faulted += 1;
                self.tasks.entry(*task).or_default().record_invalid();
            }
        }
    }

    /// Fold another score board into this one.
    pub fn merge(&mut self, other: &ScoreBoard) {
        for (task, acc) in &other.tasks {
            self.tasks.entry(*task).or_default().merge(acc);
        }
        self.skipped += other.skipped;
        self.faulted += other.faulted;
    }

    /// Accumulator of one task.
    pub fn accumulator(&self, task: NpTask) -> TaskAccumulator {
        self.tasks.get(&task).copied().unwrap_or_default()
    }

    /// Records counted towards any task.
    pub fn processed(&self) -> usize {
        self.tasks.values().map(|acc| acc.total).sum()
    }

    /// Final per-task statistics for every handled task.
    pub fn subtask_results(&self) -> SubtaskResults {
        SubtaskResults(
            NpTask::ALL
                .into_iter()
                .map(|task| (task, self.accumulator(task).statistics()))
                .collect(),
        )
    }
}

/// The main scoring engine
#[derive(Clone)]
pub struct ScoringEngine {
    config: ScoringEngineConfig,
    validators: HashMap<NpTask, Arc<dyn ProblemValidator>>,
}

impl ScoringEngine {
    /// Create a new scoring engine with the built-in validators
    pub fn new(config: ScoringEngineConfig) -> Self {
        let mut engine = Self {
            config,
            validators: HashMap::new(),
        };
        engine.register_default_validators();
        engine
    }

    fn register_default_validators(&mut self) {
        for validator in all_validators() {
            self.register_validator(validator);
        }
    }

    /// Register a validator, replacing any existing one for its task
    pub fn register_validator(&mut self, validator: Arc<dyn ProblemValidator>) {
        self.validators.insert(validator.task(), validator);
    }

    /// Get the validator for a task
    pub fn get_validator(&self, task: NpTask) -> Option<Arc<dyn ProblemValidator>> {
        self.validators.get(&task).cloned()
    }

    /// Engine configuration
    pub fn config(&self) -> &ScoringEngineConfig {
        &self.config
    }

    /// Validate one answer, containing any validator panic.
    pub fn validate(
        &self,
        task: NpTask,
        graph: &Graph,
        answer: &str,
    ) -> Result<Verdict, ScoringError> {
        let validator = self
            .get_validator(task)
            .ok_or(ScoringError::NoValidator(task))?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            validator.validate(graph, answer, &self.config.validator)
        }))
        .map_err(|payload| ScoringError::ValidatorPanic {
            task,
            message: panic_message(payload.as_ref()),
        })?;

        Ok(result?)
    }

    fn check_record(
        &self,
        task: NpTask,
        record: &EvaluationRecord,
    ) -> Result<(Verdict, f64), ScoringError> {
        let prediction = record.prediction()?;
        let ground_truth = record.ground_truth()?;
        let graph = record.graph()?;
        let verdict = self.validate(task, &graph, prediction)?;
        Ok((verdict, ground_truth))
    }

    /// Score a single record.
    pub fn score_record(&self, record: &EvaluationRecord) -> RecordOutcome {
        let Some(task) = record.task() else {
            debug!(task = %record.task_label(), "Skipping record with unhandled task");
            return RecordOutcome::Skipped;
        };

        match self.check_record(task, record) {
            Ok((verdict, ground_truth)) => {
                let ratio = match &verdict {
                    Verdict::Feasible { objective, .. } => task
                        .direction()
                        .ratio(*objective, ground_truth)
                        .unwrap_or_else(|| {
                            warn!(
                                record = %record.label(),
                                task = %task,
                                objective,
                                ground_truth,
                                "Degenerate approximation ratio, contributing 0"
                            );
                            0.0
                        }),
                    Verdict::Infeasible { .. } => 0.0,
                };
                debug!(
                    record = %record.label(),
                    task = %task,
                    feasible = verdict.is_feasible(),
                    value = verdict.objective_value(),
                    ratio,
                    message = verdict.message(),
                    "Scored record"
                );
                RecordOutcome::Scored {
                    task,
                    verdict,
                    ratio,
                }
            }
            Err(error) => {
                warn!(
                    record = %record.label(),
                    task = %task,
                    code = error.error_code(),
                    error = %error,
                    "Validation error, counting record as invalid"
                );
                RecordOutcome::Faulted { task, error }
            }
        }
    }

    /// Score records sequentially into a score board.
    pub fn tally(&self, records: &[EvaluationRecord]) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        for record in records {
            board.record(&self.score_record(record));
        }
        board
    }

    /// Build the final report from accumulated state.
    pub fn report(&self, board: &ScoreBoard) -> EvaluationReport {
        let subtasks = board.subtask_results();
        let groups = GroupReporter::new(&self.config.groups).report(&subtasks);
        EvaluationReport::new(subtasks, groups, board)
    }

    /// Evaluate a batch sequentially, in input order.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn evaluate(&self, records: &[EvaluationRecord]) -> EvaluationReport {
        info!("Starting evaluation of {} records", records.len());
        let board = self.tally(records);
        self.finish(&board)
    }

    /// Evaluate a batch on blocking worker threads.
    ///
    /// Records are split into contiguous chunks, one per worker, and the
    /// per-chunk score boards merged in order afterwards.
    #[instrument(skip(self, records), fields(records = records.len(), workers = self.config.workers))]
    pub async fn evaluate_concurrent(
        &self,
        records: Vec<EvaluationRecord>,
    ) -> Result<EvaluationReport, ScoringError> {
        let workers = self.config.workers.max(1);
        info!(
            "Starting concurrent evaluation of {} records on {} workers",
            records.len(),
            workers
        );

        if workers == 1 || records.len() < 2 {
            let engine = self.clone();
            let board = tokio::task::spawn_blocking(move || engine.tally(&records))
                .await
                .map_err(|e| ScoringError::Worker(e.to_string()))?;
            return Ok(self.finish(&board));
        }

        let chunk_size = records.len().div_ceil(workers);
        let mut chunks: Vec<Vec<EvaluationRecord>> = Vec::with_capacity(workers);
        let mut remaining = records.into_iter().peekable();
        while remaining.peek().is_some() {
            chunks.push(remaining.by_ref().take(chunk_size).collect());
        }

        let handles = chunks.into_iter().map(|chunk| {
            let engine = self.clone();
            tokio::task::spawn_blocking(move || engine.tally(&chunk))
        });

        let boards = futures::future::try_join_all(handles)
            .await
            .map_err(|e| ScoringError::Worker(e.to_string()))?;

        let mut board = ScoreBoard::new();
        for partial in &boards {
            board.merge(partial);
        }

        Ok(self.finish(&board))
    }

    fn finish(&self, board: &ScoreBoard) -> EvaluationReport {
        let report = self.report(board);
        info!(
            processed = board.processed(),
            skipped = board.skipped,
            faulted = board.faulted,
            "Evaluation complete"
        );
        report
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringEngineConfig::default())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Builder for ScoringEngine
pub struct ScoringEngineBuilder {
    config: ScoringEngineConfig,
    custom_validators: Vec<Arc<dyn ProblemValidator>>,
}

impl ScoringEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: ScoringEngineConfig::default(),
            custom_validators: Vec::new(),
        }
    }

    pub fn config(mut self, config: ScoringEngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn fallback_penalty(mut self, penalty: f64) -> Self {
        self.config.validator.fallback_penalty = penalty;
        self
    }

    pub fn groups(mut self, groups: TaskGroups) -> Self {
        self.config.groups = groups;
        self
    }

    pub fn validator(mut self, validator: Arc<dyn ProblemValidator>) -> Self {
        self.custom_validators.push(validator);
        self
    }

    pub fn build(self) -> ScoringEngine {
        let mut engine = ScoringEngine::new(self.config);

        // Custom validators replace the built-in ones for their task
        for validator in self.custom_validators {
            engine.register_validator(validator);
        }

        engine
    }
}

impl Default for ScoringEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
