//! Fluent builder for evaluation records.

use npmm_domain::{EvaluationRecord, NpTask};
use serde_json::{json, Value};

/// Prefix used for task labels built from an [`NpTask`]
pub const TEST_LABEL_PREFIX: &str = "npmm";

/// Builder for creating EvaluationRecord test instances
#[derive(Clone)]
pub struct RecordBuilder {
    index: Value,
    task: String,
    prediction: Value,
    ground_truth: Value,
    question: Value,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            index: Value::Null,
            task: format!("{}-{}", TEST_LABEL_PREFIX, NpTask::GraphColoring.name()),
            prediction: json!("Answer: [1, 2]"),
            ground_truth: json!(2),
            question: json!({"0": ["1"], "1": ["0"]}),
        }
    }

    pub fn with_index(mut self, index: impl Into<Value>) -> Self {
        self.index = index.into();
        self
    }

    /// Label the record `npmm-<TaskName>`.
    pub fn with_task(mut self, task: NpTask) -> Self {
        self.task = format!("{}-{}", TEST_LABEL_PREFIX, task.name());
        self
    }

    /// Use a raw task label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.task = label.into();
        self
    }

    pub fn with_prediction(mut self, prediction: impl Into<String>) -> Self {
        self.prediction = Value::String(prediction.into());
        self
    }

    /// Prediction of the form `Answer: <answer>`.
    pub fn with_answer(self, answer: &str) -> Self {
        self.with_prediction(format!("Answer: {}", answer))
    }

    pub fn without_prediction(mut self) -> Self {
        self.prediction = Value::Null;
        self
    }

    pub fn with_ground_truth(mut self, ground_truth: f64) -> Self {
        self.ground_truth = json!(ground_truth);
        self
    }

    /// Ground truth as an arbitrary JSON value (e.g. a numeric string).
    pub fn with_raw_ground_truth(mut self, ground_truth: Value) -> Self {
        self.ground_truth = ground_truth;
        self
    }

    pub fn with_question(mut self, question: Value) -> Self {
        self.question = question;
        self
    }

    /// The record as it would appear in an input file.
    pub fn build_json(&self) -> Value {
        let mut record = json!({
            "task": self.task,
            "prediction": self.prediction,
            "reward_model": {"ground_truth": {"ground_truth": self.ground_truth}},
            "question": self.question,
        });
        if !self.index.is_null() {
            record["index"] = self.index.clone();
        }
        record
    }

    pub fn build(self) -> EvaluationRecord {
        EvaluationRecord {
            index: self.index,
            task: Value::String(self.task),
            prediction: self.prediction,
            reward_model: json!({"ground_truth": {"ground_truth": self.ground_truth}}),
            question: self.question,
        }
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
