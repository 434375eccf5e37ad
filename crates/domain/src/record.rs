//! Evaluation records as produced by the surrounding harness.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{json_kind, GraphError, RecordError};
use crate::graph::Graph;
use crate::task::NpTask;

/// One model answer to one problem instance.
///
/// Fields are kept loosely typed so that a single malformed record can be
/// reported as a fault instead of failing the whole batch at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Optional row identifier carried through for logging
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub index: Value,

    /// Task label, `<prefix>-<ProblemName>`; non-string labels are unhandled
    #[serde(default)]
    pub task: Value,

    /// Raw model answer
    #[serde(default)]
    pub prediction: Value,

    /// Holds `ground_truth.ground_truth`
    #[serde(default)]
    pub reward_model: Value,

    /// The problem instance graph
    #[serde(default)]
    pub question: Value,
}

impl EvaluationRecord {
    /// Task this record belongs to, if it is a handled one.
    pub fn task(&self) -> Option<NpTask> {
        self.task.as_str().and_then(NpTask::from_label)
    }

    /// The task label as written, for log lines.
    pub fn task_label(&self) -> String {
        match &self.task {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The prediction text.
    pub fn prediction(&self) -> Result<&str, RecordError> {
        match &self.prediction {
            Value::String(text) => Ok(text),
            Value::Null => Err(RecordError::MissingPrediction),
            other => Err(RecordError::InvalidPrediction(json_kind(other))),
        }
    }

    /// The numeric ground-truth objective.
    ///
    /// Accepts a number or a numeric string; a string-encoded reward model
    /// is decoded first.
    pub fn ground_truth(&self) -> Result<f64, RecordError> {
        let decoded;
        let reward_model = match &self.reward_model {
            Value::String(encoded) => {
                decoded = serde_json::from_str::<Value>(encoded)
                    .map_err(|e| RecordError::InvalidGroundTruth(e.to_string()))?;
                &decoded
            }
            other => other,
        };

        match reward_model.pointer("/ground_truth/ground_truth") {
            None | Some(Value::Null) => Err(RecordError::MissingGroundTruth),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| RecordError::InvalidGroundTruth(n.to_string())),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| RecordError::InvalidGroundTruth(s.clone())),
            Some(other) => Err(RecordError::InvalidGroundTruth(other.to_string())),
        }
    }

    /// The normalized problem graph.
    pub fn graph(&self) -> Result<Graph, GraphError> {
        Graph::from_value(&self.question)
    }

    /// Short identifier for log lines: the index if present, else the task.
    pub fn label(&self) -> String {
        match &self.index {
            Value::Null => self.task_label(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> EvaluationRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record() {
        let rec = record(json!({
            "index": 7,
            "task": "npmm-NpGcpD",
            "prediction": "Answer: [1,2]",
            "reward_model": {"ground_truth": {"ground_truth": 2}},
            "question": {"0": ["1"], "1": ["0"]},
            "extra": "ignored"
        }));
        assert_eq!(rec.task(), Some(NpTask::GraphColoring));
        assert_eq!(rec.prediction().unwrap(), "Answer: [1,2]");
        assert_eq!(rec.ground_truth().unwrap(), 2.0);
        assert_eq!(rec.graph().unwrap().vertex_count(), 2);
        assert_eq!(rec.label(), "7");
    }

    #[test]
    fn test_ground_truth_variants() {
        let rec = record(json!({"reward_model": {"ground_truth": {"ground_truth": " 4.5 "}}}));
        assert_eq!(rec.ground_truth().unwrap(), 4.5);

        let rec = record(json!({"reward_model": "{\"ground_truth\": {\"ground_truth\": 3}}"}));
        assert_eq!(rec.ground_truth().unwrap(), 3.0);

        let rec = record(json!({"reward_model": {}}));
        assert_eq!(rec.ground_truth(), Err(RecordError::MissingGroundTruth));

        let rec = record(json!({"reward_model": {"ground_truth": {"ground_truth": "abc"}}}));
        assert!(matches!(
            rec.ground_truth(),
            Err(RecordError::InvalidGroundTruth(_))
        ));
    }

    #[test]
    fn test_missing_fields_default() {
        let rec = record(json!({}));
        assert_eq!(rec.task(), None);
        assert_eq!(rec.prediction(), Err(RecordError::MissingPrediction));
        assert_eq!(rec.graph(), Err(GraphError::Missing));
        assert_eq!(rec.label(), "");
    }

    #[test]
    fn test_non_string_task_is_unhandled() {
        for task in [json!(null), json!(7), json!(["npmm-NpGcpD"])] {
            let rec = record(json!({"task": task.clone(), "prediction": "Answer: [1]"}));
            assert_eq!(rec.task(), None, "{}", task);
        }
        let rec = record(json!({"task": 7}));
        assert_eq!(rec.label(), "7");
        assert_eq!(record(json!({"task": null})).label(), "");
    }

    #[test]
    fn test_non_string_prediction() {
        let rec = record(json!({"prediction": 5}));
        assert_eq!(rec.prediction(), Err(RecordError::InvalidPrediction("number")));
    }
}
