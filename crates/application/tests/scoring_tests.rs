//! Tests for batch scoring and aggregation
//!
//! Covers the per-record loop, fault handling, group rollup and the
//! concurrent evaluator.

use npmm_application::{ScoringEngine, ScoringEngineBuilder, OVERALL_ROW};
use npmm_domain::{EvaluationRecord, NpTask, TaskGroups};
use npmm_testing::*;
use serde_json::json;

fn coloring(answer: &str) -> EvaluationRecord {
    RecordBuilder::new().with_answer(answer).build()
}

fn tsp(answer: &str, ground_truth: f64) -> EvaluationRecord {
    RecordBuilder::new()
        .with_task(NpTask::Tsp)
        .with_answer(answer)
        .with_ground_truth(ground_truth)
        .with_question(tsp_triangle_json())
        .build()
}

fn cut(answer: &str, ground_truth: f64) -> EvaluationRecord {
    RecordBuilder::new()
        .with_task(NpTask::MinimumCut)
        .with_answer(answer)
        .with_ground_truth(ground_truth)
        .with_question(weighted_square_json())
        .build()
}

fn clique(answer: &str, ground_truth: f64) -> EvaluationRecord {
    RecordBuilder::new()
        .with_task(NpTask::MaximumClique)
        .with_answer(answer)
        .with_ground_truth(ground_truth)
        .with_question(triangle_json())
        .build()
}

fn mixed_batch() -> Vec<EvaluationRecord> {
    let mut records = Vec::new();
    for i in 0..5 {
        records.push(RecordBuilder::new().with_index(i).with_answer("[1, 2]").build());
        records.push(coloring("[1, 1]"));
        records.push(tsp("0->1->2->0", 7.0));
        records.push(tsp("0->2->1->0", 7.0));
        records.push(cut("[[0, 1], [2, 3]]", 4.0));
        records.push(clique("[0, 1]", 3.0));
        records.push(
            RecordBuilder::new()
                .with_label("npmm-knapsack")
                .build(),
        );
    }
    records
}

// ============================================================================
// Per-task statistics
// ============================================================================

#[test]
fn test_per_task_statistics() {
    let report = ScoringEngine::default().evaluate(&mixed_batch());

    let gcp = report.subtasks.get(NpTask::GraphColoring).unwrap();
    assert_eq!(gcp.count, 10);
    assert_eq!(gcp.sr, 0.5);
    assert_eq!(gcp.ar, 0.5);

    // Both directions of the triangle tour cost 7
    let tsp = report.subtasks.get(NpTask::Tsp).unwrap();
    assert_eq!(tsp.sr, 1.0);
    assert_eq!(tsp.ar, 1.0);

    // Cut weight 6 against optimum 4
    let cut = report.subtasks.get(NpTask::MinimumCut).unwrap();
    assert_eq!(cut.sr, 1.0);
    assert!((cut.ar - 4.0 / 6.0).abs() < 1e-12);

    let clique = report.subtasks.get(NpTask::MaximumClique).unwrap();
    assert!((clique.ar - 2.0 / 3.0).abs() < 1e-12);

    let hamiltonian = report.subtasks.get(NpTask::HamiltonianCycle).unwrap();
    assert_eq!(hamiltonian.count, 0);
    assert_eq!(hamiltonian.sr, 0.0);
    assert_eq!(hamiltonian.ar, 0.0);

    assert_eq!(report.summary.processed, 30);
    assert_eq!(report.summary.skipped, 5);
    assert_eq!(report.summary.faulted, 0);
}

#[test]
fn test_subtasks_reported_in_fixed_order() {
    let report = ScoringEngine::default().evaluate(&[]);
    let names: Vec<&str> = report.subtasks.iter().map(|(task, _)| task.name()).collect();
    assert_eq!(
        names,
        vec![
            "NpTsp",
            "NpHamiltonianCycle",
            "NpMaximumCliqueProblem",
            "NpMinimumCut",
            "NpMaximumSet",
            "NpGcpD"
        ]
    );
    assert!(report.groups.is_empty());
}

#[test]
fn test_group_rollup() {
    let report = ScoringEngine::default().evaluate(&mixed_batch());
    let names: Vec<&str> = report.groups.rows().iter().map(|r| r.task.as_str()).collect();
    assert_eq!(names, vec!["planning", "graph", "partition", OVERALL_ROW]);

    let planning = &report.groups.rows()[0];
    assert_eq!(planning.num_subtasks, 1);
    assert_eq!(planning.sr, 1.0);

    let graph = &report.groups.rows()[1];
    assert_eq!(graph.num_subtasks, 2);
    assert_eq!(graph.sr, 0.75);

    let overall = report.groups.overall().unwrap();
    assert_eq!(overall.num_subtasks, 3);
    assert!((overall.sr - (1.0 + 0.75 + 1.0) / 3.0).abs() < 1e-12);
}

#[test]
fn test_custom_groups() {
    let engine = ScoringEngineBuilder::new()
        .groups(TaskGroups::new([("everything", NpTask::ALL.map(|t| t.name()).to_vec())]))
        .build();
    let report = engine.evaluate(&mixed_batch());

    assert_eq!(report.groups.rows().len(), 2);
    assert_eq!(report.groups.rows()[0].task, "everything");
    assert_eq!(report.groups.rows()[0].num_subtasks, 4);
}

// ============================================================================
// Faults and degenerate input
// ============================================================================

#[test]
fn test_faults_count_as_invalid() {
    let records = vec![
        coloring("[1, 2]"),
        RecordBuilder::new().without_prediction().build(),
        RecordBuilder::new()
            .with_raw_ground_truth(json!("unknown"))
            .build(),
        RecordBuilder::new()
            .with_question(json!({"zero": ["1"]}))
            .build(),
    ];

    let report = ScoringEngine::default().evaluate(&records);
    let gcp = report.subtasks.get(NpTask::GraphColoring).unwrap();
    assert_eq!(gcp.count, 4);
    assert_eq!(gcp.sr, 0.25);
    assert_eq!(report.summary.faulted, 3);
}

#[test]
fn test_minimum_cut_on_adjacency_list_is_invalid() {
    let record = RecordBuilder::new()
        .with_task(NpTask::MinimumCut)
        .with_answer("[[0, 3], [1, 2]]")
        .with_ground_truth(2.0)
        .with_question(json!({"0": [1, 2], "1": [0, 3], "2": [0, 3], "3": [1, 2]}))
        .build();

    let report = ScoringEngine::default().evaluate(&[record]);
    let stats = report.subtasks.get(NpTask::MinimumCut).unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.sr, 0.0);
    assert_eq!(stats.ar, 0.0);
    assert_eq!(report.summary.faulted, 1);
}

#[test]
fn test_unlabelled_records_are_skipped() {
    let records = vec![
        RecordBuilder::new().with_label("NpGcpD").build(),
        RecordBuilder::new().with_label("npmm-NpUnknown").build(),
        RecordBuilder::new().with_label("").build(),
    ];

    let report = ScoringEngine::default().evaluate(&records);
    assert_eq!(report.summary.skipped, 3);
    assert_eq!(report.summary.processed, 0);
}

#[test]
fn test_label_suffix_is_ignored() {
    let record = RecordBuilder::new().with_label("npmm-NpGcpD-hard").build();
    let report = ScoringEngine::default().evaluate(&[record]);
    assert_eq!(report.subtasks.get(NpTask::GraphColoring).unwrap().count, 1);
}

#[test]
fn test_zero_ground_truth_contributes_nothing() {
    let report = ScoringEngine::default().evaluate(&[tsp("0->1->2->0", 0.0)]);
    let stats = report.subtasks.get(NpTask::Tsp).unwrap();
    assert_eq!(stats.sr, 1.0);
    assert_eq!(stats.ar, 0.0);
}

#[test]
fn test_numeric_string_ground_truth() {
    let record = RecordBuilder::new()
        .with_raw_ground_truth(json!("2"))
        .build();
    let report = ScoringEngine::default().evaluate(&[record]);
    assert_eq!(report.subtasks.get(NpTask::GraphColoring).unwrap().ar, 1.0);
}

#[test]
fn test_fallback_penalty_is_configurable() {
    let engine = ScoringEngineBuilder::new().fallback_penalty(50.0).build();
    let graph = npmm_domain::Graph::from_json(r#"{"0": {"1": 0}, "1": {"0": 0}}"#).unwrap();
    let verdict = engine
        .validate(NpTask::MinimumCut, &graph, "Answer: [[0, 1], []]")
        .unwrap();
    assert!(verdict.is_invalid());
    assert_eq!(verdict.objective_value(), 50.0);
}

// ============================================================================
// Idempotence and concurrency
// ============================================================================

#[test]
fn test_evaluation_is_idempotent() {
    let engine = ScoringEngine::default();
    let records = mixed_batch();
    assert_eq!(engine.evaluate(&records), engine.evaluate(&records));
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let records = mixed_batch();
    let sequential = ScoringEngine::default().evaluate(&records);

    for workers in [1, 2, 3, 8, 64] {
        let engine = ScoringEngineBuilder::new().workers(workers).build();
        let concurrent = engine.evaluate_concurrent(records.clone()).await.unwrap();

        assert_eq!(concurrent.summary, sequential.summary);
        for (task, expected) in sequential.subtasks.iter() {
            let actual = concurrent.subtasks.get(task).unwrap();
            assert_eq!(actual.count, expected.count, "{}", task);
            assert_eq!(actual.sr, expected.sr, "{}", task);
            assert!((actual.ar - expected.ar).abs() < 1e-9, "{}", task);
        }
        assert_eq!(concurrent.groups.rows().len(), sequential.groups.rows().len());
    }
}

#[tokio::test]
async fn test_concurrent_empty_batch() {
    let engine = ScoringEngineBuilder::new().workers(4).build();
    let report = engine.evaluate_concurrent(Vec::new()).await.unwrap();
    assert_eq!(report.summary.processed, 0);
    assert!(report.groups.is_empty());
}
