//! End-to-end evaluation of exported artifacts
//!
//! Tests cover:
//! - Deserializing the JSON layout written by the export tooling
//! - Column dispatch with one-hot and numeric sub-pipelines
//! - Gradient boosted regressors with missing value routing
//! - Multi-target outputs

use autoprice_estimator::{Cell, EstimatorError, Frame, NodeKind, TrainedModel};
use serde_json::json;

fn boosted_artifact() -> serde_json::Value {
    json!({
        "format_version": 1,
        "trained_with": "0.1.0",
        "requires": ["pipeline", "column_transformer", "gradient_boosting"],
        "model": {
            "kind": "pipeline",
            "steps": [
                {
                    "name": "preprocess",
                    "estimator": {
                        "kind": "column_transformer",
                        "transformers": [
                            {
                                "name": "cat",
                                "columns": ["fueltype", "carbody"],
                                "estimator": {
                                    "kind": "one_hot_encoder",
                                    "categories": [["diesel", "gas"], ["hatchback", "sedan", "wagon"]],
                                    "handle_unknown": "ignore"
                                }
                            },
                            {
                                "name": "num",
                                "columns": ["enginesize", "horsepower"],
                                "estimator": { "kind": "passthrough" }
                            }
                        ],
                        "remainder": "drop"
                    }
                },
                {
                    "name": "regressor",
                    "estimator": {
                        "kind": "gradient_boosting",
                        "base_score": 13000.0,
                        "learning_rate": 0.5,
                        "n_features": 7,
                        "trees": [
                            {
                                "nodes": [
                                    { "feature_idx": 5, "threshold": 150.0, "left": 1, "right": 2, "default_left": true },
                                    { "feature_idx": -1, "left": -1, "right": -1, "leaf": -2000.0 },
                                    { "feature_idx": -1, "left": -1, "right": -1, "leaf": 8000.0 }
                                ]
                            },
                            {
                                "nodes": [
                                    { "feature_idx": 0, "threshold": 0.5, "left": 1, "right": 2 },
                                    { "feature_idx": -1, "left": -1, "right": -1, "leaf": 0.0 },
                                    { "feature_idx": -1, "left": -1, "right": -1, "leaf": 1000.0 }
                                ],
                                "weight": 2.0
                            }
                        ]
                    }
                }
            ]
        }
    })
}

fn row(fuel: &str, body: &str, size: Cell, hp: Cell) -> Frame {
    let mut frame = Frame::new(["fueltype", "carbody", "enginesize", "horsepower", "citympg"]);
    frame
        .push_row(vec![Cell::from(fuel), Cell::from(body), size, hp, Cell::from(30.0)])
        .unwrap();
    frame
}

#[test]
fn test_boosted_pipeline_from_json() {
    let model: TrainedModel = serde_json::from_value(boosted_artifact()).unwrap();
    model.validate().unwrap();
    assert_eq!(model.model.kind(), NodeKind::Sequential);

    // small gas sedan: tree0 -> -2000, tree1 -> 0
    let out = model
        .predict(&row("gas", "sedan", Cell::from(97.0), Cell::from(69.0)))
        .unwrap();
    assert_eq!(out.flatten(), vec![12000.0]);

    // large diesel: tree0 -> 8000, tree1 -> 1000 * 2
    let out = model
        .predict(&row("diesel", "wagon", Cell::from(183.0), Cell::from(123.0)))
        .unwrap();
    assert_eq!(out.flatten(), vec![18000.0]);
}

#[test]
fn test_boosted_pipeline_routes_missing() {
    let model: TrainedModel = serde_json::from_value(boosted_artifact()).unwrap();
    let out = model
        .predict(&row("gas", "sedan", Cell::Missing, Cell::Missing))
        .unwrap();
    assert_eq!(out.flatten(), vec![12000.0]);
}

#[test]
fn test_ignored_unknown_category() {
    let model: TrainedModel = serde_json::from_value(boosted_artifact()).unwrap();
    // "electric" encodes as all zeros, so tree1 sees diesel == 0
    let out = model
        .predict(&row("electric", "convertible", Cell::from(97.0), Cell::from(69.0)))
        .unwrap();
    assert_eq!(out.flatten(), vec![12000.0]);
}

#[test]
fn test_missing_input_column() {
    let model: TrainedModel = serde_json::from_value(boosted_artifact()).unwrap();
    let mut frame = Frame::new(["fueltype", "carbody", "enginesize"]);
    frame
        .push_row(vec![Cell::from("gas"), Cell::from("sedan"), Cell::from(97.0)])
        .unwrap();
    let err = model.predict(&frame).unwrap_err();
    assert!(matches!(err, EstimatorError::MissingColumn(c) if c == "horsepower"));
}

#[test]
fn test_multi_target_output_shape() {
    let model: TrainedModel = serde_json::from_value(json!({
        "format_version": 1,
        "model": {
            "kind": "linear_regression",
            "coefficients": [[1.0, 0.0], [0.0, 1.0]],
            "intercept": [0.0, 0.0]
        }
    }))
    .unwrap();

    let mut frame = Frame::new(["a", "b"]);
    frame.push_row(vec![Cell::from(1.0), Cell::from(2.0)]).unwrap();
    frame.push_row(vec![Cell::from(3.0), Cell::from(4.0)]).unwrap();

    let out = model.predict(&frame).unwrap();
    assert_eq!(out.shape, vec![2, 2]);
    assert_eq!(out.flatten(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_invalid_tree_rejected() {
    let mut artifact = boosted_artifact();
    artifact["model"]["steps"][1]["estimator"]["trees"][0]["nodes"][0]["left"] = json!(7);
    let model: TrainedModel = serde_json::from_value(artifact).unwrap();
    assert!(matches!(
        model.validate(),
        Err(EstimatorError::InvalidModel(_))
    ));
}
