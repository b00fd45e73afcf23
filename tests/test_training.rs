//! Integration test: Regression tree, metrics and hold-out split

use ndarray::{array, Array1, Array2};
use rent_estimator::error::RentError;
use rent_estimator::training::{
    train_test_split, RegressionMetrics, RentRegressor, TrainingConfig, TreeConfig, TreeNode,
};
use std::io::Write;

fn regression_data(n: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((n, 3), |(i, j)| match j {
        0 => i as f64,
        1 => (i % 7) as f64,
        _ => ((i * 13) % 5) as f64,
    });
    let y = Array1::from_shape_fn(n, |i| 3.0 * i as f64 + 2.0 * (i % 7) as f64);
    (x, y)
}

fn leaf_sizes(node: &TreeNode, out: &mut Vec<usize>) {
    match node {
        TreeNode::Leaf { n_samples, .. } => out.push(*n_samples),
        TreeNode::Split { left, right, n_samples, .. } => {
            let before = out.len();
            leaf_sizes(left, out);
            leaf_sizes(right, out);
            assert_eq!(out[before..].iter().sum::<usize>(), *n_samples);
        }
    }
}

#[test]
fn test_default_tree_respects_bounds() {
    let (x, y) = regression_data(200);
    let mut tree = RentRegressor::default();
    tree.fit(&x, &y).unwrap();

    assert!(tree.depth() <= 11, "depth {}", tree.depth());

    let mut sizes = Vec::new();
    leaf_sizes(tree.root().unwrap(), &mut sizes);
    assert!(sizes.iter().all(|&s| s >= 14), "leaf sizes {:?}", sizes);
    assert_eq!(sizes.len(), tree.n_leaves());
    assert_eq!(sizes.iter().sum::<usize>(), 200);
}

#[test]
fn test_tree_predictions_are_leaf_means() {
    let (x, y) = regression_data(120);
    let mut tree = RentRegressor::default();
    tree.fit(&x, &y).unwrap();

    let predictions = tree.predict(&x).unwrap();
    let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(predictions.iter().all(|&p| p >= min && p <= max));

    let metrics = RegressionMetrics::compute(&y, &predictions).unwrap();
    assert!(metrics.r_squared > 0.9, "r² {}", metrics.r_squared);
}

#[test]
fn test_same_seed_same_tree() {
    let (x, y) = regression_data(150);

    let mut a = RentRegressor::new(TreeConfig::new().with_random_state(3));
    let mut b = RentRegressor::new(TreeConfig::new().with_random_state(3));
    a.fit(&x, &y).unwrap();
    b.fit(&x, &y).unwrap();

    assert_eq!(a.root(), b.root());
    assert_eq!(a.feature_importances(), b.feature_importances());
}

#[test]
fn test_refit_replaces_structure() {
    let (x, y) = regression_data(100);
    let mut tree = RentRegressor::new(TreeConfig::new().with_min_samples_split(2).with_min_samples_leaf(1));
    tree.fit(&x, &y).unwrap();
    let leaves = tree.n_leaves();

    tree.fit(&x, &Array1::from_elem(100, 5.0)).unwrap();
    assert!(leaves > 1);
    assert_eq!(tree.n_leaves(), 1);
}

#[test]
fn test_invalid_hyperparameters_rejected() {
    let (x, y) = regression_data(30);
    let mut tree = RentRegressor::new(TreeConfig::new().with_min_samples_split(1));
    assert!(matches!(tree.fit(&x, &y), Err(RentError::InvalidParameter { .. })));
    assert!(!tree.is_fitted());
}

#[test]
fn test_metrics_worked_example() {
    let actual = array![100.0, 200.0, 400.0];
    let predicted = array![100.0, 200.0, 300.0];

    let metrics = RegressionMetrics::compute(&actual, &predicted).unwrap();
    assert!((metrics.rmse - 57.735).abs() < 1e-3, "rmse {}", metrics.rmse);
    assert!((metrics.r_squared - (1.0 - 10000.0 / 46666.666_666_666_67)).abs() < 1e-9);
    assert!((metrics.r_squared - 0.7857).abs() < 1e-4);
    assert!((metrics.mae - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_split_is_reproducible_and_disjoint() {
    let a = train_test_split(1000, 0.2, 42).unwrap();
    let b = train_test_split(1000, 0.2, 42).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.test_indices.len(), 200);
    assert!(a.test_indices.iter().all(|i| !a.train_indices.contains(i)));
}

#[test]
fn test_training_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{"test_size": 0.3, "random_state": 7, "tree": {{"max_depth": null, "min_samples_leaf": 5}}, "encoder": {{"unknown_policy": "Error"}}}}"#
    )
    .unwrap();

    let config = TrainingConfig::from_file(&path).unwrap();
    assert_eq!(config.test_size, 0.3);
    assert_eq!(config.random_state, 7);
    assert_eq!(config.tree.max_depth, None);
    assert_eq!(config.tree.min_samples_leaf, 5);
    assert_eq!(config.tree.min_samples_split, 20);
    assert_eq!(config.encoder.numeric_fields.len(), 3);
}

#[test]
fn test_training_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        TrainingConfig::from_file(dir.path().join("missing.json")),
        Err(RentError::ConfigError(_))
    ));

    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"test_size": 1.5}"#).unwrap();
    assert!(matches!(
        TrainingConfig::from_file(&path),
        Err(RentError::InvalidParameter { .. })
    ));
}
