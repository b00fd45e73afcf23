//! End-to-end prediction pipeline: feature encoding followed by the regression tree

use crate::error::{RentError, Result};
use crate::preprocessing::{EncoderConfig, FeatureEncoder};
use crate::record::{unzip_examples, validate_rent, PropertyRecord, TrainingExample};
use crate::training::{train_test_split, RegressionMetrics, RentRegressor, TrainingConfig, TreeConfig};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Fitted encoder and regressor, fitted and applied as one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPipeline {
    encoder: FeatureEncoder,
    regressor: RentRegressor,
    is_fitted: bool,
}

impl Default for PredictionPipeline {
    fn default() -> Self {
        Self::new(EncoderConfig::default(), TreeConfig::default())
    }
}

impl PredictionPipeline {
    pub fn new(encoder_config: EncoderConfig, tree_config: TreeConfig) -> Self {
        Self {
            encoder: FeatureEncoder::with_config(encoder_config),
            regressor: RentRegressor::new(tree_config),
            is_fitted: false,
        }
    }

    /// Build an unfitted pipeline from a training configuration
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.encoder.clone(), config.tree.clone())
    }

    /// Fit the encoder on `records`, then the regressor on the encoder's output.
    ///
    /// Prior state is discarded before anything else, so a failed fit leaves the
    /// pipeline unfitted.
    pub fn fit(&mut self, records: &[PropertyRecord], targets: &[f64]) -> Result<&mut Self> {
        *self = Self::new(self.encoder.config().clone(), self.regressor.config().clone());

        if records.len() != targets.len() {
            return Err(RentError::ShapeError {
                expected: format!("{} targets", records.len()),
                actual: format!("{} targets", targets.len()),
            });
        }
        targets
            .iter()
            .enumerate()
            .try_for_each(|(idx, &rent)| validate_rent(rent).map_err(|e| e.at_record(idx)))?;

        let start = Instant::now();
        let x = self.encoder.fit_transform(records)?;
        let y = Array1::from_vec(targets.to_vec());
        self.regressor.fit(&x, &y)?;
        self.is_fitted = true;

        info!(
            n_records = records.len(),
            n_features = x.ncols(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Pipeline fitted"
        );
        Ok(self)
    }

    /// Fit on labelled examples
    pub fn fit_examples(&mut self, examples: &[TrainingExample]) -> Result<&mut Self> {
        let (records, targets) = unzip_examples(examples);
        self.fit(&records, &targets)
    }

    /// Predict rents for a batch of records
    pub fn predict(&self, records: &[PropertyRecord]) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }
        let x = self.encoder.transform(records)?;
        self.regressor.predict(&x)
    }

    /// Predict the rent of a single record
    pub fn predict_one(&self, record: &PropertyRecord) -> Result<f64> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }
        let row = self.encoder.transform_one(record)?;
        self.regressor.predict_row(row.view())
    }

    /// Score predictions on held-out data
    pub fn evaluate(&self, records: &[PropertyRecord], targets: &[f64]) -> Result<RegressionMetrics> {
        if records.len() != targets.len() {
            return Err(RentError::ShapeError {
                expected: format!("{} targets", records.len()),
                actual: format!("{} targets", targets.len()),
            });
        }
        let predictions = self.predict(records)?;
        let actual = Array1::from_vec(targets.to_vec());
        let metrics = RegressionMetrics::compute(&actual, &predictions)?;

        info!(
            n_samples = metrics.n_samples,
            rmse = metrics.rmse,
            r_squared = metrics.r_squared,
            mae = metrics.mae,
            "Pipeline evaluated"
        );
        Ok(metrics)
    }

    /// Score predictions on labelled examples
    pub fn evaluate_examples(&self, examples: &[TrainingExample]) -> Result<RegressionMetrics> {
        let (records, targets) = unzip_examples(examples);
        self.evaluate(&records, &targets)
    }

    /// Encoded rows for a batch, in the layout the regressor was fitted on
    pub fn encode(&self, records: &[PropertyRecord]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }
        self.encoder.transform(records)
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn regressor(&self) -> &RentRegressor {
        &self.regressor
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Encoded feature names paired with their importances, most important first
    pub fn ranked_importances(&self) -> Vec<(String, f64)> {
        let importances = match self.regressor.feature_importances() {
            Some(imp) => imp,
            None => return Vec::new(),
        };
        let mut ranked: Vec<(String, f64)> = self
            .encoder
            .feature_names()
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Result of a hold-out training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub pipeline: PredictionPipeline,
    pub metrics: RegressionMetrics,
    pub n_train: usize,
    pub n_test: usize,
}

/// Shuffle with the configured seed, fit on the training share and score the
/// held-out share. Held-out rows are never seen by `fit`.
pub fn train_holdout(examples: &[TrainingExample], config: &TrainingConfig) -> Result<TrainingOutcome> {
    config.validate()?;
    let split = train_test_split(examples.len(), config.test_size, config.random_state)?;

    let pick = |indices: &[usize]| -> Vec<TrainingExample> {
        indices.iter().map(|&i| examples[i].clone()).collect()
    };
    let train = pick(&split.train_indices);
    let test = pick(&split.test_indices);

    info!(
        n_train = train.len(),
        n_test = test.len(),
        seed = config.random_state,
        "Split dataset"
    );

    let mut pipeline = PredictionPipeline::from_config(config);
    pipeline.fit_examples(&train)?;
    let metrics = pipeline.evaluate_examples(&test)?;

    Ok(TrainingOutcome {
        pipeline,
        metrics,
        n_train: train.len(),
        n_test: test.len(),
    })
}
