//! Regression metrics

use crate::error::{RentError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Metrics for evaluating rent predictions against observed rents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination; NaN when the observed rents are constant
    pub r_squared: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Number of evaluated samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute metrics from observed and predicted values
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(RentError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(RentError::ValidationError(
                "Cannot compute metrics on an empty batch".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let ss_res: f64 = errors.iter().map(|e| e * e).sum();
        let rmse = (ss_res / n).sqrt();
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean = y_true.sum() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();

        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else {
            warn!("Observed rents are constant, R² is undefined");
            f64::NAN
        };

        Ok(Self {
            rmse,
            r_squared,
            mae,
            n_samples: y_true.len(),
        })
    }
}
