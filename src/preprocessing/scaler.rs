//! Standard scaling of numeric fields

use crate::error::{RentError, Result};
use crate::record::{NumericField, PropertyRecord};
use serde::{Deserialize, Serialize};

/// Parameters for one fitted numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub field: NumericField,
    pub mean: f64,
    /// Population standard deviation; exactly 0.0 when every training value was identical
    pub std: f64,
}

impl ScalerParams {
    /// Whether the field had zero variance in the training batch
    pub fn is_degenerate(&self) -> bool {
        self.std == 0.0
    }

    /// Scale a single value. Degenerate fields always map to 0.
    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// Standard scaler: `(x - mean) / std` per field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    fields: Vec<NumericField>,
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create a new scaler over the given fields
    pub fn new(fields: Vec<NumericField>) -> Self {
        Self {
            fields,
            params: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the scaler to a batch of records, replacing any previous statistics
    pub fn fit(&mut self, records: &[PropertyRecord]) -> Result<&mut Self> {
        if records.is_empty() {
            return Err(RentError::ValidationError(
                "Cannot fit scaler on an empty batch".to_string(),
            ));
        }

        self.params = self
            .fields
            .iter()
            .map(|&field| {
                let values: Vec<f64> = records.iter().map(|r| r.numeric(field)).collect();
                Self::compute_params(field, &values)
            })
            .collect::<Result<_>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the configured fields of one record, appending to `out`
    pub fn transform_into(&self, record: &PropertyRecord, out: &mut Vec<f64>) -> Result<()> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }
        out.extend(self.params.iter().map(|p| p.scale(record.numeric(p.field))));
        Ok(())
    }

    /// Fitted parameters in output order
    pub fn params(&self) -> &[ScalerParams] {
        &self.params
    }

    /// Number of output columns
    pub fn n_features_out(&self) -> usize {
        self.fields.len()
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn compute_params(field: NumericField, values: &[f64]) -> Result<ScalerParams> {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Decide degeneracy on the raw values; a float mean of identical values
        // can drift by an ulp and leave a tiny non-zero variance behind.
        let std = if min == max {
            0.0
        } else {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            var.sqrt()
        };

        if !mean.is_finite() || !std.is_finite() {
            return Err(RentError::malformed(
                field.column_name(),
                None,
                format!("values overflow the scaling statistics (mean {}, std {})", mean, std),
            ));
        }

        Ok(ScalerParams { field, mean, std })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_sizes(sizes: &[f64]) -> Vec<PropertyRecord> {
        sizes
            .iter()
            .map(|&size| PropertyRecord {
                bhk: 1,
                size,
                bathroom: 1,
                city: "Delhi".to_string(),
                furnishing_status: "Furnished".to_string(),
                floor: "1 out of 2".to_string(),
                point_of_contact: "Contact Owner".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_standard_scaler() {
        let records = with_sizes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut scaler = StandardScaler::new(vec![NumericField::Size]);
        scaler.fit(&records).unwrap();

        let params = &scaler.params()[0];
        assert!((params.mean - 3.0).abs() < 1e-12);
        assert!((params.std - 2.0f64.sqrt()).abs() < 1e-12);

        let mut scaled = Vec::new();
        for r in &records {
            scaler.transform_into(r, &mut scaled).unwrap();
        }
        let mean: f64 = scaled.iter().sum::<f64>() / scaled.len() as f64;
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_field_maps_to_zero() {
        let records = with_sizes(&[0.1, 0.1, 0.1]);
        let mut scaler = StandardScaler::new(vec![NumericField::Size, NumericField::Bhk]);
        scaler.fit(&records).unwrap();

        assert!(scaler.params().iter().all(|p| p.is_degenerate()));

        let mut out = Vec::new();
        scaler.transform_into(&with_sizes(&[500.0])[0], &mut out).unwrap();
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn test_overflowing_statistics_name_the_field() {
        let records = with_sizes(&[f64::MAX, f64::MAX / 2.0, 1.0]);
        let mut scaler = StandardScaler::new(vec![NumericField::Size]);

        let err = scaler.fit(&records).unwrap_err();
        assert!(matches!(err, RentError::MalformedInput { ref field, .. } if field == "Size"));
        assert!(!scaler.is_fitted());
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = StandardScaler::new(vec![NumericField::Size]);
        let mut out = Vec::new();
        let err = scaler.transform_into(&with_sizes(&[1.0])[0], &mut out).unwrap_err();
        assert!(matches!(err, RentError::NotFitted));
    }
}
