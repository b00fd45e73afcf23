//! Feature encoding pipeline: standard scaling + one-hot encoding

use crate::error::{RentError, Result};
use crate::record::{CategoricalField, PropertyRecord};
use super::{
    config::EncoderConfig,
    encoder::{OneHotEncoder, Vocabulary},
    scaler::{ScalerParams, StandardScaler},
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Maps property records to fixed-width numeric vectors.
///
/// The output layout is the scaled numeric fields followed by one one-hot
/// block per categorical field. Width and ordering are fixed by `fit` and
/// stay constant until the next `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEncoder {
    config: EncoderConfig,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    feature_names: Vec<String>,
    is_fitted: bool,
}

impl FeatureEncoder {
    /// Create a new encoder with default configuration
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    /// Create a new encoder with custom configuration
    pub fn with_config(config: EncoderConfig) -> Self {
        let scaler = StandardScaler::new(config.numeric_fields.clone());
        let encoder = OneHotEncoder::new(config.categorical_fields.clone(), config.unknown_policy);
        Self {
            config,
            scaler,
            encoder,
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit statistics and vocabularies on a training batch.
    ///
    /// Any previously fitted state is discarded first.
    pub fn fit(&mut self, records: &[PropertyRecord]) -> Result<&mut Self> {
        *self = Self::with_config(self.config.clone());

        validate_batch(records)?;

        self.scaler.fit(records)?;
        self.encoder.fit(records)?;
        self.feature_names = self.build_feature_names();
        self.is_fitted = true;

        info!(
            n_records = records.len(),
            n_features = self.n_features_out(),
            "Fitted feature encoder"
        );
        Ok(self)
    }

    /// Encode a batch of records into an `(n_records, n_features_out)` matrix
    pub fn transform(&self, records: &[PropertyRecord]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }

        let width = self.n_features_out();
        let mut data = Vec::with_capacity(records.len() * width);
        let mut unknown = 0usize;

        for (idx, record) in records.iter().enumerate() {
            unknown += self
                .encode_into(record, &mut data)
                .map_err(|e| e.at_record(idx))?;
        }

        if unknown > 0 {
            debug!(unknown, n_records = records.len(), "Unseen categories encoded as zero blocks");
        }

        Ok(Array2::from_shape_vec((records.len(), width), data)?)
    }

    /// Encode a single record
    pub fn transform_one(&self, record: &PropertyRecord) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }

        let mut data = Vec::with_capacity(self.n_features_out());
        let unknown = self.encode_into(record, &mut data)?;
        if unknown > 0 {
            debug!(unknown, "Unseen categories encoded as zero blocks");
        }
        Ok(Array1::from_vec(data))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, records: &[PropertyRecord]) -> Result<Array2<f64>> {
        self.fit(records)?;
        self.transform(records)
    }

    /// Encoded column names, e.g. `Size` or `City=Mumbai`
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Width of an encoded vector
    pub fn n_features_out(&self) -> usize {
        self.scaler.n_features_out() + self.encoder.n_features_out()
    }

    /// Fitted scaling parameters
    pub fn scaler_params(&self) -> &[ScalerParams] {
        self.scaler.params()
    }

    /// Fitted vocabularies
    pub fn vocabularies(&self) -> &[Vocabulary] {
        self.encoder.vocabularies()
    }

    /// Vocabulary of a single field
    pub fn vocabulary(&self, field: CategoricalField) -> Option<&Vocabulary> {
        self.encoder.vocabulary(field)
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn encode_into(&self, record: &PropertyRecord, out: &mut Vec<f64>) -> Result<usize> {
        record.validate()?;
        let start = out.len();
        self.scaler.transform_into(record, out)?;
        match self.encoder.transform_into(record, out) {
            Ok(unknown) => Ok(unknown),
            Err(e) => {
                out.truncate(start);
                Err(e)
            }
        }
    }

    fn build_feature_names(&self) -> Vec<String> {
        let numeric = self
            .scaler
            .params()
            .iter()
            .map(|p| p.field.column_name().to_string());
        let categorical = self.encoder.vocabularies().iter().flat_map(|v| {
            v.categories
                .iter()
                .map(move |c| format!("{}={}", v.field.column_name(), c))
        });
        numeric.chain(categorical).collect()
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_batch(records: &[PropertyRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(RentError::ValidationError(
            "Cannot fit feature encoder on an empty batch".to_string(),
        ));
    }
    records
        .iter()
        .enumerate()
        .try_for_each(|(idx, r)| r.validate().map_err(|e| e.at_record(idx)))
}
