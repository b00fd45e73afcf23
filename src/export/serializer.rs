//! Model artifact serialization
//!
//! A fitted pipeline is persisted inside a [`ModelArtifact`] envelope carrying
//! magic bytes, a format version, descriptive metadata and an FNV-1a checksum
//! over the canonical binary encoding of the pipeline.

use crate::error::{RentError, Result};
use crate::pipeline::PredictionPipeline;
use crate::record::TARGET_COLUMN;
use crate::training::RegressionMetrics;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerializationFormat {
    /// Binary format using bincode (efficient)
    Binary,
    /// JSON format (portable, human-readable)
    Json,
}

impl Default for SerializationFormat {
    fn default() -> Self {
        SerializationFormat::Binary
    }
}

impl SerializationFormat {
    /// `.json` selects JSON, anything else is binary
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SerializationFormat::Json,
            _ => SerializationFormat::Binary,
        }
    }

    fn sniff(bytes: &[u8]) -> Self {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => SerializationFormat::Json,
            _ => SerializationFormat::Binary,
        }
    }
}

/// Descriptive metadata stored alongside the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,
    /// Crate version that wrote the artifact
    pub version: String,
    /// Training timestamp (RFC 3339)
    pub trained_at: String,
    /// Encoded feature names
    pub feature_names: Vec<String>,
    /// Target name
    pub target_name: String,
    /// Model type
    pub model_type: String,
    /// Hyperparameters
    pub hyperparameters: BTreeMap<String, String>,
    /// Evaluation metrics; undefined values are left out
    pub metrics: BTreeMap<String, f64>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            name: "rent_model".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: Utc::now().to_rfc3339(),
            feature_names: Vec::new(),
            target_name: TARGET_COLUMN.to_string(),
            model_type: "decision_tree_regressor".to_string(),
            hyperparameters: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }
}

impl ModelMetadata {
    /// Create new metadata with name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Describe a fitted pipeline
    pub fn describe(pipeline: &PredictionPipeline) -> Self {
        let tree = pipeline.regressor().config();
        let max_depth = tree
            .max_depth
            .map_or_else(|| "none".to_string(), |d| d.to_string());

        Self::default()
            .with_features(pipeline.encoder().feature_names().to_vec())
            .add_hyperparameter("max_depth", max_depth)
            .add_hyperparameter("min_samples_split", tree.min_samples_split.to_string())
            .add_hyperparameter("min_samples_leaf", tree.min_samples_leaf.to_string())
            .add_hyperparameter("random_state", tree.random_state.to_string())
            .add_hyperparameter(
                "unknown_category_policy",
                format!("{:?}", pipeline.encoder().config().unknown_policy),
            )
    }

    /// Set feature names
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.feature_names = features;
        self
    }

    /// Add hyperparameter
    pub fn add_hyperparameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hyperparameters.insert(key.into(), value.into());
        self
    }

    /// Add metric; non-finite values are skipped
    pub fn add_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        if value.is_finite() {
            self.metrics.insert(key.into(), value);
        }
        self
    }

    /// Record hold-out evaluation results
    pub fn with_evaluation(self, metrics: &RegressionMetrics) -> Self {
        self.add_metric("rmse", metrics.rmse)
            .add_metric("r_squared", metrics.r_squared)
            .add_metric("mae", metrics.mae)
            .add_metric("n_test_samples", metrics.n_samples as f64)
    }
}

/// Persisted form of a fitted pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Magic bytes for format detection
    pub magic: [u8; 4],
    /// Format version
    pub format_version: u32,
    /// Model metadata
    pub metadata: ModelMetadata,
    /// FNV-1a over the bincode encoding of `pipeline`
    pub checksum: u64,
    /// Fitted pipeline
    pub pipeline: PredictionPipeline,
}

impl ModelArtifact {
    /// Magic bytes for rent model files
    pub const MAGIC: [u8; 4] = *b"RENT";
    /// Current format version
    pub const VERSION: u32 = 1;

    /// Wrap a fitted pipeline
    pub fn new(pipeline: PredictionPipeline, metadata: ModelMetadata) -> Result<Self> {
        if !pipeline.is_fitted() {
            return Err(RentError::NotFitted);
        }
        let checksum = Self::compute_checksum(&bincode::serialize(&pipeline)?);
        Ok(Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            metadata,
            checksum,
            pipeline,
        })
    }

    /// Wrap a fitted pipeline with metadata derived from it
    pub fn from_pipeline(pipeline: PredictionPipeline, metrics: Option<&RegressionMetrics>) -> Result<Self> {
        let mut metadata = ModelMetadata::describe(&pipeline);
        if let Some(m) = metrics {
            metadata = metadata.with_evaluation(m);
        }
        Self::new(pipeline, metadata)
    }

    /// Compute checksum using FNV-1a hash
    pub fn compute_checksum(data: &[u8]) -> u64 {
        const FNV_OFFSET: u64 = 14695981039346656037;
        const FNV_PRIME: u64 = 1099511628211;

        let mut hash = FNV_OFFSET;
        for byte in data {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    /// Check magic, version, checksum and fitted state
    pub fn verify(&self) -> std::result::Result<(), String> {
        if self.magic != Self::MAGIC {
            return Err(format!("bad magic bytes {:?}", self.magic));
        }
        if self.format_version != Self::VERSION {
            return Err(format!(
                "unsupported format version {} (expected {})",
                self.format_version,
                Self::VERSION
            ));
        }
        let bytes = bincode::serialize(&self.pipeline).map_err(|e| e.to_string())?;
        if Self::compute_checksum(&bytes) != self.checksum {
            return Err("checksum verification failed, file may be corrupted".to_string());
        }
        if !self.pipeline.is_fitted() {
            return Err("pipeline is not fitted".to_string());
        }
        Ok(())
    }

    /// Save using the format implied by the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.save_with_format(path, SerializationFormat::from_path(path))
    }

    /// Save to file
    pub fn save_with_format(&self, path: impl AsRef<Path>, format: SerializationFormat) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        match format {
            SerializationFormat::Binary => bincode::serialize_into(&mut writer, self)?,
            SerializationFormat::Json => serde_json::to_writer_pretty(&mut writer, self)?,
        }
        writer.flush()?;

        info!(path = %path.display(), ?format, checksum = self.checksum, "Saved model artifact");
        Ok(())
    }

    /// Load and verify an artifact; every failure is reported as `ArtifactLoad`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RentError::artifact(path, e))?;
        let mut bytes = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(|e| RentError::artifact(path, e))?;

        let format = SerializationFormat::sniff(&bytes);
        let artifact: Self = match format {
            SerializationFormat::Binary => {
                bincode::deserialize(&bytes).map_err(|e| RentError::artifact(path, e))?
            }
            SerializationFormat::Json => {
                serde_json::from_slice(&bytes).map_err(|e| RentError::artifact(path, e))?
            }
        };

        artifact.verify().map_err(|reason| RentError::artifact(path, reason))?;

        info!(
            path = %path.display(),
            ?format,
            name = %artifact.metadata.name,
            trained_at = %artifact.metadata.trained_at,
            "Loaded model artifact"
        );
        Ok(artifact)
    }

    pub fn pipeline(&self) -> &PredictionPipeline {
        &self.pipeline
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (PredictionPipeline, ModelMetadata) {
        (self.pipeline, self.metadata)
    }
}

/// Persist a fitted pipeline with derived metadata
pub fn save_pipeline(
    pipeline: &PredictionPipeline,
    path: impl AsRef<Path>,
    metrics: Option<&RegressionMetrics>,
) -> Result<()> {
    ModelArtifact::from_pipeline(pipeline.clone(), metrics)?.save(path)
}

/// Load a fitted pipeline
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<PredictionPipeline> {
    Ok(ModelArtifact::load(path)?.pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PropertyRecord, TrainingExample};
    use crate::training::TreeConfig;
    use crate::preprocessing::EncoderConfig;
    use tempfile::tempdir;

    fn fitted_pipeline() -> PredictionPipeline {
        let examples: Vec<TrainingExample> = (0..30)
            .map(|i| {
                TrainingExample::new(
                    PropertyRecord {
                        bhk: 1 + (i % 3) as u32,
                        size: 400.0 + 25.0 * i as f64,
                        bathroom: 1 + (i % 2) as u32,
                        city: ["Mumbai", "Delhi", "Chennai"][i % 3].to_string(),
                        furnishing_status: "Unfurnished".to_string(),
                        floor: "1 out of 4".to_string(),
                        point_of_contact: "Contact Agent".to_string(),
                    },
                    20.0 * (400.0 + 25.0 * i as f64),
                )
            })
            .collect();

        let mut pipeline = PredictionPipeline::new(
            EncoderConfig::default(),
            TreeConfig::new().with_min_samples_split(4).with_min_samples_leaf(2),
        );
        pipeline.fit_examples(&examples).unwrap();
        pipeline
    }

    #[test]
    fn test_checksum_known_values() {
        assert_eq!(ModelArtifact::compute_checksum(&[]), 14695981039346656037);
        assert_eq!(ModelArtifact::compute_checksum(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SerializationFormat::from_path("model.json"), SerializationFormat::Json);
        assert_eq!(SerializationFormat::from_path("model.JSON"), SerializationFormat::Json);
        assert_eq!(SerializationFormat::from_path("model.bin"), SerializationFormat::Binary);
        assert_eq!(SerializationFormat::from_path("model"), SerializationFormat::Binary);
    }

    #[test]
    fn test_unfitted_pipeline_rejected() {
        let err = ModelArtifact::from_pipeline(PredictionPipeline::default(), None).unwrap_err();
        assert!(matches!(err, RentError::NotFitted));
    }

    #[test]
    fn test_binary_and_json_roundtrip() {
        let dir = tempdir().unwrap();
        let pipeline = fitted_pipeline();
        let artifact = ModelArtifact::from_pipeline(pipeline.clone(), None).unwrap();

        for name in ["model.bin", "model.json"] {
            let path = dir.path().join(name);
            artifact.save(&path).unwrap();
            let loaded = ModelArtifact::load(&path).unwrap();
            assert_eq!(loaded.checksum, artifact.checksum);
            assert_eq!(loaded.metadata, artifact.metadata);
        }
    }

    #[test]
    fn test_metadata_skips_undefined_metrics() {
        let metrics = RegressionMetrics {
            rmse: 10.0,
            r_squared: f64::NAN,
            mae: 5.0,
            n_samples: 4,
        };
        let metadata = ModelMetadata::new("m").with_evaluation(&metrics);
        assert_eq!(metadata.metrics.get("rmse"), Some(&10.0));
        assert!(!metadata.metrics.contains_key("r_squared"));
    }

    #[test]
    fn test_tampered_checksum_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let mut artifact = ModelArtifact::from_pipeline(fitted_pipeline(), None).unwrap();
        artifact.checksum ^= 1;
        artifact.save(&path).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, RentError::ArtifactLoad { .. }));
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_wrong_magic_and_version() {
        let dir = tempdir().unwrap();

        let mut artifact = ModelArtifact::from_pipeline(fitted_pipeline(), None).unwrap();
        artifact.magic = *b"KOLM";
        let path = dir.path().join("magic.bin");
        artifact.save(&path).unwrap();
        assert!(ModelArtifact::load(&path).unwrap_err().to_string().contains("magic"));

        let mut artifact = ModelArtifact::from_pipeline(fitted_pipeline(), None).unwrap();
        artifact.format_version = 99;
        let path = dir.path().join("version.bin");
        artifact.save(&path).unwrap();
        assert!(ModelArtifact::load(&path).unwrap_err().to_string().contains("version"));
    }
}
