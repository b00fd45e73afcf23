//! Rent Estimator - monthly rent prediction for residential listings
//!
//! This crate provides a small, complete prediction pipeline:
//! - Feature encoding (standard scaling + one-hot encoding)
//! - A variance-reduction regression tree
//! - Hold-out evaluation (RMSE, R², MAE)
//! - Checksummed model artifacts (bincode or JSON)
//! - A read-only serving layer and a CLI with an interactive form
//!
//! # Modules
//!
//! ## Core
//! - [`record`] - Property records and the feature schema
//! - [`preprocessing`] - Scaling and one-hot encoding
//! - [`training`] - Regression tree, metrics, hold-out split
//! - [`pipeline`] - Encoder + regressor as one fitted unit
//!
//! ## Persistence and serving
//! - [`export`] - Model artifact serialization
//! - [`inference`] - Rent estimation from a loaded artifact
//!
//! ## Services
//! - [`cli`] - Command-line interface
//! - [`utils`] - CSV ingestion and export

// Core error handling
pub mod error;

// Core ML modules
pub mod record;
pub mod preprocessing;
pub mod training;
pub mod pipeline;

// Persistence and serving
pub mod export;
pub mod inference;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{RentError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{RentError, Result};

    // Records
    pub use crate::record::{CategoricalField, NumericField, PropertyRecord, TrainingExample};

    // Preprocessing
    pub use crate::preprocessing::{EncoderConfig, FeatureEncoder, UnknownCategoryPolicy};

    // Training
    pub use crate::training::{RegressionMetrics, RentRegressor, TrainingConfig, TreeConfig};

    // Pipeline
    pub use crate::pipeline::{train_holdout, PredictionPipeline, TrainingOutcome};

    // Export
    pub use crate::export::{ModelArtifact, ModelMetadata, SerializationFormat};

    // Serving
    pub use crate::inference::{Estimate, PropertyForm, RentService};
}
