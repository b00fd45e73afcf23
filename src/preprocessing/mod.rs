//! Feature preprocessing
//!
//! Turns property records into fixed-width numeric vectors:
//! - Standard scaling of numeric fields
//! - One-hot encoding of categorical fields with an unknown-category policy
//! - A composed [`FeatureEncoder`] with a fit/transform contract

mod config;
mod scaler;
mod encoder;
mod pipeline;

pub use config::EncoderConfig;
pub use scaler::{ScalerParams, StandardScaler};
pub use encoder::{OneHotEncoder, UnknownCategoryPolicy, Vocabulary};
pub use pipeline::FeatureEncoder;
