//! Model persistence
//!
//! Fitted pipelines are stored as a single artifact file:
//! - Native binary format (bincode, default)
//! - JSON format (portable, human-readable), selected by a `.json` extension

mod serializer;

pub use serializer::{
    ModelArtifact, ModelMetadata, SerializationFormat,
    save_pipeline, load_pipeline,
};
