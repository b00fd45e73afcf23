//! Error types for rent estimation

use thiserror::Error;

/// Result type alias for rent-estimator operations
pub type Result<T> = std::result::Result<T, RentError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum RentError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Model not fitted")]
    NotFitted,

    #[error("Malformed input in field '{field}'{}: {reason}", record_suffix(.record))]
    MalformedInput {
        field: String,
        record: Option<usize>,
        reason: String,
    },

    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("Failed to load model artifact '{path}': {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn record_suffix(record: &Option<usize>) -> String {
    match record {
        Some(idx) => format!(" (record {})", idx),
        None => String::new(),
    }
}

impl RentError {
    /// Build a `MalformedInput` error
    pub fn malformed(field: impl Into<String>, record: Option<usize>, reason: impl Into<String>) -> Self {
        RentError::MalformedInput {
            field: field.into(),
            record,
            reason: reason.into(),
        }
    }

    /// Build an `ArtifactLoad` error
    pub fn artifact(path: impl AsRef<std::path::Path>, reason: impl std::fmt::Display) -> Self {
        RentError::ArtifactLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Attach a record index to a `MalformedInput` error that does not carry one yet
    pub fn at_record(self, idx: usize) -> Self {
        match self {
            RentError::MalformedInput { field, record: None, reason } => RentError::MalformedInput {
                field,
                record: Some(idx),
                reason,
            },
            other => other,
        }
    }
}

impl From<polars::error::PolarsError> for RentError {
    fn from(err: polars::error::PolarsError) -> Self {
        RentError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for RentError {
    fn from(err: serde_json::Error) -> Self {
        RentError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for RentError {
    fn from(err: bincode::Error) -> Self {
        RentError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for RentError {
    fn from(err: ndarray::ShapeError) -> Self {
        RentError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RentError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_malformed_display_names_field_and_record() {
        let err = RentError::malformed("Size", Some(3), "must be positive");
        assert_eq!(
            err.to_string(),
            "Malformed input in field 'Size' (record 3): must be positive"
        );

        let err = RentError::malformed("City", None, "missing");
        assert_eq!(err.to_string(), "Malformed input in field 'City': missing");
    }

    #[test]
    fn test_at_record_keeps_existing_index() {
        let err = RentError::malformed("BHK", Some(1), "x").at_record(7);
        assert!(matches!(err, RentError::MalformedInput { record: Some(1), .. }));

        let err = RentError::malformed("BHK", None, "x").at_record(7);
        assert!(matches!(err, RentError::MalformedInput { record: Some(7), .. }));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RentError = io_err.into();
        assert!(matches!(err, RentError::IoError(_)));
    }
}
