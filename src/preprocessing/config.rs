//! Encoder configuration

use serde::{Deserialize, Serialize};
use crate::record::{CategoricalField, NumericField};
use super::UnknownCategoryPolicy;

/// Configuration for feature encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Numeric fields to standard-scale, in output order
    pub numeric_fields: Vec<NumericField>,

    /// Categorical fields to one-hot encode, in output order
    pub categorical_fields: Vec<CategoricalField>,

    /// What to do with a category value that was not seen during fit
    pub unknown_policy: UnknownCategoryPolicy,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            numeric_fields: NumericField::ALL.to_vec(),
            categorical_fields: CategoricalField::ALL.to_vec(),
            unknown_policy: UnknownCategoryPolicy::Ignore,
        }
    }
}

impl EncoderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to restrict the numeric fields
    pub fn with_numeric_fields(mut self, fields: Vec<NumericField>) -> Self {
        self.numeric_fields = fields;
        self
    }

    /// Builder method to restrict the categorical fields
    pub fn with_categorical_fields(mut self, fields: Vec<CategoricalField>) -> Self {
        self.categorical_fields = fields;
        self
    }

    /// Builder method to set the unknown-category policy
    pub fn with_unknown_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncoderConfig::default();
        assert_eq!(config.numeric_fields.len(), 3);
        assert_eq!(config.categorical_fields.len(), 4);
        assert_eq!(config.unknown_policy, UnknownCategoryPolicy::Ignore);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EncoderConfig::new()
            .with_numeric_fields(vec![NumericField::Size])
            .with_categorical_fields(vec![CategoricalField::City])
            .with_unknown_policy(UnknownCategoryPolicy::Error);

        assert_eq!(config.numeric_fields, vec![NumericField::Size]);
        assert_eq!(config.categorical_fields, vec![CategoricalField::City]);
        assert_eq!(config.unknown_policy, UnknownCategoryPolicy::Error);
    }
}
