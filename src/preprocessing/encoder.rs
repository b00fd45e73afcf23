//! One-hot encoding of categorical fields

use crate::error::{RentError, Result};
use crate::record::{CategoricalField, PropertyRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Handling of category values that were not present during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownCategoryPolicy {
    /// Emit an all-zero block for the field
    Ignore,
    /// Fail with [`RentError::UnknownCategory`]
    Error,
}

impl Default for UnknownCategoryPolicy {
    fn default() -> Self {
        UnknownCategoryPolicy::Ignore
    }
}

/// Learned vocabulary for one categorical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub field: CategoricalField,
    /// Sorted, de-duplicated category values; position = one-hot index
    pub categories: Vec<String>,
}

impl Vocabulary {
    /// Index of a category, if it was seen during fit
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// One-hot encoder with an ordered vocabulary per field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    fields: Vec<CategoricalField>,
    policy: UnknownCategoryPolicy,
    vocabularies: Vec<Vocabulary>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create a new encoder
    pub fn new(fields: Vec<CategoricalField>, policy: UnknownCategoryPolicy) -> Self {
        Self {
            fields,
            policy,
            vocabularies: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn the vocabulary of every field, replacing any previous one
    pub fn fit(&mut self, records: &[PropertyRecord]) -> Result<&mut Self> {
        if records.is_empty() {
            return Err(RentError::ValidationError(
                "Cannot fit encoder on an empty batch".to_string(),
            ));
        }

        self.vocabularies = self
            .fields
            .iter()
            .map(|&field| Self::build_vocabulary(field, records))
            .collect();

        self.is_fitted = true;
        Ok(self)
    }

    /// Append the one-hot blocks for one record to `out`.
    ///
    /// Returns the number of fields whose value was not in the vocabulary.
    pub fn transform_into(&self, record: &PropertyRecord, out: &mut Vec<f64>) -> Result<usize> {
        if !self.is_fitted {
            return Err(RentError::NotFitted);
        }

        let mut unknown = 0;
        for vocab in &self.vocabularies {
            let value = record.categorical(vocab.field);
            let start = out.len();
            out.resize(start + vocab.len(), 0.0);

            match vocab.index_of(value) {
                Some(idx) => out[start + idx] = 1.0,
                None => match self.policy {
                    UnknownCategoryPolicy::Ignore => unknown += 1,
                    UnknownCategoryPolicy::Error => {
                        out.truncate(start);
                        return Err(RentError::UnknownCategory {
                            field: vocab.field.column_name().to_string(),
                            value: value.to_string(),
                        });
                    }
                },
            }
        }

        Ok(unknown)
    }

    /// Learned vocabularies in output order
    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    /// Vocabulary of a single field
    pub fn vocabulary(&self, field: CategoricalField) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|v| v.field == field)
    }

    /// Number of output columns
    pub fn n_features_out(&self) -> usize {
        self.vocabularies.iter().map(Vocabulary::len).sum()
    }

    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn build_vocabulary(field: CategoricalField, records: &[PropertyRecord]) -> Vocabulary {
        let categories: BTreeSet<&str> = records.iter().map(|r| r.categorical(field)).collect();
        Vocabulary {
            field,
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }
}
