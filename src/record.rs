//! Property records and the feature schema they are encoded against

use crate::error::{RentError, Result};
use serde::{Deserialize, Serialize};

/// Numeric input fields, in encoding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    Bhk,
    Size,
    Bathroom,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [NumericField::Bhk, NumericField::Size, NumericField::Bathroom];

    /// Dataset column name
    pub fn column_name(self) -> &'static str {
        match self {
            NumericField::Bhk => "BHK",
            NumericField::Size => "Size",
            NumericField::Bathroom => "Bathroom",
        }
    }
}

/// Categorical input fields, in encoding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    PointOfContact,
    Floor,
    City,
    FurnishingStatus,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::PointOfContact,
        CategoricalField::Floor,
        CategoricalField::City,
        CategoricalField::FurnishingStatus,
    ];

    /// Dataset column name
    pub fn column_name(self) -> &'static str {
        match self {
            CategoricalField::PointOfContact => "Point of Contact",
            CategoricalField::Floor => "Floor",
            CategoricalField::City => "City",
            CategoricalField::FurnishingStatus => "Furnishing Status",
        }
    }
}

/// Target column of the listings dataset
pub const TARGET_COLUMN: &str = "Rent";

/// One rental listing as seen by the encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub bhk: u32,
    pub size: f64,
    pub bathroom: u32,
    pub city: String,
    pub furnishing_status: String,
    pub floor: String,
    pub point_of_contact: String,
}

impl PropertyRecord {
    /// Numeric value of a field
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Bhk => self.bhk as f64,
            NumericField::Size => self.size,
            NumericField::Bathroom => self.bathroom as f64,
        }
    }

    /// Categorical value of a field with surrounding whitespace removed.
    ///
    /// Vocabularies are built from and matched against this form, so
    /// `"Mumbai "` and `"Mumbai"` are the same category on every path.
    pub fn categorical(&self, field: CategoricalField) -> &str {
        let raw = match field {
            CategoricalField::PointOfContact => &self.point_of_contact,
            CategoricalField::Floor => &self.floor,
            CategoricalField::City => &self.city,
            CategoricalField::FurnishingStatus => &self.furnishing_status,
        };
        raw.trim()
    }

    /// Check every field against its domain.
    ///
    /// Errors name the offending column; callers working on a batch attach
    /// the record index with [`RentError::at_record`].
    pub fn validate(&self) -> Result<()> {
        if self.bhk < 1 {
            return Err(RentError::malformed(
                NumericField::Bhk.column_name(),
                None,
                format!("must be at least 1, got {}", self.bhk),
            ));
        }
        if self.bathroom < 1 {
            return Err(RentError::malformed(
                NumericField::Bathroom.column_name(),
                None,
                format!("must be at least 1, got {}", self.bathroom),
            ));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(RentError::malformed(
                NumericField::Size.column_name(),
                None,
                format!("must be a positive number, got {}", self.size),
            ));
        }
        for field in CategoricalField::ALL {
            if self.categorical(field).is_empty() {
                return Err(RentError::malformed(field.column_name(), None, "must not be empty"));
            }
        }
        Ok(())
    }
}

/// A listing paired with its observed monthly rent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub record: PropertyRecord,
    pub rent: f64,
}

impl TrainingExample {
    pub fn new(record: PropertyRecord, rent: f64) -> Self {
        Self { record, rent }
    }
}

/// Observed rents must be positive and finite
pub fn validate_rent(rent: f64) -> Result<()> {
    if !rent.is_finite() || rent <= 0.0 {
        return Err(RentError::malformed(
            TARGET_COLUMN,
            None,
            format!("must be a positive number, got {}", rent),
        ));
    }
    Ok(())
}

/// Split training examples into records and targets
pub fn unzip_examples(examples: &[TrainingExample]) -> (Vec<PropertyRecord>, Vec<f64>) {
    examples
        .iter()
        .map(|ex| (ex.record.clone(), ex.rent))
        .unzip()
}
