//! Input domains of the interactive estimate form

use crate::error::{RentError, Result};
use crate::record::{CategoricalField, NumericField, PropertyRecord};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const BHK_RANGE: RangeInclusive<u32> = 1..=10;
pub const SIZE_RANGE: RangeInclusive<f64> = 100.0..=10000.0;
pub const BATHROOM_RANGE: RangeInclusive<u32> = 1..=10;

pub const CITIES: [&str; 6] = ["Mumbai", "Bangalore", "Delhi", "Chennai", "Hyderabad", "Kolkata"];
pub const FURNISHING_STATUSES: [&str; 3] = ["Furnished", "Semi-Furnished", "Unfurnished"];
pub const CONTACT_TYPES: [&str; 3] = ["Contact Owner", "Contact Agent", "Contact Builder"];
pub const DEFAULT_FLOOR: &str = "1st out of 5";

/// Values collected by the form before they become a [`PropertyRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyForm {
    pub bhk: u32,
    pub size: f64,
    pub bathroom: u32,
    pub city: String,
    pub furnishing_status: String,
    pub floor: String,
    pub point_of_contact: String,
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self {
            bhk: 2,
            size: 1000.0,
            bathroom: 2,
            city: CITIES[0].to_string(),
            furnishing_status: FURNISHING_STATUSES[1].to_string(),
            floor: DEFAULT_FLOOR.to_string(),
            point_of_contact: CONTACT_TYPES[0].to_string(),
        }
    }
}

impl PropertyForm {
    /// Check every field against its domain and build the record
    pub fn into_record(self) -> Result<PropertyRecord> {
        check_range(NumericField::Bhk, self.bhk, &BHK_RANGE)?;
        check_range(NumericField::Size, self.size, &SIZE_RANGE)?;
        check_range(NumericField::Bathroom, self.bathroom, &BATHROOM_RANGE)?;
        check_choice(CategoricalField::City, &self.city, &CITIES)?;
        check_choice(CategoricalField::FurnishingStatus, &self.furnishing_status, &FURNISHING_STATUSES)?;
        check_choice(CategoricalField::PointOfContact, &self.point_of_contact, &CONTACT_TYPES)?;

        let record = PropertyRecord {
            bhk: self.bhk,
            size: self.size,
            bathroom: self.bathroom,
            city: self.city,
            furnishing_status: self.furnishing_status,
            floor: self.floor.trim().to_string(),
            point_of_contact: self.point_of_contact,
        };
        record.validate()?;
        Ok(record)
    }
}

fn check_range<T>(field: NumericField, value: T, range: &RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RentError::malformed(
            field.column_name(),
            None,
            format!("{} is outside {}..={}", value, range.start(), range.end()),
        ))
    }
}

fn check_choice(field: CategoricalField, value: &str, choices: &[&str]) -> Result<()> {
    if choices.contains(&value) {
        Ok(())
    } else {
        Err(RentError::malformed(
            field.column_name(),
            None,
            format!("'{}' is not one of {}", value, choices.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_is_valid() {
        let record = PropertyForm::default().into_record().unwrap();
        assert_eq!(record.floor, "1st out of 5");
        assert_eq!(record.city, "Mumbai");
    }

    #[test]
    fn test_out_of_range_values() {
        let form = PropertyForm { bhk: 11, ..Default::default() };
        assert!(matches!(
            form.into_record(),
            Err(RentError::MalformedInput { ref field, .. }) if field == "BHK"
        ));

        let form = PropertyForm { size: 50.0, ..Default::default() };
        assert!(form.into_record().is_err());
    }

    #[test]
    fn test_unknown_choice() {
        let form = PropertyForm { city: "Pune".to_string(), ..Default::default() };
        let err = form.into_record().unwrap_err();
        assert!(err.to_string().contains("City"));
    }

    #[test]
    fn test_blank_floor_rejected() {
        let form = PropertyForm { floor: "   ".to_string(), ..Default::default() };
        assert!(form.into_record().is_err());
    }
}
