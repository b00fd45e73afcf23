//! CSV ingestion and export of rental listings

use crate::error::{RentError, Result};
use crate::inference::Estimate;
use crate::record::{
    validate_rent, CategoricalField, NumericField, PropertyRecord, TrainingExample, TARGET_COLUMN,
};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Column holding the estimate in exported prediction files
pub const PREDICTION_COLUMN: &str = "Predicted Rent";
/// Column holding the per-area rate in exported prediction files
pub const RATE_COLUMN: &str = "Rent per Sqft";

/// Load a CSV file with a header row
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| RentError::DataError(format!("Failed to open {}: {}", path.display(), e)))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .into_reader_with_file_handle(file)
        .finish()?;

    info!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded CSV");
    Ok(df)
}

/// Load listings with their observed rents
pub fn load_examples(path: impl AsRef<Path>) -> Result<Vec<TrainingExample>> {
    frame_to_examples(&load_csv(path)?)
}

/// Load listings without rents
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<PropertyRecord>> {
    frame_to_records(&load_csv(path)?)
}

/// Convert every row of `df` into a record; extra columns are ignored
pub fn frame_to_records(df: &DataFrame) -> Result<Vec<PropertyRecord>> {
    let bhk = count_column(df, NumericField::Bhk)?;
    let size = float_column(df, NumericField::Size.column_name())?;
    let bathroom = count_column(df, NumericField::Bathroom)?;
    let city = string_column(df, CategoricalField::City)?;
    let furnishing = string_column(df, CategoricalField::FurnishingStatus)?;
    let floor = string_column(df, CategoricalField::Floor)?;
    let contact = string_column(df, CategoricalField::PointOfContact)?;

    (0..df.height())
        .map(|idx| {
            let record = PropertyRecord {
                bhk: bhk[idx],
                size: size[idx],
                bathroom: bathroom[idx],
                city: city[idx].clone(),
                furnishing_status: furnishing[idx].clone(),
                floor: floor[idx].clone(),
                point_of_contact: contact[idx].clone(),
            };
            record.validate().map_err(|e| e.at_record(idx))?;
            Ok(record)
        })
        .collect()
}

/// Convert every row of `df` into a record paired with its rent
pub fn frame_to_examples(df: &DataFrame) -> Result<Vec<TrainingExample>> {
    let records = frame_to_records(df)?;
    let rents = float_column(df, TARGET_COLUMN)?;

    records
        .into_iter()
        .zip(rents)
        .enumerate()
        .map(|(idx, (record, rent))| {
            validate_rent(rent).map_err(|e| e.at_record(idx))?;
            Ok(TrainingExample::new(record, rent))
        })
        .collect()
}

/// Build a frame with the dataset's column names
pub fn records_to_frame(records: &[PropertyRecord]) -> Result<DataFrame> {
    let bhk: Vec<u32> = records.iter().map(|r| r.bhk).collect();
    let size: Vec<f64> = records.iter().map(|r| r.size).collect();
    let bathroom: Vec<u32> = records.iter().map(|r| r.bathroom).collect();
    let text = |field: CategoricalField| -> Vec<String> {
        records.iter().map(|r| r.categorical(field).to_string()).collect()
    };

    Ok(DataFrame::new(vec![
        Series::new(NumericField::Bhk.column_name().into(), bhk).into(),
        Series::new(NumericField::Size.column_name().into(), size).into(),
        Series::new(NumericField::Bathroom.column_name().into(), bathroom).into(),
        Series::new(CategoricalField::City.column_name().into(), text(CategoricalField::City)).into(),
        Series::new(
            CategoricalField::FurnishingStatus.column_name().into(),
            text(CategoricalField::FurnishingStatus),
        )
        .into(),
        Series::new(CategoricalField::Floor.column_name().into(), text(CategoricalField::Floor)).into(),
        Series::new(
            CategoricalField::PointOfContact.column_name().into(),
            text(CategoricalField::PointOfContact),
        )
        .into(),
    ])?)
}

/// Frame with the dataset columns followed by the target column
pub fn examples_to_frame(examples: &[TrainingExample]) -> Result<DataFrame> {
    let records: Vec<PropertyRecord> = examples.iter().map(|ex| ex.record.clone()).collect();
    let rents: Vec<f64> = examples.iter().map(|ex| ex.rent).collect();

    let mut df = records_to_frame(&records)?;
    df.with_column(Series::new(TARGET_COLUMN.into(), rents))?;
    Ok(df)
}

/// Write a DataFrame to CSV
pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path.as_ref())?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

/// Write the input records with their estimates appended
pub fn write_predictions(
    path: impl AsRef<Path>,
    records: &[PropertyRecord],
    estimates: &[Estimate],
) -> Result<()> {
    if records.len() != estimates.len() {
        return Err(RentError::ShapeError {
            expected: format!("{} estimates", records.len()),
            actual: format!("{} estimates", estimates.len()),
        });
    }

    let rents: Vec<f64> = estimates.iter().map(|e| e.rent).collect();
    let rates: Vec<Option<f64>> = estimates.iter().map(|e| e.rent_per_sqft).collect();

    let mut df = records_to_frame(records)?;
    df.with_column(Series::new(PREDICTION_COLUMN.into(), rents))?;
    df.with_column(Series::new(RATE_COLUMN.into(), rates))?;
    save_csv(&mut df, path.as_ref())?;

    info!(path = %path.as_ref().display(), rows = records.len(), "Wrote predictions");
    Ok(())
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| RentError::malformed(name, None, "column is missing"))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = column(df, name)?.cast(&DataType::Float64)?;
    values
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(idx, v)| match v {
            Some(x) if x.is_finite() => Ok(x),
            Some(x) => Err(RentError::malformed(name, Some(idx), format!("{} is not finite", x))),
            None => Err(RentError::malformed(name, Some(idx), "missing or not numeric")),
        })
        .collect()
}

fn count_column(df: &DataFrame, field: NumericField) -> Result<Vec<u32>> {
    let name = field.column_name();
    float_column(df, name)?
        .into_iter()
        .enumerate()
        .map(|(idx, v)| {
            if v.fract() != 0.0 || v < 0.0 || v > u32::MAX as f64 {
                Err(RentError::malformed(name, Some(idx), format!("{} is not a whole count", v)))
            } else {
                Ok(v as u32)
            }
        })
        .collect()
}

fn string_column(df: &DataFrame, field: CategoricalField) -> Result<Vec<String>> {
    let name = field.column_name();
    let values = column(df, name)?.cast(&DataType::String)?;
    values
        .str()?
        .into_iter()
        .enumerate()
        .map(|(idx, v)| match v {
            Some(s) => Ok(s.to_string()),
            None => Err(RentError::malformed(name, Some(idx), "missing value")),
        })
        .collect()
}
