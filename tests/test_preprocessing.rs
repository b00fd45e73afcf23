//! Integration test: Feature encoding end-to-end

use rent_estimator::error::RentError;
use rent_estimator::preprocessing::{EncoderConfig, FeatureEncoder, UnknownCategoryPolicy};
use rent_estimator::record::{CategoricalField, NumericField, PropertyRecord};

fn listing(bhk: u32, size: f64, bathroom: u32, city: &str, furnishing: &str, floor: &str, contact: &str) -> PropertyRecord {
    PropertyRecord {
        bhk,
        size,
        bathroom,
        city: city.to_string(),
        furnishing_status: furnishing.to_string(),
        floor: floor.to_string(),
        point_of_contact: contact.to_string(),
    }
}

fn sample_records() -> Vec<PropertyRecord> {
    vec![
        listing(2, 1100.0, 2, "Kolkata", "Unfurnished", "Ground out of 2", "Contact Owner"),
        listing(2, 800.0, 1, "Kolkata", "Semi-Furnished", "1 out of 3", "Contact Owner"),
        listing(1, 650.0, 1, "Mumbai", "Furnished", "5 out of 12", "Contact Agent"),
        listing(3, 1600.0, 3, "Bangalore", "Semi-Furnished", "2 out of 4", "Contact Agent"),
        listing(2, 1000.0, 2, "Delhi", "Unfurnished", "1 out of 3", "Contact Owner"),
        listing(4, 2400.0, 4, "Hyderabad", "Furnished", "Ground out of 3", "Contact Owner"),
    ]
}

#[test]
fn test_encoder_fit_transform_shape() {
    let records = sample_records();
    let mut encoder = FeatureEncoder::new();
    let encoded = encoder.fit_transform(&records).unwrap();

    let vocab_total: usize = encoder.vocabularies().iter().map(|v| v.len()).sum();
    assert_eq!(encoder.n_features_out(), NumericField::ALL.len() + vocab_total);
    assert_eq!(encoded.nrows(), records.len());
    assert_eq!(encoded.ncols(), encoder.n_features_out());
}

#[test]
fn test_numeric_columns_are_standardized() {
    let records = sample_records();
    let mut encoder = FeatureEncoder::new();
    let encoded = encoder.fit_transform(&records).unwrap();

    for col in 0..NumericField::ALL.len() {
        let column = encoded.column(col);
        let mean = column.sum() / column.len() as f64;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / column.len() as f64;
        assert!(mean.abs() < 1e-9, "column {} mean {}", col, mean);
        assert!((var - 1.0).abs() < 1e-9, "column {} variance {}", col, var);
    }
}

#[test]
fn test_one_hot_blocks_sum_to_one_for_known_values() {
    let records = sample_records();
    let mut encoder = FeatureEncoder::new();
    let encoded = encoder.fit_transform(&records).unwrap();

    let mut offset = NumericField::ALL.len();
    for vocab in encoder.vocabularies() {
        for row in encoded.rows() {
            let block = row.slice(ndarray::s![offset..offset + vocab.len()]);
            assert_eq!(block.sum(), 1.0);
            assert!(block.iter().all(|&v| v == 0.0 || v == 1.0));
        }
        offset += vocab.len();
    }
    assert_eq!(offset, encoder.n_features_out());
}

#[test]
fn test_vocabulary_is_sorted() {
    let mut encoder = FeatureEncoder::new();
    encoder.fit(&sample_records()).unwrap();

    let cities = &encoder.vocabulary(CategoricalField::City).unwrap().categories;
    assert_eq!(cities, &vec!["Bangalore", "Delhi", "Hyderabad", "Kolkata", "Mumbai"]);
}

#[test]
fn test_unseen_category_produces_zero_block() {
    let mut encoder = FeatureEncoder::new();
    encoder.fit(&sample_records()).unwrap();

    let unseen = listing(2, 900.0, 2, "Chennai", "Unfurnished", "1 out of 3", "Contact Builder");
    let row = encoder.transform_one(&unseen).unwrap();
    assert_eq!(row.len(), encoder.n_features_out());

    let names = encoder.feature_names();
    for (name, value) in names.iter().zip(row.iter()) {
        if name.starts_with("City=") || name.starts_with("Point of Contact=") {
            assert_eq!(*value, 0.0, "{} should be zero", name);
        }
    }
    let unfurnished = names.iter().position(|n| n == "Furnishing Status=Unfurnished").unwrap();
    assert_eq!(row[unfurnished], 1.0);
}

#[test]
fn test_strict_policy_rejects_unseen_category() {
    let config = EncoderConfig::new().with_unknown_policy(UnknownCategoryPolicy::Error);
    let mut encoder = FeatureEncoder::with_config(config);
    encoder.fit(&sample_records()).unwrap();

    let unseen = listing(2, 900.0, 2, "Chennai", "Unfurnished", "1 out of 3", "Contact Owner");
    match encoder.transform_one(&unseen).unwrap_err() {
        RentError::UnknownCategory { field, value } => {
            assert_eq!(field, "City");
            assert_eq!(value, "Chennai");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_degenerate_numeric_field_encodes_zero() {
    let records: Vec<PropertyRecord> = (0..4)
        .map(|i| listing(2, 700.0 + 100.0 * i as f64, 2, "Delhi", "Furnished", "1 out of 2", "Contact Owner"))
        .collect();
    let mut encoder = FeatureEncoder::new();
    let encoded = encoder.fit_transform(&records).unwrap();

    // BHK and Bathroom never vary
    assert!(encoded.column(0).iter().all(|&v| v == 0.0));
    assert!(encoded.column(2).iter().all(|&v| v == 0.0));
    assert!(encoded.column(1).iter().any(|&v| v != 0.0));

    let row = encoder
        .transform_one(&listing(5, 900.0, 5, "Delhi", "Furnished", "1 out of 2", "Contact Owner"))
        .unwrap();
    assert_eq!(row[0], 0.0);
    assert!(row.iter().all(|v| v.is_finite()));
}

#[test]
fn test_fit_rejects_empty_and_malformed_batches() {
    let mut encoder = FeatureEncoder::new();
    assert!(encoder.fit(&[]).is_err());

    let mut records = sample_records();
    records[4].city = "  ".to_string();
    match encoder.fit(&records).unwrap_err() {
        RentError::MalformedInput { field, record, .. } => {
            assert_eq!(field, "City");
            assert_eq!(record, Some(4));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!encoder.is_fitted());
}

#[test]
fn test_transform_is_deterministic() {
    let records = sample_records();
    let mut a = FeatureEncoder::new();
    let mut b = FeatureEncoder::new();
    assert_eq!(a.fit_transform(&records).unwrap(), b.fit_transform(&records).unwrap());
    assert_eq!(a.feature_names(), b.feature_names());
}
