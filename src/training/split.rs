//! Seeded hold-out split

use crate::error::{RentError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Train and test row indices
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffle `0..n_samples` with `seed` and hold out `ceil(test_size * n)` rows.
///
/// Both sides are guaranteed to be non-empty.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<HoldoutSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RentError::InvalidParameter {
            name: "test_size".to_string(),
            value: test_size.to_string(),
            reason: "must be strictly between 0 and 1".to_string(),
        });
    }
    if n_samples < 2 {
        return Err(RentError::ValidationError(format!(
            "Need at least 2 samples for a train/test split, got {}",
            n_samples
        )));
    }

    let n_test = ((n_samples as f64 * test_size).ceil() as usize).clamp(1, n_samples - 1);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train_indices = indices.split_off(n_test);
    Ok(HoldoutSplit {
        train_indices,
        test_indices: indices,
    })
}
