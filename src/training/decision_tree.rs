//! Regression tree over encoded feature vectors

use crate::error::{RentError, Result};
use super::TreeConfig;
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Splits must remove at least this fraction of the node's squared error
const MIN_RELATIVE_GAIN: f64 = 1e-12;

/// Regression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node; samples with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Variance-reduction regression tree predicting monthly rent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentRegressor {
    config: TreeConfig,
    root: Option<TreeNode>,
    n_features: usize,
    feature_importances: Option<Vec<f64>>,
}

impl Default for RentRegressor {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl RentRegressor {
    /// Create an unfitted tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Fit the tree, replacing any previous structure
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        self.config.validate()?;
        self.root = None;
        self.feature_importances = None;

        let (n_samples, n_features) = x.dim();

        if n_samples != y.len() {
            return Err(RentError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(RentError::ValidationError(
                "Cannot fit a tree on an empty batch".to_string(),
            ));
        }
        if let Some(idx) = y.iter().position(|v| !v.is_finite()) {
            return Err(RentError::ValidationError(format!(
                "Target at record {} is not finite",
                idx
            )));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(RentError::ValidationError(
                "Encoded features contain non-finite values".to_string(),
            ));
        }

        self.n_features = n_features;

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);
        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        let root = self.build_tree(x, y, indices, 0, &mut rng, &mut importances);

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        self.root = Some(root);
        self.feature_importances = Some(importances);

        info!(
            n_samples,
            n_features,
            depth = self.depth(),
            n_leaves = self.n_leaves(),
            "Fitted regression tree"
        );
        Ok(self)
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        depth: usize,
        rng: &mut ChaCha8Rng,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n_samples as f64;
        let sse: f64 = indices.iter().map(|&i| (y[i] - mean).powi(2)).sum();

        let first = y[indices[0]];
        let is_pure = indices.iter().all(|&i| y[i] == first);

        let should_stop = is_pure
            || n_samples < self.config.min_samples_split
            || n_samples < 2 * self.config.min_samples_leaf
            || self.config.max_depth.map_or(false, |d| depth >= d);

        if should_stop {
            return TreeNode::Leaf { value: mean, n_samples };
        }

        let best = match self.find_best_split(x, y, &indices, mean, rng) {
            Some(best) if best.gain > sse * MIN_RELATIVE_GAIN => best,
            _ => return TreeNode::Leaf { value: mean, n_samples },
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[[i, best.feature_idx]] <= best.threshold);

        importances[best.feature_idx] += best.gain;

        let left = Box::new(self.build_tree(x, y, left_indices, depth + 1, rng, importances));
        let right = Box::new(self.build_tree(x, y, right_indices, depth + 1, rng, importances));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity: sse / n_samples as f64,
        }
    }

    /// Best split across features. Features are visited in a seeded random
    /// order and the first one reaching the maximal gain wins.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        mean: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let mut order: Vec<usize> = (0..x.ncols()).collect();
        order.shuffle(rng);

        let per_feature: Vec<Option<SplitCandidate>> = order
            .par_iter()
            .map(|&feature_idx| self.best_split_for_feature(x, y, indices, feature_idx, mean))
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .fold(None, |best, candidate| match best {
                Some(b) if b.gain >= candidate.gain => Some(b),
                _ => Some(candidate),
            })
    }

    /// Sorted sweep over one feature using running sums of centred targets
    fn best_split_for_feature(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        feature_idx: usize,
        mean: f64,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x[[i, feature_idx]], y[i] - mean))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        if pairs[0].0 == pairs[n - 1].0 {
            return None;
        }

        let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
        let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        let min_leaf = self.config.min_samples_leaf;
        let mut left_sum = 0.0f64;
        let mut left_sq = 0.0f64;
        let mut best: Option<SplitCandidate> = None;

        for i in 0..n - 1 {
            left_sum += pairs[i].1;
            left_sq += pairs[i].1 * pairs[i].1;

            let left_n = i + 1;
            let right_n = n - left_n;
            if left_n < min_leaf {
                continue;
            }
            if right_n < min_leaf {
                break;
            }
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let children_sse = (left_sq - left_sum * left_sum / left_n as f64)
                + (right_sq - right_sum * right_sum / right_n as f64);
            let gain = parent_sse - children_sse;

            if best.map_or(true, |b| gain > b.gain) {
                best = Some(SplitCandidate {
                    feature_idx,
                    threshold: midpoint(pairs[i].0, pairs[i + 1].0),
                    gain,
                });
            }
        }

        best
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(RentError::NotFitted)?;
        self.check_width(x.ncols())?;

        Ok(x.rows()
            .into_iter()
            .map(|row| Self::predict_sample(root, row))
            .collect())
    }

    /// Predict a single encoded vector
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        let root = self.root.as_ref().ok_or(RentError::NotFitted)?;
        self.check_width(row.len())?;
        Ok(Self::predict_sample(root, row))
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features {
            return Err(RentError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", width),
            });
        }
        Ok(())
    }

    fn predict_sample(root: &TreeNode, sample: ArrayView1<f64>) -> f64 {
        let mut node = root;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    node = if sample[*feature_idx] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Normalised total squared-error reduction per feature
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    /// Number of levels including the leaves; 0 when unfitted
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Self::node_depth)
    }

    fn node_depth(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => {
                1 + Self::node_depth(left).max(Self::node_depth(right))
            }
        }
    }

    /// Get number of leaves
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Self::count_leaves)
    }

    fn count_leaves(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => Self::count_leaves(left) + Self::count_leaves(right),
        }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }
}

/// Threshold halfway between two sorted distinct values, falling back to the
/// lower one when rounding would push the midpoint onto the upper value
fn midpoint(lower: f64, upper: f64) -> f64 {
    let mid = lower + (upper - lower) / 2.0;
    if mid >= upper { lower } else { mid }
}
