//! Model training module
//!
//! Provides:
//! - Tree and training configuration
//! - The variance-reduction regression tree used for rent prediction
//! - Regression metrics (RMSE, R², MAE)
//! - A seeded hold-out split

mod config;
mod models;
pub mod decision_tree;
pub mod split;

pub use config::{TrainingConfig, TreeConfig};
pub use models::RegressionMetrics;
pub use decision_tree::{RentRegressor, TreeNode};
pub use split::{train_test_split, HoldoutSplit};
