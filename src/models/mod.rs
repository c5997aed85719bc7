//! Binary classifiers
//!
//! The rest of the crate treats a classifier as an opaque trainable
//! predictor behind the [`Classifier`] trait; the two concrete models are
//! logistic regression and a random forest.

pub mod forest;
pub mod logistic;
pub mod tree;

pub use forest::RandomForest;
pub use logistic::LogisticRegression;
pub use tree::{DecisionTree, TreeNode};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// Trait for trainable binary classifiers. Labels are exactly 0.0 or 1.0.
pub trait Classifier: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict class labels (0.0 or 1.0) for each row
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}
