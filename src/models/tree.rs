//! CART decision tree (Gini impurity, binary labels)

use crate::error::{FruitError, Result};
use crate::models::Classifier;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Binary classification tree. With `max_features` set, each split
/// considers a seeded random subset of features, which is what the random
/// forest relies on for tree decorrelation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn build_node(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let positives = indices.iter().filter(|&&i| y[i] > 0.5).count();
        let leaf = TreeNode::Leaf {
            value: if positives * 2 >= n { 1.0 } else { 0.0 },
            n_samples: n,
        };

        let pure = positives == 0 || positives == n;
        let depth_reached = self.max_depth.map(|d| depth >= d).unwrap_or(false);
        if pure || depth_reached || n < self.min_samples_split {
            return leaf;
        }

        let features = self.candidate_features(x.ncols(), rng);
        let Some((feature_idx, threshold)) =
            self.best_split(x, y, indices, &features, positives)
        else {
            return leaf;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| x[[i, feature_idx]] <= threshold);

        TreeNode::Split {
            feature_idx,
            threshold,
            left: Box::new(self.build_node(x, y, &left_idx, depth + 1, rng)),
            right: Box::new(self.build_node(x, y, &right_idx, depth + 1, rng)),
        }
    }

    fn candidate_features(&self, n_features: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        match self.max_features {
            Some(k) if k < n_features => {
                let mut sampled = rand::seq::index::sample(rng, n_features, k).into_vec();
                sampled.sort_unstable();
                sampled
            }
            _ => (0..n_features).collect(),
        }
    }

    /// Exhaustive threshold search over the candidate features; returns the
    /// split minimizing weighted Gini impurity, or `None` when no split
    /// improves on the parent.
    fn best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        features: &[usize],
        positives: usize,
    ) -> Option<(usize, f64)> {
        let n = indices.len();
        let parent_gini = gini(n, positives);

        let mut best: Option<(usize, f64)> = None;
        let mut best_score = parent_gini - 1e-12;

        for &feature_idx in features {
            let mut samples: Vec<(f64, bool)> = indices
                .iter()
                .map(|&i| (x[[i, feature_idx]], y[i] > 0.5))
                .collect();
            samples.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_n = 0usize;
            let mut left_pos = 0usize;

            for split_at in 1..n {
                left_n += 1;
                if samples[split_at - 1].1 {
                    left_pos += 1;
                }

                // Can only cut between distinct feature values
                if samples[split_at - 1].0 == samples[split_at].0 {
                    continue;
                }

                let right_n = n - left_n;
                if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                    continue;
                }

                let right_pos = positives - left_pos;
                let score = (left_n as f64 * gini(left_n, left_pos)
                    + right_n as f64 * gini(right_n, right_pos))
                    / n as f64;

                if score < best_score {
                    best_score = score;
                    let threshold = (samples[split_at - 1].0 + samples[split_at].0) / 2.0;
                    best = Some((feature_idx, threshold));
                }
            }
        }

        best
    }

    fn predict_row(node: &TreeNode, row: ndarray::ArrayView1<f64>) -> f64 {
        match node {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if row[*feature_idx] <= *threshold {
                    Self::predict_row(left, row)
                } else {
                    Self::predict_row(right, row)
                }
            }
        }
    }
}

fn gini(n: usize, positives: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

impl Classifier for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(FruitError::ShapeError {
                expected: format!("{} labels", x.nrows()),
                actual: format!("{} labels", y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(FruitError::DataError(
                "cannot fit a tree on zero samples".to_string(),
            ));
        }

        let indices: Vec<usize> = (0..x.nrows()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.root = Some(self.build_node(x, y, &indices, 0, &mut rng));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(FruitError::NotFitted)?;
        Ok(Array1::from_iter(
            x.rows().into_iter().map(|row| Self::predict_row(root, row)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_threshold_split() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut tree = DecisionTree::new();
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), y);

        // The learned threshold generalizes between the clusters
        let probe = array![[5.0], [9.0]];
        let preds = tree.predict(&probe).unwrap();
        assert_eq!(preds[0], 0.0);
        assert_eq!(preds[1], 1.0);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 1.0, 0.0, 1.0];

        let mut stump = DecisionTree::new().with_max_depth(0);
        stump.fit(&x, &y).unwrap();
        // Depth zero means a single majority leaf
        let preds = stump.predict(&x).unwrap();
        assert!(preds.iter().all(|&p| p == preds[0]));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let tree = DecisionTree::new();
        let err = tree.predict(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, FruitError::NotFitted));
    }
}
