//! Random forest of Gini trees

use crate::error::{FruitError, Result};
use crate::models::tree::DecisionTree;
use crate::models::Classifier;
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Bootstrap-aggregated decision trees with sqrt feature subsampling and
/// majority voting. Every source of randomness derives from `seed`, so a
/// fitted forest is reproducible bit for bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(FruitError::ShapeError {
                expected: format!("{} labels", n_samples),
                actual: format!("{} labels", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(FruitError::DataError(
                "cannot fit a forest on zero samples".to_string(),
            ));
        }

        let max_features = (x.ncols() as f64).sqrt().round().max(1.0) as usize;
        self.trees = Vec::with_capacity(self.n_estimators);

        for t in 0..self.n_estimators {
            let tree_seed = self.seed.wrapping_add(t as u64);
            let mut rng = ChaCha8Rng::seed_from_u64(tree_seed);

            let bootstrap: Vec<usize> =
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let x_boot = x.select(Axis(0), &bootstrap);
            let y_boot = y.select(Axis(0), &bootstrap);

            let mut tree = DecisionTree::new()
                .with_min_samples_split(self.min_samples_split)
                .with_min_samples_leaf(self.min_samples_leaf)
                .with_max_features(max_features)
                .with_seed(tree_seed);
            if let Some(depth) = self.max_depth {
                tree = tree.with_max_depth(depth);
            }

            tree.fit(&x_boot, &y_boot)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(FruitError::NotFitted);
        }

        let mut votes: Array1<f64> = Array1::zeros(x.nrows());
        for tree in &self.trees {
            votes = votes + tree.predict(x)?;
        }

        let majority = self.trees.len() as f64 / 2.0;
        Ok(votes.mapv(|v| if v >= majority { 1.0 } else { 0.0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [-3.0, -2.0],
            [-2.5, -3.0],
            [-2.0, -2.5],
            [-3.5, -2.2],
            [2.0, 3.0],
            [2.5, 2.0],
            [3.0, 2.5],
            [3.5, 3.2],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let mut forest = RandomForest::new(25).with_seed(42);
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let (x, y) = separable();
        let mut a = RandomForest::new(10).with_seed(7);
        let mut b = RandomForest::new(10).with_seed(7);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let forest = RandomForest::new(5);
        let err = forest.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, FruitError::NotFitted));
    }
}
