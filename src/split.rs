//! Stratified train/test splitting

use crate::data::{CleanedDataset, QualityLabel};
use crate::error::{FruitError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// An owning, disjoint partition of a cleaned dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: CleanedDataset,
    pub test: CleanedDataset,
}

/// Stratified holdout splitter. Each class contributes
/// `round(class_len * test_fraction)` rows to the test side, so both sides
/// approximate the full dataset's class proportions within stratified
/// rounding. Deterministic for a fixed seed.
#[derive(Debug, Clone)]
pub struct StratifiedSplitter {
    test_fraction: f64,
    seed: u64,
}

impl StratifiedSplitter {
    /// Create a splitter with the default 0.2 test fraction
    pub fn new(seed: u64) -> Self {
        Self {
            test_fraction: 0.2,
            seed,
        }
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Partition the dataset. Every row lands in exactly one side; row order
    /// within each side follows the original dataset order.
    pub fn split(&self, data: &CleanedDataset) -> Result<Split> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(FruitError::DataError(format!(
                "test fraction must be strictly between 0 and 1, got {}",
                self.test_fraction
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut train_idx: Vec<usize> = Vec::new();
        let mut test_idx: Vec<usize> = Vec::new();

        // Fixed class iteration order keeps the rng stream deterministic
        for class in [QualityLabel::Bad, QualityLabel::Good] {
            let target = class.as_f64();
            let mut indices: Vec<usize> = data
                .labels
                .iter()
                .enumerate()
                .filter(|(_, &label)| label == target)
                .map(|(i, _)| i)
                .collect();

            if indices.len() < 2 {
                return Err(FruitError::InsufficientData {
                    label: class.name().to_string(),
                    count: indices.len(),
                    needed: 2,
                });
            }

            indices.shuffle(&mut rng);
            let n_test = (indices.len() as f64 * self.test_fraction).round() as usize;
            debug!(class = class.name(), total = indices.len(), n_test, "stratum allocated");

            test_idx.extend(indices.drain(..n_test));
            train_idx.extend(indices);
        }

        train_idx.sort_unstable();
        test_idx.sort_unstable();

        Ok(Split {
            train: data.take(&train_idx),
            test: data.take(&test_idx),
        })
    }
}
