//! Pipeline evaluation: predictions, confusion matrix, and derived metrics

use crate::data::CleanedDataset;
use crate::error::Result;
use crate::pipeline::Pipeline;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// True and predicted labels for one pipeline over the test set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSet {
    pub truth: Array1<f64>,
    pub predicted: Array1<f64>,
}

/// 2x2 confusion matrix; rows are the true class, columns the predicted
/// class, both ordered [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(truth: &Array1<f64>, predicted: &Array1<f64>) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (t, p) in truth.iter().zip(predicted.iter()) {
            counts[class_index(*t)][class_index(*p)] += 1;
        }
        Self { counts }
    }

    pub fn count(&self, true_class: usize, predicted_class: usize) -> usize {
        self.counts[true_class][predicted_class]
    }

    /// Total rows whose true class is `true_class`
    pub fn row_sum(&self, true_class: usize) -> usize {
        self.counts[true_class].iter().sum()
    }

    /// Total rows predicted as `predicted_class`
    pub fn col_sum(&self, predicted_class: usize) -> usize {
        self.counts[0][predicted_class] + self.counts[1][predicted_class]
    }

    pub fn total(&self) -> usize {
        self.row_sum(0) + self.row_sum(1)
    }

    /// Each row rescaled to sum to 1 (true-class proportions of the
    /// predictions); an empty row stays all zero.
    pub fn row_normalized(&self) -> [[f64; 2]; 2] {
        let mut out = [[0.0f64; 2]; 2];
        for (row, out_row) in self.counts.iter().zip(out.iter_mut()) {
            let sum: usize = row.iter().sum();
            if sum > 0 {
                for (cell, out_cell) in row.iter().zip(out_row.iter_mut()) {
                    *out_cell = *cell as f64 / sum as f64;
                }
            }
        }
        out
    }
}

/// Precision, recall and F1 for one class. Empty denominators yield 0
/// rather than NaN or an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassMetrics {
    fn from_confusion(confusion: &ConfusionMatrix, class: usize) -> Self {
        let true_positive = confusion.count(class, class);
        let predicted_positive = confusion.col_sum(class);
        let actual_positive = confusion.row_sum(class);

        let precision = if predicted_positive > 0 {
            true_positive as f64 / predicted_positive as f64
        } else {
            0.0
        };
        let recall = if actual_positive > 0 {
            true_positive as f64 / actual_positive as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
        }
    }
}

/// Derived evaluation metrics for one pipeline; immutable once computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    /// Per-class metrics indexed by class ([0] = bad, [1] = good)
    pub per_class: [ClassMetrics; 2],
}

impl Metrics {
    pub fn compute(truth: &Array1<f64>, predicted: &Array1<f64>) -> Self {
        let confusion = ConfusionMatrix::from_labels(truth, predicted);
        let total = confusion.total();
        let correct = confusion.count(0, 0) + confusion.count(1, 1);
        let accuracy = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        Self {
            accuracy,
            confusion,
            per_class: [
                ClassMetrics::from_confusion(&confusion, 0),
                ClassMetrics::from_confusion(&confusion, 1),
            ],
        }
    }
}

fn class_index(label: f64) -> usize {
    if label > 0.5 {
        1
    } else {
        0
    }
}

/// Fit the pipeline on the training set, predict the test set, and derive
/// all metrics. Deterministic given a deterministic pipeline and split.
pub fn evaluate(
    pipeline: &mut Pipeline,
    train: &CleanedDataset,
    test: &CleanedDataset,
) -> Result<(PredictionSet, Metrics)> {
    pipeline.fit(&train.features, &train.labels)?;
    let predicted = pipeline.predict(&test.features)?;

    let predictions = PredictionSet {
        truth: test.labels.clone(),
        predicted,
    };
    let metrics = Metrics::compute(&predictions.truth, &predictions.predicted);
    debug!(accuracy = metrics.accuracy, n_test = test.n_rows(), "pipeline evaluated");

    Ok((predictions, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_confusion_counts_and_accuracy() {
        let truth = array![0.0, 0.0, 1.0, 1.0, 1.0, 0.0];
        let predicted = array![0.0, 1.0, 1.0, 1.0, 0.0, 0.0];

        let m = Metrics::compute(&truth, &predicted);
        assert_eq!(m.confusion.count(0, 0), 2);
        assert_eq!(m.confusion.count(0, 1), 1);
        assert_eq!(m.confusion.count(1, 0), 1);
        assert_eq!(m.confusion.count(1, 1), 2);
        assert!((m.accuracy - 4.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_row_sums_match_true_class_counts() {
        let truth = array![0.0, 0.0, 0.0, 1.0, 1.0];
        let predicted = array![1.0, 1.0, 1.0, 0.0, 0.0];

        let confusion = ConfusionMatrix::from_labels(&truth, &predicted);
        assert_eq!(confusion.row_sum(0), 3);
        assert_eq!(confusion.row_sum(1), 2);
    }

    #[test]
    fn test_precision_recall_per_class() {
        let truth = array![0.0, 0.0, 1.0, 1.0, 1.0, 0.0];
        let predicted = array![0.0, 1.0, 1.0, 1.0, 0.0, 0.0];

        let m = Metrics::compute(&truth, &predicted);
        // Class 1: tp=2, predicted-positive=3, actual-positive=3
        assert!((m.per_class[1].precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((m.per_class[1].recall - 2.0 / 3.0).abs() < 1e-10);
        assert!((m.per_class[1].f1 - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        // Nothing predicted positive and nothing actually negative
        let truth = array![1.0, 1.0, 1.0];
        let predicted = array![0.0, 0.0, 0.0];

        let m = Metrics::compute(&truth, &predicted);
        assert_eq!(m.per_class[1].precision, 0.0);
        assert_eq!(m.per_class[1].recall, 0.0);
        assert_eq!(m.per_class[1].f1, 0.0);
        assert_eq!(m.per_class[0].recall, 0.0);
        assert_eq!(m.accuracy, 0.0);
    }

    #[test]
    fn test_row_normalization() {
        let truth = array![0.0, 0.0, 0.0, 0.0, 1.0];
        let predicted = array![0.0, 0.0, 0.0, 1.0, 1.0];

        let norm = ConfusionMatrix::from_labels(&truth, &predicted).row_normalized();
        assert!((norm[0][0] - 0.75).abs() < 1e-10);
        assert!((norm[0][1] - 0.25).abs() < 1e-10);
        assert!((norm[1][0] + norm[1][1] - 1.0).abs() < 1e-10);
    }
}
