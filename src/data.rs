//! Dataset schema, fixed vocabularies, and the cleaned dataset type

use crate::error::{FruitError, Result};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier column dropped before any processing
pub const ID_COLUMN: &str = "A_id";

/// The six continuous sensory measurements, in feature-matrix order
pub const NUMERIC_FEATURES: [&str; 6] = [
    "Size",
    "Weight",
    "Sweetness",
    "Crunchiness",
    "Juiciness",
    "Acidity",
];

/// Ordinal ripeness attribute (last feature column)
pub const RIPENESS_COLUMN: &str = "Ripeness";

/// Binary target column
pub const LABEL_COLUMN: &str = "Quality";

/// Sentinel token marking a missing value in the raw table
pub const MISSING_TOKEN: &str = "-";

/// All feature columns in the fixed matrix order (ripeness last)
pub const FEATURE_NAMES: [&str; 7] = [
    "Size",
    "Weight",
    "Sweetness",
    "Crunchiness",
    "Juiciness",
    "Acidity",
    "Ripeness",
];

/// Ripeness vocabulary. The ordinal encoding is part of the data contract:
/// green < medium < ripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ripeness {
    Green = 1,
    Medium = 2,
    Ripe = 3,
}

impl Ripeness {
    /// Fallback when a column has no known ripeness value at all
    pub const DEFAULT: Ripeness = Ripeness::Medium;

    /// Total mapping from a raw token. Unrecognized tokens map to `None`
    /// (the "unknown" sentinel path), never to an error.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "green" => Some(Ripeness::Green),
            "medium" => Some(Ripeness::Medium),
            "ripe" => Some(Ripeness::Ripe),
            _ => None,
        }
    }

    /// Accept an already-encoded ordinal when the raw column is numeric
    pub fn from_ordinal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        match value.round() as i64 {
            1 => Some(Ripeness::Green),
            2 => Some(Ripeness::Medium),
            3 => Some(Ripeness::Ripe),
            _ => None,
        }
    }

    pub fn ordinal(self) -> f64 {
        self as i64 as f64
    }
}

/// Binary quality label vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    Bad = 0,
    Good = 1,
}

impl QualityLabel {
    /// Total mapping from a raw token; unrecognized tokens map to `None`
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "bad" => Some(QualityLabel::Bad),
            "good" => Some(QualityLabel::Good),
            _ => None,
        }
    }

    /// Accept an already-encoded 0/1 label when the raw column is numeric
    pub fn from_value(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        match value.round() as i64 {
            0 => Some(QualityLabel::Bad),
            1 => Some(QualityLabel::Good),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        self as i64 as f64
    }

    /// Class index in metric/confusion-matrix ordering ([0, 1])
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            QualityLabel::Bad => "bad",
            QualityLabel::Good => "good",
        }
    }
}

/// Fully numeric, label-complete dataset produced by the cleaner.
///
/// Invariants: every feature value is finite, the ripeness column holds
/// only {1.0, 2.0, 3.0}, and every label is exactly 0.0 or 1.0. Immutable
/// once produced; downstream stages only read or `take` row subsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedDataset {
    /// Row-major feature matrix, columns ordered as [`FEATURE_NAMES`]
    pub features: Array2<f64>,
    /// Parallel label vector (0.0 = bad, 1.0 = good)
    pub labels: Array1<f64>,
}

impl CleanedDataset {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Owning row selection; used by the splitter to materialize each side
    pub fn take(&self, indices: &[usize]) -> CleanedDataset {
        CleanedDataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }

    /// Row counts per class, indexed by [`QualityLabel::index`]
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for &label in self.labels.iter() {
            counts[if label > 0.5 { 1 } else { 0 }] += 1;
        }
        counts
    }
}

/// Load the raw tabular input. The file must exist and carry a header row;
/// column typing is left to schema inference (the cleaner copes with both
/// string and numeric representations).
pub fn load_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(FruitError::InputNotFound(path.display().to_string()));
    }

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(1000))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ripeness_vocabulary() {
        assert_eq!(Ripeness::from_token("green"), Some(Ripeness::Green));
        assert_eq!(Ripeness::from_token(" Ripe "), Some(Ripeness::Ripe));
        assert_eq!(Ripeness::from_token("overripe"), None);
        assert_eq!(Ripeness::from_token("-"), None);
        assert_eq!(Ripeness::Medium.ordinal(), 2.0);
    }

    #[test]
    fn test_ripeness_from_ordinal() {
        assert_eq!(Ripeness::from_ordinal(3.0), Some(Ripeness::Ripe));
        assert_eq!(Ripeness::from_ordinal(1.4), Some(Ripeness::Green));
        assert_eq!(Ripeness::from_ordinal(7.0), None);
        assert_eq!(Ripeness::from_ordinal(f64::NAN), None);
    }

    #[test]
    fn test_label_vocabulary() {
        assert_eq!(QualityLabel::from_token("good"), Some(QualityLabel::Good));
        assert_eq!(QualityLabel::from_token("BAD"), Some(QualityLabel::Bad));
        assert_eq!(QualityLabel::from_token("meh"), None);
        assert_eq!(QualityLabel::Good.as_f64(), 1.0);
        assert_eq!(QualityLabel::Bad.index(), 0);
    }

    #[test]
    fn test_take_and_class_counts() {
        let data = CleanedDataset {
            features: Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap(),
            labels: Array1::from_vec(vec![0.0, 1.0, 1.0, 0.0]),
        };
        assert_eq!(data.class_counts(), [2, 2]);

        let subset = data.take(&[1, 3]);
        assert_eq!(subset.n_rows(), 2);
        assert_eq!(subset.labels.to_vec(), vec![1.0, 0.0]);
        assert_eq!(subset.features[[0, 0]], 2.0);
    }

    #[test]
    fn test_load_table_missing_file() {
        let err = load_table(Path::new("/nonexistent/apples.csv")).unwrap_err();
        assert!(matches!(err, FruitError::InputNotFound(_)));
    }
}
