//! Leakage-safe preprocessing + model pipeline
//!
//! The scaler's statistics are frozen at fit time and only ever computed
//! from the training features handed to [`Pipeline::fit`]. Calling
//! `transform` or `predict` before fitting is a contract violation and
//! returns [`FruitError::NotFitted`] rather than silently refitting.

use crate::error::{FruitError, Result};
use crate::models::Classifier;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standardizing transform: (x - mean) / std per feature column.
/// Explicit fit/apply separation guards against train/test leakage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Option<Array1<f64>>,
    stds: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column mean and sample standard deviation (ddof 1).
    /// Zero-variance columns scale by 1.0 instead of dividing by zero.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let means = x.mean_axis(Axis(0)).ok_or_else(|| {
            FruitError::DataError("cannot fit scaler on an empty matrix".to_string())
        })?;

        let stds = if x.nrows() > 1 {
            x.std_axis(Axis(0), 1.0)
                .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
        } else {
            Array1::ones(x.ncols())
        };

        self.means = Some(means);
        self.stds = Some(stds);
        Ok(self)
    }

    /// Apply the frozen transform; never refits
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (means, stds) = match (&self.means, &self.stds) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(FruitError::NotFitted),
        };

        if x.ncols() != means.len() {
            return Err(FruitError::ShapeError {
                expected: format!("{} feature columns", means.len()),
                actual: format!("{} feature columns", x.ncols()),
            });
        }

        let centered = x - &means.clone().insert_axis(Axis(0));
        Ok(centered / &stds.clone().insert_axis(Axis(0)))
    }

    pub fn is_fitted(&self) -> bool {
        self.means.is_some()
    }

    /// Fitted per-column means, if fitted
    pub fn means(&self) -> Option<&Array1<f64>> {
        self.means.as_ref()
    }

    /// Fitted per-column standard deviations, if fitted
    pub fn stds(&self) -> Option<&Array1<f64>> {
        self.stds.as_ref()
    }
}

/// A standardizing transform composed with one trainable classifier,
/// fit and applied as a single unit.
pub struct Pipeline {
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    is_fitted: bool,
}

impl Pipeline {
    /// Build a pipeline around a classifier
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self {
            scaler: StandardScaler::new(),
            classifier,
            is_fitted: false,
        }
    }

    /// Fit the scaler on the training features only, then the classifier
    /// on the transformed features.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(FruitError::ShapeError {
                expected: format!("{} labels", x.nrows()),
                actual: format!("{} labels", y.len()),
            });
        }

        self.scaler.fit(x)?;
        let transformed = self.scaler.transform(x)?;
        self.classifier.fit(&transformed, y)?;
        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the already-fitted transform, then the classifier
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(FruitError::NotFitted);
        }
        let transformed = self.scaler.transform(x)?;
        self.classifier.predict(&transformed)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogisticRegression;
    use ndarray::array;

    #[test]
    fn test_scaler_centers_and_scales() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit(&x).unwrap().transform(&x).unwrap();

        for col in 0..2 {
            let mean: f64 = scaled.column(col).mean().unwrap();
            assert!(mean.abs() < 1e-10);
        }
    }

    #[test]
    fn test_scaler_zero_variance_column() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit(&x).unwrap().transform(&x).unwrap();
        assert!(scaled.column(0).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let scaler = StandardScaler::new();
        let err = scaler.transform(&array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, FruitError::NotFitted));
    }

    #[test]
    fn test_train_only_fit_is_reproducible_and_leakage_sensitive() {
        let train = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]];
        let full = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0], [100.0, 200.0]];

        let mut a = StandardScaler::new();
        let mut b = StandardScaler::new();
        a.fit(&train).unwrap();
        b.fit(&train).unwrap();
        assert_eq!(a.means().unwrap(), b.means().unwrap());
        assert_eq!(a.stds().unwrap(), b.stds().unwrap());

        let mut c = StandardScaler::new();
        c.fit(&full).unwrap();
        assert_ne!(a.means().unwrap(), c.means().unwrap());
        assert_ne!(a.stds().unwrap(), c.stds().unwrap());
    }

    #[test]
    fn test_pipeline_predict_before_fit_fails() {
        let pipeline = Pipeline::new(Box::new(LogisticRegression::new()));
        let err = pipeline.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, FruitError::NotFitted));
    }

    #[test]
    fn test_pipeline_shape_mismatch_fails() {
        let mut pipeline = Pipeline::new(Box::new(LogisticRegression::new()));
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0];
        let err = pipeline.fit(&x, &y).map(|_| ()).unwrap_err();
        assert!(matches!(err, FruitError::ShapeError { .. }));
    }
}
