//! Raw-table cleaning and normalization
//!
//! Turns the raw tabular input into a [`CleanedDataset`]: every numeric
//! feature coerced to a finite float with mean imputation, ripeness mapped
//! through its ordinal vocabulary with mode imputation, and rows with an
//! unresolvable label dropped outright. Imputation and unmapped tokens are
//! defined fallbacks, never errors.

use crate::data::{
    CleanedDataset, QualityLabel, Ripeness, LABEL_COLUMN, MISSING_TOKEN, NUMERIC_FEATURES,
    RIPENESS_COLUMN,
};
use crate::error::{FruitError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use tracing::debug;

/// Data cleaner. Stateless apart from the configurable missing-value token.
#[derive(Debug, Clone)]
pub struct Cleaner {
    missing_token: String,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            missing_token: MISSING_TOKEN.to_string(),
        }
    }

    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = token.into();
        self
    }

    /// Clean the raw table. Fails only on a missing required column or an
    /// empty result; individual bad values fall back to imputation.
    ///
    /// Feature means are computed over all rows with a known value for that
    /// feature, before label filtering, so rows later dropped for a missing
    /// label still contribute to the imputation statistics. The label itself
    /// is never imputed.
    pub fn clean(&self, df: &DataFrame) -> Result<CleanedDataset> {
        // The identifier column, if present, is simply never read.
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(NUMERIC_FEATURES.len() + 1);

        for name in NUMERIC_FEATURES {
            let series = required_column(df, name)?;
            let raw = self.numeric_values(series)?;
            columns.push(impute_mean(&raw));
        }

        let ripeness_raw = self.ripeness_values(required_column(df, RIPENESS_COLUMN)?)?;
        columns.push(impute_mode(&ripeness_raw));

        let label_raw = self.label_values(required_column(df, LABEL_COLUMN)?)?;
        let keep: Vec<usize> = label_raw
            .iter()
            .enumerate()
            .filter_map(|(i, label)| label.map(|_| i))
            .collect();

        let dropped = df.height() - keep.len();
        if dropped > 0 {
            debug!(dropped, "rows dropped for unresolvable label");
        }
        if keep.is_empty() {
            return Err(FruitError::EmptyDataset);
        }

        let mut features = Array2::zeros((keep.len(), columns.len()));
        for (row_out, &row_in) in keep.iter().enumerate() {
            for (col, values) in columns.iter().enumerate() {
                features[[row_out, col]] = values[row_in];
            }
        }

        let labels = Array1::from_iter(
            label_raw
                .iter()
                .filter_map(|label| label.map(QualityLabel::as_f64)),
        );

        Ok(CleanedDataset { features, labels })
    }

    /// Read a numeric feature as optional floats. Sentinel tokens, parse
    /// failures, nulls, and non-finite values all become unknown.
    fn numeric_values(&self, series: &Series) -> Result<Vec<Option<f64>>> {
        match series.dtype() {
            DataType::String => {
                let ca = series.str()?;
                Ok(ca
                    .into_iter()
                    .map(|opt| opt.and_then(|token| self.parse_numeric(token)))
                    .collect())
            }
            _ => {
                let casted = series.cast(&DataType::Float64)?;
                let ca = casted.f64()?;
                Ok(ca
                    .into_iter()
                    .map(|opt| opt.filter(|v| v.is_finite()))
                    .collect())
            }
        }
    }

    fn parse_numeric(&self, token: &str) -> Option<f64> {
        let trimmed = token.trim();
        if trimmed == self.missing_token {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn ripeness_values(&self, series: &Series) -> Result<Vec<Option<Ripeness>>> {
        match series.dtype() {
            DataType::String => {
                let ca = series.str()?;
                Ok(ca
                    .into_iter()
                    .map(|opt| {
                        opt.and_then(|token| {
                            if token.trim() == self.missing_token {
                                None
                            } else {
                                Ripeness::from_token(token)
                            }
                        })
                    })
                    .collect())
            }
            _ => {
                let casted = series.cast(&DataType::Float64)?;
                let ca = casted.f64()?;
                Ok(ca
                    .into_iter()
                    .map(|opt| opt.and_then(Ripeness::from_ordinal))
                    .collect())
            }
        }
    }

    fn label_values(&self, series: &Series) -> Result<Vec<Option<QualityLabel>>> {
        match series.dtype() {
            DataType::String => {
                let ca = series.str()?;
                Ok(ca
                    .into_iter()
                    .map(|opt| {
                        opt.and_then(|token| {
                            if token.trim() == self.missing_token {
                                None
                            } else {
                                QualityLabel::from_token(token)
                            }
                        })
                    })
                    .collect())
            }
            _ => {
                let casted = series.cast(&DataType::Float64)?;
                let ca = casted.f64()?;
                Ok(ca
                    .into_iter()
                    .map(|opt| opt.and_then(QualityLabel::from_value))
                    .collect())
            }
        }
    }
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| FruitError::MissingColumn(name.to_string()))
}

/// Fill unknowns with the mean of the known values. A column with no known
/// value at all falls back to 0.0.
fn impute_mean(values: &[Option<f64>]) -> Vec<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.iter().flatten() {
        sum += v;
        count += 1;
    }
    let mean = if count > 0 { sum / count as f64 } else { 0.0 };
    values.iter().map(|v| v.unwrap_or(mean)).collect()
}

/// Fill unknown ripeness entries with the column mode. Ties resolve to the
/// lower ordinal; a column with no known value defaults to medium (2).
fn impute_mode(values: &[Option<Ripeness>]) -> Vec<f64> {
    let mut counts = [0usize; 3];
    for r in values.iter().flatten() {
        counts[*r as usize - 1] += 1;
    }

    let mut mode = Ripeness::DEFAULT;
    let mut best = 0usize;
    for candidate in [Ripeness::Green, Ripeness::Medium, Ripeness::Ripe] {
        let count = counts[candidate as usize - 1];
        if count > best {
            best = count;
            mode = candidate;
        }
    }

    values
        .iter()
        .map(|r| r.unwrap_or(mode).ordinal())
        .collect()
}
