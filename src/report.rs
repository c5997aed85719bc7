//! Side-by-side model comparison report
//!
//! Pure aggregation over already-computed [`Metrics`]; rendering is a
//! separate concern so the same report can go to the console as a
//! fixed-width table or elsewhere as JSON.

use crate::error::Result;
use crate::evaluation::Metrics;
use serde::Serialize;

/// Fixed metric-row ordering: accuracy first, then precision/recall/F1 for
/// class 0 (bad) and class 1 (good).
pub const METRIC_ROWS: [&str; 7] = [
    "Accuracy",
    "Precision (bad)",
    "Recall (bad)",
    "F1 (bad)",
    "Precision (good)",
    "Recall (good)",
    "F1 (good)",
];

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub metric: String,
    /// One value per model, in model input order
    pub values: Vec<f64>,
}

/// Comparison table keyed by metric name with one column per model
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub models: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ComparisonReport {
    /// Aggregate evaluator outputs; model column order follows input order
    pub fn from_results(results: &[(String, Metrics)]) -> Self {
        let models = results.iter().map(|(name, _)| name.clone()).collect();

        let rows = METRIC_ROWS
            .iter()
            .enumerate()
            .map(|(row_idx, metric)| ReportRow {
                metric: metric.to_string(),
                values: results
                    .iter()
                    .map(|(_, m)| metric_value(m, row_idx))
                    .collect(),
            })
            .collect();

        Self { models, rows }
    }

    /// Render as a fixed-width console table
    pub fn render_text(&self) -> String {
        let metric_width = METRIC_ROWS
            .iter()
            .map(|m| m.len())
            .max()
            .unwrap_or(0)
            .max("Metric".len());
        let col_width = self
            .models
            .iter()
            .map(|m| m.len())
            .max()
            .unwrap_or(0)
            .max(8);

        let mut out = String::new();
        out.push_str(&format!("{:<metric_width$}", "Metric"));
        for model in &self.models {
            out.push_str(&format!("  {:>col_width$}", model));
        }
        out.push('\n');
        out.push_str(&"─".repeat(metric_width + self.models.len() * (col_width + 2)));
        out.push('\n');

        for row in &self.rows {
            out.push_str(&format!("{:<metric_width$}", row.metric));
            for value in &row.values {
                out.push_str(&format!("  {:>col_width$.4}", value));
            }
            out.push('\n');
        }

        out
    }

    /// Structured rendering alternative
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn metric_value(metrics: &Metrics, row_idx: usize) -> f64 {
    match row_idx {
        0 => metrics.accuracy,
        1 => metrics.per_class[0].precision,
        2 => metrics.per_class[0].recall,
        3 => metrics.per_class[0].f1,
        4 => metrics.per_class[1].precision,
        5 => metrics.per_class[1].recall,
        _ => metrics.per_class[1].f1,
    }
}
