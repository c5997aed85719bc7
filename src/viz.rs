//! Confusion-matrix visualization sink
//!
//! Consumes true/predicted label pairs plus a title and exposes the
//! row-normalized matrix (each row sums to 1 over that true class's
//! predictions). Only text rendering is provided here; richer rendering
//! backends can consume [`ConfusionMatrixView::matrix`] directly.

use crate::data::QualityLabel;
use crate::evaluation::{ConfusionMatrix, PredictionSet};
use serde::Serialize;

/// Display order for classes: good first, then bad
pub const CLASS_DISPLAY: [QualityLabel; 2] = [QualityLabel::Good, QualityLabel::Bad];

/// Row-normalized confusion matrix ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ConfusionMatrixView {
    pub title: String,
    /// Class names in display order
    pub class_names: [&'static str; 2],
    /// matrix[i][j] = fraction of display-class-i rows predicted as
    /// display-class j
    matrix: [[f64; 2]; 2],
}

impl ConfusionMatrixView {
    pub fn new(predictions: &PredictionSet, title: impl Into<String>) -> Self {
        let confusion = ConfusionMatrix::from_labels(&predictions.truth, &predictions.predicted);
        let normalized = confusion.row_normalized();

        // Reindex from class order [0, 1] into display order
        let mut matrix = [[0.0f64; 2]; 2];
        for (i, row_class) in CLASS_DISPLAY.iter().enumerate() {
            for (j, col_class) in CLASS_DISPLAY.iter().enumerate() {
                matrix[i][j] = normalized[row_class.index()][col_class.index()];
            }
        }

        Self {
            title: title.into(),
            class_names: [CLASS_DISPLAY[0].name(), CLASS_DISPLAY[1].name()],
            matrix,
        }
    }

    pub fn matrix(&self) -> &[[f64; 2]; 2] {
        &self.matrix
    }

    /// Text heatmap with per-cell percentages
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Confusion matrix — {} (%)\n", self.title));
        out.push_str(&format!(
            "{:<12} {:>10} {:>10}\n",
            "true \\ pred", self.class_names[0], self.class_names[1]
        ));

        for (i, name) in self.class_names.iter().enumerate() {
            out.push_str(&format!(
                "{:<12} {:>9.2}% {:>9.2}%\n",
                name,
                self.matrix[i][0] * 100.0,
                self.matrix[i][1] * 100.0
            ));
        }

        out
    }
}
