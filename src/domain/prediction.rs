// ============================================================
// Layer 3 — Prediction Domain Type
// ============================================================
// The result of classifying one image: the single most
// probable label and how confident the model was in it.

use serde::{Deserialize, Serialize};

/// The outcome of classifying a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The winning class label (always a member of the label set)
    pub label: String,

    /// The winning class probability, in [0, 1]
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
