// ============================================================
// Layer 3 — Dataset and Retraining Reports
// ============================================================
// Structured results for the data-ingestion pipeline.
//
// The dataset loader never fails on a single bad file — it
// skips it. But "skipped" must not mean "silent": every skip
// is recorded here with its reason, and the counts are
// surfaced in the retrain response so a caller can tell that
// 40 of their 50 uploaded images were unreadable.

use serde::{Deserialize, Serialize};

use crate::domain::image::TrainingSample;

/// One file the dataset loader could not use, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path:   String,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path:   path.into(),
            reason: reason.into(),
        }
    }
}

/// Everything the dataset loader produced from one directory
/// tree: the usable samples plus a record of every skip.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub samples: Vec<TrainingSample>,
    pub skipped: Vec<SkippedFile>,
}

impl TrainingSet {
    pub fn new(samples: Vec<TrainingSample>, skipped: Vec<SkippedFile>) -> Self {
        Self { samples, skipped }
    }

    /// An empty batch is a distinct, reportable condition —
    /// the orchestrator turns it into a client error, never
    /// into a silent no-op training run.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Summary of a completed retraining run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrainReport {
    /// How many images were actually trained on
    pub samples: usize,

    /// Files that were present but excluded, with reasons
    pub skipped: Vec<SkippedFile>,

    /// Number of passes made over the training batch
    pub epochs: usize,
}
