// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers. By programming against these
// traits instead of concrete types, the orchestration code
// can swap implementations without changing:
//   - DatasetLoader implements SampleSource
//   - PredictUseCase implements ImageClassifier
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::labels::ClassLabels;
use crate::domain::prediction::Prediction;
use crate::domain::report::TrainingSet;
use crate::error::ServiceError;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can assemble a labelled training set.
///
/// Implementations:
///   - DatasetLoader → walks a directory tree of class folders
pub trait SampleSource {
    /// Load every usable sample, keyed by the given label set.
    /// Per-file failures are recorded in the returned report,
    /// not raised as errors.
    fn load_all(&self, labels: &ClassLabels) -> Result<TrainingSet>;
}

// ─── ImageClassifier ──────────────────────────────────────────────────────────
/// Any component that maps raw image bytes to a prediction.
///
/// Implementations:
///   - PredictUseCase → decodes, runs the CNN, looks up the label
pub trait ImageClassifier {
    /// Classify one image. Fails fast with `DecodeFailure` when
    /// the bytes are not a decodable image.
    fn classify(&self, bytes: &[u8]) -> Result<Prediction, ServiceError>;
}
