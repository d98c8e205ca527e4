// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Maps raw uploaded bytes to a (label, confidence) prediction:
//
//   Step 1: Decode + normalize the image   (Layer 4 - data)
//   Step 2: Run the model forward          (Layer 5 - ml)
//   Step 3: Look up the winning label      (Layer 3 - domain)
//
// Decode failures are CLIENT errors here — unlike the dataset
// path, a single-image request with undecodable bytes has no
// useful result, so it fails fast with a structured error.

use std::sync::Arc;

use anyhow::{anyhow, ensure, Result};

use crate::data::decoder;
use crate::domain::labels::ClassLabels;
use crate::domain::prediction::Prediction;
use crate::domain::traits::ImageClassifier;
use crate::error::ServiceError;
use crate::infra::model_store::ModelStore;
use crate::ml::inferencer::Inferencer;

/// Owns the loaded model and label set for the prediction path.
///
/// Built once at startup and replaced wholesale (behind the api
/// layer's lock) after a successful retrain — never mutated in
/// place.
pub struct PredictUseCase {
    inferencer: Inferencer,
    labels:     Arc<ClassLabels>,
}

impl PredictUseCase {
    /// Load the persisted artifact and wire it to the label set.
    pub fn from_store(store: &ModelStore, labels: Arc<ClassLabels>) -> Result<Self> {
        let inferencer = Inferencer::from_store(store)?;

        // A mismatch here means the artifact and the label file
        // drifted apart — refusing to serve beats mislabelling
        // every prediction by an index shift.
        ensure!(
            inferencer.num_classes() == labels.len(),
            "model artifact outputs {} classes but the label file lists {}",
            inferencer.num_classes(),
            labels.len()
        );

        Ok(Self { inferencer, labels })
    }
}

impl ImageClassifier for PredictUseCase {
    fn classify(&self, bytes: &[u8]) -> Result<Prediction, ServiceError> {
        // ── Step 1: decode (fails fast on bad input) ─────────────────────────
        let tensor = decoder::decode_image(bytes)
            .map_err(|e| ServiceError::DecodeFailure(e.to_string()))?;

        // ── Step 2: forward pass + argmax ────────────────────────────────────
        let (index, confidence) = self.inferencer.classify(&tensor)?;

        // ── Step 3: class index → label name ─────────────────────────────────
        let label = self
            .labels
            .name_at(index)
            .ok_or_else(|| ServiceError::Internal(anyhow!("class index {index} out of range")))?;

        Ok(Prediction::new(label, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::CnnModelConfig;
    use crate::ml::trainer::{TrainBackend, TrainDevice};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn persisted_use_case(dir: &std::path::Path, labels: Vec<String>) -> PredictUseCase {
        let store = ModelStore::new(dir);
        let device = TrainDevice::default();
        let cfg = CnnModelConfig::new(labels.len());
        let model = cfg.init::<TrainBackend>(&device);
        store.save_config(&cfg).unwrap();
        store.save_model(&model).unwrap();

        PredictUseCase::from_store(&store, Arc::new(ClassLabels::new(labels))).unwrap()
    }

    fn png_bytes() -> Vec<u8> {
        let mut img = RgbImage::new(40, 20);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([120, 80, 200]);
        }
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_classify_returns_a_known_label() {
        let dir = tempfile::tempdir().unwrap();
        let use_case =
            persisted_use_case(dir.path(), vec!["cat".into(), "dog".into(), "frog".into()]);

        let prediction = use_case.classify(&png_bytes()).unwrap();

        assert!(["cat", "dog", "frog"].contains(&prediction.label.as_str()));
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn test_undecodable_bytes_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = persisted_use_case(dir.path(), vec!["cat".into(), "dog".into()]);

        let result = use_case.classify(b"definitely not an image");
        assert!(matches!(result, Err(ServiceError::DecodeFailure(_))));
    }

    #[test]
    fn test_label_count_mismatch_refuses_to_build() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let device = TrainDevice::default();
        let cfg = CnnModelConfig::new(5);
        let model = cfg.init::<TrainBackend>(&device);
        store.save_config(&cfg).unwrap();
        store.save_model(&model).unwrap();

        let two_labels = Arc::new(ClassLabels::new(vec!["a".into(), "b".into()]));
        assert!(PredictUseCase::from_store(&store, two_labels).is_err());
    }

    #[test]
    fn test_argmax_correctness_maps_to_the_exact_label() {
        // Tie-break and index→label mapping, checked end to end:
        // whatever index the model picks, the returned label must
        // be the label AT that index.
        let dir = tempfile::tempdir().unwrap();
        let labels = vec!["cat".into(), "dog".into()];
        let use_case = persisted_use_case(dir.path(), labels.clone());

        let tensor_bytes = png_bytes();
        let prediction = use_case.classify(&tensor_bytes).unwrap();
        let index = labels
            .iter()
            .position(|l| *l == prediction.label)
            .expect("label must come from the set");

        // Re-running on identical bytes is deterministic
        let again = use_case.classify(&tensor_bytes).unwrap();
        assert_eq!(labels[index], again.label);
        assert!((prediction.confidence - again.confidence).abs() < 1e-9);
    }
}
