// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::domain::image::{ImageTensor, CHANNELS, IMAGE_SIDE};
use crate::infra::model_store::ModelStore;
use crate::ml::model::CnnModel;

pub type InferBackend = burn::backend::NdArray;
pub type InferDevice  = burn::backend::ndarray::NdArrayDevice;

/// Holds the loaded model and answers single-image queries.
/// Built once at process start (and rebuilt after a successful
/// retrain); read-only afterwards.
pub struct Inferencer {
    model:       CnnModel<InferBackend>,
    num_classes: usize,
    device:      InferDevice,
}

impl Inferencer {
    /// Load the persisted artifact and its architecture config.
    pub fn from_store(store: &ModelStore) -> Result<Self> {
        let device = InferDevice::default();
        let cfg = store.load_config()?;
        let model: CnnModel<InferBackend> = cfg.init(&device);
        let model = store.load_model(model, &device)?;
        tracing::info!("Model loaded ({} classes)", cfg.num_classes);
        Ok(Self {
            model,
            num_classes: cfg.num_classes,
            device,
        })
    }

    /// Build an inferencer around an already-constructed model.
    /// Used by tests; the service always goes through the store.
    pub fn from_model(model: CnnModel<InferBackend>, num_classes: usize) -> Self {
        Self {
            model,
            num_classes,
            device: InferDevice::default(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Classify one decoded image.
    ///
    /// Returns the winning class index and its probability. The
    /// probability vector comes from a softmax over the logits,
    /// so the confidence is always in [0, 1].
    pub fn classify(&self, tensor: &ImageTensor) -> Result<(usize, f64)> {
        // Single-item batch: [1, 32, 32, 3] → [1, 3, 32, 32]
        let input = Tensor::<InferBackend, 1>::from_floats(tensor.pixels(), &self.device)
            .reshape([1, IMAGE_SIDE, IMAGE_SIDE, CHANNELS])
            .permute([0, 3, 1, 2]);

        let logits = self.model.forward(input); // [1, num_classes]
        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("cannot read probability vector: {e:?}"))?;

        let (index, confidence) = argmax(&probs)
            .ok_or_else(|| anyhow::anyhow!("model produced an empty probability vector"))?;

        tracing::debug!("Predicted class {} conf={:.4}", index, confidence);
        Ok((index, confidence as f64))
    }
}

/// Index and value of the maximum element.
///
/// Ties break to the LOWEST index: the scan only replaces the
/// current best on a strictly greater value. This matches the
/// conventional argmax and keeps predictions deterministic.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    if values.is_empty() {
        return None;
    }

    let mut best_index = 0usize;
    let mut best_value = f32::NEG_INFINITY;

    for (i, &v) in values.iter().enumerate() {
        // Strictly greater: an equal value never displaces an
        // earlier winner
        if v > best_value {
            best_value = v;
            best_index = i;
        }
    }

    Some((best_index, best_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::TENSOR_LEN;
    use crate::ml::model::CnnModelConfig;

    #[test]
    fn test_argmax_picks_the_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
    }

    #[test]
    fn test_argmax_breaks_ties_to_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5, 0.5]), Some((1, 0.5)));
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
    }

    #[test]
    fn test_argmax_of_empty_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_classify_returns_valid_index_and_unit_confidence() {
        // Even an untrained model must produce a class index in
        // range and a softmax confidence in [0, 1].
        let device = InferDevice::default();
        let model = CnnModelConfig::new(4).init::<InferBackend>(&device);
        let inferencer = Inferencer::from_model(model, 4);

        let tensor = ImageTensor::new(vec![0.3; TENSOR_LEN]);
        let (index, confidence) = inferencer.classify(&tensor).unwrap();

        assert!(index < 4);
        assert!((0.0..=1.0).contains(&confidence));
    }
}
