// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of training
// samples into model-ready tensors.
//
// How batching works here:
//   Input:  Vec of N samples, each a 32×32×3 tensor in HWC order
//   Output: ClassifierBatch with images [N, 3, 32, 32] and
//           targets [N]
//
// All samples already have identical shape, so batching is a
// flatten + reshape, followed by a permute from channels-last
// (how the decoder emits pixels) to channels-first (what the
// convolution layers consume).
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::image::{TrainingSample, CHANNELS, IMAGE_SIDE};

// ─── ClassifierBatch ──────────────────────────────────────────────────────────
/// A batch of labelled images ready for the model forward pass.
///
/// B is the Burn Backend — generic so the same batcher serves
/// both the autodiff training backend and the plain inference
/// backend.
#[derive(Debug, Clone)]
pub struct ClassifierBatch<B: Backend> {
    /// Image tensors — shape: [batch_size, 3, 32, 32]
    pub images: Tensor<B, 4>,

    /// Class indices — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created in the right place.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TrainingSample, ClassifierBatch<B>> for ImageBatcher<B> {
    /// Convert a Vec of samples into a single ClassifierBatch.
    ///
    /// Steps:
    ///   1. Flatten all pixel buffers into one Vec<f32>
    ///   2. Reshape to [batch, 32, 32, 3] (decoder layout)
    ///   3. Permute to [batch, 3, 32, 32] for the conv layers
    ///   4. Collect class indices into an Int tensor
    fn batch(&self, items: Vec<TrainingSample>) -> ClassifierBatch<B> {
        let batch_size = items.len();

        let pixels_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.tensor.pixels().iter().copied())
            .collect();

        let targets_flat: Vec<i32> = items
            .iter()
            .map(|s| s.class_index as i32)
            .collect();

        let images = Tensor::<B, 1>::from_floats(pixels_flat.as_slice(), &self.device)
            .reshape([batch_size, IMAGE_SIDE, IMAGE_SIDE, CHANNELS])
            .permute([0, 3, 1, 2]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets_flat.as_slice(), &self.device);

        ClassifierBatch { images, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::{ImageTensor, TENSOR_LEN};
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;

    fn sample(value: f32, class_index: usize) -> TrainingSample {
        TrainingSample::new(ImageTensor::new(vec![value; TENSOR_LEN]), class_index)
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = ImageBatcher::<NdArray>::new(NdArrayDevice::default());
        let batch = batcher.batch(vec![sample(0.1, 0), sample(0.9, 2)]);

        assert_eq!(batch.images.dims(), [2, CHANNELS, IMAGE_SIDE, IMAGE_SIDE]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_targets_keep_sample_order() {
        let batcher = ImageBatcher::<NdArray>::new(NdArrayDevice::default());
        let batch = batcher.batch(vec![sample(0.0, 2), sample(0.0, 0), sample(0.0, 1)]);

        let targets: Vec<i64> = batch
            .targets
            .into_data()
            .to_vec::<i64>()
            .unwrap_or_default();
        assert_eq!(targets, vec![2, 0, 1]);
    }
}
