// ============================================================
// Layer 3 — Image Tensor and Training Sample
// ============================================================
// The fixed-shape numeric representation of a decoded image,
// plus the (tensor, class index) pair used for training.
//
// Every image in the system — whatever its original size or
// format — ends up as the same 32×32×3 array of floats in
// [0, 1], stored row-major with the three colour channels
// interleaved per pixel (HWC layout, RGB as decoded).

use serde::{Deserialize, Serialize};

/// Side length of the square input image, in pixels.
pub const IMAGE_SIDE: usize = 32;

/// Colour channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// Total number of float values in one image tensor.
pub const TENSOR_LEN: usize = IMAGE_SIDE * IMAGE_SIDE * CHANNELS;

/// A decoded, resized, normalized image.
///
/// Invariant: `pixels.len() == TENSOR_LEN` and every value
/// lies in [0, 1]. The decoder is the only producer, so the
/// invariant is established at the single point of creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTensor {
    pixels: Vec<f32>,
}

impl ImageTensor {
    /// Wrap a pixel buffer produced by the decoder.
    pub fn new(pixels: Vec<f32>) -> Self {
        debug_assert_eq!(pixels.len(), TENSOR_LEN);
        Self { pixels }
    }

    /// The raw HWC pixel values, length `TENSOR_LEN`.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// One labelled training example: an image tensor plus the
/// class index its directory name mapped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    pub tensor:      ImageTensor,
    pub class_index: usize,
}

impl TrainingSample {
    pub fn new(tensor: ImageTensor, class_index: usize) -> Self {
        Self { tensor, class_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_len_is_32x32x3() {
        assert_eq!(TENSOR_LEN, 3072);
    }

    #[test]
    fn test_pixels_round_trip() {
        let pixels = vec![0.5f32; TENSOR_LEN];
        let tensor = ImageTensor::new(pixels.clone());
        assert_eq!(tensor.pixels(), pixels.as_slice());
    }
}
