// ============================================================
// Layer 4 — Image Decoder
// ============================================================
// Turns raw image bytes into the fixed-shape normalized tensor
// every other component works with.
//
// The pipeline is always the same three steps:
//   1. Decode whatever format the bytes claim to be (png, jpeg,
//      bmp, gif, ...) via the image crate
//   2. Resize to exactly 32×32 — aspect ratio is NOT preserved,
//      distortion is accepted
//   3. Normalize u8 pixel values to [0, 1] by dividing by 255
//
// This is a pure function of its input bytes: no caching, no
// side effects. What happens on failure is the CALLER's policy:
// the inference path propagates the error to the client, the
// dataset loader skips the file and records the reason.
//
// Reference: image crate documentation (DynamicImage, imageops)

use std::path::Path;

use image::imageops::FilterType;
use thiserror::Error;

use crate::domain::image::{ImageTensor, CHANNELS, IMAGE_SIDE, TENSOR_LEN};

/// Why a particular input could not become an ImageTensor.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unreadable file: {0}")]
    Read(#[from] std::io::Error),

    #[error("undecodable image data: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode raw bytes into a normalized 32×32×3 tensor.
///
/// The output is row-major HWC with RGB channel order, every
/// value in [0, 1].
pub fn decode_image(bytes: &[u8]) -> Result<ImageTensor, DecodeError> {
    let img = image::load_from_memory(bytes)?;

    // Bilinear resize to the fixed model resolution. Triangle is
    // the bilinear filter; source aspect ratio is ignored.
    let resized = img.resize_exact(
        IMAGE_SIDE as u32,
        IMAGE_SIDE as u32,
        FilterType::Triangle,
    );

    // RGB8 drops any alpha channel and expands grayscale,
    // so the output is always exactly 3 channels.
    let rgb = resized.to_rgb8();

    let pixels: Vec<f32> = rgb
        .into_raw()
        .into_iter()
        .map(|c| c as f32 / 255.0)
        .collect();

    debug_assert_eq!(pixels.len(), TENSOR_LEN);
    Ok(ImageTensor::new(pixels))
}

/// Read a file from disk and decode it.
pub fn decode_file(path: &Path) -> Result<ImageTensor, DecodeError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// Encode a small solid-colour PNG in memory.
    fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(rgb);
        }
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encoding a PNG in memory cannot fail");
        buf
    }

    #[test]
    fn test_decodes_to_fixed_shape_in_unit_range() {
        let bytes = png_bytes(64, 48, [200, 100, 0]);
        let tensor = decode_image(&bytes).unwrap();
        assert_eq!(tensor.pixels().len(), TENSOR_LEN);
        assert!(tensor.pixels().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_resizes_any_aspect_ratio() {
        // A 100×7 image still becomes 32×32 — distortion accepted
        let bytes = png_bytes(100, 7, [10, 20, 30]);
        let tensor = decode_image(&bytes).unwrap();
        assert_eq!(tensor.pixels().len(), IMAGE_SIDE * IMAGE_SIDE * CHANNELS);
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        let result = decode_image(b"this is definitely not an image");
        assert!(matches!(result, Err(DecodeError::Decode(_))));
    }

    #[test]
    fn test_round_trip_within_quantization_tolerance() {
        // Build an already-32x32 image, decode it, re-encode it as
        // PNG (lossless), decode again: the two tensors must agree
        // within u8 quantization error.
        let bytes = png_bytes(32, 32, [17, 130, 244]);
        let first = decode_image(&bytes).unwrap();

        let quantized: Vec<u8> = first
            .pixels()
            .iter()
            .map(|&v| (v * 255.0).round() as u8)
            .collect();
        let img = RgbImage::from_raw(32, 32, quantized).unwrap();
        let mut reencoded = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut reencoded), ImageFormat::Png)
            .unwrap();

        let second = decode_image(&reencoded).unwrap();
        for (a, b) in first.pixels().iter().zip(second.pixels()) {
            assert!((a - b).abs() <= 1.5 / 255.0, "{a} vs {b}");
        }
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = decode_file(Path::new("/no/such/file.png"));
        assert!(matches!(result, Err(DecodeError::Read(_))));
    }
}
