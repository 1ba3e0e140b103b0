//! JPEG encoding backed by the `image` crate.
//!
//! This is the lossy codec the compression engine drives: each loop iteration
//! encodes the same bitmap at a lower quality until the output is small enough.

use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use super::Encoder;
use crate::decode::DecodedImage;
use crate::Quality;

/// Largest width or height a baseline JPEG frame header can describe.
pub const MAX_DIMENSION: u32 = 65_535;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec reported a failure
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// The codec returned without writing anything
    #[error("Encoder produced no output at quality {0}")]
    EmptyOutput(u8),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (clamped to 1-100)
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    // Rough pre-size; JPEG output for photos is usually well under a byte per pixel
    let mut buffer = Vec::with_capacity(expected_len / 8);
    ImageJpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    if buffer.is_empty() {
        return Err(EncodeError::EmptyOutput(quality));
    }

    Ok(buffer)
}

/// The production [`Encoder`]: baseline JPEG via the `image` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JpegEncoder;

impl JpegEncoder {
    /// Create a new JPEG encoder.
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for JpegEncoder {
    fn encode(&self, image: &DecodedImage, quality: Quality) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(&image.pixels, image.width, image.height, quality.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width) as u8);
                pixels.push((y * 255 / height) as u8);
                pixels.push(((x ^ y) & 0xFF) as u8);
            }
        }
        pixels
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let pixels = vec![128u8; 100 * 100 * 3];
        let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_lower_quality_is_smaller_for_detailed_image() {
        let pixels = gradient(128, 128);

        let low_q = encode_jpeg(&pixels, 128, 128, 10).unwrap();
        let high_q = encode_jpeg(&pixels, 128, 128, 100).unwrap();

        assert!(
            low_q.len() < high_q.len(),
            "low={} high={}",
            low_q.len(),
            high_q.len()
        );
    }

    #[test]
    fn test_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_invalid_pixel_data_short() {
        let pixels = vec![128u8; 99 * 100 * 3];
        let result = encode_jpeg(&pixels, 100, 100, 90);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 30000,
                actual: 29700
            })
        ));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 100, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_single_pixel() {
        let jpeg_bytes = encode_jpeg(&[255, 0, 0], 1, 1, 90).unwrap();
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encoder_trait_uses_image_dimensions() {
        let image = DecodedImage::new(20, 10, gradient(20, 10));
        let via_trait = JpegEncoder::new()
            .encode(&image, Quality::clamped(75))
            .unwrap();
        let direct = encode_jpeg(&image.pixels, 20, 10, 75).unwrap();
        assert_eq!(via_trait, direct);
    }

    #[test]
    fn test_encoder_trait_reports_bad_buffer() {
        let image = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0u8; 5],
        };
        let result = JpegEncoder.encode(&image, Quality::MAX);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
