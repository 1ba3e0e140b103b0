//! Quality back-off search.
//!
//! The engine encodes a bitmap at decreasing quality until the output fits
//! under a byte threshold or the quality floor is reached. At the floor the
//! last candidate is accepted even if it is still too large: the result is a
//! best-effort bound, not a guarantee.
//!
//! # Architecture
//!
//! Each invocation is synchronous and owns its candidate buffers; nothing is
//! shared between invocations. Iterations are strictly sequential because each
//! decision depends on the previous candidate's size. Callers that need to
//! stay responsive run the engine on a worker thread (see [`crate::job`]).
//!
//! # Examples
//!
//! ```ignore
//! use squish_core::compress_bytes;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let result = compress_bytes(&bytes, 20 * 1024).unwrap();
//! println!("{} bytes at quality {}", result.len(), result.quality);
//! ```

mod cancel;
mod schedule;

pub use cancel::{Cancellation, NeverCancel};
pub use schedule::{next_quality, QualitySchedule};

use crate::config::{CompressionConfig, ConfigError};
use crate::decode::{decode_image, DecodedImage};
use crate::encode::{EncodeError, Encoder, JpegEncoder, MAX_DIMENSION};
use crate::error::CompressError;
use crate::Quality;

/// An accepted encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    /// Encoded bytes (never empty).
    pub bytes: Vec<u8>,
    /// Quality the bytes were encoded at.
    pub quality: Quality,
    /// Number of encode attempts made, including the accepted one.
    pub iterations: u32,
    /// False when the floor was reached without fitting under the threshold.
    pub within_threshold: bool,
}

impl CompressedImage {
    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a value produced by the engine.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take ownership of the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Searches for the highest quality whose encoding fits a byte threshold.
#[derive(Debug, Clone)]
pub struct CompressionEngine<E = JpegEncoder> {
    encoder: E,
    initial: Quality,
    floor: Quality,
    decay: f64,
}

impl Default for CompressionEngine {
    fn default() -> Self {
        Self {
            encoder: JpegEncoder,
            initial: Quality::clamped(crate::INITIAL_QUALITY),
            floor: Quality::clamped(crate::QUALITY_FLOOR),
            decay: crate::DECAY_FACTOR,
        }
    }
}

impl CompressionEngine {
    /// Create a JPEG engine from a configuration.
    pub fn new(config: CompressionConfig) -> Result<Self, ConfigError> {
        Self::with_encoder(JpegEncoder, config)
    }
}

impl<E: Encoder> CompressionEngine<E> {
    /// Create an engine driving a custom encoder.
    pub fn with_encoder(encoder: E, config: CompressionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            encoder,
            initial: config.initial()?,
            floor: config.floor()?,
            decay: config.decay_factor,
        })
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> CompressionConfig {
        CompressionConfig {
            initial_quality: self.initial.get(),
            quality_floor: self.floor.get(),
            decay_factor: self.decay,
        }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Every quality this engine would try if no candidate ever fit.
    pub fn schedule(&self) -> QualitySchedule {
        QualitySchedule::new(self.initial, self.floor, self.decay)
    }

    /// Compress `image` so its encoding is at most `threshold` bytes, if the
    /// quality floor allows it.
    ///
    /// A threshold of 0 runs the search all the way to the floor.
    ///
    /// # Errors
    ///
    /// - `CompressError::InvalidImage` for a zero-area or inconsistent bitmap,
    ///   or one with a side longer than [`MAX_DIMENSION`], before any encode
    ///   is attempted.
    /// - `CompressError::Encode` on the first codec failure; nothing is retried.
    pub fn compress(
        &self,
        image: &DecodedImage,
        threshold: u64,
    ) -> Result<CompressedImage, CompressError> {
        self.compress_with_cancel(image, threshold, &NeverCancel)
    }

    /// Like [`compress`](Self::compress), polling `cancel` before every attempt.
    ///
    /// Returns `CompressError::Cancelled` without output once the signal fires.
    pub fn compress_with_cancel<C: Cancellation + ?Sized>(
        &self,
        image: &DecodedImage,
        threshold: u64,
        cancel: &C,
    ) -> Result<CompressedImage, CompressError> {
        if image.is_empty()
            || !image.has_consistent_buffer()
            || image.width > MAX_DIMENSION
            || image.height > MAX_DIMENSION
        {
            return Err(CompressError::InvalidImage {
                width: image.width,
                height: image.height,
                len: image.pixels.len(),
            });
        }

        let mut quality = self.initial;
        let mut iterations = 0u32;

        loop {
            if cancel.is_cancelled() {
                log::debug!("compression cancelled after {iterations} attempts");
                return Err(CompressError::Cancelled);
            }

            let candidate = self.encoder.encode(image, quality)?;
            iterations += 1;
            if candidate.is_empty() {
                return Err(EncodeError::EmptyOutput(quality.get()).into());
            }

            let size = candidate.len() as u64;
            log::debug!(
                "attempt {iterations}: {}x{} at quality {quality} -> {size} bytes (threshold {threshold})",
                image.width,
                image.height,
            );

            let within_threshold = size <= threshold;
            if within_threshold || quality <= self.floor {
                if within_threshold {
                    log::info!("accepted quality {quality} at {size} bytes after {iterations} attempts");
                } else {
                    log::warn!(
                        "reached quality floor {quality} at {size} bytes, still above threshold {threshold}"
                    );
                }
                return Ok(CompressedImage {
                    bytes: candidate,
                    quality,
                    iterations,
                    within_threshold,
                });
            }

            quality = next_quality(quality, self.floor, self.decay);
        }
    }
}

/// Compress a decoded image with the default configuration and JPEG encoder.
pub fn compress(image: &DecodedImage, threshold: u64) -> Result<CompressedImage, CompressError> {
    CompressionEngine::default().compress(image, threshold)
}

/// Decode source bytes and compress them with the default configuration.
pub fn compress_bytes(raw: &[u8], threshold: u64) -> Result<CompressedImage, CompressError> {
    let image = decode_image(raw)?;
    compress(&image, threshold)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;

    /// Fake codec with size strictly increasing in quality.
    struct RecordingEncoder {
        bytes_per_step: usize,
        calls: RefCell<Vec<u8>>,
    }

    impl Encoder for RecordingEncoder {
        fn encode(&self, _image: &DecodedImage, quality: Quality) -> Result<Vec<u8>, EncodeError> {
            self.calls.borrow_mut().push(quality.get());
            Ok(vec![1; usize::from(quality.get()) * self.bytes_per_step])
        }
    }

    fn config_strategy() -> impl Strategy<Value = CompressionConfig> {
        (1u8..=100, 0.01f64..0.95)
            .prop_flat_map(|(initial, decay)| {
                (Just(initial), 1u8..=initial, Just(decay))
            })
            .prop_map(|(initial, floor, decay)| CompressionConfig {
                initial_quality: initial,
                quality_floor: floor,
                decay_factor: decay,
            })
    }

    fn image() -> DecodedImage {
        DecodedImage::new(2, 2, vec![0u8; 12])
    }

    proptest! {
        /// Property: Attempts are strictly decreasing, bounded, and end at or above the floor.
        #[test]
        fn prop_terminates_monotonically_above_floor(
            config in config_strategy(),
            bytes_per_step in 1usize..=50,
            threshold in 0u64..=6000,
        ) {
            let encoder = RecordingEncoder { bytes_per_step, calls: RefCell::new(Vec::new()) };
            let engine = CompressionEngine::with_encoder(encoder, config).unwrap();
            let result = engine.compress(&image(), threshold).unwrap();

            let attempts = engine.encoder().calls.borrow().clone();
            prop_assert!(attempts.windows(2).all(|w| w[0] > w[1]), "not strictly decreasing: {:?}", attempts);
            prop_assert!(attempts.len() <= usize::from(config.initial_quality - config.quality_floor) + 1);
            prop_assert_eq!(result.iterations as usize, attempts.len());
            prop_assert!(result.quality.get() >= config.quality_floor);
            prop_assert!(!result.bytes.is_empty());
        }

        /// Property: If any quality above the floor fits, the result fits.
        #[test]
        fn prop_best_effort_bound(
            bytes_per_step in 1usize..=50,
            fitting_quality in 6u8..=100,
        ) {
            let encoder = RecordingEncoder { bytes_per_step, calls: RefCell::new(Vec::new()) };
            let engine = CompressionEngine::with_encoder(encoder, CompressionConfig::default()).unwrap();
            let threshold = (usize::from(fitting_quality) * bytes_per_step) as u64;

            let result = engine.compress(&image(), threshold).unwrap();
            prop_assert!(result.len() as u64 <= threshold);
            prop_assert!(result.within_threshold);
        }

        /// Property: Defaults never take more than 30 attempts, whatever the threshold.
        #[test]
        fn prop_default_iteration_bound(threshold in any::<u64>()) {
            let encoder = RecordingEncoder { bytes_per_step: 100, calls: RefCell::new(Vec::new()) };
            let engine = CompressionEngine::with_encoder(encoder, CompressionConfig::default()).unwrap();
            let result = engine.compress(&image(), threshold).unwrap();
            prop_assert!(result.iterations <= 30);
        }
    }
}
