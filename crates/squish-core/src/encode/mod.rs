//! Lossy encoding for Squish.
//!
//! This module provides:
//! - The [`Encoder`] capability the compression engine is written against
//! - [`JpegEncoder`], the production implementation
//! - [`encode_jpeg`] for one-shot encodes of raw RGB buffers
//!
//! Keeping the engine generic over [`Encoder`] lets its search be exercised
//! with deterministic fake codecs in tests.

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, JpegEncoder, MAX_DIMENSION};

use crate::decode::DecodedImage;
use crate::Quality;

/// Encodes a decoded bitmap at a given quality.
///
/// Implementations must be deterministic in output size for a given image and
/// quality; the engine relies on this to compare candidates against a threshold.
pub trait Encoder {
    /// Encode `image` at `quality`, returning the encoded bytes.
    fn encode(&self, image: &DecodedImage, quality: Quality) -> Result<Vec<u8>, EncodeError>;
}
