//! Size-bounded compression WASM bindings.
//!
//! These functions implement the job contract for JavaScript hosts: raw source
//! bytes and a threshold in, one result object out. Compression failures are
//! reported through the result's `status` and `error_kind`, never thrown.
//!
//! # Functions
//!
//! - [`compress_image`] - Decode and compress with the default settings
//! - [`compress_image_with_config`] - Same, with a tuning object
//! - [`compress_decoded`] - Compress a bitmap that is already decoded
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@squish/wasm';
//!
//! const result = compress_image(bytes, 20 * 1024);
//! if (result.status === 'success') {
//!   const jpeg = result.result_bytes();
//!   console.log(`${jpeg.byteLength} bytes at quality ${result.final_quality}`);
//! } else {
//!   console.warn(`compression failed: ${result.error_kind}`);
//! }
//! ```

use crate::types::JsDecodedImage;
use squish_core::{
    decode_image, CompressError, CompressedImage, CompressionConfig, CompressionEngine, JobOutput,
};
use wasm_bindgen::prelude::*;

/// Outcome of one compression call.
#[wasm_bindgen]
pub struct JsCompressionResult {
    output: JobOutput,
    iterations: u32,
    within_threshold: bool,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// `"success"` or `"failure"`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.output.status().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_success(&self) -> bool {
        self.output.is_success()
    }

    /// Encoded JPEG bytes (a copy), or `undefined` on failure.
    pub fn result_bytes(&self) -> Option<Vec<u8>> {
        self.output.result_bytes().map(<[u8]>::to_vec)
    }

    /// Quality the result was encoded at, or `undefined` on failure.
    #[wasm_bindgen(getter)]
    pub fn final_quality(&self) -> Option<u8> {
        self.output.final_quality().map(|q| q.get())
    }

    /// `InvalidImage`, `DecodeError`, `EncodeError` or `Cancelled`; `undefined` on success.
    #[wasm_bindgen(getter)]
    pub fn error_kind(&self) -> Option<String> {
        self.output.error_kind().map(|kind| kind.as_str().to_string())
    }

    /// Number of encode attempts (0 on failure).
    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// False when the quality floor was hit before the size fit.
    #[wasm_bindgen(getter)]
    pub fn within_threshold(&self) -> bool {
        self.within_threshold
    }
}

impl From<Result<CompressedImage, CompressError>> for JsCompressionResult {
    fn from(result: Result<CompressedImage, CompressError>) -> Self {
        let (iterations, within_threshold) = match &result {
            Ok(compressed) => (compressed.iterations, compressed.within_threshold),
            Err(_) => (0, false),
        };
        Self {
            output: JobOutput::from(result),
            iterations,
            within_threshold,
        }
    }
}

fn decode_and_compress(
    bytes: &[u8],
    threshold: u64,
    engine: &CompressionEngine,
) -> JsCompressionResult {
    decode_image(bytes)
        .map_err(CompressError::from)
        .and_then(|image| engine.compress(&image, threshold))
        .inspect_err(|e| log::warn!("compression failed: {e}"))
        .into()
}

/// Convert a JS number into a byte threshold.
///
/// Fractions are truncated and values past `u64::MAX` saturate. `None` for
/// negative, `NaN` or infinite input.
fn byte_threshold(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value as u64)
}

fn threshold_arg(value: f64) -> Result<u64, JsValue> {
    byte_threshold(value).ok_or_else(|| {
        JsValue::from_str(&format!(
            "Invalid threshold: {} (expected a non-negative byte count)",
            value
        ))
    })
}

/// Decode `bytes` and compress them to at most `threshold` bytes if possible.
///
/// # Arguments
///
/// * `bytes` - Source JPEG or PNG bytes as a `Uint8Array`
/// * `threshold` - Maximum acceptable output size in bytes (0 = smallest possible)
///
/// # Errors
///
/// Throws if `threshold` is negative, `NaN` or infinite.
#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], threshold: f64) -> Result<JsCompressionResult, JsValue> {
    let threshold = threshold_arg(threshold)?;
    Ok(decode_and_compress(bytes, threshold, &CompressionEngine::default()))
}

/// Like [`compress_image`], with tuning overrides.
///
/// `config` is a plain object with any of `initialQuality`, `qualityFloor`
/// and `decayFactor`; missing fields keep their defaults.
///
/// # Errors
///
/// Throws if `threshold` is not a non-negative number, or if `config` is not
/// an object of that shape or fails validation. Compression failures are
/// still returned as a result, not thrown.
#[wasm_bindgen]
pub fn compress_image_with_config(
    bytes: &[u8],
    threshold: f64,
    config: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let threshold = threshold_arg(threshold)?;
    let config: CompressionConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid compression config: {}", e)))?;
    let engine = CompressionEngine::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(decode_and_compress(bytes, threshold, &engine))
}

/// Compress an already-decoded image.
///
/// # Errors
///
/// Throws if `threshold` is negative, `NaN` or infinite.
#[wasm_bindgen]
pub fn compress_decoded(
    image: &JsDecodedImage,
    threshold: f64,
) -> Result<JsCompressionResult, JsValue> {
    let threshold = threshold_arg(threshold)?;
    Ok(CompressionEngine::default()
        .compress(&image.to_decoded(), threshold)
        .into())
}
