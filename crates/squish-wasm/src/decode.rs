//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@squish/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const before = decode_image(bytes);
//! console.log(`Source is ${before.width}x${before.height}`);
//! ```

use crate::types::JsDecodedImage;
use squish_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes, applying EXIF orientation.
///
/// # Errors
///
/// Throws if the bytes are empty, in an unsupported format, or corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
