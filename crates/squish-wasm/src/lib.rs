//! Squish WASM - WebAssembly bindings for Squish
//!
//! This crate exposes the squish-core compression engine to JavaScript hosts.
//! The host is the task runner: it reads the source bytes, calls in here off the
//! main thread (typically from a Web Worker), and stores the returned bytes.
//!
//! # Module Structure
//!
//! - `compress` - Size-bounded compression and its result object
//! - `decode` - Source image decoding for before/after display
//! - `logger` - Routes `log` records to the browser console
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@squish/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, 20 * 1024);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod decode;
mod logger;
mod types;

pub use compress::{
    compress_decoded, compress_image, compress_image_with_config, JsCompressionResult,
};
pub use decode::decode_image;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Change how much of the engine's logging reaches the console.
///
/// Accepts "off", "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logger::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    logger::install(filter);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
