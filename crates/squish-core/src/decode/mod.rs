//! Source image decoding for Squish.
//!
//! This module turns source-encoded bytes into the [`DecodedImage`] bitmap
//! the compression engine re-encodes:
//! - JPEG and PNG input, detected from the bytes themselves
//! - EXIF orientation correction
//!
//! A decode failure is reported before the engine is ever invoked; the engine
//! assumes its input bitmap is already decoded.
//!
//! # Examples
//!
//! ```ignore
//! use squish_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
