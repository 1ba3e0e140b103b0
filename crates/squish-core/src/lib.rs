//! Squish Core - Size-bounded image re-encoding library
//!
//! This crate provides the core functionality for Squish: decoding source
//! images, encoding them as JPEG, and searching for the highest quality whose
//! encoded output fits under a byte threshold.
//!
//! # Module Structure
//!
//! - `config` - Tunable constants for the quality search
//! - `decode` - Source byte decoding (JPEG, PNG) with EXIF orientation
//! - `encode` - JPEG encoding and the `Encoder` capability trait
//! - `engine` - The quality back-off loop and cancellation
//! - `error` - The failure taxonomy reported to task runners
//! - `job` - Input/output contract for whatever runs the engine in the background

pub mod config;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod job;

pub use config::{
    CompressionConfig, ConfigError, DECAY_FACTOR, INITIAL_QUALITY, QUALITY_FLOOR,
};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{EncodeError, Encoder, JpegEncoder};
pub use engine::{
    compress, compress_bytes, Cancellation, CompressedImage, CompressionEngine, NeverCancel,
};
pub use error::{CompressError, ErrorKind};
pub use job::{run_job, spawn_job, JobError, JobHandle, JobId, JobOutput, JobRequest};

/// Encoder fidelity level (1 to 100).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality any encoder accepts.
    pub const MIN: Quality = Quality(1);
    /// Highest quality (least lossy).
    pub const MAX: Quality = Quality(100);

    /// Create a quality level, returning `None` outside `1..=100`.
    pub fn new(value: u8) -> Option<Self> {
        (1..=100).contains(&value).then_some(Self(value))
    }

    /// Create a quality level, clamping into `1..=100`.
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    /// The raw value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}

impl TryFrom<u8> for Quality {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConfigError::QualityOutOfRange {
            field: "quality",
            value,
        })
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
