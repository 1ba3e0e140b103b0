//! Failure taxonomy for a compression invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Why a compression invocation produced no output.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The bitmap has zero area, a side the codec cannot encode, or a pixel
    /// buffer that disagrees with its dimensions.
    #[error("Invalid image: {width}x{height} with {len} pixel bytes")]
    InvalidImage { width: u32, height: u32, len: usize },

    /// The source bytes could not be decoded into a bitmap.
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The codec failed at some quality level.
    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// The invocation was cancelled between encode attempts.
    #[error("Compression cancelled")]
    Cancelled,
}

impl CompressError {
    /// The reporting category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressError::InvalidImage { .. } => ErrorKind::InvalidImage,
            CompressError::Decode(_) => ErrorKind::DecodeError,
            CompressError::Encode(_) => ErrorKind::EncodeError,
            CompressError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether re-running the whole invocation could succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Stable failure categories reported to task runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed, zero-dimension or oversized input. Permanent.
    InvalidImage,
    /// Source bytes are not a decodable image. Permanent.
    DecodeError,
    /// Codec failure mid-loop. The caller may retry the whole invocation.
    EncodeError,
    /// Aborted cooperatively. Not reported as an error.
    Cancelled,
}

impl ErrorKind {
    /// The name used in the output contract's `errorKind` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidImage => "InvalidImage",
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::EncodeError => "EncodeError",
            ErrorKind::Cancelled => "Cancelled",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::EncodeError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
