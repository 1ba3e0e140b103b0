//! Contract between the compression engine and the task runner that drives it.
//!
//! A task runner hands the engine raw source bytes and a threshold, and gets
//! back exactly one [`JobOutput`]: the accepted bytes with their quality, or a
//! failure kind. Nothing here queues work. [`spawn_job`] runs a single job on
//! its own thread and returns a [`JobHandle`] the caller awaits or cancels.
//!
//! The serialized form of [`JobOutput`] is the wire shape hosts observe:
//!
//! ```text
//! { "status": "success", "resultBytes": [...], "finalQuality": 81 }
//! { "status": "failure", "errorKind": "DecodeError" }
//! ```

mod handle;

pub use handle::{persist_output, spawn_job, spawn_job_with, JobError, JobHandle, JobId};

use serde::{Deserialize, Serialize};

use crate::decode::decode_image;
use crate::encode::Encoder;
use crate::engine::{Cancellation, CompressedImage, CompressionEngine};
use crate::error::{CompressError, ErrorKind};
use crate::Quality;

/// Input to one compression job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Source-encoded image bytes.
    pub raw_bytes: Vec<u8>,
    /// Maximum acceptable encoded size in bytes.
    #[serde(rename = "thresholdBytes")]
    pub threshold: u64,
}

impl JobRequest {
    pub fn new(raw_bytes: Vec<u8>, threshold: u64) -> Self {
        Self {
            raw_bytes,
            threshold,
        }
    }
}

/// The single result a job publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum JobOutput {
    #[serde(rename = "success", rename_all = "camelCase")]
    Success {
        result_bytes: Vec<u8>,
        final_quality: Quality,
    },
    #[serde(rename = "failure", rename_all = "camelCase")]
    Failure { error_kind: ErrorKind },
}

impl JobOutput {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutput::Success { .. })
    }

    /// `"success"` or `"failure"`.
    pub fn status(&self) -> &'static str {
        match self {
            JobOutput::Success { .. } => "success",
            JobOutput::Failure { .. } => "failure",
        }
    }

    pub fn result_bytes(&self) -> Option<&[u8]> {
        match self {
            JobOutput::Success { result_bytes, .. } => Some(result_bytes),
            JobOutput::Failure { .. } => None,
        }
    }

    pub fn final_quality(&self) -> Option<Quality> {
        match self {
            JobOutput::Success { final_quality, .. } => Some(*final_quality),
            JobOutput::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            JobOutput::Success { .. } => None,
            JobOutput::Failure { error_kind } => Some(*error_kind),
        }
    }
}

impl From<Result<CompressedImage, CompressError>> for JobOutput {
    fn from(result: Result<CompressedImage, CompressError>) -> Self {
        match result {
            Ok(compressed) => JobOutput::Success {
                final_quality: compressed.quality,
                result_bytes: compressed.bytes,
            },
            Err(err) => JobOutput::Failure {
                error_kind: err.kind(),
            },
        }
    }
}

/// Decode and compress one request.
///
/// Every failure is folded into [`JobOutput::Failure`]; this never returns an
/// error or partial output.
pub fn run_job<E, C>(request: &JobRequest, engine: &CompressionEngine<E>, cancel: &C) -> JobOutput
where
    E: Encoder,
    C: Cancellation + ?Sized,
{
    let result = decode_image(&request.raw_bytes)
        .map_err(CompressError::from)
        .and_then(|image| engine.compress_with_cancel(&image, request.threshold, cancel));

    if let Err(err) = &result {
        match err.kind() {
            ErrorKind::Cancelled => log::info!("job cancelled"),
            kind => log::warn!("job failed ({kind}): {err}"),
        }
    }

    JobOutput::from(result)
}
