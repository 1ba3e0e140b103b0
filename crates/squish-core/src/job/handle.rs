//! Background execution of a single job.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{run_job, JobOutput, JobRequest};
use crate::config::{CompressionConfig, ConfigError};
use crate::encode::Encoder;
use crate::engine::CompressionEngine;

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque ticket identifying a spawned job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(u64);

impl JobId {
    fn next() -> Self {
        Self(NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Errors from starting or awaiting a background job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to start worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("{0} panicked")]
    Panicked(JobId),

    #[error("Failed to write job output: {0}")]
    Persist(#[source] io::Error),
}

/// Handle to a job running on its own thread.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    cancel: Arc<AtomicBool>,
    thread: JoinHandle<JobOutput>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Ask the job to stop before its next encode attempt.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the job publishes its output.
    pub fn join(self) -> Result<JobOutput, JobError> {
        self.thread.join().map_err(|_| JobError::Panicked(self.id))
    }

    /// Block until the job finishes and write accepted bytes to `<dir>/<id>.jpg`.
    ///
    /// The path is `None` when the job failed; nothing is written then.
    pub fn join_into(self, dir: &Path) -> Result<(JobOutput, Option<PathBuf>), JobError> {
        let id = self.id;
        let output = self.join()?;
        let path = match output.result_bytes() {
            Some(bytes) => Some(persist_output(dir, id, bytes).map_err(JobError::Persist)?),
            None => None,
        };
        Ok((output, path))
    }
}

/// Run `request` on a new thread with the JPEG encoder.
pub fn spawn_job(request: JobRequest, config: CompressionConfig) -> Result<JobHandle, JobError> {
    spawn_job_with(request, CompressionEngine::new(config)?)
}

/// Run `request` on a new thread with a prepared engine.
pub fn spawn_job_with<E>(
    request: JobRequest,
    engine: CompressionEngine<E>,
) -> Result<JobHandle, JobError>
where
    E: Encoder + Send + 'static,
{
    let id = JobId::next();
    let cancel = Arc::new(AtomicBool::new(false));
    let worker_cancel = Arc::clone(&cancel);

    log::debug!(
        "starting {id}: {} source bytes, threshold {}",
        request.raw_bytes.len(),
        request.threshold
    );

    let thread = thread::Builder::new()
        .name(format!("squish-{id}"))
        .spawn(move || run_job(&request, &engine, &worker_cancel))
        .map_err(JobError::Spawn)?;

    Ok(JobHandle { id, cancel, thread })
}

/// Write accepted bytes to `<dir>/<id>.jpg`, returning the absolute path.
pub fn persist_output(dir: &Path, id: JobId, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{id}.jpg"));
    fs::write(&path, bytes)?;
    let path = path.canonicalize()?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodedImage;
    use crate::encode::{encode_jpeg, EncodeError};
    use crate::error::ErrorKind;
    use crate::Quality;
    use std::sync::mpsc::{self, Receiver};
    use tempfile::TempDir;

    fn source_jpeg() -> Vec<u8> {
        encode_jpeg(&vec![77u8; 24 * 24 * 3], 24, 24, 100).unwrap()
    }

    /// Blocks each encode until the test releases it.
    struct GatedEncoder(Receiver<()>);

    impl Encoder for GatedEncoder {
        fn encode(&self, _image: &DecodedImage, _quality: Quality) -> Result<Vec<u8>, EncodeError> {
            self.0
                .recv()
                .map_err(|_| EncodeError::EncodingFailed("gate closed".into()))?;
            Ok(vec![0; 4096])
        }
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = JobId::next();
        let b = JobId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("job-"));
    }

    #[test]
    fn test_spawn_and_join() {
        let handle =
            spawn_job(JobRequest::new(source_jpeg(), u64::MAX), CompressionConfig::default())
                .unwrap();
        let output = handle.join().unwrap();
        assert_eq!(output.final_quality(), Some(Quality::MAX));
    }

    #[test]
    fn test_spawn_rejects_invalid_config() {
        let config = CompressionConfig::new().with_quality_floor(0);
        let result = spawn_job(JobRequest::new(source_jpeg(), 0), config);
        assert!(matches!(result, Err(JobError::Config(_))));
    }

    #[test]
    fn test_cancel_takes_effect_before_next_attempt() {
        let (release, gate) = mpsc::channel();
        let engine =
            CompressionEngine::with_encoder(GatedEncoder(gate), CompressionConfig::default())
                .unwrap();
        let handle = spawn_job_with(JobRequest::new(source_jpeg(), 0), engine).unwrap();

        handle.cancel();
        // Release the first attempt; the worker may already have stopped and dropped the gate
        let _ = release.send(());

        let output = handle.join().unwrap();
        assert_eq!(output.error_kind(), Some(ErrorKind::Cancelled));
    }

    #[test]
    fn test_persist_output_writes_file() {
        let dir = TempDir::new().unwrap();
        let id = JobId::next();
        let cache = dir.path().join("cache");

        let path = persist_output(&cache, id, &[0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap().to_string_lossy(), format!("{id}.jpg"));
        assert_eq!(fs::read(&path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_join_into_persists_success() {
        let dir = TempDir::new().unwrap();
        let handle =
            spawn_job(JobRequest::new(source_jpeg(), u64::MAX), CompressionConfig::default())
                .unwrap();
        let id = handle.id();

        let (output, path) = handle.join_into(dir.path()).unwrap();
        let path = path.unwrap();
        assert!(path.ends_with(format!("{id}.jpg")));
        assert_eq!(fs::read(&path).unwrap(), output.result_bytes().unwrap());
    }

    #[test]
    fn test_join_into_skips_failed_job() {
        let dir = TempDir::new().unwrap();
        let handle = spawn_job(
            JobRequest::new(b"not an image".to_vec(), 1024),
            CompressionConfig::default(),
        )
        .unwrap();

        let (output, path) = handle.join_into(dir.path()).unwrap();
        assert_eq!(output.error_kind(), Some(ErrorKind::DecodeError));
        assert!(path.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
