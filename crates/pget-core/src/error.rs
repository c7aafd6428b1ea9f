//! Error type for a download job.

use std::path::PathBuf;

/// Error surfaced by a download job. Exactly one of these reaches the caller
/// even when several chunks fail concurrently.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Plan parameters were unusable (zero length, zero connections).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The HEAD capability probe failed; the job never starts.
    #[error("probe failed: {0}")]
    Probe(String),

    /// A chunk response had a status other than 200 or 206.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u32 },

    /// Curl reported a transport error (connection, timeout, TLS, etc.).
    #[error("network: {0}")]
    Network(#[from] curl::Error),

    /// Transfer completed but moved a different byte count than the chunk
    /// length (e.g. server closed early, or ignored the Range header).
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },

    /// Disk I/O on a chunk file or the temp output failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),

    /// An externally requested stop was observed mid-download. Not a job
    /// failure; the CLI reports it as an interrupted run.
    #[error("download interrupted by shutdown request")]
    GracefulShutdown,

    /// A chunk file was absent or out of order when combining.
    #[error("chunk {index} missing at combine time")]
    MissingChunk { index: usize },

    /// A part file holds more bytes than its chunk was ever planned to have.
    #[error("corrupt resume state for chunk {index}: {on_disk} bytes on disk, {planned} planned")]
    CorruptResumeState {
        index: usize,
        on_disk: u64,
        planned: u64,
    },

    /// The final atomic rename failed; temp and chunk files are left on disk.
    #[error("failed to rename {temp:?} to {final_path:?}")]
    Rename {
        temp: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
