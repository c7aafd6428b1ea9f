//! Download job description and cooperative cancellation.
//!
//! A `DownloadJob` carries everything the engine needs after the probe and
//! destination steps: the URL, where the file goes, how big it is, and how
//! many connections to use. The `CancelToken` is shared between the caller
//! (e.g. a ctrl-c handler) and every chunk worker; workers poll it from
//! their write callbacks and stop between buffers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::dest::Destination;

mod run;
pub use run::run;

/// Shared cancellation flag. Cloning hands out another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Workers notice at their next write callback.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything the engine needs to run one download.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Fully validated http(s) URL.
    pub url: String,
    /// Resolved output directory, filename, and final path.
    pub dest: Destination,
    /// Total size in bytes, from the probe.
    pub content_length: u64,
    /// Whether the server advertised `Accept-Ranges: bytes`.
    pub range_supported: bool,
    /// Requested connection count (already clamped by the caller).
    pub connections: usize,
    /// Reuse bytes from part files left by an earlier interrupted run.
    pub resume: bool,
}

/// What a finished download looked like.
#[derive(Debug)]
pub struct JobReport {
    /// Bytes combined into the final file.
    pub bytes_written: u64,
    /// Where the file ended up.
    pub final_path: PathBuf,
    /// Wall-clock time for the whole job, including the combine step.
    pub elapsed: Duration,
    /// Number of chunks the transfer was split into.
    pub chunk_count: usize,
}
