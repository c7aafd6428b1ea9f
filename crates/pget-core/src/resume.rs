//! Resume state: part files on disk reconciled against a fresh plan.
//!
//! There is no separate metadata store. The length of each part file is the
//! count of bytes already written for that chunk; resuming stats the
//! deterministic part paths and adjusts the plan accordingly.

use std::fs;
use std::path::Path;

use crate::chunk;
use crate::error::DownloadError;
use crate::plan::ChunkRange;

/// Bytes already written for one chunk, read from its part file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeRecord {
    pub index: usize,
    pub bytes_written: u64,
}

/// Stats every part path for the plan's index set. A missing file yields no
/// record (that chunk is fetched in full).
pub fn scan_part_files(
    dir: &Path,
    filename: &str,
    count: usize,
) -> Result<Vec<ResumeRecord>, DownloadError> {
    let mut records = Vec::new();
    for index in 0..count {
        let path = chunk::part_path(dir, filename, index);
        match fs::metadata(&path) {
            Ok(meta) => records.push(ResumeRecord {
                index,
                bytes_written: meta.len(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(DownloadError::Storage(e)),
        }
    }
    Ok(records)
}

/// The work left for a (possibly resumed) job.
#[derive(Debug, Clone)]
pub struct ReconciledPlan {
    /// Ranges still to fetch, starts advanced past the on-disk bytes.
    /// Fully-written chunks are absent here: their fetchers must not run.
    pub fetches: Vec<ChunkRange>,
    /// Progress seeds `(curr, total)` for EVERY chunk index, in plan order.
    /// `total` is the full planned chunk length even when resuming.
    pub seeds: Vec<(u64, u64)>,
}

impl ReconciledPlan {
    /// Identity reconciliation for a fresh download: fetch everything.
    pub fn fresh(plan: &[ChunkRange]) -> Self {
        Self {
            fetches: plan.to_vec(),
            seeds: plan.iter().map(|r| (0, r.len())).collect(),
        }
    }
}

/// Adjusts a fresh plan against the on-disk records.
///
/// `bytes_written == planned` skips the chunk entirely;
/// `0 < bytes_written < planned` shrinks the range to
/// `[start + bytes_written, end]` and seeds progress;
/// `bytes_written > planned` means the disk disagrees with the plan and is
/// fatal (`CorruptResumeState`), not recoverable in place.
pub fn reconcile(
    plan: &[ChunkRange],
    on_disk: &[ResumeRecord],
) -> Result<ReconciledPlan, DownloadError> {
    let mut written = vec![0u64; plan.len()];
    for rec in on_disk {
        if rec.index >= plan.len() {
            return Err(DownloadError::CorruptResumeState {
                index: rec.index,
                on_disk: rec.bytes_written,
                planned: 0,
            });
        }
        written[rec.index] = rec.bytes_written;
    }

    let mut fetches = Vec::with_capacity(plan.len());
    let mut seeds = Vec::with_capacity(plan.len());
    for range in plan {
        let planned = range.len();
        let done = written[range.index];
        if done > planned {
            return Err(DownloadError::CorruptResumeState {
                index: range.index,
                on_disk: done,
                planned,
            });
        }
        seeds.push((done, planned));
        if done == planned {
            tracing::debug!(chunk = range.index, "chunk already complete, skipping fetch");
            continue;
        }
        fetches.push(ChunkRange {
            index: range.index,
            start: range.start + done,
            end: range.end,
        });
    }

    Ok(ReconciledPlan { fetches, seeds })
}
