//! Shared per-chunk progress counters.
//!
//! One atomic counter per chunk index in an ordered vector: each fetcher
//! bumps only its own entry, so there is no lock and no contention. The
//! renderer reads snapshots in ascending index order.

mod render;

pub use render::{render_line, spawn_renderer, RendererHandle};

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of one chunk's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// Chunk index (0-based; rendered labels are 1-based).
    pub index: usize,
    /// Bytes received so far. Monotonically non-decreasing.
    pub curr: u64,
    /// Planned byte count for this chunk.
    pub total: u64,
}

impl ChunkProgress {
    /// Completion percentage, rounded to the nearest integer.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.curr as f64 / self.total as f64) * 100.0).round() as u32
    }
}

struct Counter {
    curr: AtomicU64,
    total: u64,
}

/// Per-chunk byte counters shared between fetchers and the renderer.
pub struct ProgressTracker {
    counters: Vec<Counter>,
}

impl ProgressTracker {
    /// Builds a tracker from `(curr, total)` seeds, one per chunk index.
    ///
    /// Fresh jobs seed `(0, chunk_len)`; resumed jobs seed `curr` with the
    /// byte count already on disk so bars start at the right percentage.
    pub fn new(seeds: &[(u64, u64)]) -> Self {
        let counters = seeds
            .iter()
            .map(|&(curr, total)| Counter {
                curr: AtomicU64::new(curr),
                total,
            })
            .collect();
        Self { counters }
    }

    /// Adds `delta` received bytes to chunk `index`.
    pub fn increment(&self, index: usize, delta: u64) {
        self.counters[index].curr.fetch_add(delta, Ordering::Relaxed);
    }

    /// Snapshot of one chunk.
    pub fn snapshot(&self, index: usize) -> ChunkProgress {
        let c = &self.counters[index];
        ChunkProgress {
            index,
            curr: c.curr.load(Ordering::Relaxed),
            total: c.total,
        }
    }

    /// Snapshots for every chunk, ascending index order.
    pub fn snapshot_all(&self) -> Vec<ChunkProgress> {
        (0..self.counters.len()).map(|i| self.snapshot(i)).collect()
    }

    /// Sum of bytes received across all chunks.
    pub fn current_bytes(&self) -> u64 {
        self.counters
            .iter()
            .map(|c| c.curr.load(Ordering::Relaxed))
            .sum()
    }

    /// Sum of planned bytes across all chunks.
    pub fn total_bytes(&self) -> u64 {
        self.counters.iter().map(|c| c.total).sum()
    }
}
