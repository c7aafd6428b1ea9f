//! Chunk type and range planning.

use crate::error::DownloadError;

/// One chunk: inclusive byte range `[start, end]` with a stable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// Position in the plan (dense, 0-based).
    pub index: usize,
    /// First byte offset (inclusive).
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ChunkRange {
    /// Length of this chunk in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for curl's `range()` option: `start-end` (inclusive end).
    pub fn range_value(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Builds the chunk plan for a ranged download.
///
/// Chunks are near-equal; the last chunk absorbs the division remainder so
/// the union covers `[0, content_length - 1]` exactly. `connections` is
/// capped at `content_length` so every chunk is at least one byte.
pub fn plan(content_length: u64, connections: usize) -> Result<Vec<ChunkRange>, DownloadError> {
    if content_length == 0 {
        return Err(DownloadError::InvalidInput("content length is 0".into()));
    }
    if connections == 0 {
        return Err(DownloadError::InvalidInput("connection count is 0".into()));
    }

    let count = (connections as u64).min(content_length);
    let base = content_length / count;

    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start = i * base;
        let end = if i == count - 1 {
            content_length - 1
        } else {
            start + base - 1
        };
        out.push(ChunkRange {
            index: i as usize,
            start,
            end,
        });
    }
    Ok(out)
}

/// Single whole-file chunk for servers without byte-range support.
///
/// Degraded mode, not an error: one connection streams `[0, content_length - 1]`.
pub fn single_range(content_length: u64) -> Result<Vec<ChunkRange>, DownloadError> {
    plan(content_length, 1)
}
