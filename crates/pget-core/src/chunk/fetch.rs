//! Single-chunk HTTP Range GET, streamed into the chunk's part file.

use std::cell::Cell;
use std::io;
use std::time::{Duration, Instant};

use crate::error::DownloadError;
use crate::job::CancelToken;
use crate::plan::ChunkRange;
use crate::progress::ProgressTracker;

use super::ChunkFile;

/// Downloads one chunk: GET with `Range: bytes=<start>-<end>`, appending the
/// body to `chunk` and crediting every read to this chunk's progress entry.
///
/// Only status 200 or 206 may produce bytes; the write callback rejects
/// anything else before it can land in the part file. The cancellation token
/// is checked at every write boundary; observing it yields
/// `GracefulShutdown`. Runs on the current thread; callers put it on a
/// worker thread or inside `spawn_blocking`.
pub fn fetch_chunk(
    url: &str,
    range: &ChunkRange,
    chunk: &ChunkFile,
    tracker: &ProgressTracker,
    cancel: &CancelToken,
    buffer_size: Option<usize>,
) -> Result<(), DownloadError> {
    if cancel.is_canceled() {
        return Err(DownloadError::GracefulShutdown);
    }

    let started = Instant::now();
    let expected = range.len();
    // Resumed chunks append after what a previous run wrote.
    chunk.seek_to_end()?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    // Low-speed abort instead of a tight wall clock: stalled transfers die,
    // slow-but-moving ones survive.
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(Duration::from_secs(3600))?;
    if let Some(size) = buffer_size {
        easy.buffer_size(size)?;
    }
    easy.range(&range.range_value())?;

    let status = Cell::new(0u32);
    let rejected = Cell::new(false);
    let written = Cell::new(0u64);
    let storage_error: Cell<Option<io::Error>> = Cell::new(None);

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = parse_status_line(line) {
                // Each redirect hop starts a new status line; keep the last.
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            if cancel.is_canceled() {
                return Ok(0);
            }
            let code = status.get();
            if code != 200 && code != 206 {
                rejected.set(true);
                return Ok(0);
            }
            match chunk.write_all(data) {
                Ok(()) => {
                    written.set(written.get() + data.len() as u64);
                    tracker.increment(range.index, data.len() as u64);
                    Ok(data.len())
                }
                Err(e) => {
                    storage_error.set(Some(e));
                    Ok(0)
                }
            }
        })?;
        if let Err(e) = transfer.perform() {
            if cancel.is_canceled() {
                return Err(DownloadError::GracefulShutdown);
            }
            if rejected.get() {
                return Err(DownloadError::UnexpectedStatus {
                    status: status.get(),
                });
            }
            if e.is_write_error() {
                if let Some(io_err) = storage_error.take() {
                    return Err(DownloadError::Storage(io_err));
                }
            }
            return Err(DownloadError::Network(e));
        }
    }

    let code = easy.response_code()?;
    if code != 200 && code != 206 {
        // Bodyless statuses (e.g. 204) never reach the write callback.
        return Err(DownloadError::UnexpectedStatus { status: code });
    }

    let received = written.get();
    if received != expected {
        return Err(DownloadError::PartialTransfer { expected, received });
    }

    tracing::debug!(
        chunk = range.index,
        bytes = received,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "chunk complete"
    );
    Ok(())
}

/// Extracts the numeric status from an `HTTP/<ver> <code> ...` status line.
/// Returns `None` for ordinary header lines.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let text = std::str::from_utf8(line).ok()?.trim();
    if !text.starts_with("HTTP/") {
        return None;
    }
    text.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_parses_code() {
        assert_eq!(parse_status_line(b"HTTP/1.1 206 Partial Content\r\n"), Some(206));
        assert_eq!(parse_status_line(b"HTTP/1.1 404 Not Found\r\n"), Some(404));
        assert_eq!(parse_status_line(b"HTTP/2 200\r\n"), Some(200));
    }

    #[test]
    fn header_lines_are_ignored() {
        assert_eq!(parse_status_line(b"Content-Length: 42\r\n"), None);
        assert_eq!(parse_status_line(b"\r\n"), None);
        assert_eq!(parse_status_line(b"HTTP/1.1\r\n"), None);
    }
}
