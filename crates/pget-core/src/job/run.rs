//! Supervision of one download: fan out chunk fetchers, collect their
//! results, then combine the parts into the final file.

use std::fs::{self, File};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::chunk::{self, fetch_chunk, ChunkFile};
use crate::combine;
use crate::config::PgetConfig;
use crate::error::DownloadError;
use crate::plan::{self, ChunkRange};
use crate::progress::{self, ProgressTracker};
use crate::resume;

use super::{CancelToken, DownloadJob, JobReport};

/// Runs one download job to completion.
///
/// Plans the chunk ranges, reconciles them against any part files left by an
/// earlier run (when `job.resume` is set), streams every incomplete chunk
/// concurrently, and finally concatenates the parts into `dest.final_path`
/// via a temp file and an atomic rename. Progress bars render on stdout for
/// the whole fetch phase and always draw one final frame before this
/// function moves on.
///
/// On any error the part files stay on disk so a later `--resume` run can
/// pick up where this one stopped; `GracefulShutdown` is reported the same
/// way but means the user asked to stop, not that something broke.
pub async fn run(
    job: DownloadJob,
    config: &PgetConfig,
    cancel: CancelToken,
) -> Result<JobReport, DownloadError> {
    let started = Instant::now();

    let ranges = if job.range_supported {
        plan::plan(job.content_length, job.connections)?
    } else {
        tracing::info!("server does not advertise byte ranges, using a single connection");
        plan::single_range(job.content_length)?
    };
    tracing::info!(
        url = %job.url,
        chunks = ranges.len(),
        total_bytes = job.content_length,
        resume = job.resume,
        "starting download"
    );

    fs::create_dir_all(&job.dest.dir)?;

    let reconciled = if job.resume {
        let on_disk = resume::scan_part_files(&job.dest.dir, &job.dest.filename, ranges.len())?;
        resume::reconcile(&ranges, &on_disk)?
    } else {
        resume::ReconciledPlan::fresh(&ranges)
    };

    let mut chunks = Vec::with_capacity(ranges.len());
    for range in &ranges {
        let chunk = if job.resume {
            ChunkFile::open_resume(&job.dest.dir, &job.dest.filename, range.index)?
        } else {
            ChunkFile::create(&job.dest.dir, &job.dest.filename, range.index)?
        };
        chunks.push(chunk);
    }

    // Every handle the job will need exists before the first byte moves:
    // the chunk files above, the temp output here.
    let temp = chunk::temp_output_path(&job.dest.final_path);
    let temp_out = File::create(&temp)?;

    let tracker = Arc::new(ProgressTracker::new(&reconciled.seeds));
    let renderer = progress::spawn_renderer(
        Arc::clone(&tracker),
        config.progress_width,
        Duration::from_millis(config.progress_interval_ms),
    );

    let fetch_result = {
        let url = job.url.clone();
        let fetches = reconciled.fetches;
        let worker_chunks = chunks.clone();
        let tracker = Arc::clone(&tracker);
        let cancel = cancel.clone();
        let buffer = config.chunk_buffer_bytes;
        tokio::task::spawn_blocking(move || {
            fetch_chunks(&url, &fetches, &worker_chunks, &tracker, &cancel, buffer)
        })
        .await
        .unwrap_or_else(|e| panic!("fetch phase panicked: {:?}", e))
    };

    // The renderer owns the terminal until it has drawn the final frame.
    renderer.stop().await;
    if let Err(e) = fetch_result {
        tracing::debug!(
            fetched = tracker.current_bytes(),
            total = tracker.total_bytes(),
            "fetch phase ended early"
        );
        drop(temp_out);
        let _ = fs::remove_file(&temp);
        return Err(e);
    }

    let chunk_count = chunks.len();
    let combine_result = {
        let combine_chunks = chunks.clone();
        tokio::task::spawn_blocking(move || -> Result<u64, DownloadError> {
            let mut out = temp_out;
            combine::combine_chunks(&combine_chunks, chunk_count, &mut out)
        })
        .await
        .unwrap_or_else(|e| panic!("combine phase panicked: {:?}", e))
    };
    let bytes_written = match combine_result {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
    };
    // A rename failure leaves the temp and part files for manual recovery.
    combine::finalize(&temp, &job.dest.final_path)?;
    combine::remove_part_files(chunks);

    tracing::info!(
        bytes = bytes_written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        path = %job.dest.final_path.display(),
        "download complete"
    );

    Ok(JobReport {
        bytes_written,
        final_path: job.dest.final_path,
        elapsed: started.elapsed(),
        chunk_count,
    })
}

/// Runs one OS thread per incomplete chunk and collects their results over a
/// channel. The first real failure wins and trips the cancel token so the
/// remaining workers stop early; cancellations reported by workers are never
/// promoted over a real error.
fn fetch_chunks(
    url: &str,
    fetches: &[ChunkRange],
    chunks: &[ChunkFile],
    tracker: &Arc<ProgressTracker>,
    cancel: &CancelToken,
    buffer_size: Option<usize>,
) -> Result<(), DownloadError> {
    if fetches.is_empty() {
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(fetches.len());
    for range in fetches {
        let range = *range;
        let u = url.to_string();
        let chunk = chunks[range.index].clone();
        let tracker = Arc::clone(tracker);
        let cancel = cancel.clone();
        let tx = tx.clone();
        handles.push(std::thread::spawn(move || {
            let res = fetch_chunk(&u, &range, &chunk, &tracker, &cancel, buffer_size);
            let _ = tx.send((range.index, res));
        }));
    }
    drop(tx);

    let mut first_error: Option<DownloadError> = None;
    let mut interrupted = false;
    for _ in 0..fetches.len() {
        let (index, res) = rx.recv().expect("worker result");
        match res {
            Ok(()) => {}
            Err(DownloadError::GracefulShutdown) => {
                tracing::debug!(chunk = index, "chunk stopped by cancel");
                interrupted = true;
            }
            Err(e) => {
                tracing::warn!(chunk = index, error = %e, "chunk failed");
                if first_error.is_none() {
                    first_error = Some(e);
                    cancel.trigger();
                }
            }
        }
    }
    for h in handles {
        h.join().unwrap_or_else(|e| panic!("worker panicked: {:?}", e));
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    if interrupted {
        return Err(DownloadError::GracefulShutdown);
    }
    Ok(())
}
