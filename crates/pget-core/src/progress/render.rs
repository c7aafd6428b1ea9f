//! Terminal rendering of per-chunk progress bars.
//!
//! A tokio task redraws every chunk's line on a fixed cadence and rewinds
//! the cursor so the next frame overwrites it. The stop signal produces
//! exactly one final frame that stays on screen; `RendererHandle::stop`
//! resolves only after that frame is flushed.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::{ChunkProgress, ProgressTracker};

/// Formats one bar line, e.g. `Connection 3 - [>>>>>     ] 50%`.
///
/// Labels are 1-based. The filled cell count is `floor(percent/100 * width)`
/// of the rounded percentage, so the bar fills completely only at 100%.
pub fn render_line(p: &ChunkProgress, width: usize) -> String {
    let percent = p.percent();
    let filled = (((percent as f64) / 100.0) * width as f64).floor() as usize;
    let filled = filled.min(width);
    format!(
        "Connection {} - [{}{}] {}%",
        p.index + 1,
        ">".repeat(filled),
        " ".repeat(width - filled),
        percent
    )
}

/// Handle to the running renderer task.
pub struct RendererHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl RendererHandle {
    /// Signals the renderer to draw the final frame and waits until it has
    /// been flushed and the task has exited.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.task.await;
    }
}

/// Spawns the periodic renderer over a shared tracker.
///
/// When stdout is not a terminal the periodic frames are skipped (no cursor
/// games in piped output); the final frame is still printed once.
pub fn spawn_renderer(
    tracker: Arc<ProgressTracker>,
    width: usize,
    interval: Duration,
) -> RendererHandle {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let width = width.max(1);
        let interactive = io::stdout().is_terminal();
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if interactive {
                        draw_frame(&tracker, width, interactive, true);
                    }
                }
                _ = &mut stop_rx => {
                    draw_frame(&tracker, width, interactive, false);
                    break;
                }
            }
        }
    });
    RendererHandle { stop_tx, task }
}

/// Prints one line per chunk in ascending order; with `rewind`, moves the
/// cursor back up over all lines so the next frame overwrites this one.
fn draw_frame(tracker: &ProgressTracker, width: usize, interactive: bool, rewind: bool) {
    let snapshots = tracker.snapshot_all();
    let mut out = io::stdout().lock();
    for p in &snapshots {
        if interactive {
            // Clear the whole line first: the percent text shrinks and grows.
            let _ = writeln!(out, "\x1b[2K{}", render_line(p, width));
        } else {
            let _ = writeln!(out, "{}", render_line(p, width));
        }
    }
    if interactive && rewind {
        let _ = write!(out, "{}", "\x1b[F".repeat(snapshots.len()));
    }
    let _ = out.flush();
}
