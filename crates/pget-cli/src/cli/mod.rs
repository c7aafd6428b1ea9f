//! CLI for the pget parallel downloader.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use pget_core::config;
use pget_core::dest;
use pget_core::error::DownloadError;
use pget_core::human::human_bytes;
use pget_core::job::{self, CancelToken, DownloadJob};
use pget_core::probe;

/// Top-level CLI for the pget parallel downloader.
#[derive(Debug, Parser)]
#[command(name = "pget")]
#[command(about = "pget: parallel chunked HTTP(S) downloader", long_about = None)]
pub struct Cli {
    /// Direct HTTP/HTTPS URL to download.
    pub url: String,

    /// Number of parallel connections (default and cap come from config.toml).
    #[arg(short = 'c', long, value_name = "N")]
    pub connections: Option<usize>,

    /// Output file path; the default name is derived from the server response or URL.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Reuse part files left behind by an earlier interrupted run.
    #[arg(long)]
    pub resume: bool,

    /// Log to stderr at debug level instead of the log file.
    #[arg(long)]
    pub verbose: bool,
}

/// Probe the URL, resolve the destination, and run the download job.
pub async fn run(args: Cli) -> Result<()> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let url = dest::validate_url(&args.url)?;

    let probe_url = url.clone();
    let head = tokio::task::spawn_blocking(move || probe::probe(&probe_url))
        .await
        .context("probe task join")??;
    tracing::debug!(
        content_length = head.content_length,
        accept_ranges = head.accept_ranges,
        "probe finished"
    );

    let destination = dest::resolve(
        args.output.as_deref(),
        &url,
        head.content_disposition.as_deref(),
    )?;
    println!(
        "Downloading {} ({}) to {}",
        url,
        human_bytes(head.content_length),
        destination.final_path.display()
    );

    let connections = match args.connections {
        None => cfg.default_connections,
        Some(0) => {
            tracing::info!(
                default = cfg.default_connections,
                "zero connections requested, using the default"
            );
            cfg.default_connections
        }
        Some(n) if n > cfg.max_connections => {
            tracing::info!(
                requested = n,
                max = cfg.max_connections,
                "capping connection count"
            );
            cfg.max_connections
        }
        Some(n) => n,
    };

    let cancel = CancelToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            eprintln!("stopping, part files are kept for --resume");
            ctrl_c_cancel.trigger();
        }
    });

    let job = DownloadJob {
        url,
        dest: destination,
        content_length: head.content_length,
        range_supported: head.accept_ranges,
        connections,
        resume: args.resume,
    };

    match job::run(job, &cfg, cancel).await {
        Ok(report) => {
            println!(
                "Downloaded {} in {:.1}s ({} chunks) -> {}",
                human_bytes(report.bytes_written),
                report.elapsed.as_secs_f64(),
                report.chunk_count,
                report.final_path.display()
            );
            Ok(())
        }
        Err(DownloadError::GracefulShutdown) => {
            println!("Download interrupted; run again with --resume to continue.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
