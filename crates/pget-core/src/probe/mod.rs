//! HTTP HEAD capability probe.
//!
//! Determines whether a ranged, parallel download is possible: total size
//! (`Content-Length`), `Accept-Ranges: bytes`, and the `Content-Disposition`
//! filename hint. The engine consumes the result; it never probes itself.

mod parse;

use std::str;
use std::time::Duration;

use crate::error::DownloadError;

/// Parsed HEAD response: what the planner and destination resolution need.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Total size in bytes. Mandatory: without it there is nothing to plan.
    pub content_length: u64,
    /// True if the server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
    /// Raw `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
}

/// Performs a HEAD request and parses the metadata.
///
/// Follows redirects. Any failure here is a `Probe` error: the job never
/// starts. Runs on the current thread; call from `spawn_blocking` in async
/// code.
pub fn probe(url: &str) -> Result<ProbeResult, DownloadError> {
    let perr = |e: curl::Error| DownloadError::Probe(e.to_string());

    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(perr)?;
    easy.nobody(true).map_err(perr)?; // HEAD request
    easy.follow_location(true).map_err(perr)?;
    easy.connect_timeout(Duration::from_secs(15)).map_err(perr)?;
    easy.timeout(Duration::from_secs(30)).map_err(perr)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(perr)?;
        transfer
            .perform()
            .map_err(|e| DownloadError::Probe(format!("HEAD request failed: {}", e)))?;
    }

    let code = easy.response_code().map_err(perr)?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Probe(format!(
            "HEAD {} returned HTTP {}",
            url, code
        )));
    }

    parse::parse_head(&headers)
}
