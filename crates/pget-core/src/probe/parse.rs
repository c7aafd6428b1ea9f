//! Parse HEAD response header lines into a ProbeResult.

use crate::error::DownloadError;

use super::ProbeResult;

/// Parses collected header lines. With redirects every hop's headers are in
/// `lines`; later values overwrite earlier ones, so the final hop wins.
pub(crate) fn parse_head(lines: &[String]) -> Result<ProbeResult, DownloadError> {
    let mut content_length = None;
    let mut accept_ranges = false;
    let mut content_disposition = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("accept-ranges") {
                accept_ranges = value.eq_ignore_ascii_case("bytes");
            }
            if name.eq_ignore_ascii_case("content-disposition") {
                content_disposition = Some(value.to_string());
            }
        }
    }

    let content_length = content_length.ok_or_else(|| {
        DownloadError::Probe("response did not include a usable Content-Length".into())
    })?;

    Ok(ProbeResult {
        content_length,
        accept_ranges,
        content_disposition,
    })
}
