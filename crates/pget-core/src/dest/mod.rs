//! Destination resolution: where the download lands and under what name.
//!
//! Name precedence: explicit `-o` path, then the Content-Disposition
//! filename, then the last URL path segment, then a fixed fallback. Derived
//! names are sanitized; an explicit path is taken as given.

mod content_disposition;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use sanitize::sanitize_filename;

use std::path::{Path, PathBuf};

use crate::error::DownloadError;

/// Fallback when neither the header nor the URL yields a usable name.
const DEFAULT_FILENAME: &str = "download.bin";

/// A fully resolved download destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Absolute directory the output and its part files live in.
    pub dir: PathBuf,
    /// Final file name (single component, no separators).
    pub filename: String,
    /// `dir` joined with `filename`.
    pub final_path: PathBuf,
}

/// Parses and validates the source URL, returning it in normalized form.
pub fn validate_url(raw: &str) -> Result<String, DownloadError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| DownloadError::InvalidInput(format!("invalid URL {:?}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.as_str().to_string()),
        other => Err(DownloadError::InvalidInput(format!(
            "unsupported URL scheme {:?}",
            other
        ))),
    }
}

/// Resolves the destination for a download.
///
/// With `output` set the path is used as-is (made absolute against the
/// current directory if needed). Otherwise the name comes from
/// `content_disposition` or the URL path, sanitized, with `download.bin`
/// as the last resort, and lands in the current directory.
pub fn resolve(
    output: Option<&Path>,
    url: &str,
    content_disposition: Option<&str>,
) -> Result<Destination, DownloadError> {
    if let Some(path) = output {
        return from_explicit_path(path);
    }

    let candidate = content_disposition
        .and_then(parse_content_disposition_filename)
        .or_else(|| filename_from_url(url));
    let filename = match candidate {
        Some(raw) => {
            let safe = sanitize_filename(&raw);
            if usable(&safe) {
                safe
            } else {
                DEFAULT_FILENAME.to_string()
            }
        }
        None => DEFAULT_FILENAME.to_string(),
    };

    let dir = std::env::current_dir()?;
    let final_path = dir.join(&filename);
    Ok(Destination {
        dir,
        filename,
        final_path,
    })
}

fn from_explicit_path(path: &Path) -> Result<Destination, DownloadError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let filename = absolute
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            DownloadError::InvalidInput(format!("output path {:?} has no file name", path))
        })?;
    let dir = absolute.parent().map(Path::to_path_buf).ok_or_else(|| {
        DownloadError::InvalidInput(format!("output path {:?} has no parent directory", path))
    })?;
    Ok(Destination {
        dir,
        filename,
        final_path: absolute,
    })
}

/// Last non-empty path segment of the URL, if any.
fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

fn usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
