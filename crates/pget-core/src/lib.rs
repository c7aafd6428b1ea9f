//! Engine for parallel chunked HTTP(S) downloads.
//!
//! The flow is probe -> plan -> fetch -> combine: a HEAD request sizes the
//! file, the planner splits it into contiguous byte ranges, one worker per
//! range streams into a hidden part file while a shared tracker renders
//! progress bars, and the combiner concatenates the parts in order before an
//! atomic rename puts the final file in place. Part files double as resume
//! state for interrupted runs.

pub mod chunk;
pub mod combine;
pub mod config;
pub mod dest;
pub mod error;
pub mod human;
pub mod job;
pub mod logging;
pub mod plan;
pub mod probe;
pub mod progress;
pub mod resume;

pub use error::DownloadError;
