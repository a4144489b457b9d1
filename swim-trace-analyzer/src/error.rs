use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the trace/log analysis pipeline.
///
/// Apart from [`AnalyzerError::Io`] every variant is recoverable: callers drop
/// the offending line, skip the file, print a "no data" line or fall back to
/// text-only output.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A duration token carried no numeric prefix, or its value overflowed.
    #[error("unusable duration token '{0}'")]
    UnrecognizedUnit(String),

    /// A grammar matched the line but one of its sub-tokens did not parse.
    #[error("malformed line: {0}")]
    MalformedLine(String),

    /// A named input does not exist.
    #[error("{} not found", .0.display())]
    MissingFile(PathBuf),

    /// A file or group produced zero usable events.
    #[error("no data in {0}")]
    EmptyResult(String),

    /// The chart backend cannot be used.
    #[error("chart rendering unavailable: {0}")]
    RenderingUnavailable(String),

    /// Histogram edges were empty or not strictly increasing.
    #[error("invalid bucket edges: {0}")]
    InvalidBuckets(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = AnalyzerError> = std::result::Result<T, E>;
