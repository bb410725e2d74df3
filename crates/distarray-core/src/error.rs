//! Error types for distribution, protocol and format operations.

use thiserror::Error;

/// Result type alias for distributed array operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Distributed array error types.
///
/// None of these are retried internally. Short reads are the only
/// tolerated partial condition and they are handled inside the format
/// crate's exact-read primitive before an [`Error::EndOfStream`] is raised.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid shape, grid shape, distribution kind or requested format version.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed stream: bad magic, unsupported version, bad header.
    #[error("format error: {0}")]
    Format(String),

    /// Stream ended before the requested number of bytes was read.
    #[error("EOF: reading {what}, expected {expected} bytes got {actual}")]
    EndOfStream {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Export record violates the distributed array protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Index not present in any explicit (unstructured) index set.
    #[error("lookup error: index {index} is not owned by any grid rank")]
    Lookup { index: usize },

    /// Rank, coordinate or index outside its valid range.
    #[error("{what} {index} out of bounds (limit {limit})")]
    Bounds {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol(message.into())
    }

    /// Create an end-of-stream error.
    pub fn end_of_stream(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::EndOfStream {
            what,
            expected,
            actual,
        }
    }

    /// Create a bounds error.
    pub fn bounds(what: &'static str, index: usize, limit: usize) -> Self {
        Error::Bounds { what, index, limit }
    }

    /// Get error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::Format(_) => "format",
            Error::EndOfStream { .. } => "end_of_stream",
            Error::Protocol(_) => "protocol",
            Error::Lookup { .. } => "lookup",
            Error::Bounds { .. } => "bounds",
            Error::Io(_) => "io_error",
        }
    }
}
