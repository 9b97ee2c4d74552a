//! Error types for counter extraction and reporting.
//!
//! Every failure the tool can report falls into one of three classes:
//! 1. **Invalid arguments:** bad entity counts or unusable metric definitions.
//! 2. **Missing sources:** the stats file cannot be opened or read.
//! 3. **Malformed values:** a recognized counter whose value does not parse.

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Failure raised while configuring, parsing, or rendering a stats report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The caller supplied an unusable argument or definition set.
    #[error("{0}")]
    InvalidArgument(String),

    /// The stats source could not be opened or read.
    #[error("{origin} not found or unreadable: {source}")]
    SourceNotFound {
        /// Human-readable name of the source (usually its path).
        origin: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A line matched a known counter but its value token did not parse.
    #[error("line {line}: malformed value {value:?} for metric `{key}`")]
    MalformedMetricValue {
        /// One-based line number within the source.
        line: usize,
        /// Logical metric name the line matched.
        key: String,
        /// The offending token, or an empty string when the token was missing.
        value: String,
    },
}

impl ReportError {
    /// Builds an [`ReportError::InvalidArgument`] from any displayable message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Process status for this failure.
    ///
    /// Argument and missing-source errors are reported and the process exits
    /// normally; a malformed value aborts the run with a failure status.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidArgument(_) | Self::SourceNotFound { .. } => ExitCode::SUCCESS,
            Self::MalformedMetricValue { .. } => ExitCode::FAILURE,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;
