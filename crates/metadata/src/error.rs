//! Extraction errors.

use dataset::ReadError;
use thiserror::Error;

/// How a failed file should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing, unreadable as the format, or corrupted
    InvalidFile,
    /// Any other error while reading the fields
    Unexpected,
}

/// A whole-file extraction failure. No partial records survive it.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The decoder refused to open the file.
    #[error("cannot decode file: {0}")]
    Open(#[source] ReadError),

    /// Decoding failed partway through the field stream.
    #[error("decoding failed after {fields_read} fields: {source}")]
    Field {
        /// Fields decoded successfully before the failure
        fields_read: usize,
        /// Underlying decoder error
        #[source]
        source: ReadError,
    },
}

impl ExtractError {
    /// The decoder error behind this failure.
    #[must_use]
    pub fn read_error(&self) -> &ReadError {
        match self {
            Self::Open(e) | Self::Field { source: e, .. } => e,
        }
    }

    /// Classify the failure for reporting.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        let err = self.read_error();
        if err.is_invalid_file() {
            FailureKind::InvalidFile
        } else {
            FailureKind::Unexpected
        }
    }
}

/// Result type alias for extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;
