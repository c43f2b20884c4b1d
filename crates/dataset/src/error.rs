//! Error types for field decoding.

use std::io::ErrorKind;

use thiserror::Error;

use crate::tag::Tag;

/// Errors produced while decoding a file into typed fields.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The file could not be opened or read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither a Part 10 preamble nor a recognisable data set at offset 0.
    #[error("not a DICOM file")]
    NotDicom,

    /// The transfer syntax is recognised but cannot be decoded.
    #[error("unsupported transfer syntax: {0}")]
    UnsupportedTransferSyntax(String),

    /// The data ended inside an element header or value.
    #[error("unexpected end of data at offset {offset}")]
    Truncated {
        /// Byte offset where more data was expected
        offset: usize,
    },

    /// An explicit VR header carried an unknown code.
    #[error("unknown value representation {code:?} for {tag} at offset {offset}")]
    UnknownVr {
        /// Element being decoded
        tag: Tag,
        /// The raw two-byte code
        code: [u8; 2],
        /// Byte offset of the VR field
        offset: usize,
    },

    /// Structurally invalid encoding.
    #[error("malformed data at offset {offset}: {reason}")]
    Malformed {
        /// Byte offset of the offending header
        offset: usize,
        /// What was wrong
        reason: String,
    },
}

impl ReadError {
    /// `true` when the file is absent, unreadable, or not a valid file of the
    /// format. Other I/O failures (interrupted reads, resource exhaustion)
    /// are environmental and return `false`.
    #[must_use]
    pub fn is_invalid_file(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                ErrorKind::NotFound
                    | ErrorKind::PermissionDenied
                    | ErrorKind::InvalidData
                    | ErrorKind::UnexpectedEof
            ),
            _ => true,
        }
    }
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, ReadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_unreadable_files_are_invalid_file() {
        let err: ReadError = std::io::Error::new(ErrorKind::NotFound, "gone").into();
        assert!(err.is_invalid_file());
        assert!(err.to_string().contains("gone"));
        let err: ReadError = std::io::Error::new(ErrorKind::PermissionDenied, "denied").into();
        assert!(err.is_invalid_file());
    }

    #[test]
    fn other_io_errors_are_unexpected() {
        let err: ReadError = std::io::Error::new(ErrorKind::Interrupted, "signal").into();
        assert!(!err.is_invalid_file());
        let err: ReadError = std::io::Error::other("disk controller reset").into();
        assert!(!err.is_invalid_file());
    }

    #[test]
    fn format_errors_are_invalid_file() {
        assert!(ReadError::NotDicom.is_invalid_file());
        assert!(ReadError::Truncated { offset: 12 }.is_invalid_file());
        assert!(ReadError::UnsupportedTransferSyntax("1.2.840.10008.1.2.1.99".into())
            .is_invalid_file());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ReadError::Truncated { offset: 140 }.to_string(),
            "unexpected end of data at offset 140"
        );
        let err = ReadError::UnknownVr {
            tag: Tag::new(0x0010, 0x0010),
            code: *b"ZZ",
            offset: 136,
        };
        assert!(err.to_string().contains("(0010, 0010)"));
        assert_eq!(
            ReadError::Malformed {
                offset: 8,
                reason: "odd length".into()
            }
            .to_string(),
            "malformed data at offset 8: odd length"
        );
    }
}
