//! DICOM metadata extraction and JSON-safe serialization.
//!
//! Decoded fields flow through two stages:
//!
//! ```text
//! FieldDecoder ──► Extractor (per file) ──► MetadataMapping ──► Serializer (once)
//!                   drop (7FE0,0010)          path → records      normalize values
//!                   resolve keywords                              render tags
//!                   summarize > 1 MiB OB/OW/UN                    truncate bytes
//! ```
//!
//! # Modules
//!
//! - [`extract`]: `Extractor`, keyword resolution, binary summaries
//! - [`serialize`]: `Serializer`, `normalize`
//! - [`record`]: `MetadataRecord`, `ExtractionResult`, `MetadataMapping`
//! - [`error`]: `ExtractError`, `FailureKind`

pub mod error;
pub mod extract;
pub mod record;
pub mod serialize;

/// Byte values longer than this are dropped from the serialized output.
pub const DEFAULT_MAX_BYTES_LENGTH: usize = 1024;

/// OB/OW/UN byte values longer than this (1 MiB) are summarized at extraction.
pub const DEFAULT_BINARY_SUMMARY_THRESHOLD: usize = 1_048_576;

// Top-level re-exports for convenience
pub use error::{ExtractError, FailureKind};
pub use extract::{
    extract, resolve_keyword, summarize_binary, ExtractOptions, Extractor, PRIVATE_TAG_KEYWORD,
    UNKNOWN_TAG_KEYWORD,
};
pub use record::{ExtractionResult, MetadataMapping, MetadataRecord};
pub use serialize::{from_json, normalize, serialize_metadata, Serializer};
