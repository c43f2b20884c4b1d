//! Metadata Extractor: decoded fields to [`MetadataRecord`]s.
//!
//! Per field, in order:
//!
//! 1. the bulk payload (7FE0,0010) is dropped
//! 2. a keyword is resolved: field name, dictionary, then
//!    [`PRIVATE_TAG_KEYWORD`] / [`UNKNOWN_TAG_KEYWORD`]
//! 3. byte values of OB/OW/UN above the summary threshold become a short
//!    description carrying the length and the first 16 bytes in hex
//!
//! The first decoder error aborts the file; no partial list is returned.

use std::path::Path;

use dataset::{keyword_for_tag, FieldDecoder, ReadError, Tag, TypedField, Value};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::record::MetadataRecord;
use crate::DEFAULT_BINARY_SUMMARY_THRESHOLD;

/// Keyword for tags in an odd (private) group without a name.
pub const PRIVATE_TAG_KEYWORD: &str = "Private Tag";
/// Keyword for standard tags missing from the dictionary.
pub const UNKNOWN_TAG_KEYWORD: &str = "Unknown Standard Tag";

/// Bytes shown in a binary summary.
const SUMMARY_PREFIX_LEN: usize = 16;

/// Extraction tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Byte values of binary-capable VRs longer than this are summarized.
    pub binary_summary_threshold: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            binary_summary_threshold: DEFAULT_BINARY_SUMMARY_THRESHOLD,
        }
    }
}

/// Builds record lists from decoded field streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the given options.
    #[must_use]
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Turn one file's field stream into records.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Field`] for the first `Err` in `fields`.
    pub fn extract<I>(&self, fields: I) -> Result<Vec<MetadataRecord>>
    where
        I: IntoIterator<Item = std::result::Result<TypedField, ReadError>>,
    {
        let mut records = Vec::new();
        for (fields_read, item) in fields.into_iter().enumerate() {
            let field = item.map_err(|source| ExtractError::Field {
                fields_read,
                source,
            })?;
            if field.tag == Tag::PIXEL_DATA {
                debug!(tag = %field.tag, "skipping bulk payload");
                continue;
            }
            records.push(self.record(field));
        }
        Ok(records)
    }

    /// Decode `path` with `decoder` and extract its records.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Open`] if the decoder rejects the file, otherwise as
    /// [`Extractor::extract`].
    pub fn extract_file<D: FieldDecoder>(
        &self,
        decoder: &D,
        path: &Path,
    ) -> Result<Vec<MetadataRecord>> {
        let fields = decoder.decode(path).map_err(ExtractError::Open)?;
        self.extract(fields)
    }

    fn record(&self, field: TypedField) -> MetadataRecord {
        let TypedField {
            tag,
            name,
            vr,
            value,
        } = field;
        let keyword = resolve_keyword(tag, name);
        let value = match value {
            Value::Bytes(bytes)
                if vr.is_binary_capable() && bytes.len() > self.options.binary_summary_threshold =>
            {
                debug!(%tag, %vr, len = bytes.len(), "summarizing binary value");
                Value::Str(summarize_binary(&bytes))
            }
            other => other,
        };
        MetadataRecord {
            tag,
            keyword,
            value,
        }
    }
}

/// Extract with default options.
///
/// # Errors
///
/// See [`Extractor::extract`].
pub fn extract<I>(fields: I) -> Result<Vec<MetadataRecord>>
where
    I: IntoIterator<Item = std::result::Result<TypedField, ReadError>>,
{
    Extractor::default().extract(fields)
}

/// Display keyword for a field.
#[must_use]
pub fn resolve_keyword(tag: Tag, name: Option<String>) -> String {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        return name;
    }
    if let Some(keyword) = keyword_for_tag(tag) {
        return keyword.to_string();
    }
    if tag.is_private() {
        PRIVATE_TAG_KEYWORD.to_string()
    } else {
        UNKNOWN_TAG_KEYWORD.to_string()
    }
}

/// `"<Binary Data, length: N bytes, first 16 hex: …...>"`
#[must_use]
pub fn summarize_binary(bytes: &[u8]) -> String {
    let hex: String = bytes
        .iter()
        .take(SUMMARY_PREFIX_LEN)
        .map(|b| format!("{b:02x}"))
        .collect();
    format!(
        "<Binary Data, length: {} bytes, first 16 hex: {hex}...>",
        bytes.len()
    )
}
