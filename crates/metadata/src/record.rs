//! Metadata records and the per-run path mapping.

use std::collections::BTreeMap;

use dataset::{Tag, Value};

/// One extracted field of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    /// Tag of the source field
    pub tag: Tag,
    /// Resolved display keyword, never empty
    pub keyword: String,
    /// Raw value, with oversized binary payloads replaced by a summary
    pub value: Value,
}

impl MetadataRecord {
    /// Build a record.
    #[must_use]
    pub fn new(tag: Tag, keyword: impl Into<String>, value: Value) -> Self {
        Self {
            tag,
            keyword: keyword.into(),
            value,
        }
    }
}

/// Outcome of extracting one file: `None` when the file could not be decoded.
pub type ExtractionResult = Option<Vec<MetadataRecord>>;

/// File path → record list, ordered by path.
///
/// Only successful extractions are stored, so a failed file is simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataMapping {
    files: BTreeMap<String, Vec<MetadataRecord>>,
}

impl MetadataMapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for `path`. Returns `true` if it was stored.
    pub fn insert(&mut self, path: impl Into<String>, result: ExtractionResult) -> bool {
        match result {
            Some(records) => {
                self.files.insert(path.into(), records);
                true
            }
            None => false,
        }
    }

    /// Records of `path`, if it was extracted successfully.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[MetadataRecord]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Number of files stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// `true` when no file was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetadataRecord])> {
        self.files
            .iter()
            .map(|(path, records)| (path.as_str(), records.as_slice()))
    }
}

impl FromIterator<(String, Vec<MetadataRecord>)> for MetadataMapping {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MetadataRecord>)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
