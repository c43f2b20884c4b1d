//! Standard data dictionary: tag → keyword and VR.
//!
//! Backed by the full DICOM registry from `dicom-dictionary-std`, including
//! repeating-group entries such as `(60xx,3000)`. Private tags are never
//! resolved, whatever the registry holds for their range.
//!
//! Registry entries with a context-dependent VR (`US or SS`, `OB or OW`) are
//! narrowed to one code; implicit VR streams have no other source for it.

use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_dictionary_std::StandardDataDictionary;

use crate::tag::Tag;
use crate::vr::Vr;

static REGISTRY: StandardDataDictionary = StandardDataDictionary;

fn lookup(tag: Tag) -> Option<&'static impl DataDictionaryEntry> {
    if tag.is_private() {
        return None;
    }
    REGISTRY.by_tag(dicom_core::Tag(tag.group, tag.element))
}

/// Keyword of a standard tag, e.g. `PatientName` for `(0010, 0010)`.
#[must_use]
pub fn keyword_for_tag(tag: Tag) -> Option<&'static str> {
    lookup(tag).map(DataDictionaryEntry::alias)
}

/// Dictionary VR of a standard tag; used to decode implicit VR encodings.
#[must_use]
pub fn vr_for_tag(tag: Tag) -> Option<Vr> {
    lookup(tag).and_then(|entry| Vr::from_bytes(entry.vr().relaxed().to_bytes()))
}
