//! DICOM data set decoding: Part 10 files to typed, tagged fields.
//!
//! # Modules
//!
//! - [`tag`]: `(group, element)` identifiers
//! - [`vr`]: value representation codes
//! - [`value`]: `Value` sum type, `TypedField`, `DataSet`
//! - [`dictionary`]: standard keyword and VR lookup
//! - [`reader`]: `FieldDecoder` trait and the Part 10 implementation
//! - [`error`]: `ReadError`

pub mod dictionary;
pub mod error;
pub mod reader;
pub mod tag;
pub mod value;
pub mod vr;

// Top-level re-exports for convenience
pub use dictionary::{keyword_for_tag, vr_for_tag};
pub use error::ReadError;
pub use reader::{FieldDecoder, FieldReader, Part10Decoder};
pub use tag::Tag;
pub use value::{DataSet, PersonName, Scalar, TypedField, Value};
pub use vr::Vr;
