//! Typed values and the fields that carry them.
//!
//! A decoded data element is a [`TypedField`]: its [`Tag`], an optional
//! dictionary keyword, its [`Vr`], and a [`Value`]. `Value` is a closed sum
//! type; consumers dispatch on the variant, never on the VR.

use core::fmt;

use crate::tag::Tag;
use crate::vr::Vr;

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// A single element of a multi-valued field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Empty component
    Null,
    /// Boolean flag
    Bool(bool),
    /// Signed integer (IS, SS, SL, SV)
    Int(i64),
    /// Unsigned integer (US, UL, UV)
    UInt(u64),
    /// Floating point number (DS, FL, FD)
    Float(f64),
    /// Character string
    Str(String),
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::Int(i),
            Scalar::UInt(u) => Value::UInt(u),
            Scalar::Float(x) => Value::Float(x),
            Scalar::Str(s) => Value::Str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// PersonName
// ---------------------------------------------------------------------------

/// A PN value, kept in its encoded `family^given^middle^prefix^suffix` form.
///
/// Up to three component groups (alphabetic, ideographic, phonetic) are
/// separated by `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    raw: String,
}

impl PersonName {
    /// Wrap an encoded name.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// The raw value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (empty numeric or AT element)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point number; may be non-finite
    Float(f64),
    /// Character string
    Str(String),
    /// Byte payload (OB, OW, UN, ...)
    Bytes(Vec<u8>),
    /// Nested items of an SQ element
    Sequence(Vec<DataSet>),
    /// Multi-valued element, one scalar per component
    Multi(Vec<Scalar>),
    /// A tag used as a value (AT)
    Tag(Tag),
    /// Plain string-keyed mapping, in insertion order
    Map(Vec<(String, Value)>),
    /// Plain ordered list
    List(Vec<Value>),
    /// Person name with component structure
    PersonName(PersonName),
}

impl Value {
    /// Borrow the payload of a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Tag> for Value {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

// ---------------------------------------------------------------------------
// TypedField / DataSet
// ---------------------------------------------------------------------------

/// One decoded data element.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedField {
    /// Element tag
    pub tag: Tag,
    /// Dictionary keyword, when the decoder knows one
    pub name: Option<String>,
    /// Value representation
    pub vr: Vr,
    /// Decoded value
    pub value: Value,
}

impl TypedField {
    /// Build a field with no keyword.
    #[must_use]
    pub fn new(tag: Tag, vr: Vr, value: Value) -> Self {
        Self {
            tag,
            name: None,
            vr,
            value,
        }
    }

    /// Attach a keyword.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// An ordered list of fields: a sequence item or a whole file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    fields: Vec<TypedField>,
}

impl DataSet {
    /// Create an empty data set.
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, keeping encounter order.
    pub fn push(&mut self, field: TypedField) {
        self.fields.push(field);
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` when the data set has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> core::slice::Iter<'_, TypedField> {
        self.fields.iter()
    }

    /// First field with the given tag.
    #[must_use]
    pub fn get(&self, tag: Tag) -> Option<&TypedField> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

impl FromIterator<TypedField> for DataSet {
    fn from_iter<I: IntoIterator<Item = TypedField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DataSet {
    type Item = TypedField;
    type IntoIter = std::vec::IntoIter<TypedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a TypedField;
    type IntoIter = core::slice::Iter<'a, TypedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
