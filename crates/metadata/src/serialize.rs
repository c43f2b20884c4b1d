//! Value Serializer: record values to a JSON-safe tree.
//!
//! `normalize` dispatch, first match wins:
//!
//! | Value                | Output                                           |
//! |----------------------|--------------------------------------------------|
//! | `Bytes` > limit      | `"<Binary data, N bytes, removed>"`              |
//! | `Bytes` ≤ limit      | UTF-8 string, or `"<Binary data, N bytes, not UTF-8 decodable>"` |
//! | `Sequence`           | `"<Sequence, length L>"` (items not visited)     |
//! | `Multi`              | array of its scalars                             |
//! | `Tag`                | `"(GGGG, EEEE)"`                                 |
//! | `Map` / `List`       | same shape, every value normalized               |
//! | JSON-legal scalar    | kept                                             |
//! | anything else        | its `Display` string                             |
//!
//! Normalization never fails.

use dataset::{Scalar, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::record::{MetadataMapping, MetadataRecord};
use crate::DEFAULT_MAX_BYTES_LENGTH;

/// Converts mappings and values into `serde_json` trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Serializer {
    max_bytes_length: usize,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BYTES_LENGTH)
    }
}

impl Serializer {
    /// Byte values longer than `max_bytes_length` are replaced by a placeholder.
    #[must_use]
    pub fn new(max_bytes_length: usize) -> Self {
        Self { max_bytes_length }
    }

    /// Serialize every file of `mapping`, in path order.
    #[must_use]
    pub fn serialize(&self, mapping: &MetadataMapping) -> JsonValue {
        let files: Map<String, JsonValue> = mapping
            .iter()
            .map(|(path, records)| {
                let records = records.iter().map(|r| self.record(r)).collect();
                (path.to_string(), JsonValue::Array(records))
            })
            .collect();
        JsonValue::Object(files)
    }

    /// `{ "tag", "keyword", "value" }` for one record.
    #[must_use]
    pub fn record(&self, record: &MetadataRecord) -> JsonValue {
        let mut out = Map::with_capacity(3);
        out.insert("tag".into(), JsonValue::String(record.tag.to_string()));
        out.insert("keyword".into(), JsonValue::String(record.keyword.clone()));
        out.insert("value".into(), self.normalize(&record.value));
        JsonValue::Object(out)
    }

    /// Convert any value into a JSON-safe one.
    #[must_use]
    pub fn normalize(&self, value: &Value) -> JsonValue {
        match value {
            Value::Bytes(bytes) => self.bytes(bytes),
            Value::Sequence(items) => {
                JsonValue::String(format!("<Sequence, length {}>", items.len()))
            }
            Value::Multi(items) => JsonValue::Array(items.iter().map(scalar).collect()),
            Value::Tag(tag) => JsonValue::String(tag.to_string()),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, v)| (key.clone(), self.normalize(v)))
                    .collect(),
            ),
            Value::List(items) => {
                JsonValue::Array(items.iter().map(|v| self.normalize(v)).collect())
            }
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::UInt(u) => JsonValue::from(*u),
            Value::Float(x) => float(*x),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::PersonName(name) => JsonValue::String(name.to_string()),
        }
    }

    fn bytes(&self, bytes: &[u8]) -> JsonValue {
        let len = bytes.len();
        if len > self.max_bytes_length {
            return JsonValue::String(format!("<Binary data, {len} bytes, removed>"));
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => JsonValue::String(text.to_string()),
            Err(_) => JsonValue::String(format!("<Binary data, {len} bytes, not UTF-8 decodable>")),
        }
    }
}

fn scalar(s: &Scalar) -> JsonValue {
    match s {
        Scalar::Null => JsonValue::Null,
        Scalar::Bool(b) => JsonValue::Bool(*b),
        Scalar::Int(i) => JsonValue::from(*i),
        Scalar::UInt(u) => JsonValue::from(*u),
        Scalar::Float(x) => float(*x),
        Scalar::Str(s) => JsonValue::String(s.clone()),
    }
}

/// Finite floats are numbers; NaN and infinities have no JSON form.
fn float(x: f64) -> JsonValue {
    Number::from_f64(x).map_or_else(|| JsonValue::String(x.to_string()), JsonValue::Number)
}

/// Serialize `mapping` with the given truncation limit.
#[must_use]
pub fn serialize_metadata(mapping: &MetadataMapping, max_bytes_length: usize) -> JsonValue {
    Serializer::new(max_bytes_length).serialize(mapping)
}

/// Normalize one value with the given truncation limit.
#[must_use]
pub fn normalize(value: &Value, max_bytes_length: usize) -> JsonValue {
    Serializer::new(max_bytes_length).normalize(value)
}

/// Lift an already JSON-safe tree back into the value model.
///
/// Objects become [`Value::Map`], arrays [`Value::List`]; numbers keep their
/// integer or float nature.
#[must_use]
pub fn from_json(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::Str(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(from_json).collect()),
        JsonValue::Object(entries) => Value::Map(
            entries
                .iter()
                .map(|(key, v)| (key.clone(), from_json(v)))
                .collect(),
        ),
    }
}
