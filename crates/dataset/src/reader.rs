//! Part 10 reader: decodes a file into a lazy stream of [`TypedField`]s.
//!
//! Layout handled:
//!
//! ```text
//! [0..128]    preamble (ignored)
//! [128..132]  b"DICM"
//! [132..]     file meta group (0002,xxxx), always explicit VR little endian
//! [...]       data set, encoded per the Transfer Syntax UID
//! ```
//!
//! Files without the preamble are accepted when they open with a plausible
//! element header in any even group: either a known explicit VR code, or an
//! implicit length that fits the file. The encoding is then inferred from
//! that first header.
//!
//! Nested sequences are decoded eagerly with the element that owns them, the
//! top level is decoded one element per [`Iterator::next`] call. The first
//! error ends the stream.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::dictionary;
use crate::error::{ReadError, Result};
use crate::tag::Tag;
use crate::value::{DataSet, PersonName, Scalar, TypedField, Value};
use crate::vr::Vr;

/// Length value marking an undefined-length sequence, item or pixel data.
const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;
/// Sequences nested deeper than this are rejected.
const MAX_DEPTH: usize = 32;
/// Offset of the `DICM` magic after the preamble.
const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Implicit VR Little Endian.
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
/// Explicit VR Little Endian.
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
/// Deflated Explicit VR Little Endian (not supported).
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
/// Explicit VR Big Endian (retired, still found in archives).
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";

// ---------------------------------------------------------------------------
// FieldDecoder
// ---------------------------------------------------------------------------

/// Turns a file path into an ordered stream of typed fields.
///
/// Opening fails when the file is unreadable or not of the expected format;
/// errors met later surface as `Err` items of the stream.
pub trait FieldDecoder {
    /// Stream of decoded fields.
    type Fields: Iterator<Item = Result<TypedField>>;

    /// Open `path` and prepare to decode it.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Io`] if the file cannot be read and
    /// [`ReadError::NotDicom`] if it does not look like a data set.
    fn decode(&self, path: &Path) -> Result<Self::Fields>;
}

/// [`FieldDecoder`] for Part 10 files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Part10Decoder;

impl Part10Decoder {
    /// Create a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FieldDecoder for Part10Decoder {
    type Fields = FieldReader;

    fn decode(&self, path: &Path) -> Result<FieldReader> {
        let data = fs::read(path)?;
        FieldReader::new(data)
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Syntax {
    explicit: bool,
    endian: Endian,
}

const IMPLICIT_LE: Syntax = Syntax {
    explicit: false,
    endian: Endian::Little,
};
const EXPLICIT_LE: Syntax = Syntax {
    explicit: true,
    endian: Endian::Little,
};
const EXPLICIT_BE: Syntax = Syntax {
    explicit: true,
    endian: Endian::Big,
};

fn syntax_for_uid(uid: &str) -> Result<Syntax> {
    match uid {
        IMPLICIT_VR_LITTLE_ENDIAN => Ok(IMPLICIT_LE),
        EXPLICIT_VR_BIG_ENDIAN => Ok(EXPLICIT_BE),
        DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN => {
            Err(ReadError::UnsupportedTransferSyntax(uid.to_string()))
        }
        // Explicit little endian and every encapsulated syntax.
        _ => Ok(EXPLICIT_LE),
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Bounds-checked reader over a byte slice. Offsets in errors are absolute.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos, base: 0 }
    }

    fn offset(&self) -> usize {
        self.base.saturating_add(self.pos)
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn truncated(&self) -> ReadError {
        ReadError::Truncated {
            offset: self.offset(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| self.truncated())?;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| self.truncated())?;
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.take(N)?;
        slice.try_into().map_err(|_| self.truncated())
    }

    fn u16(&mut self, endian: Endian) -> Result<u16> {
        let b = self.array::<2>()?;
        Ok(match endian {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        })
    }

    fn u32(&mut self, endian: Endian) -> Result<u32> {
        let b = self.array::<4>()?;
        Ok(match endian {
            Endian::Little => u32::from_le_bytes(b),
            Endian::Big => u32::from_be_bytes(b),
        })
    }

    fn tag(&mut self, endian: Endian) -> Result<Tag> {
        let group = self.u16(endian)?;
        let element = self.u16(endian)?;
        Ok(Tag::new(group, element))
    }

    fn peek_group(&self, endian: Endian) -> Option<u16> {
        let end = self.pos.checked_add(2)?;
        let b: [u8; 2] = self.buf.get(self.pos..end)?.try_into().ok()?;
        Some(match endian {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        })
    }

    fn peek_tag(&self, endian: Endian) -> Option<Tag> {
        let mut probe = Cursor::at(self.buf, self.pos);
        probe.tag(endian).ok()
    }

    /// Guess explicit vs implicit VR from the header at the current position.
    fn guess_syntax(&self) -> Syntax {
        let code = self
            .pos
            .checked_add(4)
            .zip(self.pos.checked_add(6))
            .and_then(|(start, end)| self.buf.get(start..end))
            .and_then(|b| <[u8; 2]>::try_from(b).ok());
        match code.and_then(Vr::from_bytes) {
            Some(_) => EXPLICIT_LE,
            None => IMPLICIT_LE,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldReader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum State {
    Meta,
    Body(Syntax),
}

/// Lazy iterator over the top-level fields of one file.
///
/// Yields the file meta group first, then the data set in encounter order.
/// After the first `Err` it yields nothing more.
pub struct FieldReader {
    data: Vec<u8>,
    pos: usize,
    state: State,
    transfer_syntax: Option<String>,
    done: bool,
}

impl FieldReader {
    /// Wrap an in-memory file.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::NotDicom`] when the bytes carry neither the
    /// `DICM` magic nor a plausible first element.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        let pos = locate_data_set(&data)?;
        Ok(Self {
            data,
            pos,
            state: State::Meta,
            transfer_syntax: None,
            done: false,
        })
    }

    /// Collect the remaining fields into a [`DataSet`].
    ///
    /// # Errors
    ///
    /// Returns the first decoding error met.
    pub fn read_all(self) -> Result<DataSet> {
        self.collect()
    }

    fn read_next(&mut self) -> Option<Result<TypedField>> {
        let mut cur = Cursor::at(&self.data, self.pos);
        if cur.is_empty() {
            return None;
        }

        let syntax = match self.state {
            State::Meta if cur.peek_group(Endian::Little) == Some(Tag::META_GROUP) => EXPLICIT_LE,
            State::Meta => {
                let syntax = match self.transfer_syntax.as_deref() {
                    Some(uid) => match syntax_for_uid(uid) {
                        Ok(syntax) => syntax,
                        Err(e) => return Some(Err(e)),
                    },
                    None => cur.guess_syntax(),
                };
                debug!(
                    transfer_syntax = self.transfer_syntax.as_deref().unwrap_or("<none>"),
                    explicit = syntax.explicit,
                    big_endian = syntax.endian == Endian::Big,
                    "data set encoding selected"
                );
                self.state = State::Body(syntax);
                syntax
            }
            State::Body(syntax) => syntax,
        };

        let result = read_element(&mut cur, syntax, 0);
        self.pos = cur.pos;

        if let Ok(field) = &result {
            if field.tag == Tag::TRANSFER_SYNTAX_UID {
                self.transfer_syntax = field.value.as_str().map(str::to_string);
            }
        }
        Some(result)
    }
}

impl Iterator for FieldReader {
    type Item = Result<TypedField>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.read_next();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Offset of the first element, or `NotDicom`.
fn locate_data_set(data: &[u8]) -> Result<usize> {
    let magic_end = PREAMBLE_LEN.saturating_add(MAGIC.len());
    if data.get(PREAMBLE_LEN..magic_end) == Some(MAGIC.as_slice()) {
        return Ok(magic_end);
    }
    if plausible_first_element(data) {
        debug!("no preamble, reading data set from offset 0");
        return Ok(0);
    }
    Err(ReadError::NotDicom)
}

/// Standard-group element header at offset 0, explicit or implicit VR.
fn plausible_first_element(data: &[u8]) -> bool {
    let mut cur = Cursor::at(data, 0);
    let Ok(tag) = cur.tag(Endian::Little) else {
        return false;
    };
    if tag.group == 0 || tag.is_private() || tag.is_delimiter() {
        return false;
    }
    let mut explicit = Cursor::at(data, cur.pos);
    if explicit.array::<2>().ok().and_then(Vr::from_bytes).is_some() {
        return true;
    }
    let remaining = data.len().saturating_sub(8);
    cur.u32(Endian::Little).is_ok_and(|len| {
        len == UNDEFINED_LENGTH || usize::try_from(len).is_ok_and(|len| len <= remaining)
    })
}

// ---------------------------------------------------------------------------
// Element decoding
// ---------------------------------------------------------------------------

fn read_element(cur: &mut Cursor<'_>, syntax: Syntax, depth: usize) -> Result<TypedField> {
    let header_offset = cur.offset();
    let tag = cur.tag(syntax.endian)?;
    if tag.is_delimiter() {
        return Err(ReadError::Malformed {
            offset: header_offset,
            reason: format!("unexpected delimiter {tag} outside a sequence"),
        });
    }

    let (vr, len) = if syntax.explicit {
        let vr_offset = cur.offset();
        let code = cur.array::<2>()?;
        let vr = Vr::from_bytes(code).ok_or(ReadError::UnknownVr {
            tag,
            code,
            offset: vr_offset,
        })?;
        let len = if vr.has_long_header() {
            cur.take(2)?;
            cur.u32(syntax.endian)?
        } else {
            u32::from(cur.u16(syntax.endian)?)
        };
        (vr, len)
    } else {
        let len = cur.u32(syntax.endian)?;
        (dictionary::vr_for_tag(tag).unwrap_or(Vr::UN), len)
    };

    let (vr, value) = if len == UNDEFINED_LENGTH {
        read_undefined_length(cur, tag, vr, syntax, depth, header_offset)?
    } else {
        let len = usize::try_from(len).map_err(|_| cur.truncated())?;
        let value_offset = cur.offset();
        let bytes = cur.take(len)?;
        if vr == Vr::SQ {
            let mut items = Cursor::new(bytes, value_offset);
            (vr, Value::Sequence(read_items(&mut items, syntax, depth)?))
        } else {
            (vr, decode_value(vr, bytes, syntax.endian))
        }
    };

    let mut field = TypedField::new(tag, vr, value);
    field.name = dictionary::keyword_for_tag(tag).map(str::to_string);
    Ok(field)
}

fn read_undefined_length(
    cur: &mut Cursor<'_>,
    tag: Tag,
    vr: Vr,
    syntax: Syntax,
    depth: usize,
    header_offset: usize,
) -> Result<(Vr, Value)> {
    match vr {
        Vr::SQ => Ok((Vr::SQ, Value::Sequence(read_items(cur, syntax, depth)?))),
        // Undefined-length UN is a sequence encoded as implicit VR little endian.
        Vr::UN if tag != Tag::PIXEL_DATA => {
            Ok((Vr::SQ, Value::Sequence(read_items(cur, IMPLICIT_LE, depth)?)))
        }
        Vr::OB | Vr::OW | Vr::UN => Ok((vr, Value::Bytes(read_fragments(cur, syntax)?))),
        _ => Err(ReadError::Malformed {
            offset: header_offset,
            reason: format!("undefined length on {vr} element {tag}"),
        }),
    }
}

/// Items of a sequence. Stops at the sequence delimiter or at the end of
/// `cur` (defined-length sequences are given a cursor over exactly their value).
fn read_items(cur: &mut Cursor<'_>, syntax: Syntax, depth: usize) -> Result<Vec<DataSet>> {
    let depth = depth.saturating_add(1);
    if depth > MAX_DEPTH {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            reason: format!("sequences nested deeper than {MAX_DEPTH}"),
        });
    }

    let mut items = Vec::new();
    while !cur.is_empty() {
        let item_offset = cur.offset();
        let tag = cur.tag(syntax.endian)?;
        let len = cur.u32(syntax.endian)?;
        if tag == Tag::SEQUENCE_DELIMITATION {
            break;
        }
        if tag != Tag::ITEM {
            return Err(ReadError::Malformed {
                offset: item_offset,
                reason: format!("expected item, found {tag}"),
            });
        }
        let item = if len == UNDEFINED_LENGTH {
            read_item_until_delimiter(cur, syntax, depth)?
        } else {
            let len = usize::try_from(len).map_err(|_| cur.truncated())?;
            let base = cur.offset();
            let mut body = Cursor::new(cur.take(len)?, base);
            let mut item = DataSet::new();
            while !body.is_empty() {
                item.push(read_element(&mut body, syntax, depth)?);
            }
            item
        };
        items.push(item);
    }
    Ok(items)
}

fn read_item_until_delimiter(
    cur: &mut Cursor<'_>,
    syntax: Syntax,
    depth: usize,
) -> Result<DataSet> {
    let mut item = DataSet::new();
    loop {
        match cur.peek_tag(syntax.endian) {
            Some(Tag::ITEM_DELIMITATION) => {
                cur.tag(syntax.endian)?;
                cur.u32(syntax.endian)?;
                return Ok(item);
            }
            Some(_) => item.push(read_element(cur, syntax, depth)?),
            None => return Err(cur.truncated()),
        }
    }
}

/// Encapsulated pixel data: fragment items up to the sequence delimiter,
/// concatenated. The basic offset table (first item) is included as-is.
fn read_fragments(cur: &mut Cursor<'_>, syntax: Syntax) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let item_offset = cur.offset();
        let tag = cur.tag(syntax.endian)?;
        let len = cur.u32(syntax.endian)?;
        match tag {
            Tag::SEQUENCE_DELIMITATION => return Ok(out),
            Tag::ITEM if len != UNDEFINED_LENGTH => {
                let len = usize::try_from(len).map_err(|_| cur.truncated())?;
                out.extend_from_slice(cur.take(len)?);
            }
            _ => {
                return Err(ReadError::Malformed {
                    offset: item_offset,
                    reason: format!("bad fragment item {tag}"),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Value decoding
// ---------------------------------------------------------------------------

fn decode_value(vr: Vr, bytes: &[u8], endian: Endian) -> Value {
    if vr == Vr::AT {
        return decode_tags(bytes, endian);
    }
    if let Some(width) = vr.numeric_width() {
        return decode_numbers(vr, width, bytes, endian);
    }
    if vr.is_bytes() {
        return Value::Bytes(bytes.to_vec());
    }
    let text = decode_text(bytes);
    if vr.is_long_text() {
        return Value::Str(text.trim_end_matches([' ', '\0']).to_string());
    }
    decode_text_values(vr, &text)
}

/// UTF-8 when valid, otherwise one char per byte (ISO 8859-1).
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn decode_text_values(vr: Vr, text: &str) -> Value {
    let trimmed = text.trim_end_matches([' ', '\0']);
    if trimmed.is_empty() {
        return Value::Str(String::new());
    }
    let components: Vec<&str> = trimmed
        .split('\\')
        .map(|c| {
            if vr == Vr::UI {
                c.trim_end_matches(['\0', ' '])
            } else {
                c.trim_matches(' ')
            }
        })
        .collect();

    match components.as_slice() {
        [single] if vr == Vr::PN => Value::PersonName(PersonName::new(*single)),
        [single] => Value::from(text_scalar(vr, single)),
        many => Value::Multi(many.iter().map(|c| text_scalar(vr, c)).collect()),
    }
}

fn text_scalar(vr: Vr, component: &str) -> Scalar {
    match vr {
        Vr::IS | Vr::DS if component.is_empty() => Scalar::Null,
        Vr::IS => component
            .parse::<i64>()
            .map_or_else(|_| Scalar::Str(component.to_string()), Scalar::Int),
        Vr::DS => component
            .parse::<f64>()
            .map_or_else(|_| Scalar::Str(component.to_string()), Scalar::Float),
        _ => Scalar::Str(component.to_string()),
    }
}

fn decode_numbers(vr: Vr, width: usize, bytes: &[u8], endian: Endian) -> Value {
    let chunks = bytes.chunks_exact(width);
    if !chunks.remainder().is_empty() {
        debug!(%vr, len = bytes.len(), "numeric value length is not a multiple of {width}");
    }
    let mut numbers: Vec<Scalar> = chunks.filter_map(|c| number(vr, c, endian)).collect();
    match numbers.len() {
        0 => Value::Null,
        1 => numbers.pop().map_or(Value::Null, Value::from),
        _ => Value::Multi(numbers),
    }
}

fn number(vr: Vr, chunk: &[u8], endian: Endian) -> Option<Scalar> {
    macro_rules! read {
        ($ty:ty) => {{
            let b = chunk.try_into().ok()?;
            match endian {
                Endian::Little => <$ty>::from_le_bytes(b),
                Endian::Big => <$ty>::from_be_bytes(b),
            }
        }};
    }
    let scalar = match vr {
        Vr::US => Scalar::UInt(u64::from(read!(u16))),
        Vr::UL => Scalar::UInt(u64::from(read!(u32))),
        Vr::UV => Scalar::UInt(read!(u64)),
        Vr::SS => Scalar::Int(i64::from(read!(i16))),
        Vr::SL => Scalar::Int(i64::from(read!(i32))),
        Vr::SV => Scalar::Int(read!(i64)),
        Vr::FL => Scalar::Float(f64::from(read!(f32))),
        Vr::FD => Scalar::Float(read!(f64)),
        _ => return None,
    };
    Some(scalar)
}

fn decode_tags(bytes: &[u8], endian: Endian) -> Value {
    let mut tags: Vec<Value> = bytes
        .chunks_exact(4)
        .filter_map(|c| {
            let mut cur = Cursor::new(c, 0);
            cur.tag(endian).ok().map(Value::Tag)
        })
        .collect();
    match tags.len() {
        0 => Value::Null,
        1 => tags.pop().unwrap_or(Value::Null),
        _ => Value::List(tags),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;

    /// Explicit VR little endian element with a short header.
    fn short(tag: Tag, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&tag.group.to_le_bytes());
        out.extend_from_slice(&tag.element.to_le_bytes());
        out.extend_from_slice(vr);
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
        out.extend_from_slice(value);
        out
    }

    /// Explicit VR little endian element with a long header.
    fn long(tag: Tag, vr: &[u8; 2], len: u32, value: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&tag.group.to_le_bytes());
        out.extend_from_slice(&tag.element.to_le_bytes());
        out.extend_from_slice(vr);
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(value);
        out
    }

    fn marker(tag: Tag, len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&tag.group.to_le_bytes());
        out.extend_from_slice(&tag.element.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out
    }

    fn part10(ts: &str, body: &[u8]) -> Vec<u8> {
        let mut uid = ts.as_bytes().to_vec();
        if uid.len() % 2 == 1 {
            uid.push(0);
        }
        let mut out = vec![0u8; PREAMBLE_LEN];
        out.extend_from_slice(MAGIC);
        out.extend(short(Tag::TRANSFER_SYNTAX_UID, b"UI", &uid));
        out.extend_from_slice(body);
        out
    }

    fn fields(data: Vec<u8>) -> Vec<TypedField> {
        FieldReader::new(data).unwrap().read_all().unwrap().into_iter().collect()
    }

    #[test]
    fn rejects_random_bytes() {
        assert!(matches!(
            FieldReader::new(b"hello, world".to_vec()),
            Err(ReadError::NotDicom)
        ));
    }

    #[test]
    fn reads_meta_then_body_in_order() {
        let mut body = short(Tag::new(0x0008, 0x0060), b"CS", b"CT");
        body.extend(short(Tag::new(0x0010, 0x0010), b"PN", b"Doe^John"));
        let out = fields(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body));

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].tag, Tag::TRANSFER_SYNTAX_UID);
        assert_eq!(out[0].value, Value::Str(EXPLICIT_VR_LITTLE_ENDIAN.into()));
        assert_eq!(out[1].name.as_deref(), Some("Modality"));
        assert_eq!(out[1].value, Value::Str("CT".into()));
        assert_eq!(
            out[2].value,
            Value::PersonName(PersonName::new("Doe^John"))
        );
    }

    #[test]
    fn reads_implicit_vr_body_with_dictionary_vrs() {
        let mut body = marker(Tag::new(0x0028, 0x0010), 2);
        body.extend_from_slice(&512u16.to_le_bytes());
        body.extend(marker(Tag::new(0x0009, 0x1001), 4));
        body.extend_from_slice(&[1, 2, 3, 4]);
        let out = fields(part10(IMPLICIT_VR_LITTLE_ENDIAN, &body));

        assert_eq!(out[1].vr, Vr::US);
        assert_eq!(out[1].value, Value::UInt(512));
        assert_eq!(out[2].vr, Vr::UN);
        assert_eq!(out[2].value, Value::Bytes(vec![1, 2, 3, 4]));
        assert_eq!(out[2].name, None);
    }

    #[test]
    fn splits_multi_valued_text_and_parses_numbers() {
        let mut body = short(Tag::new(0x0008, 0x0008), b"CS", b"ORIGINAL\\PRIMARY ");
        body.extend(short(Tag::new(0x0028, 0x0030), b"DS", b"0.5\\0.25"));
        body.extend(short(Tag::new(0x0020, 0x0013), b"IS", b" 7"));
        let out = fields(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body));

        assert_eq!(
            out[1].value,
            Value::Multi(vec![
                Scalar::Str("ORIGINAL".into()),
                Scalar::Str("PRIMARY".into())
            ])
        );
        assert_eq!(
            out[2].value,
            Value::Multi(vec![Scalar::Float(0.5), Scalar::Float(0.25)])
        );
        assert_eq!(out[3].value, Value::Int(7));
    }

    #[test]
    fn decodes_binary_numbers_and_tags() {
        let mut us = Vec::new();
        us.extend_from_slice(&1u16.to_le_bytes());
        us.extend_from_slice(&2u16.to_le_bytes());
        let mut body = short(Tag::new(0x0018, 0x1310), b"US", &us);
        let mut at = Vec::new();
        at.extend_from_slice(&0x0018u16.to_le_bytes());
        at.extend_from_slice(&0x1063u16.to_le_bytes());
        body.extend(short(Tag::new(0x0028, 0x0009), b"AT", &at));
        body.extend(short(Tag::new(0x0018, 0x9999), b"FD", &1.5f64.to_le_bytes()));
        let out = fields(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body));

        assert_eq!(
            out[1].value,
            Value::Multi(vec![Scalar::UInt(1), Scalar::UInt(2)])
        );
        assert_eq!(out[2].value, Value::Tag(Tag::new(0x0018, 0x1063)));
        assert_eq!(out[3].value, Value::Float(1.5));
    }

    #[test]
    fn reads_undefined_length_sequence() {
        let mut seq_body = marker(Tag::ITEM, UNDEFINED_LENGTH);
        seq_body.extend(short(Tag::new(0x0008, 0x1150), b"UI", b"1.2.3\0"));
        seq_body.extend(marker(Tag::ITEM_DELIMITATION, 0));
        seq_body.extend(marker(Tag::ITEM, 14));
        seq_body.extend(short(Tag::new(0x0008, 0x1155), b"UI", b"1.2.4\0"));
        seq_body.extend(marker(Tag::SEQUENCE_DELIMITATION, 0));
        let mut body = long(Tag::new(0x0008, 0x1140), b"SQ", UNDEFINED_LENGTH, &seq_body);
        body.extend(short(Tag::new(0x0008, 0x0060), b"CS", b"MR"));
        let out = fields(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body));

        match &out[1].value {
            Value::Sequence(items) => {
                assert_eq!(items.len(), 2);
                let first = items[0].get(Tag::new(0x0008, 0x1150)).unwrap();
                assert_eq!(first.value, Value::Str("1.2.3".into()));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
        assert_eq!(out[2].value, Value::Str("MR".into()));
    }

    #[test]
    fn reads_encapsulated_pixel_data() {
        let mut frags = marker(Tag::ITEM, 0);
        frags.extend(marker(Tag::ITEM, 4));
        frags.extend_from_slice(&[9, 8, 7, 6]);
        frags.extend(marker(Tag::SEQUENCE_DELIMITATION, 0));
        let body = long(Tag::PIXEL_DATA, b"OB", UNDEFINED_LENGTH, &frags);
        let out = fields(part10("1.2.840.10008.1.2.4.50", &body));

        assert_eq!(out[1].tag, Tag::PIXEL_DATA);
        assert_eq!(out[1].value, Value::Bytes(vec![9, 8, 7, 6]));
    }

    #[test]
    fn deflated_syntax_is_unsupported() {
        let body = short(Tag::new(0x0008, 0x0060), b"CS", b"CT");
        let mut reader = FieldReader::new(part10(DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(ReadError::UnsupportedTransferSyntax(_)))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn truncated_value_ends_the_stream() {
        let mut body = short(Tag::new(0x0008, 0x0060), b"CS", b"CT");
        body.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x20, 0x00, b'D']);
        let reader = FieldReader::new(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();
        let results: Vec<_> = reader.collect();
        assert_eq!(results.len(), 3);
        assert!(matches!(results[2], Err(ReadError::Truncated { .. })));
    }

    #[test]
    fn reads_preamble_less_implicit_data_set() {
        let mut data = marker(Tag::new(0x0008, 0x0060), 2);
        data.extend_from_slice(b"US");
        let out = fields(data);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].vr, Vr::CS);
        assert_eq!(out[0].value, Value::Str("US".into()));
    }

    #[test]
    fn reads_preamble_less_patient_group_dump() {
        let mut data = marker(Tag::new(0x0010, 0x0010), 8);
        data.extend_from_slice(b"Doe^John");
        data.extend(marker(Tag::new(0x0010, 0x0020), 4));
        data.extend_from_slice(b"P001");
        let out = fields(data);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name.as_deref(), Some("PatientName"));
        assert_eq!(out[1].value, Value::Str("P001".into()));

        let explicit = short(Tag::new(0x0020, 0x000D), b"UI", b"1.2.3\0");
        assert_eq!(fields(explicit).len(), 1);
    }

    #[test]
    fn preamble_less_header_must_be_plausible() {
        // Odd group.
        let mut data = marker(Tag::new(0x0009, 0x0010), 2);
        data.extend_from_slice(b"AB");
        assert!(matches!(FieldReader::new(data), Err(ReadError::NotDicom)));
        // Implicit length runs past the end of the file.
        let mut data = marker(Tag::new(0x0010, 0x0010), 64);
        data.extend_from_slice(b"Doe^John");
        assert!(matches!(FieldReader::new(data), Err(ReadError::NotDicom)));
        // Header too short.
        assert!(matches!(
            FieldReader::new(vec![0x10, 0x00, 0x10]),
            Err(ReadError::NotDicom)
        ));
    }

    #[test]
    fn latin1_text_falls_back_per_byte() {
        let body = short(Tag::new(0x0008, 0x0080), b"LO", &[b'Z', 0xFC, b'r', b'i']);
        let out = fields(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body));
        assert_eq!(out[1].value, Value::Str("Züri".into()));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let mut inner = Vec::new();
        for _ in 0..=MAX_DEPTH {
            let mut item = marker(Tag::ITEM, UNDEFINED_LENGTH);
            item.extend(long(Tag::new(0x0040, 0xA730), b"SQ", UNDEFINED_LENGTH, &inner));
            item.extend(marker(Tag::ITEM_DELIMITATION, 0));
            item.extend(marker(Tag::SEQUENCE_DELIMITATION, 0));
            inner = item;
        }
        let body = long(Tag::new(0x0040, 0xA730), b"SQ", UNDEFINED_LENGTH, &inner);
        let reader = FieldReader::new(part10(EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();
        assert!(matches!(
            reader.read_all(),
            Err(ReadError::Malformed { .. })
        ));
    }
}
