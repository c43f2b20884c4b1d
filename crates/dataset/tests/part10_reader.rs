//! Integration tests for the Part 10 decoder against files on disk.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use std::fs;
use std::path::PathBuf;

use dataset::{FieldDecoder, Part10Decoder, ReadError, Tag, Value, Vr};
use tempfile::TempDir;

fn element(tag: Tag, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.group.to_le_bytes());
    out.extend_from_slice(&tag.element.to_le_bytes());
    out.extend_from_slice(vr);
    if matches!(vr, b"OB" | b"OW" | b"UN" | b"SQ" | b"UT") {
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    } else {
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    }
    out.extend_from_slice(value);
    out
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn explicit_le_file(body: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(element(Tag::TRANSFER_SYNTAX_UID, b"UI", b"1.2.840.10008.1.2.1\0"));
    out.extend_from_slice(body);
    out
}

#[test]
fn test_decodes_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let mut body = element(Tag::new(0x0010, 0x0010), b"PN", b"Doe^Jane");
    body.extend(element(Tag::new(0x0010, 0x0020), b"LO", b"PID-001 "));
    body.extend(element(Tag::PIXEL_DATA, b"OW", &[0u8; 32]));
    let path = write_file(&dir, "image.dcm", &explicit_le_file(&body));

    let fields: Vec<_> = Part10Decoder::new()
        .decode(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(fields.len(), 4);
    assert_eq!(fields[1].name.as_deref(), Some("PatientName"));
    assert_eq!(fields[2].value, Value::Str("PID-001".into()));
    assert_eq!(fields[3].tag, Tag::PIXEL_DATA);
    assert_eq!(fields[3].vr, Vr::OW);
}

#[test]
fn test_missing_file_is_invalid_file() {
    let dir = TempDir::new().unwrap();
    let err = Part10Decoder::new()
        .decode(&dir.path().join("absent.dcm"))
        .err()
        .unwrap();
    assert!(matches!(err, ReadError::Io(_)));
    assert!(err.is_invalid_file());
}

#[test]
fn test_text_file_is_not_dicom() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.dcm", b"this is not an image at all\n");
    let err = Part10Decoder::new().decode(&path).err().unwrap();
    assert!(matches!(err, ReadError::NotDicom));
    assert!(err.is_invalid_file());
}

#[test]
fn test_empty_file_is_not_dicom() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty", b"");
    assert!(matches!(
        Part10Decoder::new().decode(&path),
        Err(ReadError::NotDicom)
    ));
}

#[test]
fn test_truncated_file_fails_mid_stream() {
    let dir = TempDir::new().unwrap();
    let mut bytes = explicit_le_file(&element(Tag::new(0x0008, 0x0060), b"CS", b"CT"));
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x40]);
    let path = write_file(&dir, "cut.dcm", &bytes);

    let results: Vec<_> = Part10Decoder::new().decode(&path).unwrap().collect();
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results.last().unwrap().is_err());
}

#[test]
fn test_big_endian_body() {
    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(element(Tag::TRANSFER_SYNTAX_UID, b"UI", b"1.2.840.10008.1.2.2\0"));
    // (0028,0010) US 2 = 256, big endian
    out.extend_from_slice(&[0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02, 0x01, 0x00]);
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "be.dcm", &out);

    let fields: Vec<_> = Part10Decoder::new()
        .decode(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(fields[1].tag, Tag::new(0x0028, 0x0010));
    assert_eq!(fields[1].value, Value::UInt(256));
}

proptest::proptest! {
    #[test]
    fn test_arbitrary_bytes_never_panic(data in proptest::collection::vec(proptest::num::u8::ANY, 0..512)) {
        if let Ok(reader) = dataset::FieldReader::new(data) {
            let _ = reader.count();
        }
    }

    #[test]
    fn test_arbitrary_body_after_magic_never_panics(body in proptest::collection::vec(proptest::num::u8::ANY, 0..512)) {
        let reader = dataset::FieldReader::new(explicit_le_file(&body)).unwrap();
        let _ = reader.count();
    }
}
