//! End-to-end extraction → mapping → serialization with an in-memory decoder.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dataset::{DataSet, FieldDecoder, ReadError, Tag, TypedField, Value, Vr};
use metadata::{
    serialize_metadata, ExtractError, Extractor, FailureKind, MetadataMapping,
    DEFAULT_MAX_BYTES_LENGTH,
};
use serde_json::json;

/// Serves canned field lists; unknown paths are `NotDicom`, and a field
/// list may carry an injected mid-stream error.
#[derive(Default)]
struct MockDecoder {
    files: HashMap<PathBuf, Vec<Result<TypedField, ReadError>>>,
}

impl MockDecoder {
    fn add(&mut self, path: &str, fields: Vec<TypedField>) {
        self.files
            .insert(PathBuf::from(path), fields.into_iter().map(Ok).collect());
    }

    fn add_broken(&mut self, path: &str, good: Vec<TypedField>) {
        let mut items: Vec<_> = good.into_iter().map(Ok).collect();
        items.push(Err(ReadError::Malformed {
            offset: 64,
            reason: "bad item".into(),
        }));
        self.files.insert(PathBuf::from(path), items);
    }
}

impl FieldDecoder for MockDecoder {
    type Fields = std::vec::IntoIter<Result<TypedField, ReadError>>;

    fn decode(&self, path: &Path) -> Result<Self::Fields, ReadError> {
        match self.files.get(path) {
            Some(items) => Ok(items
                .iter()
                .map(|r| match r {
                    Ok(f) => Ok(f.clone()),
                    Err(ReadError::Malformed { offset, reason }) => Err(ReadError::Malformed {
                        offset: *offset,
                        reason: reason.clone(),
                    }),
                    Err(_) => Err(ReadError::NotDicom),
                })
                .collect::<Vec<_>>()
                .into_iter()),
            None => Err(ReadError::NotDicom),
        }
    }
}

fn field(group: u16, element: u16, vr: Vr, value: Value) -> TypedField {
    TypedField::new(Tag::new(group, element), vr, value)
}

fn run(decoder: &MockDecoder, paths: &[&str]) -> MetadataMapping {
    let extractor = Extractor::default();
    let mut mapping = MetadataMapping::new();
    for path in paths {
        let result = extractor.extract_file(decoder, Path::new(path)).ok();
        mapping.insert(*path, result);
    }
    mapping
}

#[test]
fn test_patient_name_passes_through() {
    let mut decoder = MockDecoder::default();
    decoder.add(
        "a.dcm",
        vec![field(0x0010, 0x0010, Vr::PN, "John^Doe".into()).with_name("PatientName")],
    );
    let out = serialize_metadata(&run(&decoder, &["a.dcm"]), DEFAULT_MAX_BYTES_LENGTH);
    assert_eq!(
        out,
        json!({"a.dcm": [{"tag": "(0010, 0010)", "keyword": "PatientName", "value": "John^Doe"}]})
    );
}

#[test]
fn test_large_binary_summarized_then_kept_by_serializer() {
    let mut decoder = MockDecoder::default();
    let mut payload = vec![0u8; 2_000_000];
    payload[..16].copy_from_slice(&[
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ]);
    decoder.add("big.dcm", vec![field(0x0029, 0x1010, Vr::OB, Value::Bytes(payload))]);

    let out = serialize_metadata(&run(&decoder, &["big.dcm"]), DEFAULT_MAX_BYTES_LENGTH);
    let record = &out["big.dcm"][0];
    assert_eq!(record["keyword"], json!("Private Tag"));
    assert_eq!(
        record["value"],
        json!("<Binary Data, length: 2000000 bytes, first 16 hex: 00112233445566778899aabbccddeeff...>")
    );
}

#[test]
fn test_sequence_of_three_is_summarized() {
    let item: DataSet = [field(0x0008, 0x1150, Vr::UI, "1.2.840".into())]
        .into_iter()
        .collect();
    let mut decoder = MockDecoder::default();
    decoder.add(
        "seq.dcm",
        vec![field(
            0x0008,
            0x1140,
            Vr::SQ,
            Value::Sequence(vec![item.clone(), item.clone(), item]),
        )],
    );
    let out = serialize_metadata(&run(&decoder, &["seq.dcm"]), DEFAULT_MAX_BYTES_LENGTH);
    assert_eq!(out["seq.dcm"][0]["keyword"], json!("ReferencedImageSequence"));
    assert_eq!(out["seq.dcm"][0]["value"], json!("<Sequence, length 3>"));
}

#[test]
fn test_failed_files_are_absent() {
    let mut decoder = MockDecoder::default();
    decoder.add("ok.dcm", vec![field(0x0008, 0x0060, Vr::CS, "CT".into())]);
    decoder.add_broken("broken.dcm", vec![field(0x0008, 0x0060, Vr::CS, "MR".into())]);

    let mapping = run(&decoder, &["ok.dcm", "broken.dcm", "missing.dcm"]);
    assert_eq!(mapping.len(), 1);

    let out = serialize_metadata(&mapping, DEFAULT_MAX_BYTES_LENGTH);
    let obj = out.as_object().unwrap();
    assert!(obj.contains_key("ok.dcm"));
    assert!(!obj.contains_key("broken.dcm"));
    assert!(!obj.contains_key("missing.dcm"));
}

#[test]
fn test_failure_kinds() {
    let mut decoder = MockDecoder::default();
    decoder.add_broken("broken.dcm", vec![]);
    let extractor = Extractor::default();

    let err = extractor
        .extract_file(&decoder, Path::new("missing.dcm"))
        .unwrap_err();
    assert!(matches!(err, ExtractError::Open(ReadError::NotDicom)));
    assert_eq!(err.kind(), FailureKind::InvalidFile);

    let err = extractor
        .extract_file(&decoder, Path::new("broken.dcm"))
        .unwrap_err();
    assert!(matches!(err, ExtractError::Field { fields_read: 0, .. }));
}

#[test]
fn test_pixel_data_dropped_and_order_kept() {
    let mut decoder = MockDecoder::default();
    decoder.add(
        "img.dcm",
        vec![
            field(0x0028, 0x0010, Vr::US, Value::UInt(512)),
            field(0x7FE0, 0x0010, Vr::OW, Value::Bytes(vec![0; 1024])),
            field(0x0008, 0x0005, Vr::CS, "ISO_IR 100".into()),
            field(0x0028, 0x0009, Vr::AT, Value::Tag(Tag::new(0x0018, 0x1063))),
        ],
    );
    let out = serialize_metadata(&run(&decoder, &["img.dcm"]), DEFAULT_MAX_BYTES_LENGTH);
    assert_eq!(
        out["img.dcm"],
        json!([
            {"tag": "(0028, 0010)", "keyword": "Rows", "value": 512},
            {"tag": "(0008, 0005)", "keyword": "SpecificCharacterSet", "value": "ISO_IR 100"},
            {"tag": "(0028, 0009)", "keyword": "FrameIncrementPointer", "value": "(0018, 1063)"},
        ])
    );
}

#[test]
fn test_non_ascii_survives_pretty_printing() {
    let mut decoder = MockDecoder::default();
    decoder.add(
        "jp.dcm",
        vec![field(0x0010, 0x0010, Vr::PN, "山田^太郎".into())],
    );
    let out = serialize_metadata(&run(&decoder, &["jp.dcm"]), DEFAULT_MAX_BYTES_LENGTH);
    let text = serde_json::to_string_pretty(&out).unwrap();
    assert!(text.contains("山田^太郎"));
    assert!(text.contains("\n  \"jp.dcm\": [\n    {\n      \"tag\""));
}
