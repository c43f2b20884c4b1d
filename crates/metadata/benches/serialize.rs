//! Criterion benchmarks for the metadata serializer.
//!
//! Run: cargo bench -p metadata --bench serialize
//!
//! Results show:
//!   serialize_files/*  : whole-mapping serialization vs number of files
//!   normalize_bytes/*  : byte values below and above the truncation limit

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation, // file index → u16 element numbers, bounded by the loop
    missing_docs,                     // criterion_group! macro generates undocumented items
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dataset::{DataSet, Scalar, Tag, Value};
use metadata::{MetadataMapping, MetadataRecord, Serializer};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_records(n: u16) -> Vec<MetadataRecord> {
    vec![
        MetadataRecord::new(Tag::new(0x0008, 0x0060), "Modality", "CT".into()),
        MetadataRecord::new(
            Tag::new(0x0010, 0x0010),
            "PatientName",
            format!("Patient^{n:04}").into(),
        ),
        MetadataRecord::new(
            Tag::new(0x0028, 0x0030),
            "PixelSpacing",
            Value::Multi(vec![Scalar::Float(0.5), Scalar::Float(0.5)]),
        ),
        MetadataRecord::new(
            Tag::new(0x0008, 0x1140),
            "ReferencedImageSequence",
            Value::Sequence(vec![DataSet::new(); 2]),
        ),
        MetadataRecord::new(
            Tag::new(0x0029, n),
            "Private Tag",
            Value::Bytes(vec![0xAB; 4096]),
        ),
    ]
}

fn make_mapping(files: usize) -> MetadataMapping {
    (0..files)
        .map(|i| {
            let n = (i % usize::from(u16::MAX)) as u16;
            (format!("/data/study/{i:06}.dcm"), make_records(n))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_serialize_files(c: &mut Criterion) {
    let serializer = Serializer::default();
    let mut group = c.benchmark_group("serialize_files");
    for files in [10usize, 100, 1_000] {
        let mapping = make_mapping(files);
        group.bench_with_input(BenchmarkId::from_parameter(files), &mapping, |b, m| {
            b.iter(|| black_box(serializer.serialize(m)));
        });
    }
    group.finish();
}

fn bench_normalize_bytes(c: &mut Criterion) {
    let serializer = Serializer::default();
    let mut group = c.benchmark_group("normalize_bytes");
    for len in [512usize, 1024, 1_048_576] {
        let value = Value::Bytes(vec![b'a'; len]);
        group.bench_with_input(BenchmarkId::from_parameter(len), &value, |b, v| {
            b.iter(|| black_box(serializer.normalize(v)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_serialize_files, bench_normalize_bytes);
criterion_main!(benches);
