//! Run orchestration: scan, extract each file, serialize once, save.
//!
//! Progress goes to the run log sink passed in by the caller; diagnostics
//! (per-file failures) go through `tracing`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dataset::FieldDecoder;
use metadata::{ExtractOptions, Extractor, FailureKind, MetadataMapping, Serializer};
use tracing::{debug, info, warn};

use crate::output::write_json_atomic;
use crate::scan::scan_dicom_candidates;

const SEPARATOR: &str = "--------------------------------------------------";

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scan_dir: PathBuf,
    pub output: PathBuf,
    pub log: PathBuf,
    pub extract: ExtractOptions,
    pub max_bytes_length: usize,
}

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Candidate files found by the scan
    pub candidates: usize,
    /// Files that produced metadata
    pub processed: usize,
    /// Whether an output document was written
    pub saved: bool,
}

/// Process every candidate under `config.scan_dir` with `decoder`.
///
/// Per-file failures are logged and skipped. A failed output write is
/// reported in `log` and then returned as the error of the run.
pub fn run<D: FieldDecoder>(
    decoder: &D,
    config: &RunConfig,
    log: &mut dyn Write,
) -> Result<RunSummary> {
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
    writeln!(log, "Starting DICOM Metadata Processor - {started}")?;
    writeln!(
        log,
        "Scanning for DICOM files in: {} (and subdirectories)",
        config.scan_dir.display()
    )?;
    writeln!(log, "Metadata will be saved to: {}", config.output.display())?;
    writeln!(log, "Logs will be saved to: {}", config.log.display())?;
    writeln!(log, "{SEPARATOR}")?;

    let candidates = scan_dicom_candidates(&config.scan_dir);
    if candidates.is_empty() {
        writeln!(
            log,
            "No potential DICOM files found in '{}' or its subdirectories.",
            config.scan_dir.display()
        )?;
        writeln!(log, "--- Processing Complete ---")?;
        return Ok(RunSummary {
            candidates: 0,
            processed: 0,
            saved: false,
        });
    }

    let total = candidates.len();
    info!(total, dir = %config.scan_dir.display(), "scan complete");
    writeln!(log, "Found {total} potential DICOM files. Processing...")?;
    writeln!(log, "{SEPARATOR}")?;

    let extractor = Extractor::new(config.extract);
    let mut mapping = MetadataMapping::new();
    for (i, path) in candidates.iter().enumerate() {
        let name = display_name(path);
        let result = match extractor.extract_file(decoder, path) {
            Ok(records) => Some(records),
            Err(e) => {
                match e.kind() {
                    FailureKind::InvalidFile => {
                        warn!(error = %e, "Skipping: {name} (Not a valid DICOM file or corrupted)");
                    }
                    FailureKind::Unexpected => warn!("Error processing {name}: {e}"),
                }
                None
            }
        };

        let outcome = match &result {
            Some(records) => format!("{} meta fields", records.len()),
            None => "No metadata".to_string(),
        };
        writeln!(
            log,
            "[{}/{total}] Processed file: {name} -- {outcome}",
            i.saturating_add(1)
        )?;
        mapping.insert(path.display().to_string(), result);
    }

    writeln!(log, "{SEPARATOR}")?;
    writeln!(log, "Finished processing {} valid DICOM files.", mapping.len())?;

    let tree = Serializer::new(config.max_bytes_length).serialize(&mapping);
    debug!(files = mapping.len(), "metadata serialized");
    let saved = write_json_atomic(&config.output, &tree);
    match &saved {
        Ok(()) => writeln!(
            log,
            "Successfully saved all metadata to: {}",
            config.output.display()
        )?,
        Err(e) => writeln!(log, "Error saving metadata: {e:#}")?,
    }
    writeln!(log)?;
    writeln!(log, "--- DICOM processing complete ---")?;

    saved.with_context(|| format!("failed to save metadata to {}", config.output.display()))?;
    Ok(RunSummary {
        candidates: total,
        processed: mapping.len(),
        saved: true,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
