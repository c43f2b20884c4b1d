//! Candidate discovery: recursive walk filtered by extension.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Files with this extension (any case) are candidates, as are files with none.
const DICOM_EXTENSION: &str = "dcm";

/// Recursively collect candidate files under `dir`, sorted by path.
///
/// Hidden entries (leading `.`) are not visited. Unreadable directories are
/// logged and skipped.
pub fn scan_dicom_candidates(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_candidate(e.path()))
        .map(DirEntry::into_path)
        .collect();
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    files.dedup();
    files
}

/// `dcm` in any case, or no extension at all.
pub fn is_candidate(path: &Path) -> bool {
    match path.extension() {
        None => true,
        Some(ext) => ext
            .to_str()
            .is_some_and(|e| e.eq_ignore_ascii_case(DICOM_EXTENSION)),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}
