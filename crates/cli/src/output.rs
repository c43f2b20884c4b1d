//! All-or-nothing JSON output.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;

/// Pretty-print `value` (2-space indent, non-ASCII kept literal) to `path`.
///
/// The document is written to a temporary file next to `path` and renamed
/// over it once complete, so readers never observe a partial document.
/// A replaced file keeps its permissions; a new one is created `0644`.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temporary file in {}", dir.display()))?;

    let mut writer = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut writer, value).context("cannot encode metadata as JSON")?;
    writer.flush().context("cannot flush metadata")?;
    let tmp = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("cannot flush metadata")?;
    tmp.as_file().sync_all().context("cannot sync metadata")?;
    #[cfg(unix)]
    tmp.as_file()
        .set_permissions(output_permissions(path))
        .context("cannot set metadata file permissions")?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot replace {}", path.display()))?;
    Ok(())
}

/// Mode of the file being replaced, else `0644`. Temporary files start `0600`.
#[cfg(unix)]
fn output_permissions(path: &Path) -> std::fs::Permissions {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).map_or_else(|_| fs::Permissions::from_mode(0o644), |m| m.permissions())
}
