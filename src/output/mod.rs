//! Durable run artifacts: the navigation document and the audit record.

pub mod audit;
pub mod navigation;

use std::fs;
use std::path::Path;

pub use audit::{AuditPaths, AuditRecord, AuditRecorder};
pub use navigation::{render, write_document, NAVIGATION_FILE};

/// Write `contents` to `path` through a sibling temp file and a rename, so
/// readers never observe a truncated file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("Invalid output path: {}", path.display()))?
        .to_string_lossy();
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&temp_path, contents)
        .map_err(|e| format!("Failed to write temp file {}: {}", temp_path.display(), e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to replace {}: {}", path.display(), e)
    })
}
