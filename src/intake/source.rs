//! File selections from the picker and from a drop target.

use std::path::{Path, PathBuf};

use crate::error::{InquiryError, Result};
use crate::model::attachment::RawFile;

/// Files chosen explicitly, in the order given.
pub fn picker_selection(paths: &[PathBuf]) -> Result<Vec<RawFile>> {
    paths.iter().map(|p| RawFile::from_path(p)).collect()
}

/// Files dropped onto the form.
///
/// A dropped directory contributes its regular, non-hidden files sorted by
/// name (no recursion). A dropped file is a one-element selection.
pub fn drop_target(path: &Path) -> Result<Vec<RawFile>> {
    if !path.is_dir() {
        return Ok(vec![RawFile::from_path(path)?]);
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(path).map_err(|e| InquiryError::io(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| InquiryError::io(path, e))?;
        let entry_path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !entry_path.is_file() {
            continue;
        }
        files.push(entry_path);
    }
    files.sort();

    tracing::debug!(dir = %path.display(), count = files.len(), "Expanded drop target");
    picker_selection(&files)
}
