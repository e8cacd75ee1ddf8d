//! Atomic file replacement for run outputs.
//!
//! The mapping store and the run reports must never be left half-written:
//! an aborted run has to leave the previous persisted state untouched.
//! All writers therefore go through a write-to-temp-then-rename helper.

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `contents` to `path`, replacing any existing file atomically.
///
/// The data is first written to a sibling `.tmp` file and then renamed
/// over the target, so a crash mid-write leaves the old file intact.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = temp_sibling(path);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".tmp");
    path.with_file_name(name)
}
