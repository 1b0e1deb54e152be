//! Two-sink version substitution with all-or-nothing semantics.
//!
//! One logical version lives in two persisted locations: the version
//! marker file (`__version__ = "X.Y.Z"`) and the project manifest
//! (`current = "X.Y.Z"`). Both substitutions are staged in memory and
//! only written once every sink has validated, so a pattern mismatch in
//! either file leaves both untouched.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The literal assignment looked up in the version marker file.
pub fn marker_needle(version: &str) -> String {
    format!("__version__ = \"{}\"", version)
}

/// The literal field looked up in the project manifest.
pub fn manifest_needle(version: &str) -> String {
    format!("current = \"{}\"", version)
}

/// A single pending file rewrite, staged in memory.
#[derive(Debug)]
pub struct StagedWrite {
    pub path: PathBuf,
    pub original: String,
    pub updated: String,
}

/// Stage the replacement of `needle` with `replacement` in `path`.
///
/// The needle must occur exactly once: zero occurrences is a pattern
/// mismatch, more than one is ambiguous. Either way the file is not
/// modified.
pub fn stage_substitution(path: &Path, needle: &str, replacement: &str) -> Result<StagedWrite> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let count = original.matches(needle).count();
    if count == 0 {
        anyhow::bail!(
            "pattern mismatch: '{}' not found in {}",
            needle,
            path.display()
        );
    }
    if count > 1 {
        anyhow::bail!(
            "pattern ambiguous: '{}' occurs {} times in {}",
            needle,
            count,
            path.display()
        );
    }

    Ok(StagedWrite {
        path: path.to_path_buf(),
        original: original.clone(),
        updated: original.replacen(needle, replacement, 1),
    })
}

/// Write `contents` to `path` atomically via a sibling temp file.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file next to {}", path.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Apply all staged writes. If a later write fails, sinks written so far
/// are restored to their original contents before the error surfaces.
pub fn commit_writes(writes: &[StagedWrite]) -> Result<()> {
    for (i, write) in writes.iter().enumerate() {
        if let Err(e) = write_atomic(&write.path, &write.updated) {
            for done in &writes[..i] {
                let _ = write_atomic(&done.path, &done.original);
            }
            return Err(e);
        }
    }
    Ok(())
}
