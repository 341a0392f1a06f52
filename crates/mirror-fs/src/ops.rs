//! Mutating filesystem primitives
//!
//! Copies are written through a same-directory temp file and renamed into
//! place, so a replaced target is never observable half-written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Outcome of a removal: the entry was deleted, or it was already gone.
///
/// `NotFound` during deletion achieves the desired end state and is never
/// surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyAbsent,
}

/// Copy `source` to `dest`, replacing any existing file at `dest`.
///
/// Reads the full source content, writes it to a temp file next to `dest`
/// under an exclusive lock, syncs, then renames over `dest`. The parent
/// directory of `dest` must already exist; creating it is a separate
/// operation with its own retry budget.
pub fn copy_atomic(source: &Path, dest: &Path) -> Result<()> {
    let content = fs::read(source).map_err(|e| Error::io(source, e))?;

    // Temp file in the destination directory (ensures same filesystem)
    let temp_name = format!(
        ".{}.{}.tmp",
        dest.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = dest.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .write_all(&content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    // Release lock (implicit on drop, but be explicit)
    temp_file
        .unlock()
        .map_err(|e| Error::io(&temp_path, e))?;

    fs::rename(&temp_path, dest).map_err(|e| Error::io(dest, e))
}

/// Create a directory and any missing ancestors.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Delete a file. Already-absent counts as success.
pub fn remove_file(path: &Path) -> Result<Removal> {
    match fs::remove_file(path) {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Removal::AlreadyAbsent),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Recursively delete a directory and everything beneath it.
/// Already-absent counts as success.
pub fn remove_dir_recursive(path: &Path) -> Result<Removal> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Removal::AlreadyAbsent),
        Err(e) => Err(Error::io(path, e)),
    }
}
