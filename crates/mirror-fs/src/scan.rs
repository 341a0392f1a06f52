//! Source-tree enumeration
//!
//! One scan produces the full catalogue for a cycle: every file under the
//! root, plus a marker entry for every directory with no files anywhere in
//! its subtree. Nothing is cached between cycles; the catalogue is consumed
//! by the sync engine and discarded, and correctness is re-derived from
//! disk on every run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::fingerprint::Fingerprint;
use crate::{Error, Result};

/// One filesystem object discovered by a scan.
///
/// `fingerprint` is `None` exactly when the entry marks a directory with
/// no files in its entire subtree; there is no separate kind tag. A
/// directory that only lacks direct children but has files deeper down is
/// not emitted; it is implied by its descendants' relative paths.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogueEntry {
    /// Base name of the file or empty directory.
    pub name: String,
    /// Absolute path of the immediate parent directory. Diagnostics only,
    /// never used in path arithmetic.
    pub parent: PathBuf,
    /// Content digest for files; `None` marks an empty directory.
    pub fingerprint: Option<Fingerprint>,
    /// Absolute path under the scanned root.
    pub path: PathBuf,
}

impl CatalogueEntry {
    /// True when this entry marks an empty directory rather than a file.
    pub fn is_empty_dir(&self) -> bool {
        self.fingerprint.is_none()
    }
}

/// Walk `root` and produce the catalogue.
///
/// Symlinks are followed; broken links, unreadable entries, and files
/// vanishing mid-scan surface as errors rather than being skipped. A
/// directory whose subtree holds subdirectories but no files still counts
/// as empty, and every qualifying directory (the root included) is emitted
/// independently; the engine's create-if-missing is idempotent, so
/// redundant nested markers are harmless.
pub fn scan(root: &Path) -> Result<Vec<CatalogueEntry>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let (file_paths, dirs) = collect_tree(root)?;

    let mut files = Vec::with_capacity(file_paths.len());
    for path in file_paths {
        let fingerprint = Fingerprint::of_file(&path)?;
        files.push((path, fingerprint));
    }

    let empty_dirs: Vec<PathBuf> = dirs
        .into_iter()
        .filter(|dir| !files.iter().any(|(file, _)| file.starts_with(dir)))
        .collect();

    debug!(
        files = files.len(),
        empty_dirs = empty_dirs.len(),
        root = %root.display(),
        "scan complete"
    );

    let mut catalogue = Vec::with_capacity(files.len() + empty_dirs.len());
    catalogue.extend(
        files
            .into_iter()
            .map(|(path, fingerprint)| entry_for(path, Some(fingerprint))),
    );
    catalogue.extend(empty_dirs.into_iter().map(|path| entry_for(path, None)));
    Ok(catalogue)
}

/// Enumerate all files and all directories under `root`, root included.
///
/// Shared by the source scan and the target cleanup pass so both sides see
/// the tree through the same walk.
pub fn collect_tree(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(walk_error)?;
        let path = entry.path().to_path_buf();
        if entry.file_type().is_dir() {
            dirs.push(path);
        } else {
            files.push(path);
        }
    }
    Ok((files, dirs))
}

fn entry_for(path: PathBuf, fingerprint: Option<Fingerprint>) -> CatalogueEntry {
    let name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned();
    let parent = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.clone());
    CatalogueEntry {
        name,
        parent,
        fingerprint,
        path,
    }
}

fn walk_error(error: walkdir::Error) -> Error {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    match error.into_io_error() {
        Some(source) => Error::io(path, source),
        None => Error::io(path, std::io::Error::other("filesystem loop detected")),
    }
}
