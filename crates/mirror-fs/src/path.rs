//! Path validation and placement helpers

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Check whether a path names a network location.
///
/// Detects UNC paths (`//server/share` or `\\server\share`) and
/// URL-style shares.
pub fn is_network_path(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    raw.starts_with("\\\\")
        || raw.starts_with("//")
        || raw.starts_with("smb://")
        || raw.starts_with("nfs://")
}

/// Validate that `path` is absolute and local.
///
/// Root paths are handed over already validated by the caller; anything
/// else is a configuration error, not a prompt for re-entry.
pub fn validate_local_absolute(path: &Path) -> Result<()> {
    if is_network_path(path) {
        return Err(Error::NetworkPath {
            path: path.to_path_buf(),
        });
    }
    if !path.is_absolute() {
        return Err(Error::NotAbsolute {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Compute `path` relative to `root`.
///
/// The result is what gets re-joined onto the other tree's root, so the
/// directory structure mirrors exactly instead of flattening.
pub fn relative_to(root: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}
