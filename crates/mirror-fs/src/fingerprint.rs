//! Content fingerprinting
//!
//! A fingerprint is the SHA-256 digest of a file's full content, rendered
//! as lowercase hex. Digest equality is the sole equality test between a
//! source and a target file; size and modification time are never
//! consulted. Cost is O(file size), accepted for correctness.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Lowercase-hex SHA-256 digest of file content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a file by reading its full content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn of_file(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::of_bytes(&content))
    }

    /// Fingerprint a byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
