//! Job configuration
//!
//! The core accepts already-validated input: absolute local paths and a
//! non-negative whole-minute interval. There is no interactive recovery;
//! invalid configuration fails fast with a typed error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use mirror_fs::{RetryPolicy, ops, path as fs_path};

use crate::scheduler::Schedule;
use crate::{Error, Result};

fn default_attempts() -> u32 {
    5
}

/// Configuration for one mirror job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Absolute path to the source root. Never modified.
    pub source: PathBuf,
    /// Absolute path to the target root. Created if missing.
    pub target: PathBuf,
    /// Minutes between cycle starts; zero runs a single cycle.
    #[serde(default)]
    pub interval_minutes: u64,
    /// Maximum attempts per mutating filesystem operation.
    #[serde(default = "default_attempts")]
    pub retry_attempts: u32,
}

impl JobConfig {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            interval_minutes: 0,
            retry_attempts: default_attempts(),
        }
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate paths and prepare the target root.
    ///
    /// Both roots must be absolute and local; the source must be an
    /// existing directory; the target is created when missing. Roots are
    /// canonicalized so every event and report shows real paths.
    pub fn validated(mut self) -> Result<Self> {
        fs_path::validate_local_absolute(&self.source)?;
        fs_path::validate_local_absolute(&self.target)?;

        if !self.source.is_dir() {
            return Err(Error::SourceNotFound {
                path: self.source.clone(),
            });
        }
        if !self.target.exists() {
            ops::create_dir(&self.target)?;
        }

        self.source = dunce::canonicalize(&self.source)?;
        self.target = dunce::canonicalize(&self.target)?;
        Ok(self)
    }

    /// The schedule implied by `interval_minutes`.
    pub fn schedule(&self) -> Schedule {
        match self.interval_minutes {
            0 => Schedule::Once,
            minutes => Schedule::Every(Duration::from_secs(minutes * 60)),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            ..RetryPolicy::default()
        }
    }
}
