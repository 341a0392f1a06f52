//! Cleanup phase: stale-entry removal
//!
//! Everything under the target root with no counterpart under the source
//! root is deleted. Target contents are collected before any deletion, so
//! the pass is unaffected by its own removals; entries a recursive
//! directory delete already took out resolve as already-absent skips.

use std::path::{Path, PathBuf};

use mirror_fs::{Removal, ops, path as fs_path, scan};

use crate::engine::{SyncEngine, display_dir};
use crate::event::{EventAction, EventLevel, EventStatus, SyncEvent};
use crate::report::{RemovalOutcome, RemovalResult};
use crate::Result;

impl SyncEngine {
    /// Remove every file and directory under the target root that has no
    /// counterpart at the same relative path under the source root.
    ///
    /// Runs unconditionally after every apply phase, even when apply
    /// reported no changes. Files go first; directories are deleted
    /// recursively, so a single stale top-level directory takes its whole
    /// subtree in one operation.
    pub fn cleanup(&self) -> Result<Vec<RemovalResult>> {
        let (files, dirs) = scan::collect_tree(self.target_root())?;
        let mut results = Vec::new();

        for file in files {
            let Some(counterpart) = self.source_counterpart(&file) else {
                continue;
            };
            if counterpart.is_file() {
                continue;
            }
            results.push(self.delete(&file, false));
        }

        for dir in dirs {
            let Some(counterpart) = self.source_counterpart(&dir) else {
                continue;
            };
            if counterpart.is_dir() {
                continue;
            }
            results.push(self.delete(&dir, true));
        }

        Ok(results)
    }

    /// The would-be source path for a target-tree object.
    fn source_counterpart(&self, target_path: &Path) -> Option<PathBuf> {
        fs_path::relative_to(self.target_root(), target_path)
            .ok()
            .map(|relative| self.source_root().join(relative))
    }

    fn delete(&self, path: &Path, recursive: bool) -> RemovalResult {
        let name = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .into_owned();

        let removal = self.mutate(EventAction::Delete, &name, path, || {
            if recursive {
                ops::remove_dir_recursive(path)
            } else {
                ops::remove_file(path)
            }
        });

        let outcome = match removal {
            Ok(Removal::Removed) => {
                self.sink().emit(SyncEvent::new(
                    EventLevel::Info,
                    EventStatus::Ok,
                    EventAction::Delete,
                    &name,
                    display_dir(path),
                ));
                RemovalOutcome::Removed
            }
            Ok(Removal::AlreadyAbsent) => {
                self.sink().emit(SyncEvent::new(
                    EventLevel::Info,
                    EventStatus::Skip,
                    EventAction::Delete,
                    &name,
                    display_dir(path),
                ));
                RemovalOutcome::AlreadyAbsent
            }
            Err(_) => RemovalOutcome::Failed,
        };

        RemovalResult {
            path: path.to_path_buf(),
            outcome,
        }
    }
}
