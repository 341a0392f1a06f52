//! Sync engine apply phase
//!
//! One decision per catalogue entry, keyed on entry kind, target presence,
//! and digest equality. Decisions are independent and order-insensitive:
//! each depends only on target-tree state, never on other entries'
//! outcomes, and a failed entry is abandoned after its retry budget while
//! the pass moves on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::{CatalogueEntry, Fingerprint, RetryPolicy, ops, path as fs_path};

use crate::event::{EventAction, EventLevel, EventSink, EventStatus, SyncEvent};
use crate::report::{EntryResult, SyncOutcome};

/// Applies a source catalogue to the target tree and prunes stale entries.
///
/// Mutates the filesystem only under `target_root`; `source_root` is
/// read-only throughout.
pub struct SyncEngine {
    source_root: PathBuf,
    target_root: PathBuf,
    retry: RetryPolicy,
    sink: Arc<dyn EventSink>,
}

impl SyncEngine {
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        retry: RetryPolicy,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            retry,
            sink,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Apply every catalogue entry to the target tree.
    pub fn apply(&self, catalogue: &[CatalogueEntry]) -> Vec<EntryResult> {
        catalogue
            .iter()
            .map(|entry| self.apply_entry(entry))
            .collect()
    }

    fn apply_entry(&self, entry: &CatalogueEntry) -> EntryResult {
        let outcome = match self.target_path(entry) {
            Ok(target) => match &entry.fingerprint {
                None => self.sync_directory(entry, &target),
                Some(digest) => self.sync_file(entry, digest, &target),
            },
            Err(error) => {
                self.sink.emit(
                    SyncEvent::new(
                        EventLevel::Error,
                        EventStatus::Fail,
                        EventAction::Copy,
                        &entry.name,
                        entry.parent.display().to_string(),
                    )
                    .with_error(error),
                );
                SyncOutcome::Failed
            }
        };
        EntryResult {
            path: entry.path.clone(),
            outcome,
        }
    }

    /// Mirror the entry's source-relative path under the target root.
    fn target_path(&self, entry: &CatalogueEntry) -> mirror_fs::Result<PathBuf> {
        let relative = fs_path::relative_to(&self.source_root, &entry.path)?;
        Ok(self.target_root.join(relative))
    }

    fn sync_directory(&self, entry: &CatalogueEntry, target: &Path) -> SyncOutcome {
        if target.is_dir() {
            self.emit(
                EventLevel::Info,
                EventStatus::Skip,
                EventAction::Create,
                entry,
                target,
            );
            return SyncOutcome::SkippedExists;
        }

        let created = self.mutate(EventAction::Create, &entry.name, target, || {
            ops::create_dir(target)
        });
        if created.is_err() {
            return SyncOutcome::Failed;
        }

        if target.is_dir() {
            self.emit(
                EventLevel::Info,
                EventStatus::Ok,
                EventAction::Create,
                entry,
                target,
            );
            SyncOutcome::Created
        } else {
            self.emit(
                EventLevel::Error,
                EventStatus::Fail,
                EventAction::Create,
                entry,
                target,
            );
            SyncOutcome::Missing
        }
    }

    fn sync_file(&self, entry: &CatalogueEntry, digest: &Fingerprint, target: &Path) -> SyncOutcome {
        // The parent may be absent when the source file sits in a
        // directory the target tree has never seen. Creating it is its own
        // retried operation, separate from the copy.
        if let Some(parent) = target.parent()
            && !parent.is_dir()
        {
            let created = self.mutate(EventAction::Create, &entry.name, target, || {
                ops::create_dir(parent)
            });
            if created.is_err() {
                return SyncOutcome::Failed;
            }
        }

        let existing = match self.target_digest(EventAction::Replace, &entry.name, target) {
            Ok(existing) => existing,
            Err(_) => return SyncOutcome::Failed,
        };

        match existing {
            None => self.transfer(EventAction::Copy, SyncOutcome::Copied, entry, digest, target),
            Some(found) if found == *digest => {
                self.emit(
                    EventLevel::Info,
                    EventStatus::Skip,
                    EventAction::Replace,
                    entry,
                    target,
                );
                SyncOutcome::SkippedIdentical
            }
            Some(_) => self.transfer(
                EventAction::Replace,
                SyncOutcome::Replaced,
                entry,
                digest,
                target,
            ),
        }
    }

    /// Copy or replace, then verify by re-reading the target.
    fn transfer(
        &self,
        action: EventAction,
        on_success: SyncOutcome,
        entry: &CatalogueEntry,
        digest: &Fingerprint,
        target: &Path,
    ) -> SyncOutcome {
        let copied = self.mutate(action, &entry.name, target, || {
            ops::copy_atomic(&entry.path, target)
        });
        if copied.is_err() {
            return SyncOutcome::Failed;
        }

        // The write reported success; what landed on disk decides the
        // outcome. A digest mismatch here is corruption, not a retryable
        // I/O failure, so it is reported once and left for the next cycle.
        match self.target_digest(action, &entry.name, target) {
            Ok(Some(found)) if found == *digest => {
                self.emit(EventLevel::Info, EventStatus::Ok, action, entry, target);
                on_success
            }
            Ok(Some(_)) => {
                self.emit(EventLevel::Error, EventStatus::Mismatch, action, entry, target);
                SyncOutcome::VerificationMismatch
            }
            Ok(None) => {
                self.emit(EventLevel::Error, EventStatus::Missing, action, entry, target);
                SyncOutcome::Missing
            }
            Err(_) => SyncOutcome::Failed,
        }
    }

    /// Digest of the target file, `None` when absent.
    ///
    /// Re-reads are retried like mutations; a target that stays unreadable
    /// fails the entry.
    fn target_digest(
        &self,
        action: EventAction,
        name: &str,
        target: &Path,
    ) -> mirror_fs::Result<Option<Fingerprint>> {
        if !target.is_file() {
            return Ok(None);
        }
        self.mutate(action, name, target, || {
            match Fingerprint::of_file(target) {
                Ok(digest) => Ok(Some(digest)),
                Err(error) if error.is_not_found() => Ok(None),
                Err(error) => Err(error),
            }
        })
    }

    /// Run an operation under the retry policy, emitting a warning per
    /// failed attempt plus an escalated error once the budget is nearly
    /// exhausted (one final attempt still follows the escalation).
    pub(crate) fn mutate<T>(
        &self,
        action: EventAction,
        name: &str,
        target: &Path,
        op: impl FnMut() -> mirror_fs::Result<T>,
    ) -> mirror_fs::Result<T> {
        let directory = display_dir(target);
        self.retry.run(op, |failure| {
            self.sink.emit(
                SyncEvent::new(
                    EventLevel::Warning,
                    EventStatus::Retry,
                    action,
                    name,
                    directory.clone(),
                )
                .with_error(failure.error),
            );
            if failure.escalated {
                self.sink.emit(
                    SyncEvent::new(
                        EventLevel::Error,
                        EventStatus::Fail,
                        action,
                        name,
                        directory.clone(),
                    )
                    .with_error(failure.error),
                );
            }
        })
    }

    fn emit(
        &self,
        level: EventLevel,
        status: EventStatus,
        action: EventAction,
        entry: &CatalogueEntry,
        target: &Path,
    ) {
        self.sink.emit(SyncEvent::new(
            level,
            status,
            action,
            &entry.name,
            display_dir(target),
        ));
    }

    pub(crate) fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }
}

pub(crate) fn display_dir(target: &Path) -> String {
    target.parent().unwrap_or(target).display().to_string()
}
