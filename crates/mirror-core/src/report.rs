//! Cycle reports
//!
//! Per-entry outcomes are reporting only; no entry carries state across
//! runs. Every cycle recomputes the full catalogue from disk.

use std::path::PathBuf;

use serde::Serialize;

/// Resolution of a single catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncOutcome {
    /// Directory created in the target.
    Created,
    /// File copied to a previously missing target path.
    Copied,
    /// Existing target file overwritten after a digest mismatch.
    Replaced,
    /// Target file already matched the source digest.
    SkippedIdentical,
    /// Target directory already existed.
    SkippedExists,
    /// The write reported success but the re-read digest differs.
    /// Signals silent corruption, not a retryable I/O failure.
    VerificationMismatch,
    /// The write reported success but the target is absent.
    Missing,
    /// All attempts exhausted; the entry was abandoned.
    Failed,
}

impl SyncOutcome {
    /// True when the outcome mutated the target tree.
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::Created | Self::Copied | Self::Replaced)
    }

    /// True when the entry ended in a failure state.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::VerificationMismatch | Self::Missing | Self::Failed)
    }
}

/// Result of applying one catalogue entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResult {
    pub path: PathBuf,
    pub outcome: SyncOutcome,
}

/// Resolution of one cleanup deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalOutcome {
    /// Stale entry deleted.
    Removed,
    /// Entry was already gone when the delete ran (e.g. taken out by an
    /// earlier recursive directory delete).
    AlreadyAbsent,
    /// All delete attempts exhausted.
    Failed,
}

/// Result of one cleanup deletion.
#[derive(Debug, Clone, Serialize)]
pub struct RemovalResult {
    pub path: PathBuf,
    pub outcome: RemovalOutcome,
}

/// Report of one scan → apply → cleanup cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    /// One result per catalogue entry.
    pub applied: Vec<EntryResult>,
    /// One result per cleanup deletion that was attempted.
    pub removed: Vec<RemovalResult>,
    /// Cycle-level problems that did not map to a single entry.
    pub errors: Vec<String>,
    pub success: bool,
}

impl CycleReport {
    /// Number of operations that changed the target tree.
    ///
    /// Zero on a repeat run over an unchanged source: that is the
    /// idempotence contract.
    pub fn mutations(&self) -> usize {
        self.applied
            .iter()
            .filter(|e| e.outcome.is_mutation())
            .count()
            + self
                .removed
                .iter()
                .filter(|r| r.outcome == RemovalOutcome::Removed)
                .count()
    }

    /// Number of entries and removals that ended in a failure state.
    pub fn failures(&self) -> usize {
        self.applied
            .iter()
            .filter(|e| e.outcome.is_failure())
            .count()
            + self
                .removed
                .iter()
                .filter(|r| r.outcome == RemovalOutcome::Failed)
                .count()
    }

    /// Count of applied entries with the given outcome.
    pub fn outcome_count(&self, outcome: SyncOutcome) -> usize {
        self.applied.iter().filter(|e| e.outcome == outcome).count()
    }
}
