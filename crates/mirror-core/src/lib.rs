//! Synchronization engine for the mirror tool
//!
//! Consumes the catalogue produced by `mirror-fs`, applies it to the
//! target tree, prunes stale entries, and repeats on a schedule. The
//! target tree itself is the only persistent state; its correctness is
//! re-derived every cycle, never incrementally trusted.

mod cleanup;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod job;
pub mod report;
pub mod scheduler;

pub use config::JobConfig;
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use event::{EventAction, EventLevel, EventSink, EventStatus, MemorySink, NullSink, SyncEvent};
pub use job::SyncJob;
pub use report::{CycleReport, EntryResult, RemovalOutcome, RemovalResult, SyncOutcome};
pub use scheduler::{Schedule, ScheduleSummary, StopReason};
