//! Structured sync events
//!
//! The engine reports every decision, outcome, retry attempt, and cleanup
//! deletion as a `SyncEvent` pushed into an `EventSink` handed to it at
//! construction. Rendering (console, file, test capture) is entirely the
//! sink's concern; the engine never owns a log destination.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

/// Status of the reported operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Operation completed and verified.
    Ok,
    /// Nothing to do; desired state already present (or already gone).
    Skip,
    /// A failed attempt that will be retried.
    Retry,
    /// Escalated failure or a target absent where one was just created.
    Fail,
    /// Post-write digest differs from the source digest.
    Mismatch,
    /// Target file absent after a reported successful write.
    Missing,
}

/// The operation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventAction {
    Create,
    Copy,
    Replace,
    Delete,
    CycleStart,
    CycleEnd,
}

/// One structured log record produced by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct SyncEvent {
    pub timestamp: DateTime<Local>,
    pub level: EventLevel,
    pub status: EventStatus,
    pub action: EventAction,
    /// Base name of the object the operation applied to.
    pub name: String,
    /// Directory the operation applied in.
    pub directory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncEvent {
    pub fn new(
        level: EventLevel,
        status: EventStatus,
        action: EventAction,
        name: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            status,
            action,
            name: name.into(),
            directory: directory.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Skip => "skip",
            Self::Retry => "retry",
            Self::Fail => "fail",
            Self::Mismatch => "mismatch",
            Self::Missing => "missing",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "create",
            Self::Copy => "copy",
            Self::Replace => "replace",
            Self::Delete => "delete",
            Self::CycleStart => "cycle-start",
            Self::CycleEnd => "cycle-end",
        };
        write!(f, "{label}")
    }
}

/// Destination for engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: SyncEvent) {}
}

/// Sink that records events for later inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SyncEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().expect("event sink poisoned").clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: SyncEvent) {
        self.events.lock().expect("event sink poisoned").push(event);
    }
}
