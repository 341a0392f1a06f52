//! Tracing-backed event sink

use tracing::{error, info, warn};

use mirror_core::{EventLevel, EventSink, SyncEvent};

/// Renders engine events through the global tracing subscriber.
///
/// The engine produces the structured fields; formatting and destination
/// stay with the subscriber installed in `main`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SyncEvent) {
        match event.level {
            EventLevel::Info => info!(
                status = %event.status,
                name = %event.name,
                dir = %event.directory,
                "{}",
                event.action
            ),
            EventLevel::Warning => warn!(
                status = %event.status,
                name = %event.name,
                dir = %event.directory,
                error = event.error.as_deref().unwrap_or(""),
                "{}",
                event.action
            ),
            EventLevel::Error => error!(
                status = %event.status,
                name = %event.name,
                dir = %event.directory,
                error = event.error.as_deref().unwrap_or(""),
                "{}",
                event.action
            ),
        }
    }
}
