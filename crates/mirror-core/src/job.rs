//! Cycle orchestration
//!
//! A cycle is scan → apply → cleanup, strictly sequential and
//! single-threaded: the scanner completes before the engine starts, and
//! the engine is the only writer.

use std::sync::Arc;

use tracing::info;

use mirror_fs::scan;

use crate::config::JobConfig;
use crate::engine::SyncEngine;
use crate::event::{EventAction, EventLevel, EventSink, EventStatus, SyncEvent};
use crate::report::CycleReport;
use crate::Result;

/// A validated mirror job: scanner plus engine plus event sink.
pub struct SyncJob {
    config: JobConfig,
    engine: SyncEngine,
    sink: Arc<dyn EventSink>,
}

impl SyncJob {
    /// Validate `config` and construct the job.
    ///
    /// # Errors
    ///
    /// Fails fast on non-absolute or network paths, a missing source
    /// directory, or an uncreatable target.
    pub fn new(config: JobConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let config = config.validated()?;
        let engine = SyncEngine::new(
            config.source.clone(),
            config.target.clone(),
            config.retry_policy(),
            Arc::clone(&sink),
        );
        Ok(Self {
            config,
            engine,
            sink,
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run one scan → apply → cleanup cycle.
    ///
    /// Per-entry failures land in the report and never abort the cycle;
    /// cleanup runs even when apply reported failures. Only a failed
    /// source scan aborts, since there is no catalogue to apply.
    pub fn run_cycle(&self, cycle: u64) -> Result<CycleReport> {
        self.emit_cycle(EventAction::CycleStart, cycle);
        let report = self.run_phases();
        self.emit_cycle(EventAction::CycleEnd, cycle);
        report
    }

    fn run_phases(&self) -> Result<CycleReport> {
        let catalogue = scan::scan(&self.config.source)?;
        info!(entries = catalogue.len(), "catalogue built");

        let applied = self.engine.apply(&catalogue);

        let mut errors = Vec::new();
        let removed = match self.engine.cleanup() {
            Ok(removed) => removed,
            Err(error) => {
                errors.push(error.to_string());
                Vec::new()
            }
        };

        let mut report = CycleReport {
            applied,
            removed,
            errors,
            success: false,
        };
        report.success = report.failures() == 0 && report.errors.is_empty();
        Ok(report)
    }

    fn emit_cycle(&self, action: EventAction, cycle: u64) {
        self.sink.emit(SyncEvent::new(
            EventLevel::Info,
            EventStatus::Ok,
            action,
            format!("cycle {cycle}"),
            self.config.source.display().to_string(),
        ));
    }
}
