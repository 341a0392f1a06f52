//! Cycle scheduling
//!
//! Runs cycles at a fixed interval. A running cycle always completes;
//! the cancel signal is only observed while waiting for the next cycle,
//! where it races the interval timer and the first completion wins.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::error;

use crate::report::CycleReport;
use crate::Result;

/// How often cycles run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Run exactly one cycle.
    Once,
    /// Repeat, starting each cycle `interval` after the previous start.
    Every(Duration),
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Single-run schedule finished.
    Completed,
    /// The cancel signal won the wait race.
    Cancelled,
}

/// Aggregate result of a scheduled run.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub stop: StopReason,
}

/// Drive `run_cycle` on `schedule` until it completes or `cancel` fires.
///
/// The cancel future is pinned once and raced against the interval timer
/// between cycles; the loser of each race is simply left pending. Both
/// sides are passive waits owning no state, so nothing needs cleanup. A
/// cycle that returns an error is counted and the schedule continues: the
/// next cycle re-derives everything from disk.
pub async fn run<C, F>(schedule: Schedule, cancel: F, mut run_cycle: C) -> ScheduleSummary
where
    C: FnMut(u64) -> Result<CycleReport>,
    F: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let mut cycles = 0;
    let mut failed_cycles = 0;

    loop {
        let started = Instant::now();
        match run_cycle(cycles) {
            Ok(report) => {
                if !report.success {
                    failed_cycles += 1;
                }
            }
            Err(err) => {
                error!(error = %err, cycle = cycles, "cycle aborted");
                failed_cycles += 1;
            }
        }
        cycles += 1;

        let Schedule::Every(interval) = schedule else {
            return ScheduleSummary {
                cycles,
                failed_cycles,
                stop: StopReason::Completed,
            };
        };

        tokio::select! {
            () = &mut cancel => {
                return ScheduleSummary {
                    cycles,
                    failed_cycles,
                    stop: StopReason::Cancelled,
                };
            }
            () = tokio::time::sleep_until(started + interval) => {}
        }
    }
}
