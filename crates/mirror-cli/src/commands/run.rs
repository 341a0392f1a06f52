//! The run command: scheduled mirror cycles

use std::sync::Arc;

use colored::Colorize;

use mirror_core::scheduler::{self, StopReason};
use mirror_core::{CycleReport, JobConfig, SyncJob, SyncOutcome};

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::sink::TracingSink;

pub fn run_sync(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let job = SyncJob::new(config, Arc::new(TracingSink))?;
    let schedule = job.config().schedule();

    println!(
        "{} Mirroring {} into {}",
        "=>".blue().bold(),
        job.config().source.display().to_string().cyan(),
        job.config().target.display().to_string().cyan(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(async {
        let cancel = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        scheduler::run(schedule, cancel, |cycle| {
            let report = job.run_cycle(cycle)?;
            print_cycle(cycle, &report, args.json);
            Ok(report)
        })
        .await
    });

    if summary.stop == StopReason::Cancelled {
        println!("{} Cancelled before the next cycle.", "--".yellow().bold());
    }
    if summary.failed_cycles > 0 {
        return Err(CliError::user(format!(
            "{} of {} cycle(s) reported failures",
            summary.failed_cycles, summary.cycles
        )));
    }
    println!(
        "{} {} cycle(s) completed.",
        "OK".green().bold(),
        summary.cycles
    );
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<JobConfig> {
    if let Some(path) = &args.config {
        return Ok(JobConfig::load(path)?);
    }
    match (&args.source, &args.target) {
        (Some(source), Some(target)) => {
            let mut config = JobConfig::new(source, target);
            config.interval_minutes = args.every;
            Ok(config)
        }
        _ => Err(CliError::user(
            "either --config or both --source and --target are required",
        )),
    }
}

fn print_cycle(cycle: u64, report: &CycleReport, json: bool) {
    if json {
        if let Ok(rendered) = serde_json::to_string_pretty(report) {
            println!("{rendered}");
        }
        return;
    }

    let skipped = report.outcome_count(SyncOutcome::SkippedIdentical)
        + report.outcome_count(SyncOutcome::SkippedExists);
    let line = format!(
        "cycle {}: {} copied, {} replaced, {} created, {} skipped, {} removed, {} failed",
        cycle,
        report.outcome_count(SyncOutcome::Copied),
        report.outcome_count(SyncOutcome::Replaced),
        report.outcome_count(SyncOutcome::Created),
        skipped,
        report
            .removed
            .iter()
            .filter(|r| r.outcome == mirror_core::RemovalOutcome::Removed)
            .count(),
        report.failures(),
    );
    if report.success {
        println!("{} {}", "OK".green().bold(), line);
    } else {
        println!("{} {}", "ERROR".red().bold(), line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run_args(source: &std::path::Path, target: &std::path::Path) -> RunArgs {
        RunArgs {
            source: Some(source.to_path_buf()),
            target: Some(target.to_path_buf()),
            every: 0,
            config: None,
            json: false,
        }
    }

    #[test]
    fn single_run_mirrors_the_tree() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let target = temp.path().join("target");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.txt"), "X").unwrap();
        fs::write(source.join("sub").join("b.txt"), "Y").unwrap();

        run_sync(run_args(&source, &target)).unwrap();

        assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "X");
        assert_eq!(
            fs::read_to_string(target.join("sub").join("b.txt")).unwrap(),
            "Y"
        );
    }

    #[test]
    fn missing_source_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = run_sync(run_args(
            &temp.path().join("absent"),
            &temp.path().join("target"),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn config_file_drives_the_run() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let target = temp.path().join("target");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), "X").unwrap();

        let config_path = temp.path().join("mirror.toml");
        fs::write(
            &config_path,
            format!(
                "source = {:?}\ntarget = {:?}\n",
                source.display().to_string(),
                target.display().to_string()
            ),
        )
        .unwrap();

        let args = RunArgs {
            source: None,
            target: None,
            every: 0,
            config: Some(config_path),
            json: false,
        };
        run_sync(args).unwrap();

        assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "X");
    }
}
