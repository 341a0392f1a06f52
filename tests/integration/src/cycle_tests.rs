//! End-to-end cycle properties: full scan -> apply -> cleanup runs over
//! real temp trees, exercised through `SyncJob`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use mirror_core::{EventAction, JobConfig, MemorySink, NullSink, SyncJob};

fn job(source: &Path, target: &Path) -> SyncJob {
    SyncJob::new(JobConfig::new(source, target), Arc::new(NullSink)).unwrap()
}

/// Walk `root` and return every file's root-relative path with content.
fn tree_contents(root: &Path) -> Vec<(String, Vec<u8>)> {
    let (files, _) = mirror_fs::scan::collect_tree(root).unwrap();
    let mut contents: Vec<(String, Vec<u8>)> = files
        .into_iter()
        .map(|path| {
            let relative = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned();
            let bytes = fs::read(&path).unwrap();
            (relative, bytes)
        })
        .collect();
    contents.sort();
    contents
}

#[test]
fn first_cycle_scenario_from_empty_target() {
    // Source has a.txt ("X") at root and empty dir b/; target is empty.
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join("b")).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();

    let report = job(&source, &target).run_cycle(0).unwrap();

    assert!(report.success);
    assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "X");
    assert!(target.join("b").is_dir());
}

#[test]
fn changed_content_is_replaced_on_rerun() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();

    let job = job(&source, &target);
    job.run_cycle(0).unwrap();

    fs::write(source.join("a.txt"), "Y").unwrap();
    let report = job.run_cycle(1).unwrap();

    assert_eq!(
        report.outcome_count(mirror_core::SyncOutcome::Replaced),
        1
    );
    assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "Y");
}

#[test]
fn stale_entries_are_removed() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(target.join("stale-dir")).unwrap();
    fs::write(source.join("keep.txt"), "k").unwrap();
    fs::write(target.join("stale.txt"), "s").unwrap();

    let report = job(&source, &target).run_cycle(0).unwrap();

    assert!(report.success);
    assert!(!target.join("stale.txt").exists());
    assert!(!target.join("stale-dir").exists());
    assert!(target.join("keep.txt").exists());
}

#[test]
fn mirror_is_complete_in_both_directions() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join("docs").join("img")).unwrap();
    fs::create_dir_all(source.join("empty")).unwrap();
    fs::write(source.join("a.txt"), "alpha").unwrap();
    fs::write(source.join("docs").join("readme.md"), "# hi").unwrap();
    fs::write(source.join("docs").join("img").join("logo.bin"), "logo").unwrap();
    // Pre-existing junk in the target that must disappear.
    fs::create_dir_all(target.join("junk")).unwrap();
    fs::write(target.join("junk").join("old.txt"), "old").unwrap();
    fs::write(target.join("extra.txt"), "extra").unwrap();

    let report = job(&source, &target).run_cycle(0).unwrap();

    assert!(report.success);
    assert_eq!(tree_contents(&source), tree_contents(&target));
    assert!(target.join("empty").is_dir());
}

#[test]
fn second_cycle_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join("sub")).unwrap();
    fs::create_dir_all(source.join("empty")).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();
    fs::write(source.join("sub").join("b.txt"), "Y").unwrap();

    let job = job(&source, &target);
    let first = job.run_cycle(0).unwrap();
    let second = job.run_cycle(1).unwrap();

    assert!(first.mutations() > 0);
    assert_eq!(second.mutations(), 0, "repeat run must change nothing");
    assert!(second.success);
}

#[test]
fn cycle_events_bracket_the_work() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();

    let sink = Arc::new(MemorySink::new());
    let job = SyncJob::new(JobConfig::new(&source, &target), sink.clone()).unwrap();
    job.run_cycle(7).unwrap();

    let events = sink.events();
    assert_eq!(events.first().unwrap().action, EventAction::CycleStart);
    assert_eq!(events.last().unwrap().action, EventAction::CycleEnd);
    assert_eq!(events.first().unwrap().name, "cycle 7");
    assert!(events.len() > 2, "entry outcomes must be reported too");
}

#[tokio::test]
async fn scheduled_cycles_pick_up_source_changes_until_cancelled() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), "v0").unwrap();

    let job = job(&source, &target);
    let (tx, rx) = tokio::sync::oneshot::channel();
    let mut tx = Some(tx);

    let source_for_cycles = source.clone();
    let summary = mirror_core::scheduler::run(
        mirror_core::Schedule::Every(std::time::Duration::from_millis(20)),
        async {
            let _ = rx.await;
        },
        move |cycle| {
            let report = job.run_cycle(cycle)?;
            // Mutate the source between cycles; cancel once the change
            // has been mirrored.
            match cycle {
                0 => fs::write(source_for_cycles.join("a.txt"), "v1").unwrap(),
                1 => {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(());
                    }
                }
                _ => {}
            }
            Ok(report)
        },
    )
    .await;

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failed_cycles, 0);
    assert_eq!(summary.stop, mirror_core::StopReason::Cancelled);
    assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "v1");
}

#[test]
fn half_synced_tree_converges_on_the_next_cycle() {
    // A file sits where the source wants a directory. The first cycle
    // fails that entry but cleanup removes the blocker; the second cycle
    // completes the mirror.
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join("name")).unwrap();
    fs::write(source.join("name").join("inner.txt"), "v").unwrap();
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("name"), "blocking file").unwrap();

    let job = job(&source, &target);
    let first = job.run_cycle(0).unwrap();
    assert!(!first.success, "blocked entry must be reported");

    let second = job.run_cycle(1).unwrap();
    assert!(second.success);
    assert_eq!(
        fs::read_to_string(target.join("name").join("inner.txt")).unwrap(),
        "v"
    );
}
