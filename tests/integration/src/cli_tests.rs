//! CLI behavior through the compiled `mirror` binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mirror() -> Command {
    Command::cargo_bin("mirror").unwrap()
}

#[test]
fn run_once_mirrors_and_reports_success() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join("sub")).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();
    fs::write(source.join("sub").join("b.txt"), "Y").unwrap();

    mirror()
        .arg("run")
        .arg("--source")
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 cycle(s) completed"));

    assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "X");
    assert_eq!(
        fs::read_to_string(target.join("sub").join("b.txt")).unwrap(),
        "Y"
    );
}

#[test]
fn run_json_prints_a_parseable_report() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();

    let output = mirror()
        .arg("run")
        .arg("--source")
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json_start = stdout.find('{').unwrap();
    let json_end = stdout.rfind('}').unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout[json_start..=json_end]).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["applied"][0]["outcome"], "copied");
}

#[test]
fn run_rejects_a_relative_source() {
    let temp = TempDir::new().unwrap();
    mirror()
        .arg("run")
        .arg("--source")
        .arg("relative/source")
        .arg("--target")
        .arg(temp.path().join("target"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not absolute"));
}

#[test]
fn run_rejects_a_missing_source() {
    let temp = TempDir::new().unwrap();
    mirror()
        .arg("run")
        .arg("--source")
        .arg(temp.path().join("absent"))
        .arg("--target")
        .arg(temp.path().join("target"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn run_requires_arguments() {
    mirror().arg("run").assert().failure();
}

#[test]
fn scan_lists_files_and_markers() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "X").unwrap();
    fs::create_dir(temp.path().join("empty")).unwrap();

    mirror()
        .arg("scan")
        .arg("--source")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("(empty directory)"))
        .stdout(predicate::str::contains("2 entries"));
}

#[test]
fn scan_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "X").unwrap();

    let output = mirror()
        .arg("scan")
        .arg("--source")
        .arg(temp.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let catalogue: serde_json::Value =
        serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(catalogue[0]["name"], "a.txt");
    assert!(catalogue[0]["fingerprint"].is_string());
}

#[test]
fn completions_emit_a_script() {
    mirror()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("mirror"));
}
