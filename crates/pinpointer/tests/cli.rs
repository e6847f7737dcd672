use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const TWO_TRIALS: &str = r#"{
    "target": [0.0, 0.0],
    "trials": [
        { "index": 0, "measured": [1.0, 2.0], "label": "IMG_0000.jpg" },
        { "index": 1, "measured": [-1.0, 0.0] },
        { "index": 2, "skipped": "out_of_bounds" }
    ]
}"#;

fn write_session(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write session");
    path
}

fn pinpointer() -> Command {
    Command::cargo_bin("pinpointer").expect("binary")
}

#[test]
fn analyze_writes_default_report_and_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write_session(dir.path(), "block_a.json", TWO_TRIALS);

    pinpointer()
        .arg("analyze")
        .arg(&session)
        .assert()
        .success()
        .stdout(predicate::str::contains("trials: 2 (skipped: 1)"))
        .stdout(predicate::str::contains("radial"));

    let report_path = dir.path().join("block_a_report.json");
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).expect("report")).expect("json");
    assert_eq!(report["session"]["trial_count"], 2);
    assert_eq!(report["statistics"]["x"]["mean"], 0.0);
    assert_eq!(report["statistics"]["x"]["std_dev"], 1.0);
    assert_eq!(report["skipped"][0]["index"], 2);
    assert_eq!(report["trials"][0]["label"], "IMG_0000.jpg");
}

#[test]
fn analyze_writes_csv_when_asked() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write_session(dir.path(), "s.json", TWO_TRIALS);
    let report = dir.path().join("out.json");
    let csv = dir.path().join("out.csv");

    pinpointer()
        .args(["analyze", "--report"])
        .arg(&report)
        .arg("--csv")
        .arg(&csv)
        .arg(&session)
        .assert()
        .success();

    assert!(report.exists());
    let text = fs::read_to_string(csv).expect("csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "trial_index,target_x,target_y,measured_x,measured_y,error_x,error_y,error_radial"
    );
    assert_eq!(lines[2], "1,0,0,-1,0,-1,0,1");
    assert_eq!(lines[4], "dimension,count,mean,stddev,variance,min,max");
    assert_eq!(lines[5], "x,2,0,1,1,-1,1");
}

#[test]
fn empty_session_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write_session(
        dir.path(),
        "empty.json",
        r#"{ "target": [0.0, 0.0], "trials": [] }"#,
    );

    pinpointer()
        .arg("analyze")
        .arg(&session)
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptySession"));
}

#[test]
fn malformed_session_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write_session(dir.path(), "bad.json", r#"{ "trials": "nope" }"#);

    pinpointer().arg("analyze").arg(&session).assert().failure();
}

#[test]
fn scale_prints_factor() {
    pinpointer()
        .args(["scale", "--distance", "10", "--from", "0,0", "--to", "-30,40"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0.2\n"));
}

#[test]
fn scale_rejects_coincident_points() {
    pinpointer()
        .args(["scale", "--distance", "10", "--from", "5,5", "--to", "5,5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CoincidentReference"));
}

#[test]
fn verbosity_controls_log_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = write_session(dir.path(), "v.json", TWO_TRIALS);

    pinpointer()
        .env_remove("RUST_LOG")
        .arg("analyze")
        .arg(&session)
        .assert()
        .success()
        .stderr(predicate::str::contains("report written").not());

    pinpointer()
        .env_remove("RUST_LOG")
        .args(["-v", "analyze"])
        .arg(&session)
        .assert()
        .success()
        .stderr(predicate::str::contains("report written"));
}
