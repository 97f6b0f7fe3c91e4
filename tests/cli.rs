use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn save_writes_the_rendered_figure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wave.txt");

    Command::cargo_bin("panoplot")
        .unwrap()
        .args(["--frames", "6", "--style", "light", "--save"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved figure to"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("t = 0.00 [1/ω_p]"));
}

#[test]
fn log_file_records_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wave.txt");
    let log = dir.path().join("panoplot.log");

    Command::cargo_bin("panoplot")
        .unwrap()
        .arg("--save")
        .arg(&path)
        .arg("--log")
        .arg(&log)
        .env("RUST_LOG", "debug")
        .assert()
        .success();

    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("Starting panoplot"));
    assert!(text.contains("Saving figure"));
}

#[test]
fn unknown_style_is_rejected() {
    Command::cargo_bin("panoplot")
        .unwrap()
        .args(["--style", "sepia", "--save", "unused.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown style"));
}

#[test]
fn zero_frames_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("panoplot")
        .unwrap()
        .args(["--frames", "0", "--save"])
        .arg(dir.path().join("wave.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--frames"));
}

#[test]
fn missing_style_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("panoplot")
        .unwrap()
        .args(["--style-file", "/nonexistent/panoplot.rc", "--save"])
        .arg(dir.path().join("wave.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
