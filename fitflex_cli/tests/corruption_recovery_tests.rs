//! Corruption recovery tests for the fitflex binary.
//!
//! These tests verify the system can handle:
//! - Corrupted progress records
//! - Records written by older versions (missing fields)
//! - Garbage in the day marker
//! - Plan and history entries that no longer resolve

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tempfile::TempDir;

/// Empty config home shared by every run so a developer's own config.toml
/// never leaks into results
fn config_home() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| tempfile::tempdir().expect("Failed to create config dir"))
        .path()
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitflex"));
    cmd.env("XDG_CONFIG_HOME", config_home());
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_progress_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("progress.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted progress");

    cli()
        .args(["start", "pushups", "--complete", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();

    let contents = fs::read_to_string(data_dir.join("progress.json")).unwrap();
    let progress: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(progress["points"], 10);
}

#[test]
fn test_empty_progress_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("progress.json"), "").unwrap();

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Points:   0"));
}

#[test]
fn test_old_record_shape_loads() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // No week, plan, goal or theme fields
    fs::write(
        data_dir.join("progress.json"),
        r#"{"points": 190, "history": [{"date": "2024-01-05", "workout": "Plank Hold", "calories": 6, "seconds": 30}]}"#,
    )
    .unwrap();

    cli()
        .args(["start", "plank", "--complete", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .arg("badges")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"200 Points\s+unlocked").unwrap());

    let contents = fs::read_to_string(data_dir.join("progress.json")).unwrap();
    let progress: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(progress["points"], 200);
    assert_eq!(progress["week"].as_array().unwrap().len(), 7);
    assert_eq!(progress["history"].as_array().unwrap().len(), 2);
}

#[test]
fn test_garbage_day_marker_resets_counters() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["start", "squats", "--complete", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();

    fs::write(data_dir.join("last_active_date"), "not a date").unwrap();

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workouts: 0"))
        .stdout(predicate::str::contains("Points:   10"));

    let marker = fs::read_to_string(data_dir.join("last_active_date")).unwrap();
    assert_eq!(marker.len(), 10);
}

#[test]
fn test_unknown_ids_are_tolerated() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("progress.json"),
        r#"{"today_plan": [{"id": "retired_move", "done": false}, {"id": "plank", "done": true}],
            "history": [{"date": "2024-01-05", "workout": "Retired Move", "workout_id": "retired_move", "calories": 5, "seconds": 20}]}"#,
    )
    .unwrap();

    cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"))
        .stdout(predicate::str::contains("Plank Hold"));

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Retired Move"));
}
