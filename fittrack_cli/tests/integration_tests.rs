//! Integration tests for the fittrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Catalog listing and editing
//! - Session execution workflow
//! - Data persistence across invocations

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("fittrack"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal workout tracker"));
}

#[test]
fn test_exercises_lists_seeded_library() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("exercises")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push-ups"))
        .stdout(predicate::str::contains("Burpees"));

    // Listing alone must not create the data file
    assert!(!temp_dir.path().join("fitness_data.json").exists());
}

#[test]
fn test_show_workout_steps() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("show")
        .arg("Leg Day")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Squats"))
        .stdout(predicate::str::contains("60s rest"));
}

#[test]
fn test_show_unknown_workout_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("show")
        .arg("No Such Workout")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("workout template"));
}

#[test]
fn test_add_exercise_persists() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add-exercise")
        .arg("Rowing")
        .arg("Back")
        .arg("0.9")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Added exercise: Rowing"));

    assert!(temp_dir.path().join("fitness_data.json").exists());

    // A fresh invocation sees the new exercise
    cli()
        .arg("exercises")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rowing"));
}

#[test]
fn test_add_exercise_rejects_bad_calories() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add-exercise")
        .arg("Rowing")
        .arg("Back")
        .arg("abc")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid calories"));

    assert!(!temp_dir.path().join("fitness_data.json").exists());
}

#[test]
fn test_start_unknown_workout_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("No Such Workout")
        .arg("--fast")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("workout template"));
}

#[test]
fn test_fast_session_records_history_and_stats() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("Chest & Arms")
        .arg("--fast")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete: Chest & Arms"))
        .stdout(predicate::str::contains("Calories: 57.0 kcal"));

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Chest & Arms"));

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Workouts:     1"))
        .stdout(predicate::str::contains("Streak:       1 days"));

    cli()
        .arg("week")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Workouts: 1"));
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet."));
}

#[test]
fn test_data_file_is_valid_json_document() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("Quick Morning")
        .arg("--fast")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let contents =
        std::fs::read_to_string(temp_dir.path().join("fitness_data.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&contents).unwrap();

    // Catalog tables are name-keyed maps, history is an array
    assert!(doc["exercises"]["Push-ups"].is_object());
    assert!(doc["workouts"]["Quick Morning"].is_object());
    assert_eq!(doc["history"].as_array().unwrap().len(), 1);
    assert_eq!(doc["history"][0]["workout_name"], "Quick Morning");
    assert!(doc["user_stats"]["total_workouts"].as_u64().unwrap() == 1);
}
