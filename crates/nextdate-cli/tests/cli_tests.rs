//! Integration tests for the `nextdate` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the next, check,
//! schedule and complete subcommands through the actual binary, including env
//! overrides, limits files and exit codes.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: the binary with env overrides cleared.
fn nextdate() -> Command {
    let mut cmd = Command::cargo_bin("nextdate").unwrap();
    cmd.env_remove("NEXTDATE_NOW")
        .env_remove("NEXTDATE_LIMITS")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper: write a limits file under the temp dir and return its path.
fn limits_file(name: &str, json: &str) -> String {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, json).expect("limits fixture must be writable");
    path.to_string_lossy().into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// next subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn next_daily_scenario() {
    nextdate()
        .args(["next", "--date", "20240301", "--repeat", "d 5", "--now", "20240310"])
        .assert()
        .success()
        .stdout("20240311\n");
}

#[test]
fn next_monthly_last_day() {
    nextdate()
        .args(["next", "--date", "20240115", "--repeat", "m -1", "--now", "20240201"])
        .assert()
        .success()
        .stdout("20240229\n");
}

#[test]
fn next_reads_reference_from_env() {
    nextdate()
        .env("NEXTDATE_NOW", "20240103")
        .args(["next", "--date", "20240101", "--repeat", "w 1,3,5"])
        .assert()
        .success()
        .stdout("20240105\n");
}

#[test]
fn next_without_now_uses_today() {
    // Any valid output is an 8-digit date.
    nextdate()
        .args(["next", "--date", "20240101", "--repeat", "d 1"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{8}\n$").unwrap());
}

#[test]
fn unsupported_rule_exits_with_two() {
    nextdate()
        .args(["next", "--date", "20240101", "--repeat", "x", "--now", "20240101"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported repeat rule"));
}

#[test]
fn out_of_range_interval_exits_with_two() {
    nextdate()
        .args(["next", "--date", "20240101", "--repeat", "d 500", "--now", "20240101"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid repeat rule arguments"));
}

#[test]
fn bad_date_exits_with_two() {
    nextdate()
        .args(["next", "--date", "2024-01-01", "--repeat", "d 1", "--now", "20240101"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid date format"));

    nextdate()
        .args(["next", "--date", "20240101", "--repeat", "d 1", "--now", "tomorrow"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid --now date"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Limits file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tight_limits_surface_not_found_with_exit_one() {
    let path = limits_file("nextdate-test-tight-limits.json", r#"{"weekly_max_days": 1}"#);

    nextdate()
        .args(["--limits", path.as_str()])
        .args(["next", "--date", "20240101", "--repeat", "w 7", "--now", "20240101"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Next date not found"));
}

#[test]
fn limits_file_from_env() {
    let path = limits_file("nextdate-test-env-limits.json", r#"{"daily_max_steps": 2}"#);

    nextdate()
        .env("NEXTDATE_LIMITS", &path)
        .args(["next", "--date", "20240101", "--repeat", "d 1", "--now", "20240110"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Computation bound exceeded"));
}

#[test]
fn invalid_limits_file_exits_with_one() {
    let path = limits_file("nextdate-test-bad-limits.json", r#"{"weekly_max_days": 0}"#);

    nextdate()
        .args(["--limits", path.as_str(), "check", "--repeat", "y"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("weekly_max_days"));
}

#[test]
fn missing_limits_file_exits_with_one() {
    nextdate()
        .args(["--limits", "/nonexistent/limits.json", "check", "--repeat", "y"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read limits file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_prints_canonical_rule() {
    nextdate()
        .args(["check", "--repeat", "w 5,1,3"])
        .assert()
        .success()
        .stdout("w 1,3,5\n");
}

#[test]
fn check_json_output() {
    let output = nextdate()
        .args(["check", "--repeat", "m -1 2,8", "--json"])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["kind"], "monthly");
    assert_eq!(value["days"], serde_json::json!([-1]));
    assert_eq!(value["months"], serde_json::json!([2, 8]));
}

#[test]
fn check_rejects_bad_rule() {
    nextdate()
        .args(["check", "--repeat", "w 0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid weekday value '0'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// schedule / complete subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn schedule_moves_past_one_off_task_to_today() {
    nextdate()
        .args(["schedule", "--date", "20240101", "--now", "20240610"])
        .assert()
        .success()
        .stdout("20240610\n");
}

#[test]
fn schedule_advances_past_recurring_task() {
    nextdate()
        .args(["schedule", "--date", "20240601", "--repeat", "d 7", "--now", "20240610"])
        .assert()
        .success()
        .stdout("20240615\n");
}

#[test]
fn complete_one_off_task_prints_remove() {
    nextdate()
        .args(["complete", "--date", "20240610", "--now", "20240610"])
        .assert()
        .success()
        .stdout("remove\n");
}

#[test]
fn complete_recurring_task_prints_next_date() {
    nextdate()
        .args(["complete", "--date", "20230101", "--repeat", "y", "--now", "20240610"])
        .assert()
        .success()
        .stdout("20250101\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_subcommand_is_usage_error() {
    nextdate()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    nextdate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("next"))
        .stdout(predicate::str::contains("schedule"))
        .stdout(predicate::str::contains("complete"));
}
