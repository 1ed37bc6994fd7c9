//! End-to-end tests for the focusdeck binary.
//!
//! Each test points HOME at a fresh temporary directory so settings and the
//! session database never touch the real ones.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn focusdeck(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("focusdeck").unwrap();
    cmd.env("HOME", home.path()).env_remove("FOCUSDECK_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_status_on_empty_history() {
    let home = TempDir::new().unwrap();
    let output = focusdeck(&home)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["completed_sessions"], 0);
    assert_eq!(parsed["long_break_interval"], 4);
    assert_eq!(parsed["sessions_until_long_break"], 4);
}

#[test]
fn test_history_empty() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["history", "--output", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions yet"));
}

#[test]
fn test_report_json() {
    let home = TempDir::new().unwrap();
    let output = focusdeck(&home)
        .args(["report", "today", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["period"], "Today");
    assert_eq!(parsed["total_seconds"], 0);
}

#[test]
fn test_report_unknown_period_fails() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["report", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("fortnight"));
}

#[test]
fn test_clear_requires_force() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    focusdeck(&home)
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 sessions"));
}

#[test]
fn test_config_set_changes_status_cycle() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["config", "set", "timer.long_break_interval", "3"])
        .assert()
        .success();

    let output = focusdeck(&home)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["long_break_interval"], 3);

    assert!(home.path().join(".focusdeck").join("config.yaml").exists());
}

#[test]
fn test_config_default_output_applies() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["config", "set", "general.default_output", "json"])
        .assert()
        .success();

    focusdeck(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"));
}

#[test]
fn test_config_set_rejects_bad_minutes() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["config", "set", "timer.work_minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_config_reset_recovers_broken_file() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".focusdeck");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.yaml"), "timer: [not, a, map]").unwrap();

    focusdeck(&home).arg("status").assert().failure();
    focusdeck(&home).args(["config", "reset"]).assert().success();
    focusdeck(&home).arg("status").assert().success();
}

#[test]
fn test_run_rejects_unknown_phase() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["run", "--phase", "nap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown phase 'nap'"));
}

#[test]
fn test_run_rejects_zero_cycles() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["run", "--cycles", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--cycles"));
}

#[test]
fn test_config_set_rejects_huge_minutes() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["config", "set", "timer.work_minutes", "99999999999999h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    focusdeck(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("focusdeck"));
}
