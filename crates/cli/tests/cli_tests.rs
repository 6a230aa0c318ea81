//! CLI integration tests

use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_VARS: [&str; 12] = [
    "ARCBENCH_OUTPUT",
    "ARCBENCH_TEMP_DIR",
    "ARCBENCH_SOURCE_REPO",
    "ARCBENCH_TRIGGER_FILE",
    "ARCBENCH_CONTROLLER_NAMESPACE",
    "ARCBENCH_RUNNER_NAMESPACE",
    "ARCBENCH_TRIGGERS",
    "ARCBENCH_POLL_INTERVAL",
    "ARCBENCH_TIMEOUT",
    "ARCBENCH_GIT",
    "ARCBENCH_KUBECTL",
    "ARCBENCH_CONFIG",
];

/// The built binary with every `ARCBENCH_*` variable removed
fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_arcbench"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Run the built binary with an empty config file and a clean environment
fn arcbench(temp_dir: &TempDir, args: &[&str]) -> Output {
    let config = temp_dir.path().join("config.json");
    std::fs::write(&config, "{}").unwrap();

    command()
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = command()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    for option in [
        "--output",
        "--temp-dir",
        "--source-repo",
        "--trigger-file",
        "--controller-namespace",
        "--runner-namespace",
        "--triggers",
    ] {
        assert!(stdout.contains(option), "Should show {option} option");
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = command()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("arcbench"), "Should show binary name");
}

/// Test that a missing source repository exits with status 1
#[test]
fn test_missing_source_repo() {
    let temp_dir = TempDir::new().unwrap();
    let output = arcbench(&temp_dir, &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr.contains("source repository is required"),
        "Should explain the missing option, got: {stderr}"
    );
}

/// Test that zero triggers is rejected
#[test]
fn test_zero_triggers() {
    let temp_dir = TempDir::new().unwrap();
    let output = arcbench(
        &temp_dir,
        &["--source-repo", "git@github.com:example/repo.git", "--triggers", "0"],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("triggers must be at least 1"));
}

/// Test that a malformed flag value exits with status 1
#[test]
fn test_invalid_flag_value() {
    let temp_dir = TempDir::new().unwrap();
    let output = arcbench(&temp_dir, &["--source-repo", "r", "--triggers", "abc"]);

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("--triggers"), "got: {stderr}");
}

/// Test that an unknown flag exits with status 1
#[test]
fn test_unknown_flag() {
    let temp_dir = TempDir::new().unwrap();
    let output = arcbench(&temp_dir, &["--source-repo", "r", "--no-such-flag"]);

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("--no-such-flag"), "got: {stderr}");
}

/// Test that a git failure during sync aborts the run
#[test]
fn test_sync_failure() {
    let temp_dir = TempDir::new().unwrap();
    let work_dir = temp_dir.path().join("clone");
    let output = arcbench(
        &temp_dir,
        &[
            "--source-repo",
            "git@github.com:example/repo.git",
            "--temp-dir",
            work_dir.to_str().unwrap(),
            "--git",
            "arcbench-missing-git",
        ],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("failed to sync"), "got: {stderr}");
    assert!(work_dir.is_dir(), "Working directory should be created");
    assert!(!work_dir.join("trigger.txt").exists());
}

/// Test that a malformed config file is reported
#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.json");
    std::fs::write(&config, "not json").unwrap();

    let output = command()
        .arg("--config")
        .arg(&config)
        .args(["--source-repo", "git@github.com:example/repo.git"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Failed to parse config file"));
}
