//! Integration tests for the `armlink` CLI binary.
//!
//! Argument parsing, help output, shell completions and configuration
//! errors, all without reaching Azure.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// The `armlink` binary with every `ARMLINK_*` variable cleared and the
/// config directory pointed at an empty temp dir.
fn armlink_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("armlink");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "ARMLINK_PROFILE",
        "ARMLINK_SUBSCRIPTION",
        "ARMLINK_TOKEN",
        "ARMLINK_REGION",
        "ARMLINK_ENDPOINT",
        "ARMLINK_OUTPUT",
        "ARMLINK_INSECURE",
        "ARMLINK_TIMEOUT",
        "ARMLINK_VM_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = armlink_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_resource_commands() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("vpcs")
            .and(predicate::str::contains("secgroups"))
            .and(predicate::str::contains("vms"))
            .and(predicate::str::contains("apps")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("armlink"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .arg("teleport")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_vm_create_requires_image() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .args(["vms", "create", "--name", "web", "--network", "/subnets/a"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--image"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("armlink"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_config_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = armlink_cmd(home.path())
        .args(["vpcs", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected a hint:\n{text}");
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let output = armlink_cmd(home.path())
        .args(["-p", "nowhere", "vpcs", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("nowhere"), "Expected profile name:\n{text}");
}

#[test]
fn test_profiles_on_empty_config() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_config_use_unknown_profile_fails() {
    let home = tempfile::tempdir().unwrap();
    armlink_cmd(home.path())
        .args(["config", "use", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}
