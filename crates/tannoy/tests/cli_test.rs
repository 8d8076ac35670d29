//! Integration tests for the `tannoy` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live speaker.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tannoy` binary with env isolation.
///
/// Clears all `TANNOY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tannoy_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tannoy");
    cmd.env("HOME", "/tmp/tannoy-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tannoy-test-nonexistent")
        .env_remove("TANNOY_SPEAKER")
        .env_remove("TANNOY_HOST")
        .env_remove("TANNOY_USERNAME")
        .env_remove("TANNOY_PASSWORD")
        .env_remove("TANNOY_OUTPUT")
        .env_remove("TANNOY_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = tannoy_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn version_flag_prints_version() {
    tannoy_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tannoy"));
}

#[test]
fn help_lists_all_commands() {
    let output = tannoy_cmd().arg("--help").output().unwrap();
    let text = combined_output(&output);
    for cmd in ["info", "status", "files", "volume", "upload", "play", "config"] {
        assert!(text.contains(cmd), "help is missing '{cmd}':\n{text}");
    }
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = tannoy_cmd().arg("discover").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_volume_level_is_a_usage_error() {
    let output = tannoy_cmd().args(["volume", "loud"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Completions ─────────────────────────────────────────────────────

#[test]
fn completions_generate_for_bash() {
    tannoy_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tannoy"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn config_path_prints_a_toml_path() {
    tannoy_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn speaker_command_without_config_points_at_setup() {
    let output = tannoy_cmd().arg("info").output().unwrap();
    assert_eq!(output.status.code(), Some(1), "Expected exit code 1");
    let text = combined_output(&output);
    assert!(
        text.contains("No speaker configured"),
        "Expected setup guidance in output:\n{text}"
    );
    assert!(
        text.contains("config init"),
        "Expected 'config init' hint in output:\n{text}"
    );
}

#[test]
fn host_flag_without_password_asks_for_credentials() {
    let output = tannoy_cmd()
        .args(["info", "--host", "192.0.2.1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("No password configured"),
        "Expected credentials guidance in output:\n{text}"
    );
}
