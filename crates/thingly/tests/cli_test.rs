//! Integration tests for the `thingly` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live gateway.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `thingly` binary with env isolation.
///
/// Clears all `THINGLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn thingly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("thingly");
    cmd.env("HOME", "/tmp/thingly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/thingly-cli-test-nonexistent")
        .env_remove("THINGLY_PROFILE")
        .env_remove("THINGLY_GATEWAY")
        .env_remove("THINGLY_OUTPUT")
        .env_remove("THINGLY_INSECURE")
        .env_remove("THINGLY_TIMEOUT")
        .env_remove("THINGLY_DISCOVERY_TIMEOUT");
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
fn test_no_args_shows_help() {
    let output = thingly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    thingly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("gateway")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("resources"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    thingly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("thingly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    thingly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    thingly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = thingly_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_no_gateway() {
    thingly_cmd()
        .args(["devices", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("gateway")
                .or(predicate::str::contains("config"))
                .or(predicate::str::contains("profile")),
        );
}

#[test]
fn test_unknown_profile_fails() {
    thingly_cmd()
        .args(["--profile", "lab", "devices", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lab"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    thingly_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_invalid_output_format() {
    let output = thingly_cmd()
        .args(["--output", "invalid", "devices", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_gateway_url() {
    thingly_cmd()
        .args(["--gateway", "not a url", "devices", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for gateway"));
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing gateway config, not about argument parsing.
    thingly_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "--discovery-timeout",
            "500",
            "devices",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("gateway")
                .or(predicate::str::contains("config"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_devices_subcommands_exist() {
    thingly_cmd()
        .args(["devices", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("own"))
                .and(predicate::str::contains("disown"))
                .and(predicate::str::contains("onboard"))
                .and(predicate::str::contains("flush")),
        );
}

#[test]
fn test_resources_subcommands_exist() {
    thingly_cmd()
        .args(["resources", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("tree"))
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_dps_subcommands_exist() {
    thingly_cmd()
        .args(["dps", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set").and(predicate::str::contains("status")));
}

#[test]
fn test_config_subcommands_exist() {
    thingly_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path")),
        );
}

// ── Config round-trip ───────────────────────────────────────────────

#[test]
fn test_config_init_and_show() {
    let home = tempfile::tempdir().unwrap();
    let home_str = home.path().to_string_lossy().to_string();

    let mut init = cargo_bin_cmd!("thingly");
    init.env("HOME", &home_str)
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args([
            "config",
            "init",
            "--name",
            "lab",
            "--gateway",
            "https://10.0.0.5:8080",
            "--default",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab"));

    let mut show = cargo_bin_cmd!("thingly");
    show.env("HOME", &home_str)
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("lab").and(predicate::str::contains("10.0.0.5")),
        );
}
