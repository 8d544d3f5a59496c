//! Integration tests for the `tikgate` binary.
//!
//! Everything here runs without a router: argument parsing, config
//! handling, commands refused before any device call, and the offline
//! path against a closed local port.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// `tikgate` with every `TIKGATE_*` variable cleared and config
/// directories pointed somewhere that does not exist.
fn tikgate_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tikgate");
    cmd.env("HOME", "/tmp/tikgate-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tikgate-cli-test-nonexistent")
        .env_remove("TIKGATE_CONFIG")
        .env_remove("TIKGATE_HOST")
        .env_remove("TIKGATE_PORT")
        .env_remove("TIKGATE_USERNAME")
        .env_remove("TIKGATE_TIMEOUT")
        .env_remove("TIKGATE_OUTPUT")
        .env_remove("TIKGATE_CALLER")
        .env_remove("TIKGATE_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Config pointing at a port nothing listens on, so any device call fails
/// fast with a refused connection.
fn write_offline_config(dir: &Path, access: &str) -> PathBuf {
    let path = dir.join("tikgate.toml");
    let body = format!(
        r#"
[router]
host = "127.0.0.1"
port = 1
username = "bot"
password = "secret"
connect_timeout_secs = 1
connect_attempts = 1
retry_delay_ms = 1

[access]
{access}
"#
    );
    std::fs::write(&path, body).unwrap();
    path
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tikgate_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tikgate_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("RouterOS")
            .and(predicate::str::contains("exec"))
            .and(predicate::str::contains("console"))
            .and(predicate::str::contains("check")),
    );
}

#[test]
fn test_version_flag() {
    tikgate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tikgate"));
}

#[test]
fn test_completions_bash() {
    tikgate_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tikgate_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let output = tikgate_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_exec_requires_caller() {
    let output = tikgate_cmd().args(["exec", "speed"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--caller"), "Expected --caller in:\n{text}");
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_then_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tikgate.toml");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    let output = tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "second init must not clobber");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("127.0.0.1")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("secret").not()),
        );
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_exec_without_host_is_usage_error() {
    let output = tikgate_cmd()
        .args(["exec", "--caller", "1", "speed"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("router.host"), "Expected field name in:\n{text}");
}

#[test]
fn test_unpinned_empty_admin_list_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = []");

    let output = tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "1", "help"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("empty_admin_policy"),
        "Expected policy field in:\n{text}"
    );
}

#[test]
fn test_missing_password_is_auth_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tikgate.toml");
    std::fs::write(
        &path,
        "[router]\nhost = \"127.0.0.1\"\n\n[access]\nadmin_ids = [42]\n",
    )
    .unwrap();

    let output = tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "1", "help"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

// ── Commands answered without the router ────────────────────────────

#[test]
fn test_exec_help_lists_admin_section_for_admins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "42", "/help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("📚").and(predicate::str::contains("Admin:")));

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "7", "/help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("📚").and(predicate::str::contains("Admin:").not()));
}

#[test]
fn test_exec_refuses_dangerous_terminal_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    // Refused before connecting: no "Router offline" even though the port is closed.
    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "42", "terminal", "/system/reboot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dangerous command blocked"));
}

#[test]
fn test_exec_refuses_privileged_command_for_guest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "7", "backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🔒 Admin only"));
}

#[test]
fn test_exec_json_output_carries_keyboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "empty_admin_policy = \"everyone\"");

    let output = tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["--output", "json", "exec", "--caller", "5", "help"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["caller_id"], 5);
    assert_eq!(value["keyboard"], "admin");
    assert!(value["buttons"].as_array().is_some_and(|rows| !rows.is_empty()));
}

// ── Offline router ──────────────────────────────────────────────────

#[test]
fn test_exec_reports_router_offline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["exec", "--caller", "1", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("❌ Router offline"));
}

#[test]
fn test_check_fails_with_connection_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    let output = tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .arg("check")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_console_answers_each_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_offline_config(dir.path(), "admin_ids = [42]");

    let output = tikgate_cmd()
        .arg("--config")
        .arg(&path)
        .args(["--output", "json-compact", "console", "--caller", "7"])
        .write_stdin("help\n\nspeed\nbackup\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let replies: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 3, "blank lines are skipped:\n{stdout}");
    assert!(replies[0]["text"].as_str().unwrap().starts_with("📚"));
    assert_eq!(replies[1]["text"], "❌ Router offline");
    assert_eq!(replies[2]["text"], "🔒 Admin only");
}
