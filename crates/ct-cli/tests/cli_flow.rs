//! Integration tests for the `chaos-time` binary.
//!
//! These exercise argument handling and configuration errors, which all fail
//! before any network request is made.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn chaos_time_binary() -> String {
    env!("CARGO_BIN_EXE_chaos-time").to_string()
}

/// A command isolated from the caller's home directory and credentials.
fn isolated_command(home: &Path) -> Command {
    let mut command = Command::new(chaos_time_binary());
    command
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("JIRA_EMAIL")
        .env_remove("JIRA_API_TOKEN")
        .env_remove("JIRA_SERVER_URL")
        .env_remove("GOOGLE_API_CREDENTIALS")
        .env_remove("RUST_LOG");
    command
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path()).arg("-V").output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "chaos-time 1.0.0"
    );
}

#[test]
fn test_subcommand_required() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path()).output().unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_jira_missing_email() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path())
        .args(["jira", "-d", "2", "-m", "1", "-y", "2024"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("--email"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("JIRA_EMAIL"), "unexpected stderr: {stderr}");
}

#[test]
fn test_jira_missing_token_from_env_email() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path())
        .env("JIRA_EMAIL", "me@example.com")
        .args(["jira", "-d", "2", "-m", "1", "-y", "2024"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("JIRA_API_TOKEN"), "unexpected stderr: {stderr}");
}

#[test]
fn test_jira_missing_server_url() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path())
        .args(["jira", "-e", "me@example.com", "-t", "token"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("JIRA_SERVER_URL"), "unexpected stderr: {stderr}");
}

#[test]
fn test_invalid_date_is_rejected() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path())
        .args(["calendar", "-d", "30", "-m", "2", "-y", "2024"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(
        stderr.contains("2024-02-30 is not a valid date"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_calendar_requires_client_secrets() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path())
        .arg("calendar")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(
        stderr.contains("GOOGLE_API_CREDENTIALS"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_calendar_without_cached_token() {
    let temp = TempDir::new().unwrap();
    let output = isolated_command(temp.path())
        .env("GOOGLE_API_CREDENTIALS", temp.path().join("client_secret.json"))
        .arg("calendar")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(
        stderr.contains("google-calendar-token.json"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_config_file_supplies_token_path() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    let token_path = temp.path().join("custom-token.json");
    std::fs::write(
        &config_path,
        format!(
            "google_api_credentials = \"{}\"\ngoogle_token_path = \"{}\"\n",
            temp.path().join("client_secret.json").display(),
            token_path.display()
        ),
    )
    .unwrap();

    let output = isolated_command(temp.path())
        .arg("--config")
        .arg(&config_path)
        .arg("calendar")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("custom-token.json"), "unexpected stderr: {stderr}");
}
