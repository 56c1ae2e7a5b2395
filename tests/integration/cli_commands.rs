//! Integration tests for the aegis binary

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with a scrubbed environment rooted in `test_dir`.
fn run(test_dir: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
    let workspace = test_dir.join("ws");
    let home = test_dir.join("home");
    std::fs::create_dir_all(&workspace).unwrap();
    std::fs::create_dir_all(&home).unwrap();

    let bin = env!("CARGO_BIN_EXE_aegis");
    let mut command = Command::new(bin);
    command
        .env_clear()
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", test_dir.join("xdg"))
        .env("XDG_STATE_HOME", test_dir.join("state"))
        .arg("--workspace")
        .arg(&workspace)
        .arg("--quiet")
        .args(args);
    for (key, value) in vars {
        command.env(key, value);
    }
    command.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_domains_lists_all_labels() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["domains"], &[]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("General"));
    assert!(out.contains("Relativistic Physics"));
    assert!(out.contains("25 domains"));
}

#[test]
fn test_schema_blueprint_is_json() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["schema", "blueprint"], &[]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let schema: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(schema["type"], "ARRAY");
    assert_eq!(schema["items"]["properties"]["color"]["type"], "STRING");
}

#[test]
fn test_status_json_shows_fingerprints_only() {
    let temp = TempDir::new().unwrap();
    let output = run(
        temp.path(),
        &["status", "--format", "json"],
        &[("AEGIS_API_KEYS", "alpha-secret-1111,beta-secret-2222")],
    );
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let out = stdout(&output);
    assert!(!out.contains("secret"));
    let status: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(status["credentials"].as_array().unwrap().len(), 2);
    assert_eq!(status["attempt_budget"], 4);
    assert_eq!(status["model"], "gemini-3-pro-preview");
}

#[test]
fn test_analyze_without_keys_fails_with_configuration_error() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["analyze", "A perpetual motion machine"], &[]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).starts_with("configuration: "),
        "stderr={}",
        stderr(&output)
    );
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_unknown_domain_is_rejected_by_parser() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["analyze", "A boat", "--domain", "Alchemy"], &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown physics domain"));
}

#[test]
fn test_workspace_config_is_honored() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("ws").join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[provider]\nmodel = \"gemini-workspace\"\n[executor]\ndeadline_secs = 30\n",
    )
    .unwrap();

    let output = run(temp.path(), &["status", "--format", "toml"], &[]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("model = \"gemini-workspace\""));
    assert!(out.contains("deadline_secs = 30"));
}
