//! Integration tests for commands that need no running backends

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from any user configuration
fn threadscout_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("threadscout").unwrap();
    cmd.env("THREADSCOUT_CONFIG", config_dir.path().join("config.yml"))
        .env_remove("THREADSCOUT_TEMPLATES_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, yaml: &str) {
    fs::write(dir.path().join("config.yml"), yaml).unwrap();
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    threadscout_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("answer"))
        .stdout(predicate::str::contains("providers"));
}

#[test]
fn test_providers_marks_selection() {
    let dir = TempDir::new().unwrap();
    threadscout_cmd(&dir)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("* searxng"))
        .stdout(predicate::str::contains("* ollama_query"));
}

#[test]
fn test_providers_json() {
    let dir = TempDir::new().unwrap();
    let output = threadscout_cmd(&dir)
        .args(["--format", "json", "providers"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let sections: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = sections
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["query", "search", "summary"]);
    assert_eq!(sections[1]["multi"], serde_json::json!(true));
}

#[test]
fn test_health_with_defaults() {
    let dir = TempDir::new().unwrap();
    threadscout_cmd(&dir)
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::diff("ok\n"));
}

#[test]
fn test_health_rejects_unknown_provider() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "providers:\n  search:\n    - bing\n",
    );

    threadscout_cmd(&dir)
        .arg("health")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown search provider: bing"));
}

#[test]
fn test_invalid_config_value() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "rerank:\n  top_k: 0\n");

    threadscout_cmd(&dir)
        .arg("providers")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("top_k"));
}

#[test]
fn test_missing_title_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    threadscout_cmd(&dir)
        .args(["queries", "--body", "no title here"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("title is required"));
}

#[test]
fn test_malformed_question_json() {
    let dir = TempDir::new().unwrap();
    threadscout_cmd(&dir)
        .args(["answer", "--json", "-"])
        .write_stdin("{\"body\": \"missing title\"")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid question JSON"));
}
