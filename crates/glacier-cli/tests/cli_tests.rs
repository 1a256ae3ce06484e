use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GENERIC_FAILURE: &str = "Architectural synthesis failed. Please retry.";

const CRM_PLAN: &str = r#"{
    "name": "CRM Lead Router",
    "steps": [
        {"id": "1", "type": "trigger", "title": "New lead", "description": "A lead is created in the CRM"},
        {"id": "2", "type": "condition", "title": "Qualified", "description": "Deal size above 10k"},
        {"id": "3", "type": "action", "title": "Notify sales", "description": "Post the lead to Slack"}
    ]
}"#;

/// Temporary directory that also serves as an empty XDG config home, so the
/// user's own configuration never leaks into a test.
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Command with --no-color and an isolated environment
fn glacier_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("glacier").expect("Failed to find glacier binary");
    cmd.env("XDG_CONFIG_HOME", dir.path())
        .env_remove("GEMINI_API_KEY")
        .arg("--no-color");
    cmd
}

#[test]
fn test_synthesize_from_plan_file() {
    let dir = create_cli_test_environment();
    let plan = write_file(&dir, "plan.json", CRM_PLAN);

    glacier_cmd(&dir)
        .args(["synthesize", "Route CRM leads", "--plan-file"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Synthesizing: Route CRM leads"))
        .stdout(predicate::str::contains("# CRM Lead Router"))
        .stdout(predicate::str::contains("### 1. New lead (⚡ trigger node)"))
        .stdout(predicate::str::contains("### 2. Qualified (◇ condition node)"))
        .stdout(predicate::str::contains("Post the lead to Slack"));
}

#[test]
fn test_synthesize_prints_narration_while_waiting() {
    let dir = create_cli_test_environment();
    let plan = write_file(&dir, "plan.json", CRM_PLAN);

    glacier_cmd(&dir)
        .args(["synthesize", "Route CRM leads", "--latency-ms", "1400", "--plan-file"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("- Accessing Gemini Neural Cortex..."))
        .stdout(predicate::str::contains("- Deconstructing Natural Language Semantics..."))
        .stdout(predicate::str::contains("# CRM Lead Router"));
}

#[test]
fn test_synthesize_missing_plan_file_fails_generically() {
    let dir = create_cli_test_environment();
    let missing = dir.path().join("missing.json");

    glacier_cmd(&dir)
        .args(["synthesize", "Anything", "--plan-file"])
        .arg(&missing)
        .assert()
        .failure()
        .stdout(predicate::str::contains(GENERIC_FAILURE))
        .stdout(predicate::str::contains("missing.json").not());
}

#[test]
fn test_synthesize_invalid_plan_fails_generically() {
    let dir = create_cli_test_environment();
    let plan = write_file(&dir, "plan.json", r#"{"name": "Empty", "steps": []}"#);

    glacier_cmd(&dir)
        .args(["synthesize", "Anything", "--plan-file"])
        .arg(&plan)
        .assert()
        .failure()
        .stdout(predicate::str::contains(GENERIC_FAILURE))
        .stdout(predicate::str::contains("# Empty").not());
}

#[test]
fn test_synthesize_timeout() {
    let dir = create_cli_test_environment();
    let plan = write_file(&dir, "plan.json", CRM_PLAN);

    glacier_cmd(&dir)
        .args([
            "synthesize",
            "Slow one",
            "--latency-ms",
            "5000",
            "--timeout-ms",
            "200",
            "--plan-file",
        ])
        .arg(&plan)
        .assert()
        .failure()
        .stdout(predicate::str::contains(GENERIC_FAILURE));
}

#[test]
fn test_synthesize_empty_prompt_is_rejected() {
    let dir = create_cli_test_environment();
    let plan = write_file(&dir, "plan.json", CRM_PLAN);

    glacier_cmd(&dir)
        .args(["synthesize", "   ", "--plan-file"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("the prompt is empty"))
        .stdout(predicate::str::contains("Synthesizing").not());
}

#[test]
fn test_synthesize_without_api_key_fails() {
    let dir = create_cli_test_environment();

    glacier_cmd(&dir)
        .args(["synthesize", "Sync CRM leads to Slack"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_synthesize_with_playback() {
    let dir = create_cli_test_environment();
    let plan = write_file(&dir, "plan.json", CRM_PLAN);

    glacier_cmd(&dir)
        .args(["synthesize", "Route CRM leads", "--playback-ms", "300", "--plan-file"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Playback after 300ms"))
        .stdout(predicate::str::contains("edge  1 |"))
        .stdout(predicate::str::contains("edge  2 |"))
        .stdout(predicate::str::contains("edge  3 |").not());
}

#[test]
fn test_config_prints_defaults() {
    let dir = create_cli_test_environment();

    glacier_cmd(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("interval-ms: 600"))
        .stdout(predicate::str::contains("capacity: 5"))
        .stdout(predicate::str::contains("Accessing Gemini Neural Cortex..."));
}

#[test]
fn test_config_reads_xdg_location() {
    let dir = create_cli_test_environment();
    fs::create_dir_all(dir.path().join("glacier")).unwrap();
    fs::write(
        dir.path().join("glacier").join("config.yaml"),
        "narration:\n  interval-ms: 250\n",
    )
    .unwrap();

    glacier_cmd(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("interval-ms: 250"));
}

#[test]
fn test_config_lookup_creates_nothing() {
    let dir = create_cli_test_environment();

    glacier_cmd(&dir).arg("config").assert().success();
    assert!(!dir.path().join("glacier").exists());
}

#[test]
fn test_explicit_config_file() {
    let dir = create_cli_test_environment();
    let config = write_file(&dir, "custom.yaml", "session:\n  timeout-ms: 45000\n");

    glacier_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout-ms: 45000"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = create_cli_test_environment();
    let config = write_file(&dir, "bad.yaml", "playback:\n  period-ms: 0\n");

    glacier_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_chat_without_api_key_fails() {
    let dir = create_cli_test_environment();

    glacier_cmd(&dir)
        .args(["chat", "How do retries work?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not found"));
}

#[test]
fn test_help_lists_commands() {
    let dir = create_cli_test_environment();

    glacier_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synthesize"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("config"));
}
