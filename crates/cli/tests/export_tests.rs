//! Integration tests for `export`, `inspect` and `init` output.

mod common;

use common::{PRODUCTION_VARS, envstack_cmd};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_json_export_is_redacted() {
    let output = envstack_cmd()
        .args(["export", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("development-only-jwt-secret"));
    let tree: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tree["auth"]["jwt"]["secret"], "[REDACTED]");
    assert_eq!(tree["database"]["url"], "[REDACTED]");
    assert_eq!(tree["app"]["port"], 3000);
}

#[test]
fn test_env_export_lists_operational_vars() {
    let mut cmd = envstack_cmd();
    cmd.envs(PRODUCTION_VARS);
    cmd.args(["export", "--env", "production", "--format", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NODE_ENV=production\n"))
        .stdout(predicate::str::contains("PORT=8080\n"))
        .stdout(predicate::str::contains("DATABASE_URL=[REDACTED]\n"))
        .stdout(predicate::str::contains("db.internal").not())
        .stdout(predicate::str::contains("JWT_SECRET").not());
}

#[test]
fn test_yaml_export() {
    envstack_cmd()
        .args(["export", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NODE_ENV: development"))
        .stdout(predicate::str::contains("development-only-jwt-secret").not());
}

#[test]
fn test_export_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("nested").join("config.json");

    envstack_cmd()
        .args(["export", "--output-file"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Configuration written to"));

    let content = fs::read_to_string(&output_path).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(tree["env"]["NODE_ENV"], "development");
}

#[test]
fn test_inspect_section_is_redacted() {
    envstack_cmd()
        .args(["inspect", "database"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[REDACTED]"))
        .stdout(predicate::str::contains("postgresql://").not());
}

#[test]
fn test_init_writes_template_and_refuses_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join(".env.production");

    envstack_cmd()
        .args(["init", "--env", "production", "--output-file"])
        .arg(&template)
        .assert()
        .success();

    let content = fs::read_to_string(&template).unwrap();
    assert!(content.contains("# Required\n"));
    assert!(content.contains("DATABASE_URL=\n"));
    assert!(content.contains("SESSION_SECRET=\n"));
    assert!(content.contains("NODE_ENV=production\n"));

    envstack_cmd()
        .args(["init", "--env", "production", "--output-file"])
        .arg(&template)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));

    envstack_cmd()
        .args(["init", "--env", "test", "--force", "--output-file"])
        .arg(&template)
        .assert()
        .success();
    let content = fs::read_to_string(&template).unwrap();
    assert!(content.contains("NODE_ENV=test\n"));
}
