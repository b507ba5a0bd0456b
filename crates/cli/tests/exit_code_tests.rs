//! Integration tests for structured exit codes.
//!
//! These tests verify that envstack returns the correct exit codes
//! for different failure modes, enabling reliable shell scripting.

mod common;

use common::{PRODUCTION_VARS, envstack_cmd};
use predicates::prelude::*;

#[test]
fn test_success_returns_exit_code_0() {
    envstack_cmd().arg("load").assert().code(0);
}

#[test]
fn test_diagnostics_without_strict_still_succeed() {
    envstack_cmd()
        .args(["validate", "--env", "production"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("missing: DATABASE_URL"))
        .stderr(predicate::str::contains(
            "error: Missing required environment variables: DATABASE_URL, JWT_SECRET, SESSION_SECRET",
        ));
}

#[test]
fn test_missing_vars_return_exit_code_3_under_strict() {
    envstack_cmd()
        .args(["validate", "--env", "production", "--strict"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SESSION_SECRET"));
}

#[test]
fn test_validation_failure_returns_exit_code_2_under_strict() {
    let mut cmd = envstack_cmd();
    cmd.envs(PRODUCTION_VARS);
    cmd.env("JWT_SECRET", "short");
    cmd.args(["validate", "--env", "production", "--strict"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("auth.jwt.secret"))
        .stderr(predicate::str::contains("short").not());
}

#[test]
fn test_invalid_required_value_is_not_echoed() {
    envstack_cmd()
        .args(["--strict", "--var", "DATABASE_URL=not a url", "load"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("database.url"))
        .stderr(predicate::str::contains("not a url").not());
}

#[test]
fn test_unknown_environment_returns_exit_code_4() {
    envstack_cmd()
        .args(["load", "--env", "qa"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown environment 'qa'"));
}

#[test]
fn test_missing_section_returns_exit_code_1() {
    envstack_cmd()
        .args(["inspect", "billing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("section 'billing' not found"));
}
