//! Shared test utilities for envstack integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//!
//! Invariants / Assumptions:
//! - The spawned process starts from an empty environment, so host variables
//!   such as `APP_ENV`, `PORT` or `DATABASE_URL` never leak into a test.
//! - `DOTENV_DISABLED=1` is set unless a test removes it explicitly.

use assert_cmd::Command;

/// Returns a hermetic `envstack` command for integration testing.
pub fn envstack_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envstack");
    cmd.env_clear();
    cmd.env("DOTENV_DISABLED", "1");
    cmd
}

/// Variables that satisfy the production profile.
#[allow(dead_code)]
pub const PRODUCTION_VARS: [(&str, &str); 3] = [
    ("DATABASE_URL", "postgresql://db.internal:5432/app"),
    ("JWT_SECRET", "production-jwt-secret-0123456789abcdef"),
    ("SESSION_SECRET", "production-session-secret-0123456789ab"),
];
