//! Static checks over workspace sources.
//!
//! Invariants:
//! - Only `crates/config/src/loader/env.rs` reads the process environment directly.
//! - Exposed secret values never appear on a line that logs or prints.
//! - Tests create temp files with the tempfile crate, not `std::env::temp_dir()`.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const ENV_ACCESS_OWNER: &str = "crates/config/src/loader/env.rs";

const LOGGING_MACROS: &[&str] = &[
    "tracing::",
    "trace!(",
    "debug!(",
    "info!(",
    "warn!(",
    "error!(",
    "println!(",
    "eprintln!(",
];

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap()
}

/// (relative path, contents) of every .rs file under crates/, excluding this crate.
fn sources() -> Vec<(String, String)> {
    let root = workspace_root();
    WalkDir::new(root.join("crates"))
        .into_iter()
        .filter_entry(|entry| {
            entry.file_name() != "target" && entry.file_name() != "architecture-tests"
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(&root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            (relative, fs::read_to_string(entry.path()).unwrap())
        })
        .collect()
}

fn is_test_source(path: &str) -> bool {
    path.contains("/tests/") || path.ends_with("tests.rs") || path.ends_with("_tests.rs")
}

#[test]
fn test_process_environment_read_in_one_place() {
    let violations: Vec<String> = sources()
        .into_iter()
        .filter(|(path, _)| path != ENV_ACCESS_OWNER && !is_test_source(path))
        .filter(|(_, content)| content.contains("std::env::var"))
        .map(|(path, _)| path)
        .collect();

    assert!(
        violations.is_empty(),
        "read env vars through envstack_config::env_var_or_none instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_exposed_secrets_are_never_logged() {
    let mut violations = Vec::new();
    for (path, content) in sources() {
        for (number, line) in content.lines().enumerate() {
            if line.contains("expose_secret")
                && LOGGING_MACROS.iter().any(|mac| line.contains(mac))
            {
                violations.push(format!("{path}:{}: {}", number + 1, line.trim()));
            }
        }
    }

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn test_tests_use_tempfile() {
    let violations: Vec<String> = sources()
        .into_iter()
        .filter(|(_, content)| content.contains("#[test]"))
        .filter(|(_, content)| content.contains("std::env::temp_dir()"))
        .map(|(path, _)| path)
        .collect();

    assert!(
        violations.is_empty(),
        "use tempfile::tempdir() for RAII cleanup:\n{}",
        violations.join("\n")
    );
}
