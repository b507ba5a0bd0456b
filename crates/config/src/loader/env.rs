//! Process environment access for configuration loading.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Resolve the active environment name from the process environment.
//! - Snapshot the process environment for callers that pass it to the loader.
//! - Load `.env` files into the process environment, gated by `DOTENV_DISABLED`.
//!
//! Does NOT handle:
//! - Coercing values (see `coerce`).
//! - Mapping variables onto the tree (see `tree::path`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Environment names are matched case-sensitively.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::constants::ENVIRONMENT_VAR;
use crate::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// All process environment variables with valid UTF-8 names and values.
pub fn process_env_vars() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Supplies the raw "current environment" indicator, if any.
pub type EnvironmentResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Resolver reading the `APP_ENV` process variable.
pub fn process_environment_resolver() -> EnvironmentResolver {
    Arc::new(|| env_var_or_none(ENVIRONMENT_VAR))
}

/// Whether `value` is blank (empty or whitespace-only).
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var("DOTENV_DISABLED").ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Load environment variables from a `.env` file in the working directory, if present.
///
/// Variables already set in the process win over `.env` values. If
/// `DOTENV_DISABLED` is set to "true" or "1", nothing is loaded (useful for
/// testing). Returns whether a file was loaded.
///
/// # Errors
///
/// Returns an error if:
/// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
/// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
///
/// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
pub fn load_dotenv() -> Result<bool, ConfigError> {
    if dotenv_disabled() {
        return Ok(false);
    }

    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Ok(true)
        }
        Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
            Ok(false)
        }
        Err(dotenvy::Error::LineParse(_, idx)) => Err(ConfigError::DotenvParse { error_index: idx }),
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
            kind: io_err.kind(),
        }),
        Err(_) => Err(ConfigError::DotenvUnknown),
    }
}
