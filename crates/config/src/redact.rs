//! Secret redaction for safe logging and export.
//!
//! Responsibilities:
//! - Produce a deep copy of a tree with sensitive paths replaced by a marker.
//!
//! Does NOT handle:
//! - Deciding what is sensitive beyond the configured path list.
//!
//! Invariants:
//! - The input tree is never modified.
//! - Paths absent from the input stay absent; redaction never adds keys.
//! - Every field not listed is left byte-identical.

use serde_json::Value;

use crate::constants::{REDACTED_MARKER, SENSITIVE_PATHS};
use crate::tree::{get_path, set_path};

/// Replaces values at a fixed list of dotted paths.
#[derive(Debug, Clone)]
pub struct SecretRedactor {
    paths: Vec<String>,
    marker: String,
}

impl Default for SecretRedactor {
    fn default() -> Self {
        Self::new(SENSITIVE_PATHS.iter().copied())
    }
}

impl SecretRedactor {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            marker: REDACTED_MARKER.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Deep copy of `tree` with every configured path redacted.
    pub fn redact(&self, tree: &Value) -> Value {
        let mut redacted = tree.clone();
        for path in &self.paths {
            if get_path(&redacted, path).is_some() {
                set_path(&mut redacted, path, Value::String(self.marker.clone()));
            }
        }
        redacted
    }
}

/// Redact `paths` in `tree` with the default marker.
pub fn redact(tree: &Value, paths: &[&str]) -> Value {
    SecretRedactor::new(paths.iter().copied()).redact(tree)
}
