//! Schema validation for configuration trees.
//!
//! Responsibilities:
//! - Define the `SchemaValidator` seam the loader and manager call into.
//! - Provide a data-driven schema interpreter (`Schema`, `Field`).
//! - Ship the default application schema used by the built-in profiles.
//!
//! Does NOT handle:
//! - Loading or merging trees (see `loader`, `tree`).
//!
//! Invariants:
//! - Error messages are formatted as `"<dot.path>: <message>"`.
//! - A successful outcome always carries normalized data.
//! - Validation never mutates the candidate tree.

mod app;
mod rules;

use serde_json::Value;

pub use app::application_schema;
pub use rules::{Field, FieldKind, NumberRules, ObjectSchema, Schema, StringFormat, StringRules};

/// Result of validating a candidate tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Normalized tree, present when `valid`.
    pub data: Option<Value>,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn success(data: Value) -> Self {
        Self {
            valid: true,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            data: None,
            errors,
        }
    }
}

/// Validates candidate configuration trees.
pub trait SchemaValidator: Send + Sync {
    /// Validate a complete candidate tree.
    fn validate(&self, candidate: &Value) -> ValidationOutcome;

    /// Validate a single top-level section.
    ///
    /// Returns `None` when no sub-schema is declared for `section`.
    fn validate_section(&self, section: &str, value: &Value) -> Option<ValidationOutcome> {
        let _ = (section, value);
        None
    }
}

/// Accepts every tree unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, candidate: &Value) -> ValidationOutcome {
        ValidationOutcome::success(candidate.clone())
    }
}
