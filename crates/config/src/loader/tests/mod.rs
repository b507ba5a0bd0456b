//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test profile loading, overlay precedence and coercion.
//! - Test caching of clean results.
//! - Test missing-variable detection, secret lookup and validation diagnostics.
//! - Test environment resolution from the process environment.
//!
//! Does NOT handle:
//! - Coercion details per kind (tested in coerce.rs).
//! - Schema rule semantics (tested in schema/rules.rs).
//!
//! Invariants:
//! - Tests that touch process environment variables use `serial_test` and `temp_env`.
//! - Tests use `global_test_lock()` for additional synchronization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::schema::{Schema, SchemaValidator, ValidationOutcome, application_schema};

pub mod env_tests;
pub mod profile_tests;
pub mod secret_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Application schema that counts how often it is asked to validate.
pub struct CountingValidator {
    inner: Schema,
    calls: Arc<AtomicUsize>,
}

impl CountingValidator {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let validator = Self {
            inner: application_schema(),
            calls: Arc::clone(&calls),
        };
        (validator, calls)
    }
}

impl SchemaValidator for CountingValidator {
    fn validate(&self, candidate: &Value) -> ValidationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.validate(candidate)
    }
}

/// Secrets that satisfy the production profile's required variables.
pub fn production_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        ("DATABASE_URL", "postgresql://db.internal:5432/app"),
        ("JWT_SECRET", "production-jwt-secret-0123456789abcdef"),
        ("SESSION_SECRET", "production-session-secret-0123456789ab"),
    ]
}
