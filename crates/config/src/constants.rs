//! Centralized constants for the envstack workspace.
//!
//! This module contains default values used across crates to avoid
//! magic string duplication and improve maintainability.

use std::time::Duration;

// =============================================================================
// Environment Resolution
// =============================================================================

/// Process environment variable consulted when no environment is given explicitly.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Environment used when neither an explicit nor a resolved environment matches a profile.
pub const FALLBACK_ENVIRONMENT: &str = "development";

/// Built-in environment names.
pub const DEVELOPMENT: &str = "development";
pub const STAGING: &str = "staging";
pub const PRODUCTION: &str = "production";
pub const TEST: &str = "test";

// =============================================================================
// Redaction & Export
// =============================================================================

/// Marker written in place of sensitive values.
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// Configuration paths holding secrets or credentials.
pub const SENSITIVE_PATHS: &[&str] = &[
    "database.url",
    "cache.redis.url",
    "auth.jwt.secret",
    "auth.session.secret",
    "security.encryption.key",
    "billing.stripe.secretKey",
    "billing.stripe.webhookSecret",
    "email.smtp.password",
];

/// Operational fields emitted by the `.env` export, in output order.
pub const ENV_EXPORT_VARS: &[&str] = &[
    "NODE_ENV",
    "APP_NAME",
    "APP_URL",
    "PORT",
    "HOST",
    "LOG_LEVEL",
    "DATABASE_URL",
    "REDIS_URL",
    "CORS_ENABLED",
    "CORS_ORIGINS",
    "RATE_LIMIT_ENABLED",
];

// =============================================================================
// Secret Retrieval
// =============================================================================

/// How long a resolved secret stays in the secret manager cache.
pub const DEFAULT_SECRET_CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of secrets held in the secret manager cache.
pub const DEFAULT_SECRET_CACHE_CAPACITY: u64 = 256;

/// Service name used for keyring-backed secrets.
pub const KEYRING_SERVICE: &str = "envstack";
