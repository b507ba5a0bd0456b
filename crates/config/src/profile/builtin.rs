//! Built-in environment profiles.

use serde_json::{Value, json};

use super::ConfigProfile;
use crate::coerce::{EnvVarDefinition, EnvVarKind};
use crate::constants::{DEVELOPMENT, PRODUCTION, STAGING, TEST};

fn port_in_range(value: &Value) -> Result<(), String> {
    match value.as_i64() {
        Some(port) if (1..=65535).contains(&port) => Ok(()),
        _ => Err("must be an integer between 1 and 65535".to_string()),
    }
}

/// Typed definitions shared by every built-in profile.
fn common_definitions() -> Vec<EnvVarDefinition> {
    vec![
        EnvVarDefinition::new("NODE_ENV", EnvVarKind::String)
            .with_description("Runtime environment name"),
        EnvVarDefinition::new("APP_NAME", EnvVarKind::String).with_description("Application name"),
        EnvVarDefinition::new("APP_URL", EnvVarKind::String)
            .with_description("Public base URL of the application"),
        EnvVarDefinition::new("PORT", EnvVarKind::Number)
            .with_description("HTTP listen port")
            .with_validator(port_in_range),
        EnvVarDefinition::new("HOST", EnvVarKind::String).with_description("HTTP listen address"),
        EnvVarDefinition::new("LOG_LEVEL", EnvVarKind::String)
            .with_description("One of error, warn, info, debug, trace"),
        EnvVarDefinition::new("DATABASE_URL", EnvVarKind::String)
            .with_description("Database connection string"),
        EnvVarDefinition::new("DATABASE_POOL_MIN", EnvVarKind::Number),
        EnvVarDefinition::new("DATABASE_POOL_MAX", EnvVarKind::Number),
        EnvVarDefinition::new("DATABASE_SSL", EnvVarKind::Boolean),
        EnvVarDefinition::new("REDIS_URL", EnvVarKind::String).with_description("Redis connection string"),
        EnvVarDefinition::new("JWT_SECRET", EnvVarKind::String)
            .with_description("Token signing secret, at least 32 characters"),
        EnvVarDefinition::new("JWT_EXPIRES_IN", EnvVarKind::String),
        EnvVarDefinition::new("SESSION_SECRET", EnvVarKind::String)
            .with_description("Session cookie secret, at least 32 characters"),
        EnvVarDefinition::new("CORS_ENABLED", EnvVarKind::Boolean),
        EnvVarDefinition::new("CORS_ORIGINS", EnvVarKind::Array)
            .with_description("Comma-separated list of allowed origins"),
        EnvVarDefinition::new("RATE_LIMIT_ENABLED", EnvVarKind::Boolean),
        EnvVarDefinition::new("RATE_LIMIT_MAX", EnvVarKind::Number),
        EnvVarDefinition::new("RATE_LIMIT_WINDOW_MS", EnvVarKind::Number),
        EnvVarDefinition::new("ENCRYPTION_KEY", EnvVarKind::String),
        EnvVarDefinition::new("STRIPE_SECRET_KEY", EnvVarKind::String),
        EnvVarDefinition::new("STRIPE_WEBHOOK_SECRET", EnvVarKind::String),
        EnvVarDefinition::new("SMTP_PORT", EnvVarKind::Number).with_validator(port_in_range),
        EnvVarDefinition::new("SMTP_PASSWORD", EnvVarKind::String),
        EnvVarDefinition::new("FEATURE_SIGNUP", EnvVarKind::Boolean),
        EnvVarDefinition::new("FEATURE_BILLING", EnvVarKind::Boolean),
        EnvVarDefinition::new("MAINTENANCE_MODE", EnvVarKind::Boolean),
    ]
}

fn with_common_definitions(mut profile: ConfigProfile) -> ConfigProfile {
    profile.definitions = common_definitions();
    profile
}

pub fn development_profile() -> ConfigProfile {
    with_common_definitions(
        ConfigProfile::new(DEVELOPMENT)
            .with_defaults(json!({
                "app": {
                    "name": "envstack-app",
                    "url": "http://localhost:3000",
                    "debug": true
                },
                "logging": {"level": "debug", "format": "pretty"},
                "database": {
                    "url": "postgresql://localhost:5432/app_development",
                    "pool": {"min": 1, "max": 5}
                },
                "cache": {"redis": {"url": "redis://localhost:6379"}},
                "auth": {
                    "jwt": {
                        "secret": "development-only-jwt-secret-change-me",
                        "expiresIn": "30d"
                    }
                },
                "security": {
                    "cors": {"enabled": true, "origins": ["http://localhost:3000"]},
                    "rateLimit": {"enabled": false}
                },
                "features": {"signup": true, "billing": false},
                "development": {
                    "hotReload": true,
                    "mockEmail": true,
                    "seedDatabase": true
                }
            }))
            .with_env_var_default("NODE_ENV", DEVELOPMENT)
            .with_env_var_default("PORT", "3000")
            .with_env_var_default("LOG_LEVEL", "debug"),
    )
}

pub fn staging_profile() -> ConfigProfile {
    with_common_definitions(
        ConfigProfile::new(STAGING)
            .with_defaults(json!({
                "app": {
                    "name": "envstack-app",
                    "url": "https://staging.example.com"
                },
                "logging": {"level": "info", "format": "json"},
                "database": {"pool": {"min": 2, "max": 10}, "ssl": true},
                "security": {
                    "cors": {"enabled": true, "origins": ["https://staging.example.com"]},
                    "rateLimit": {"enabled": true, "max": 200}
                },
                "features": {"signup": true, "billing": true}
            }))
            .with_env_var_default("NODE_ENV", STAGING)
            .with_env_var_default("PORT", "8080")
            .with_env_var_default("LOG_LEVEL", "info")
            .with_required_env_var("DATABASE_URL")
            .with_required_env_var("JWT_SECRET"),
    )
}

pub fn production_profile() -> ConfigProfile {
    with_common_definitions(
        ConfigProfile::new(PRODUCTION)
            .with_defaults(json!({
                "app": {
                    "name": "envstack-app",
                    "url": "https://app.example.com"
                },
                "logging": {"level": "warn", "format": "json"},
                "database": {"pool": {"min": 5, "max": 30}, "ssl": true},
                "auth": {"jwt": {"expiresIn": "1d"}},
                "security": {
                    "cors": {"enabled": true, "origins": ["https://app.example.com"]},
                    "rateLimit": {"enabled": true, "max": 100, "windowMs": 60000}
                },
                "features": {"signup": true, "billing": true}
            }))
            .with_env_var_default("NODE_ENV", PRODUCTION)
            .with_env_var_default("PORT", "8080")
            .with_env_var_default("LOG_LEVEL", "warn")
            .with_required_env_var("DATABASE_URL")
            .with_required_env_var("JWT_SECRET")
            .with_required_env_var("SESSION_SECRET"),
    )
}

pub fn test_profile() -> ConfigProfile {
    with_common_definitions(
        ConfigProfile::new(TEST)
            .with_defaults(json!({
                "app": {"name": "envstack-app-test", "url": "http://localhost:3001"},
                "logging": {"level": "error"},
                "database": {"url": "postgresql://localhost:5432/app_test", "pool": {"min": 1, "max": 2}},
                "auth": {"jwt": {"secret": "test-only-jwt-secret-not-for-real-use", "expiresIn": "1h"}},
                "security": {"cors": {"enabled": false}, "rateLimit": {"enabled": false}},
                "features": {"signup": true, "billing": false}
            }))
            .with_env_var_default("NODE_ENV", TEST)
            .with_env_var_default("PORT", "3001")
            .with_env_var_default("LOG_LEVEL", "error"),
    )
}
