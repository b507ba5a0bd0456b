//! Secret manager consultation for variables the caller did not supply.

use secrecy::SecretString;
use serde_json::json;

use crate::coerce::{EnvVarDefinition, EnvVarKind};
use crate::loader::{ConfigLoader, LoadOptions};
use crate::profile::{ConfigProfile, ProfileRegistry};
use crate::schema::AcceptAll;
use crate::secrets::{SecretError, SecretManager, SecretProvider, StaticSecretProvider};

fn vault() -> StaticSecretProvider {
    StaticSecretProvider::new()
        .with_secret("DATABASE_URL", "postgresql://vault-db:5432/app")
        .with_secret("JWT_SECRET", "vault-jwt-secret-0123456789abcdefghij")
        .with_secret("SESSION_SECRET", "vault-session-secret-0123456789abcdef")
}

#[test]
fn test_missing_required_vars_resolve_through_secret_manager() {
    let loader =
        ConfigLoader::new().with_secret_manager(SecretManager::new().with_provider(vault()));
    let result = loader
        .load(&LoadOptions::new().with_environment("production"))
        .unwrap();

    assert!(result.is_valid(), "diagnostics: {:?}", result.validation_errors);
    assert_eq!(
        result.config["database"]["url"],
        json!("postgresql://vault-db:5432/app")
    );
    assert_eq!(
        result.config["auth"]["session"]["secret"],
        json!("vault-session-secret-0123456789abcdef")
    );
}

#[test]
fn test_supplied_value_wins_over_secret_manager() {
    let loader =
        ConfigLoader::new().with_secret_manager(SecretManager::new().with_provider(vault()));
    let result = loader
        .load(
            &LoadOptions::new()
                .with_environment("production")
                .with_env_var("DATABASE_URL", "postgresql://supplied:5432/app"),
        )
        .unwrap();

    assert_eq!(
        result.config["database"]["url"],
        json!("postgresql://supplied:5432/app")
    );
}

struct Unreachable;

impl SecretProvider for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn get_secret(&self, _key: &str) -> Result<Option<SecretString>, SecretError> {
        Err(SecretError::Provider {
            provider: "unreachable".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

#[test]
fn test_failing_secret_manager_leaves_vars_missing() {
    let loader =
        ConfigLoader::new().with_secret_manager(SecretManager::new().with_provider(Unreachable));
    let result = loader
        .load(&LoadOptions::new().with_environment("staging"))
        .unwrap();

    assert_eq!(result.missing_env_vars, vec!["DATABASE_URL", "JWT_SECRET"]);
}

fn billing_profile() -> ProfileRegistry {
    let mut registry = ProfileRegistry::new();
    registry.register_profile(
        ConfigProfile::new("billing")
            .with_env_var_default("STRIPE_SECRET_KEY", "sk_placeholder")
            .with_definition(
                EnvVarDefinition::new("SMTP_PASSWORD", EnvVarKind::String)
                    .with_default("smtp-placeholder"),
            ),
    );
    registry
}

#[test]
fn test_secret_wins_over_profile_defaults() {
    let vault = StaticSecretProvider::new()
        .with_secret("STRIPE_SECRET_KEY", "sk_live_from_vault")
        .with_secret("SMTP_PASSWORD", "smtp-from-vault");
    let loader = ConfigLoader::new()
        .with_registry(billing_profile())
        .with_validator(AcceptAll)
        .with_secret_manager(SecretManager::new().with_provider(vault));

    let result = loader
        .load(&LoadOptions::new().with_environment("billing"))
        .unwrap();

    assert_eq!(
        result.config["billing"]["stripe"]["secretKey"],
        json!("sk_live_from_vault")
    );
    assert_eq!(result.config["email"]["smtp"]["password"], json!("smtp-from-vault"));
}

#[test]
fn test_failed_secret_lookup_falls_back_to_defaults() {
    let loader = ConfigLoader::new()
        .with_registry(billing_profile())
        .with_validator(AcceptAll)
        .with_secret_manager(SecretManager::new().with_provider(Unreachable));

    let result = loader
        .load(&LoadOptions::new().with_environment("billing"))
        .unwrap();

    assert_eq!(
        result.config["billing"]["stripe"]["secretKey"],
        json!("sk_placeholder")
    );
    assert_eq!(result.config["email"]["smtp"]["password"], json!("smtp-placeholder"));
}

#[test]
fn test_blank_supplied_value_defers_to_secret() {
    let loader =
        ConfigLoader::new().with_secret_manager(SecretManager::new().with_provider(vault()));
    let result = loader
        .load(
            &LoadOptions::new()
                .with_environment("production")
                .with_env_var("JWT_SECRET", "  "),
        )
        .unwrap();

    assert!(result.missing_env_vars.is_empty());
    assert_eq!(
        result.config["auth"]["jwt"]["secret"],
        json!("vault-jwt-secret-0123456789abcdefghij")
    );
}
