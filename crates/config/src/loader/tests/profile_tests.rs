//! Loading custom profiles with custom mappings and validators.

use serde_json::json;

use crate::coerce::{EnvVarDefinition, EnvVarKind};
use crate::loader::{ConfigLoader, LoadOptions};
use crate::profile::{ConfigProfile, ProfileRegistry};
use crate::schema::AcceptAll;
use crate::tree::PathMapper;

fn worker_loader() -> ConfigLoader {
    let mut registry = ProfileRegistry::new();
    registry.register_profile(
        ConfigProfile::new("worker")
            .with_defaults(json!({"queue": {"name": "jobs", "concurrency": 4}}))
            .with_env_var_default("QUEUE_NAME", "jobs-default")
            .with_definition(
                EnvVarDefinition::new("QUEUE_CONCURRENCY", EnvVarKind::Number).with_default(8),
            )
            .with_definition(EnvVarDefinition::new("QUEUE_TAGS", EnvVarKind::Array)),
    );

    ConfigLoader::new()
        .with_registry(registry)
        .with_validator(AcceptAll)
        .with_path_mapper(
            PathMapper::empty()
                .with_mapping("QUEUE_NAME", "queue.name")
                .with_mapping("QUEUE_CONCURRENCY", "queue.concurrency")
                .with_mapping("QUEUE_TAGS", "queue.tags")
                .with_mapping("QUEUE_RETRY", "queue.retry"),
        )
}

#[test]
fn test_env_var_defaults_and_definition_defaults_apply() {
    let result = worker_loader()
        .load(&LoadOptions::new().with_environment("worker"))
        .unwrap();

    assert!(result.is_valid());
    assert_eq!(
        *result.config,
        json!({"queue": {"name": "jobs-default", "concurrency": 8}})
    );
}

#[test]
fn test_supplied_values_and_inferred_types() {
    let result = worker_loader()
        .load(
            &LoadOptions::new()
                .with_environment("worker")
                .with_env_var("QUEUE_CONCURRENCY", "16")
                .with_env_var("QUEUE_TAGS", "email,sms")
                // No definition: inferred from the raw text
                .with_env_var("QUEUE_RETRY", "{\"max\": 3}"),
        )
        .unwrap();

    assert_eq!(result.config["queue"]["concurrency"], json!(16));
    assert_eq!(result.config["queue"]["tags"], json!(["email", "sms"]));
    assert_eq!(result.config["queue"]["retry"], json!({"max": 3}));
}

#[test]
fn test_builtin_environments_absent_from_custom_registry() {
    let loader = worker_loader();
    assert!(loader.registry().contains("worker"));
    assert!(!loader.registry().contains("development"));
}
