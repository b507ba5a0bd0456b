//! Environment resolution from the process environment.

use serial_test::serial;

use super::env_lock;
use crate::constants::ENVIRONMENT_VAR;
use crate::error::ConfigError;
use crate::loader::{ConfigLoader, LoadOptions};

#[test]
#[serial]
fn test_app_env_selects_registered_environment() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([(ENVIRONMENT_VAR, Some("test"))], || {
        let loader = ConfigLoader::new();
        assert_eq!(loader.resolve_environment(None), "test");

        let result = loader.load(&LoadOptions::new()).unwrap();
        assert_eq!(result.environment, "test");
        assert_eq!(result.config["env"]["NODE_ENV"], "test");
    });
}

#[test]
#[serial]
fn test_unrecognized_app_env_falls_back_to_development() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([(ENVIRONMENT_VAR, Some("qa"))], || {
        let loader = ConfigLoader::new();
        let result = loader.load(&LoadOptions::new()).unwrap();
        assert_eq!(result.environment, "development");
    });
}

#[test]
#[serial]
fn test_environment_names_are_case_sensitive() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([(ENVIRONMENT_VAR, Some("Production"))], || {
        assert_eq!(ConfigLoader::new().resolve_environment(None), "development");
    });
}

#[test]
#[serial]
fn test_unset_or_blank_app_env_uses_fallback() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([(ENVIRONMENT_VAR, None::<&str>)], || {
        assert_eq!(ConfigLoader::new().resolve_environment(None), "development");
    });
    temp_env::with_vars([(ENVIRONMENT_VAR, Some("  "))], || {
        assert_eq!(ConfigLoader::new().resolve_environment(None), "development");
    });
}

#[test]
#[serial]
fn test_explicit_environment_wins_over_app_env() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars([(ENVIRONMENT_VAR, Some("test"))], || {
        let loader = ConfigLoader::new();
        assert_eq!(loader.resolve_environment(Some("staging")), "staging");

        // Explicit names are not rewritten by the fallback
        let err = loader
            .load(&LoadOptions::new().with_environment("qa"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(_)));
    });
}

#[test]
fn test_custom_resolver_replaces_process_lookup() {
    let loader = ConfigLoader::new().with_environment_resolver(|| Some("staging".to_string()));
    assert_eq!(loader.resolve_environment(None), "staging");
}
