//! Built-in secret providers.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use secrecy::SecretString;

use super::{SecretError, SecretProvider};
use crate::constants::KEYRING_SERVICE;
use crate::loader::env_var_or_none;

/// Reads secrets from process environment variables, optionally prefixed.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider {
    prefix: Option<String>,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `{prefix}{name}` instead of `name`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl SecretProvider for EnvSecretProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn get_secret(&self, key: &str) -> Result<Option<SecretString>, SecretError> {
        let var = match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        };
        Ok(env_var_or_none(&var).map(|value| SecretString::new(value.into())))
    }
}

/// Reads one secret per file from a directory (e.g. mounted container secrets).
#[derive(Debug, Clone)]
pub struct FileSecretProvider {
    dir: PathBuf,
}

impl FileSecretProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SecretProvider for FileSecretProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn get_secret(&self, key: &str) -> Result<Option<SecretString>, SecretError> {
        // Keys are plain names; anything path-like would escape the directory.
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Ok(None);
        }

        match std::fs::read_to_string(self.dir.join(key)) {
            Ok(contents) => {
                let value = contents.trim_end_matches(['\n', '\r']);
                if value.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::new(value.into())))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SecretError::Io(e)),
        }
    }
}

/// Reads secrets from the system keyring.
#[derive(Debug, Clone)]
pub struct KeyringSecretProvider {
    service: String,
}

impl Default for KeyringSecretProvider {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE)
    }
}

impl KeyringSecretProvider {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl SecretProvider for KeyringSecretProvider {
    fn name(&self) -> &str {
        "keyring"
    }

    fn get_secret(&self, key: &str) -> Result<Option<SecretString>, SecretError> {
        let entry = keyring::Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(SecretString::new(password.into()))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SecretError::Keyring(e)),
        }
    }
}

/// In-memory secrets, for tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    secrets: BTreeMap<String, SecretString>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.secrets.insert(name.into(), SecretString::new(value.into()));
        self
    }
}

impl SecretProvider for StaticSecretProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn get_secret(&self, key: &str) -> Result<Option<SecretString>, SecretError> {
        Ok(self.secrets.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_env_provider_with_prefix() {
        temp_env::with_vars([("_ENVSTACK_SECRET_TOKEN", Some("abc"))], || {
            let provider = EnvSecretProvider::with_prefix("_ENVSTACK_SECRET_");
            let secret = provider.get_secret("TOKEN").unwrap().unwrap();
            assert_eq!(secret.expose_secret(), "abc");
            assert!(provider.get_secret("OTHER").unwrap().is_none());
        });
    }

    #[test]
    fn test_file_provider_trims_trailing_newline() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("JWT_SECRET"), "file-secret\n").unwrap();

        let provider = FileSecretProvider::new(dir.path());
        let secret = provider.get_secret("JWT_SECRET").unwrap().unwrap();
        assert_eq!(secret.expose_secret(), "file-secret");
        assert!(provider.get_secret("MISSING").unwrap().is_none());
    }

    #[test]
    fn test_file_provider_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let provider = FileSecretProvider::new(dir.path());
        assert!(provider.get_secret("../etc/passwd").unwrap().is_none());
        assert!(provider.get_secret(".hidden").unwrap().is_none());
    }
}
