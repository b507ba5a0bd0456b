//! Dotted-path access and environment variable path mapping.
//!
//! Invariants:
//! - `set_path` replaces non-object intermediate segments with fresh objects.
//! - Variables without a mapping are never written into a tree.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::empty_tree;

/// Built-in mapping from environment variable names to configuration paths.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("NODE_ENV", "env.NODE_ENV"),
    ("APP_NAME", "app.name"),
    ("APP_URL", "app.url"),
    ("PORT", "app.port"),
    ("HOST", "app.host"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
    ("DATABASE_URL", "database.url"),
    ("DATABASE_POOL_MIN", "database.pool.min"),
    ("DATABASE_POOL_MAX", "database.pool.max"),
    ("DATABASE_SSL", "database.ssl"),
    ("REDIS_URL", "cache.redis.url"),
    ("CACHE_TTL", "cache.ttl"),
    ("JWT_SECRET", "auth.jwt.secret"),
    ("JWT_EXPIRES_IN", "auth.jwt.expiresIn"),
    ("SESSION_SECRET", "auth.session.secret"),
    ("CORS_ENABLED", "security.cors.enabled"),
    ("CORS_ORIGINS", "security.cors.origins"),
    ("RATE_LIMIT_ENABLED", "security.rateLimit.enabled"),
    ("RATE_LIMIT_MAX", "security.rateLimit.max"),
    ("RATE_LIMIT_WINDOW_MS", "security.rateLimit.windowMs"),
    ("ENCRYPTION_KEY", "security.encryption.key"),
    ("STRIPE_SECRET_KEY", "billing.stripe.secretKey"),
    ("STRIPE_WEBHOOK_SECRET", "billing.stripe.webhookSecret"),
    ("SMTP_HOST", "email.smtp.host"),
    ("SMTP_PORT", "email.smtp.port"),
    ("SMTP_USER", "email.smtp.user"),
    ("SMTP_PASSWORD", "email.smtp.password"),
    ("EMAIL_FROM", "email.from"),
    ("FEATURE_SIGNUP", "features.signup"),
    ("FEATURE_BILLING", "features.billing"),
    ("MAINTENANCE_MODE", "features.maintenanceMode"),
];

/// Read the value at a dotted path.
pub fn get_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))
}

/// Write `value` at a dotted path, creating intermediate objects as needed.
///
/// A root that is not an object is replaced by an empty object first.
pub fn set_path(tree: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut node = tree;
    for segment in parents {
        node = as_object_or_reset(node)
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    as_object_or_reset(node).insert(leaf.to_string(), value);
}

fn as_object_or_reset(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just normalized to an object"),
    }
}

/// Remove and return the value at a dotted path.
pub fn remove_path(tree: &mut Value, path: &str) -> Option<Value> {
    let (parent, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    };

    let parent_node = match parent {
        Some(parent) => parent
            .split('.')
            .try_fold(tree, |node, segment| node.as_object_mut()?.get_mut(segment))?,
        None => tree,
    };

    parent_node.as_object_mut()?.remove(leaf)
}

/// Table from environment variable names to dotted configuration paths.
#[derive(Debug, Clone)]
pub struct PathMapper {
    mappings: BTreeMap<String, String>,
}

impl Default for PathMapper {
    fn default() -> Self {
        Self::from_mappings(DEFAULT_MAPPINGS.iter().copied())
    }
}

impl PathMapper {
    /// A mapper with no entries.
    pub fn empty() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    pub fn from_mappings<I, K, V>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mappings: mappings
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        }
    }

    /// Add or replace a mapping.
    pub fn with_mapping(mut self, env_name: impl Into<String>, path: impl Into<String>) -> Self {
        self.mappings.insert(env_name.into(), path.into());
        self
    }

    pub fn path_for(&self, env_name: &str) -> Option<&str> {
        self.mappings.get(env_name).map(String::as_str)
    }

    /// Reverse lookup: the variable that feeds `path`.
    pub fn env_name_for(&self, path: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|(_, mapped)| mapped.as_str() == path)
            .map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, env_name: &str) -> bool {
        self.mappings.contains_key(env_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    /// Build an overlay tree from already-coerced variables.
    ///
    /// Variables without a mapping are skipped.
    pub fn map_env<'a, I>(&self, values: I) -> Value
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut tree = empty_tree();
        for (name, value) in values {
            if let Some(path) = self.path_for(name) {
                set_path(&mut tree, path, value);
            }
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_path_creates_intermediate_objects() {
        let mut tree = json!({});
        set_path(&mut tree, "database.pool.max", json!(10));
        assert_eq!(tree, json!({"database": {"pool": {"max": 10}}}));
    }

    #[test]
    fn test_set_path_overwrites_scalar_intermediate() {
        let mut tree = json!({"database": "postgres://old"});
        set_path(&mut tree, "database.url", json!("postgres://new"));
        assert_eq!(tree, json!({"database": {"url": "postgres://new"}}));
    }

    #[test]
    fn test_set_path_overwrites_array_intermediate() {
        let mut tree = json!({"security": {"cors": ["x"]}});
        set_path(&mut tree, "security.cors.enabled", json!(true));
        assert_eq!(tree, json!({"security": {"cors": {"enabled": true}}}));
    }

    #[test]
    fn test_set_path_keeps_siblings() {
        let mut tree = json!({"app": {"name": "svc", "port": 1}});
        set_path(&mut tree, "app.port", json!(2));
        assert_eq!(tree, json!({"app": {"name": "svc", "port": 2}}));
    }

    #[test]
    fn test_get_path() {
        let tree = json!({"auth": {"jwt": {"secret": "s"}}, "port": 3});
        assert_eq!(get_path(&tree, "auth.jwt.secret"), Some(&json!("s")));
        assert_eq!(get_path(&tree, "auth.jwt.missing"), None);
        assert_eq!(get_path(&tree, "port.deeper"), None);
        assert_eq!(get_path(&tree, "port"), Some(&json!(3)));
    }

    #[test]
    fn test_remove_path() {
        let mut tree = json!({"a": {"b": 1, "c": 2}});
        assert_eq!(remove_path(&mut tree, "a.b"), Some(json!(1)));
        assert_eq!(tree, json!({"a": {"c": 2}}));
        assert_eq!(remove_path(&mut tree, "a.zzz.q"), None);
    }

    #[test]
    fn test_map_env_ignores_unknown_variables() {
        let mapper = PathMapper::default();
        let tree = mapper.map_env([
            ("DATABASE_URL", json!("postgres://db")),
            ("SOME_UNRELATED_VAR", json!("ignored")),
        ]);
        assert_eq!(tree, json!({"database": {"url": "postgres://db"}}));
    }

    #[test]
    fn test_custom_mapping_and_reverse_lookup() {
        let mapper = PathMapper::empty().with_mapping("QUEUE_URL", "queue.url");
        assert_eq!(mapper.path_for("QUEUE_URL"), Some("queue.url"));
        assert_eq!(mapper.env_name_for("queue.url"), Some("QUEUE_URL"));
        assert!(!mapper.contains("DATABASE_URL"));
    }
}
