//! Structural change detection between configuration trees.

use serde::Serialize;
use serde_json::Value;

/// How a leaf changed between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// A single changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// List changed paths from `old` to `new`, sorted by path.
///
/// Objects are compared key by key; any other value (arrays included) is
/// compared as a whole.
pub fn diff(old: &Value, new: &Value) -> Vec<ConfigChange> {
    let mut changes = Vec::new();
    diff_into(old, new, "", &mut changes);
    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}

fn diff_into(old: &Value, new: &Value, prefix: &str, out: &mut Vec<ConfigChange>) {
    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, old_value) in old_map {
                let path = join(prefix, key);
                match new_map.get(key) {
                    Some(new_value) => diff_into(old_value, new_value, &path, out),
                    None => out.push(ConfigChange {
                        path,
                        kind: ChangeKind::Removed,
                    }),
                }
            }
            for key in new_map.keys().filter(|key| !old_map.contains_key(*key)) {
                out.push(ConfigChange {
                    path: join(prefix, key),
                    kind: ChangeKind::Added,
                });
            }
        }
        (old, new) if old != new => out.push(ConfigChange {
            path: prefix.to_string(),
            kind: ChangeKind::Modified,
        }),
        _ => {}
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identical_trees_have_no_changes() {
        let tree = json!({"a": {"b": [1, 2]}});
        assert!(diff(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn test_reports_added_removed_and_modified_leaves() {
        let old = json!({"app": {"port": 3000, "name": "svc"}, "debug": true});
        let new = json!({"app": {"port": 4000}, "logging": {"level": "info"}, "debug": true});

        let changes = diff(&old, &new);

        assert_eq!(
            changes,
            vec![
                ConfigChange {
                    path: "app.name".into(),
                    kind: ChangeKind::Removed
                },
                ConfigChange {
                    path: "app.port".into(),
                    kind: ChangeKind::Modified
                },
                ConfigChange {
                    path: "logging".into(),
                    kind: ChangeKind::Added
                },
            ]
        );
    }
}
