//! Nested configuration trees.
//!
//! Responsibilities:
//! - Dotted-path access and assignment (`path`).
//! - Right-biased deep merge of trees (`merge`).
//! - Structural change detection between two trees (`diff`).
//!
//! Does NOT handle:
//! - Validation of tree contents (see `schema`).
//! - Parsing raw environment values (see `coerce`).
//!
//! Invariants:
//! - A configuration tree is a `serde_json::Value` whose root is an object.
//! - `merge` and `diff` never mutate their inputs.

mod diff;
mod merge;
mod path;

use serde_json::{Map, Value};

pub use diff::{ChangeKind, ConfigChange, diff};
pub use merge::{merge, merge_all};
pub use path::{PathMapper, get_path, remove_path, set_path};

/// A nested configuration tree.
pub type ConfigTree = Value;

/// An empty tree (`{}`).
pub fn empty_tree() -> ConfigTree {
    Value::Object(Map::new())
}
