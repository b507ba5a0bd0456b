//! Right-biased deep merge.
//!
//! Objects merge key by key; arrays and scalars from the overlay replace the
//! base value wholesale. `Null` overlay values are skipped.

use serde_json::Value;

/// Merge `overlay` on top of `base`, returning a new tree.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// Fold `layers` left to right; later layers win.
pub fn merge_all<'a, I>(layers: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = super::empty_tree();
    for layer in layers {
        merge_into(&mut merged, layer);
    }
    merged
}

fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    continue;
                }
                let both_objects =
                    value.is_object() && base_map.get(key).is_some_and(Value::is_object);
                if both_objects {
                    if let Some(existing) = base_map.get_mut(key) {
                        merge_into(existing, value);
                    }
                } else {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        (_, Value::Null) => {}
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}
