//! Layer merging for loader configuration values.
//!
//! - Objects: merged key by key, recursively
//! - Arrays: replaced by the overlay
//! - Scalars: overlay wins

use serde_json::Value;

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

/// Merge layers in order; later layers take precedence.
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = Value::Null;
    for layer in layers {
        deep_merge(&mut merged, layer);
    }
    merged
}
