//! engine::merge
//!
//! Deep merge of metadata structures with overlays.
//!
//! # Semantics
//!
//! - Two mappings merge key by key, recursively
//! - Any other combination: the overlay value replaces the base value
//! - Sequences (e.g. `groups`) are replaced wholesale, never concatenated
//!   or merged by index
//!
//! Merging with an empty mapping returns the base unchanged.
//!
//! # Example
//!
//! ```
//! use serialmeta::engine::merge::deep_merge;
//!
//! let base: serde_yaml::Value =
//!     serde_yaml::from_str("properties: {a: {type: string}}").unwrap();
//! let overlay: serde_yaml::Value =
//!     serde_yaml::from_str("properties: {a: {read_only: true}, b: {type: int}}").unwrap();
//! let expected: serde_yaml::Value = serde_yaml::from_str(
//!     "properties: {a: {type: string, read_only: true}, b: {type: int}}",
//! )
//! .unwrap();
//!
//! assert_eq!(deep_merge(base, overlay), expected);
//! ```

use serde_yaml::Value;

/// Merge `overlay` into `base`; overlay wins on conflicts.
pub fn deep_merge(mut base: Value, overlay: Value) -> Value {
    merge_into(&mut base, overlay);
    base
}

/// In-place variant of [`deep_merge`].
pub fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => merge_into(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn overlay_adds_and_overrides() {
        let merged = deep_merge(
            yaml("properties: {a: {type: string}}"),
            yaml("properties: {a: {read_only: true}, b: {type: int}}"),
        );
        assert_eq!(
            merged,
            yaml("properties: {a: {type: string, read_only: true}, b: {type: int}}")
        );
    }

    #[test]
    fn overlay_scalar_wins() {
        let merged = deep_merge(
            yaml("properties: {a: {type: string, read_only: false}}"),
            yaml("properties: {a: {read_only: true}}"),
        );
        assert_eq!(merged, yaml("properties: {a: {type: string, read_only: true}}"));
    }

    #[test]
    fn sequences_are_replaced() {
        let merged = deep_merge(
            yaml("properties: {a: {groups: [list, detail, admin]}}"),
            yaml("properties: {a: {groups: [public]}}"),
        );
        assert_eq!(merged, yaml("properties: {a: {groups: [public]}}"));
    }

    #[test]
    fn empty_overlay_is_identity() {
        let base = yaml("properties: {a: {type: string}}\nvirtual_properties: {}");
        assert_eq!(deep_merge(base.clone(), yaml("{}")), base);
    }

    #[test]
    fn mapping_replaces_scalar_and_vice_versa() {
        assert_eq!(deep_merge(yaml("a: 1"), yaml("a: {b: 2}")), yaml("a: {b: 2}"));
        assert_eq!(deep_merge(yaml("a: {b: 2}"), yaml("a: 1")), yaml("a: 1"));
    }

    #[test]
    fn explicit_null_replaces() {
        assert_eq!(deep_merge(yaml("a: 1"), yaml("a: ~")), yaml("a: ~"));
    }

    #[test]
    fn unknown_keys_survive() {
        let merged = deep_merge(
            yaml("properties: {a: {type: string}}"),
            yaml("properties: {a: {accessor: {getter: fetchA}}}\nxml_root_name: article"),
        );
        assert_eq!(
            merged,
            yaml(
                "properties: {a: {type: string, accessor: {getter: fetchA}}}\nxml_root_name: article"
            )
        );
    }

    #[test]
    fn base_key_order_is_kept() {
        let merged = deep_merge(yaml("{z: 1, a: 2}"), yaml("{m: 3, z: 4}"));
        let keys: Vec<_> = merged
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
