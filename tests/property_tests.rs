//! Property-based tests for core domain types.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

use serialmeta::core::metadata::codec::{decode, encode, HandlerParam};
use serialmeta::core::types::ClassName;
use serialmeta::engine::merge::deep_merge;

/// Strategy for generating identifier segments.
fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

/// Strategy for generating valid fully-qualified class names.
fn class_name() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("\\"))
}

/// Strategy for list elements the codec can represent.
fn list_element() -> impl Strategy<Value = HandlerParam> {
    prop_oneof![
        Just(HandlerParam::Null),
        any::<bool>().prop_map(HandlerParam::from),
        any::<i64>().prop_map(HandlerParam::from),
        ".{0,16}".prop_map(HandlerParam::from),
    ]
}

/// Strategy for nested metadata-shaped YAML mappings.
fn metadata_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(|n| Value::from(i64::from(n))),
        "[a-z]{0,8}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,6}", 0..4)
            .prop_map(|items| Value::Sequence(items.into_iter().map(Value::from).collect())),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4).prop_map(|entries| {
            Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::from(k), v))
                    .collect::<Mapping>(),
            )
        })
    })
}

/// Strategy for top-level mappings only.
fn metadata_mapping() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z_]{1,8}", metadata_value(), 0..5).prop_map(|entries| {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (Value::from(k), v))
                .collect::<Mapping>(),
        )
    })
}

proptest! {
    /// Lists survive encode then decode unchanged.
    #[test]
    fn list_codec_roundtrip(items in prop::collection::vec(list_element(), 0..8)) {
        let value = HandlerParam::List(items);
        let encoded = encode(&value).unwrap();
        prop_assert_eq!(decode(&encoded), value);
    }

    /// Encoded lists never carry raw HTML-sensitive characters.
    #[test]
    fn encoded_lists_are_html_safe(items in prop::collection::vec(".{0,16}", 0..6)) {
        let value = HandlerParam::List(items.into_iter().map(HandlerParam::from).collect());
        let encoded = encode(&value).unwrap();
        prop_assert!(!encoded.contains(['&', '\'', '<', '>']));
    }

    /// Integers survive encode then decode unchanged.
    #[test]
    fn integer_codec_roundtrip(n in any::<i64>()) {
        let value = HandlerParam::from(n);
        prop_assert_eq!(decode(&encode(&value).unwrap()), value);
    }

    /// Text that is not JSON decodes to itself.
    #[test]
    fn non_json_text_decodes_verbatim(text in "[a-z][a-z ]{0,20}") {
        prop_assume!(!matches!(text.trim_end(), "true" | "false" | "null"));
        prop_assert_eq!(decode(&text), HandlerParam::String(text.clone()));
    }

    /// A leading namespace separator never changes the class.
    #[test]
    fn class_name_leading_separator(name in class_name()) {
        let plain = ClassName::new(name.clone()).unwrap();
        let rooted = ClassName::new(format!("\\{}", name)).unwrap();
        prop_assert_eq!(&plain, &rooted);
        prop_assert!(!plain.cache_file_stem().contains('\\'));
        prop_assert_eq!(plain.cache_file_stem().split('.').count(), name.split('\\').count());
    }

    /// Merging an empty overlay is the identity.
    #[test]
    fn merge_with_empty_is_identity(base in metadata_mapping()) {
        prop_assert_eq!(deep_merge(base.clone(), Value::Mapping(Mapping::new())), base);
    }

    /// Merging a mapping into itself is the identity.
    #[test]
    fn merge_is_idempotent(base in metadata_mapping()) {
        prop_assert_eq!(deep_merge(base.clone(), base.clone()), base);
    }

    /// Every top-level overlay key ends up in the result, and non-mapping
    /// overlay values win outright.
    #[test]
    fn overlay_keys_win(base in metadata_mapping(), overlay in metadata_mapping()) {
        let merged = deep_merge(base, overlay.clone());
        let merged = merged.as_mapping().unwrap();
        for (key, value) in overlay.as_mapping().unwrap() {
            prop_assert!(merged.contains_key(key));
            if !value.is_mapping() {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }
}
