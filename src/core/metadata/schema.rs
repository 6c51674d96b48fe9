//! core::metadata::schema
//!
//! Serializer metadata records.
//!
//! # Schema Design
//!
//! - Absent fields are omitted, never defaulted: a merge must be able to
//!   tell "not specified" apart from "specified as false/empty"
//! - Field names are the serializer's snake_case keys (`read_only`,
//!   `serialized_name`, ...)
//! - Strict parsing: unknown fields are rejected
//!
//! # Example
//!
//! ```
//! use serialmeta::core::metadata::schema::{ClassMetadata, PropertyMetadata};
//!
//! let mut meta = ClassMetadata::default();
//! meta.properties.insert(
//!     "title".to_string(),
//!     PropertyMetadata {
//!         serialized_name: Some("headline".to_string()),
//!         ..Default::default()
//!     },
//! );
//!
//! let yaml = serde_yaml::to_string(&meta).unwrap();
//! assert!(yaml.contains("serialized_name: headline"));
//! assert!(!yaml.contains("read_only"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from metadata schema conversion.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The metadata could not be converted to a YAML value.
    #[error("failed to convert metadata: {0}")]
    Convert(String),
}

/// Serialization metadata of one declared property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyMetadata {
    /// Serialization groups the property belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,

    /// Canonical type signature. Never an empty string.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,

    /// Conditional exclusion expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_if: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_name: Option<String>,
}

impl PropertyMetadata {
    /// Whether a type signature is already known.
    pub fn has_type(&self) -> bool {
        self.type_signature.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Set the type signature, ignoring empty signatures.
    pub fn set_type(&mut self, signature: impl Into<String>) {
        let signature = signature.into();
        if !signature.is_empty() {
            self.type_signature = Some(signature);
        }
    }

    /// Whether no field is specified.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Serialization metadata of a virtual property (a computed accessor).
///
/// Keyed by the accessor's method name in [`ClassMetadata`], so two
/// methods deriving the same property name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VirtualPropertyMetadata {
    /// Effective property name.
    pub name: String,

    pub serialized_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_if: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

impl VirtualPropertyMetadata {
    /// Build a record for `name` from an annotation fragment.
    ///
    /// `name` and `serialized_name` default to the effective property
    /// name. A rename in the fragment still overrides `serialized_name`.
    pub fn from_fragment(name: impl Into<String>, fragment: PropertyMetadata) -> Self {
        let name = name.into();
        Self {
            serialized_name: fragment.serialized_name.unwrap_or_else(|| name.clone()),
            name,
            groups: fragment.groups,
            type_signature: fragment.type_signature,
            read_only: fragment.read_only,
            exclude: fragment.exclude,
            exclude_if: fragment.exclude_if,
            max_depth: fragment.max_depth,
        }
    }
}

/// Metadata for one class: its own properties and virtual properties.
///
/// Inherited members are never included; every class in a hierarchy
/// gets its own record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassMetadata {
    /// Property records keyed by property name.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyMetadata>,

    /// Virtual property records keyed by accessor method name.
    #[serde(default)]
    pub virtual_properties: BTreeMap<String, VirtualPropertyMetadata>,
}

impl ClassMetadata {
    /// Convert into a YAML value for merging with overlays.
    pub fn to_value(&self) -> Result<serde_yaml::Value, SchemaError> {
        serde_yaml::to_value(self).map_err(|e| SchemaError::Convert(e.to_string()))
    }

    /// Whether the class declares nothing serializable.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.virtual_properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted() {
        let meta = PropertyMetadata {
            read_only: Some(false),
            ..Default::default()
        };
        let value = serde_yaml::to_value(&meta).unwrap();
        let mapping = value.as_mapping().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("read_only"), Some(&serde_yaml::Value::Bool(false)));
    }

    #[test]
    fn type_key_is_named_type() {
        let meta = PropertyMetadata {
            type_signature: Some("int".to_string()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&meta).unwrap();
        assert_eq!(yaml.trim(), "type: int");
    }

    #[test]
    fn set_type_ignores_empty() {
        let mut meta = PropertyMetadata::default();
        meta.set_type("");
        assert!(meta.type_signature.is_none());
        assert!(!meta.has_type());
        meta.set_type("string");
        assert!(meta.has_type());
    }

    #[test]
    fn virtual_defaults_serialized_name() {
        let record = VirtualPropertyMetadata::from_fragment("active", PropertyMetadata::default());
        assert_eq!(record.name, "active");
        assert_eq!(record.serialized_name, "active");
    }

    #[test]
    fn virtual_rename_overrides_serialized_name() {
        let fragment = PropertyMetadata {
            serialized_name: Some("is_active".to_string()),
            groups: Some(vec!["list".to_string()]),
            ..Default::default()
        };
        let record = VirtualPropertyMetadata::from_fragment("active", fragment);
        assert_eq!(record.name, "active");
        assert_eq!(record.serialized_name, "is_active");
        assert_eq!(record.groups, Some(vec!["list".to_string()]));
    }

    #[test]
    fn class_metadata_always_has_both_sections() {
        let value = ClassMetadata::default().to_value().unwrap();
        let mapping = value.as_mapping().unwrap();
        assert!(mapping.contains_key("properties"));
        assert!(mapping.contains_key("virtual_properties"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<PropertyMetadata, _> = serde_yaml::from_str("colour: red");
        assert!(result.is_err());
    }

    #[test]
    fn roundtrip() {
        let mut meta = ClassMetadata::default();
        meta.properties.insert(
            "rating".to_string(),
            PropertyMetadata {
                type_signature: Some("float".to_string()),
                max_depth: Some(2),
                ..Default::default()
            },
        );
        meta.virtual_properties.insert(
            "getFullName".to_string(),
            VirtualPropertyMetadata::from_fragment("fullName", PropertyMetadata::default()),
        );

        let yaml = serde_yaml::to_string(&meta).unwrap();
        let parsed: ClassMetadata = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(meta, parsed);
    }
}
