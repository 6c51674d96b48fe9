//! core::metadata::annotations
//!
//! Declarative serializer annotations and their extraction into metadata
//! records.
//!
//! Annotations are already-resolved tagged variants, attached to a
//! property or method in the class registry. [`extract`] is a pure
//! function over them.
//!
//! # Example
//!
//! ```
//! use serialmeta::core::metadata::annotations::{extract, Annotation};
//!
//! let annotations = vec![
//!     Annotation::Groups { groups: vec!["list".into()] },
//!     Annotation::SerializedName { name: "headline".into() },
//! ];
//! let meta = extract(&annotations).unwrap();
//! assert_eq!(meta.serialized_name.as_deref(), Some("headline"));
//! ```

use serde::Deserialize;

use super::codec::{encode_params, CodecError, HandlerParam};
use super::schema::PropertyMetadata;

/// A declarative annotation on a property or method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Serialization group membership.
    Groups { groups: Vec<String> },

    /// Explicit type, optionally with handler parameters.
    Type {
        name: String,
        #[serde(default)]
        params: Vec<HandlerParam>,
    },

    ReadOnly {
        #[serde(default = "default_read_only")]
        read_only: bool,
    },

    /// Exclusion, conditional when `condition` is non-empty.
    Exclude {
        #[serde(default, rename = "if")]
        condition: String,
    },

    MaxDepth { depth: u32 },

    SerializedName { name: String },

    /// Marks a public method as a virtual property accessor.
    VirtualProperty {
        #[serde(default)]
        name: Option<String>,
    },

    /// Any annotation kind this crate does not understand.
    #[serde(other)]
    Unknown,
}

fn default_read_only() -> bool {
    true
}

impl Annotation {
    /// Type annotation without parameters.
    pub fn type_named(name: impl Into<String>) -> Self {
        Annotation::Type {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn is_virtual_property(&self) -> bool {
        matches!(self, Annotation::VirtualProperty { .. })
    }
}

/// Extract a metadata record from annotations, in declaration order.
///
/// Each recognised kind sets one field; a later annotation of the same
/// kind overwrites an earlier one. Unknown kinds and the virtual property
/// marker are ignored here.
///
/// # Errors
///
/// Returns a [`CodecError`] if a type annotation's parameters cannot be
/// encoded.
pub fn extract(annotations: &[Annotation]) -> Result<PropertyMetadata, CodecError> {
    let mut metadata = PropertyMetadata::default();

    for annotation in annotations {
        match annotation {
            Annotation::Groups { groups } => metadata.groups = Some(groups.clone()),
            Annotation::Type { name, params } => {
                let mut signature = name.clone();
                if !params.is_empty() {
                    signature.push_str(&format!("<{}>", encode_params(params)?));
                }
                if signature.is_empty() {
                    metadata.type_signature = None;
                } else {
                    metadata.type_signature = Some(signature);
                }
            }
            Annotation::ReadOnly { read_only } => metadata.read_only = Some(*read_only),
            Annotation::Exclude { condition } => {
                if condition.is_empty() {
                    metadata.exclude = Some(true);
                } else {
                    metadata.exclude_if = Some(condition.clone());
                }
            }
            Annotation::MaxDepth { depth } => metadata.max_depth = Some(*depth),
            Annotation::SerializedName { name } => metadata.serialized_name = Some(name.clone()),
            Annotation::VirtualProperty { .. } | Annotation::Unknown => {}
        }
    }

    Ok(metadata)
}
