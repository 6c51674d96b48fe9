//! engine::builder
//!
//! Builds the [`ClassMetadata`] of one class from its own declarations.
//!
//! # Properties
//!
//! Every declared property gets a record from its annotations. When the
//! annotations set no type, the extractor chain is asked and a hit is
//! stringified into the record.
//!
//! # Virtual properties
//!
//! Every public method carrying a virtual property marker becomes a
//! virtual property. Its accessor name is the method name with an `is`,
//! `get` or `has` prefix stripped and the next character lower-cased.
//! The marker's explicit name, if any, overrides the accessor name as the
//! effective property name. Type lookup always uses the accessor name.
//! Records are keyed by method name.

use std::sync::Arc;

use thiserror::Error;

use crate::core::metadata::annotations::{extract, Annotation};
use crate::core::metadata::codec::CodecError;
use crate::core::metadata::schema::{ClassMetadata, PropertyMetadata, VirtualPropertyMetadata};
use crate::core::metadata::signature::{DateFormat, TypeStringifier};
use crate::core::types::ClassName;
use crate::reflect::{ClassDefinition, ClassRegistry, ExtractorChain};

/// Prefixes stripped from accessor method names, tested in this order.
const ACCESSOR_NAME_PREFIXES: [&str; 3] = ["is", "get", "has"];

/// Errors from building class metadata.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A member's annotations could not be turned into metadata.
    #[error("invalid annotations on {class}::{member}: {source}")]
    Annotation {
        class: String,
        member: String,
        source: CodecError,
    },
}

impl BuildError {
    /// The underlying codec error.
    pub fn codec_error(&self) -> &CodecError {
        match self {
            BuildError::Annotation { source, .. } => source,
        }
    }
}

/// Derive the accessor name of a method.
///
/// The prefix test is a plain string prefix: `isolate` yields `olate`.
///
/// # Example
///
/// ```
/// use serialmeta::engine::builder::accessor_name;
///
/// assert_eq!(accessor_name("isActive"), "active");
/// assert_eq!(accessor_name("getFullName"), "fullName");
/// assert_eq!(accessor_name("hasChildren"), "children");
/// assert_eq!(accessor_name("summary"), "summary");
/// ```
pub fn accessor_name(method: &str) -> String {
    ACCESSOR_NAME_PREFIXES
        .iter()
        .find_map(|prefix| method.strip_prefix(prefix))
        .map(lower_first)
        .unwrap_or_else(|| method.to_string())
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds per-class metadata from the registry.
pub struct ClassMetadataBuilder {
    registry: Arc<ClassRegistry>,
    extractors: ExtractorChain,
    date_format: DateFormat,
}

impl ClassMetadataBuilder {
    /// Builder using the default extractor chain.
    pub fn new(registry: Arc<ClassRegistry>, date_format: DateFormat) -> Self {
        let extractors = ExtractorChain::default_for(Arc::clone(&registry));
        Self::with_extractors(registry, extractors, date_format)
    }

    pub fn with_extractors(
        registry: Arc<ClassRegistry>,
        extractors: ExtractorChain,
        date_format: DateFormat,
    ) -> Self {
        Self {
            registry,
            extractors,
            date_format,
        }
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Build the metadata of a class from its own declarations.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Annotation`] if a type annotation carries
    /// parameters that cannot be encoded.
    pub fn build(&self, class: &ClassDefinition) -> Result<ClassMetadata, BuildError> {
        let mut metadata = ClassMetadata::default();

        for property in &class.properties {
            let record = self.record_for(&class.name, &property.name, &property.annotations)?;
            metadata.properties.insert(property.name.clone(), record);
        }

        for method in class.public_methods() {
            let Some(Annotation::VirtualProperty { name }) = method.virtual_property_marker()
            else {
                continue;
            };

            let accessor = accessor_name(&method.name);
            let property_name = match name.as_deref() {
                Some(explicit) if !explicit.is_empty() => explicit.to_string(),
                _ => accessor.clone(),
            };

            let fragment = self
                .record_for(&class.name, &accessor, &method.annotations)
                .map_err(|e| match e {
                    BuildError::Annotation { class, source, .. } => BuildError::Annotation {
                        class,
                        member: format!("{}()", method.name),
                        source,
                    },
                })?;

            metadata.virtual_properties.insert(
                method.name.clone(),
                VirtualPropertyMetadata::from_fragment(property_name, fragment),
            );
        }

        Ok(metadata)
    }

    /// Annotation record for a member, with the introspected type as a
    /// fallback. `lookup_name` is the property name used for type lookup.
    fn record_for(
        &self,
        class: &ClassName,
        lookup_name: &str,
        annotations: &[Annotation],
    ) -> Result<PropertyMetadata, BuildError> {
        let mut record = extract(annotations).map_err(|source| BuildError::Annotation {
            class: class.to_string(),
            member: lookup_name.to_string(),
            source,
        })?;

        if !record.has_type() {
            if let Some(descriptor) = self.extractors.resolve(class, lookup_name) {
                let stringifier =
                    TypeStringifier::with_classifier(self.date_format, self.registry.as_ref());
                record.set_type(stringifier.stringify(&descriptor));
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::codec::HandlerParam;
    use crate::core::metadata::signature::TypeDescriptor;
    use crate::reflect::{MethodDefinition, PropertyDefinition, Visibility};

    fn name(s: &str) -> ClassName {
        ClassName::new(s).unwrap()
    }

    fn builder_for(classes: Vec<ClassDefinition>) -> ClassMetadataBuilder {
        let mut registry = ClassRegistry::new();
        for class in classes {
            registry.register(class).unwrap();
        }
        ClassMetadataBuilder::new(Arc::new(registry), DateFormat::Rfc3339Extended)
    }

    fn build(builder: &ClassMetadataBuilder, class: &str) -> ClassMetadata {
        let registry = Arc::clone(builder.registry());
        let def = registry.get(&name(class)).unwrap();
        builder.build(def).unwrap()
    }

    mod accessor_names {
        use super::*;

        #[test]
        fn recognised_prefixes() {
            assert_eq!(accessor_name("isActive"), "active");
            assert_eq!(accessor_name("getFullName"), "fullName");
            assert_eq!(accessor_name("hasTags"), "tags");
        }

        #[test]
        fn no_prefix_verbatim() {
            assert_eq!(accessor_name("summary"), "summary");
            assert_eq!(accessor_name("Summary"), "Summary");
        }

        #[test]
        fn plain_prefix_match() {
            assert_eq!(accessor_name("isolate"), "olate");
            assert_eq!(accessor_name("hash"), "h");
            assert_eq!(accessor_name("get"), "");
        }
    }

    #[test]
    fn annotations_take_precedence_over_introspection() {
        let builder = builder_for(vec![ClassDefinition::new(name("App\\Article")).with_property(
            PropertyDefinition::new("rating")
                .with_annotation(Annotation::type_named("string"))
                .with_declared_type(TypeDescriptor::builtin("float")),
        )]);

        let meta = build(&builder, "App\\Article");
        assert_eq!(
            meta.properties["rating"].type_signature.as_deref(),
            Some("string")
        );
    }

    #[test]
    fn introspection_fallback() {
        let builder = builder_for(vec![ClassDefinition::new(name("App\\Article"))
            .with_property(
                PropertyDefinition::new("rating").with_declared_type(TypeDescriptor::builtin("float")),
            )
            .with_property(PropertyDefinition::new("untyped"))]);

        let meta = build(&builder, "App\\Article");
        assert_eq!(
            meta.properties["rating"],
            PropertyMetadata {
                type_signature: Some("float".into()),
                ..Default::default()
            }
        );
        assert!(meta.properties["untyped"].is_empty());
    }

    #[test]
    fn date_property() {
        let builder = builder_for(vec![ClassDefinition::new(name("App\\Article")).with_property(
            PropertyDefinition::new("published").with_declared_type(TypeDescriptor::class("DateTime")),
        )]);

        let meta = build(&builder, "App\\Article");
        assert_eq!(
            meta.properties["published"].type_signature.as_deref(),
            Some("DateTime<'Y-m-d\\TH:i:s.vP'>")
        );
    }

    #[test]
    fn registered_date_subclass() {
        let builder = builder_for(vec![
            ClassDefinition::new(name("DateTimeImmutable")),
            ClassDefinition::new(name("App\\Chronos")).extends(name("DateTimeImmutable")),
            ClassDefinition::new(name("App\\Event")).with_property(
                PropertyDefinition::new("start").with_doc_type(TypeDescriptor::class("App\\Chronos")),
            ),
        ]);

        let meta = build(&builder, "App\\Event");
        assert_eq!(
            meta.properties["start"].type_signature.as_deref(),
            Some("DateTimeImmutable<'Y-m-d\\TH:i:s.vP'>")
        );
    }

    #[test]
    fn date_subclass_of_unregistered_base() {
        let builder = builder_for(vec![
            ClassDefinition::new(name("App\\MyDate")).extends(name("DateTime")),
            ClassDefinition::new(name("App\\Event")).with_property(
                PropertyDefinition::new("at").with_declared_type(TypeDescriptor::class("App\\MyDate")),
            ),
        ]);

        let meta = build(&builder, "App\\Event");
        assert_eq!(
            meta.properties["at"].type_signature.as_deref(),
            Some("DateTime<'Y-m-d\\TH:i:s.vP'>")
        );
    }

    #[test]
    fn virtual_properties() {
        let builder = builder_for(vec![ClassDefinition::new(name("App\\Article"))
            .with_method(
                MethodDefinition::new("isActive")
                    .with_annotation(Annotation::VirtualProperty { name: None })
                    .with_return_type(TypeDescriptor::builtin("bool")),
            )
            .with_method(
                MethodDefinition::new("getFullName")
                    .with_annotation(Annotation::VirtualProperty {
                        name: Some("displayName".into()),
                    })
                    .with_annotation(Annotation::Groups {
                        groups: vec!["detail".into()],
                    })
                    .with_doc_return_type(TypeDescriptor::builtin("string")),
            )
            .with_method(
                MethodDefinition::new("summary")
                    .with_annotation(Annotation::VirtualProperty { name: None }),
            )
            .with_method(MethodDefinition::new("getPlain"))
            .with_method(
                MethodDefinition::new("getHidden")
                    .with_visibility(Visibility::Protected)
                    .with_annotation(Annotation::VirtualProperty { name: None }),
            )]);

        let meta = build(&builder, "App\\Article");
        assert_eq!(meta.virtual_properties.len(), 3);

        let active = &meta.virtual_properties["isActive"];
        assert_eq!(active.name, "active");
        assert_eq!(active.serialized_name, "active");
        assert_eq!(active.type_signature.as_deref(), Some("bool"));

        let full_name = &meta.virtual_properties["getFullName"];
        assert_eq!(full_name.name, "displayName");
        assert_eq!(full_name.serialized_name, "displayName");
        assert_eq!(full_name.groups, Some(vec!["detail".to_string()]));
        // Type lookup uses the accessor name, not the override.
        assert_eq!(full_name.type_signature.as_deref(), Some("string"));

        let summary = &meta.virtual_properties["summary"];
        assert_eq!(summary.name, "summary");
        assert!(summary.type_signature.is_none());
    }

    #[test]
    fn same_derived_name_does_not_collide() {
        let builder = builder_for(vec![ClassDefinition::new(name("App\\Flag"))
            .with_method(
                MethodDefinition::new("isEnabled")
                    .with_annotation(Annotation::VirtualProperty { name: None }),
            )
            .with_method(
                MethodDefinition::new("getEnabled")
                    .with_annotation(Annotation::VirtualProperty { name: None }),
            )]);

        let meta = build(&builder, "App\\Flag");
        assert_eq!(meta.virtual_properties.len(), 2);
        assert_eq!(meta.virtual_properties["isEnabled"].name, "enabled");
        assert_eq!(meta.virtual_properties["getEnabled"].name, "enabled");
    }

    #[test]
    fn own_members_only() {
        let builder = builder_for(vec![
            ClassDefinition::new(name("App\\Base")).with_property(PropertyDefinition::new("id")),
            ClassDefinition::new(name("App\\Child"))
                .extends(name("App\\Base"))
                .with_property(PropertyDefinition::new("title")),
        ]);

        let meta = build(&builder, "App\\Child");
        assert_eq!(meta.properties.keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn bad_type_params_fail() {
        let builder = builder_for(vec![ClassDefinition::new(name("App\\Article")).with_method(
            MethodDefinition::new("getImage")
                .with_annotation(Annotation::VirtualProperty { name: None })
                .with_annotation(Annotation::Type {
                    name: "Image".into(),
                    params: vec![HandlerParam::Bool(true)],
                }),
        )]);

        let registry = Arc::clone(builder.registry());
        let def = registry.get(&name("App\\Article")).unwrap();
        let err = builder.build(def).unwrap_err();
        assert!(err.to_string().contains("App\\Article::getImage()"));
        assert!(matches!(
            err.codec_error(),
            CodecError::UnsupportedParameterType(_)
        ));
    }
}
