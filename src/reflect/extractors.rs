//! reflect::extractors
//!
//! Type extraction strategies used when a property carries no explicit
//! type annotation.
//!
//! # Design
//!
//! Strategies are queried in order and the first non-empty answer wins.
//! The default chain asks the doc-block extractor before the declared-type
//! extractor: documentation types can express element types of
//! collections that plain type hints cannot.
//!
//! Both strategies look at the property of that name first, then at public
//! accessors (`get<Name>`, `is<Name>`, `has<Name>`), in the class and then
//! in its ancestors, nearest first.

use std::sync::Arc;

use super::registry::{ClassDefinition, ClassRegistry};
use crate::core::metadata::signature::TypeDescriptor;
use crate::core::types::ClassName;

/// Accessor prefixes tried for a property's type.
pub const ACCESSOR_PREFIXES: [&str; 3] = ["get", "is", "has"];

/// A strategy that reports the types of a class property.
pub trait TypeExtractor: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Types of `property` on `class`; empty when unknown.
    fn types(&self, class: &ClassName, property: &str) -> Vec<TypeDescriptor>;
}

/// Which type source a [`RegistryTypeExtractor`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeSource {
    DocBlock,
    Declared,
}

/// Registry-backed extractor, parameterised by the type source.
struct RegistryTypeExtractor {
    registry: Arc<ClassRegistry>,
    source: TypeSource,
}

impl RegistryTypeExtractor {
    fn lookup(&self, class: &ClassDefinition, property: &str) -> Option<TypeDescriptor> {
        let from_property = class.property(property).and_then(|p| match self.source {
            TypeSource::DocBlock => p.doc_type.clone(),
            TypeSource::Declared => p.declared_type.clone(),
        });
        if from_property.is_some() {
            return from_property;
        }

        let suffix = upper_first(property);
        ACCESSOR_PREFIXES.iter().find_map(|prefix| {
            let accessor = class.method(&format!("{prefix}{suffix}"))?;
            if !accessor.is_public() {
                return None;
            }
            match self.source {
                TypeSource::DocBlock => accessor.doc_return_type.clone(),
                TypeSource::Declared => accessor.return_type.clone(),
            }
        })
    }

    fn resolve(&self, class: &ClassName, property: &str) -> Vec<TypeDescriptor> {
        let Ok(own) = self.registry.get(class) else {
            return Vec::new();
        };

        std::iter::once(own)
            .chain(self.registry.ancestors(class))
            .find_map(|def| self.lookup(def, property))
            .into_iter()
            .collect()
    }
}

/// Reads documentation-level types (`doc_type`, `doc_return_type`).
pub struct DocBlockExtractor(RegistryTypeExtractor);

impl DocBlockExtractor {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self(RegistryTypeExtractor {
            registry,
            source: TypeSource::DocBlock,
        })
    }
}

impl TypeExtractor for DocBlockExtractor {
    fn name(&self) -> &'static str {
        "doc_block"
    }

    fn types(&self, class: &ClassName, property: &str) -> Vec<TypeDescriptor> {
        self.0.resolve(class, property)
    }
}

/// Reads language-level type hints (`declared_type`, `return_type`).
pub struct DeclaredTypeExtractor(RegistryTypeExtractor);

impl DeclaredTypeExtractor {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self(RegistryTypeExtractor {
            registry,
            source: TypeSource::Declared,
        })
    }
}

impl TypeExtractor for DeclaredTypeExtractor {
    fn name(&self) -> &'static str {
        "declared"
    }

    fn types(&self, class: &ClassName, property: &str) -> Vec<TypeDescriptor> {
        self.0.resolve(class, property)
    }
}

/// Ordered extractors; the first non-empty answer wins.
#[derive(Default)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn TypeExtractor>>,
}

impl ExtractorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Doc-block extractor first, declared-type extractor second.
    pub fn default_for(registry: Arc<ClassRegistry>) -> Self {
        Self::new()
            .with(DocBlockExtractor::new(Arc::clone(&registry)))
            .with(DeclaredTypeExtractor::new(registry))
    }

    pub fn with(mut self, extractor: impl TypeExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// First type reported by the first extractor that knows one.
    pub fn resolve(&self, class: &ClassName, property: &str) -> Option<TypeDescriptor> {
        for extractor in &self.extractors {
            let types = extractor.types(class, property);
            if let Some(first) = types.into_iter().next() {
                tracing::trace!(
                    class = %class,
                    property,
                    extractor = extractor.name(),
                    "resolved property type"
                );
                return Some(first);
            }
        }
        None
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
