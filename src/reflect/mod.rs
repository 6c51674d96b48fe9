//! reflect
//!
//! Single interface for class structure.
//!
//! # Architecture
//!
//! There is no runtime reflection to lean on, so class structure comes
//! from an explicit registry: per class, its direct parent and the
//! properties and methods it declares itself. The registry is filled in
//! code or from a YAML registration file.
//!
//! This module is the **only doorway** to class structure. The metadata
//! builder never inspects anything but [`ClassDefinition`]s and the
//! [`ExtractorChain`].
//!
//! # Invariants
//!
//! - A class is registered at most once
//! - A class declares each property and method name at most once
//! - Hierarchies are walked root-most ancestor first
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serialmeta::core::metadata::signature::TypeDescriptor;
//! use serialmeta::core::types::ClassName;
//! use serialmeta::reflect::{ClassDefinition, ClassRegistry, ExtractorChain, PropertyDefinition};
//!
//! let article = ClassName::new("App\\Article").unwrap();
//! let mut registry = ClassRegistry::new();
//! registry
//!     .register(
//!         ClassDefinition::new(article.clone()).with_property(
//!             PropertyDefinition::new("rating").with_declared_type(TypeDescriptor::builtin("float")),
//!         ),
//!     )
//!     .unwrap();
//!
//! let chain = ExtractorChain::default_for(Arc::new(registry));
//! assert_eq!(chain.resolve(&article, "rating"), Some(TypeDescriptor::builtin("float")));
//! ```

pub mod extractors;
pub mod registry;

pub use extractors::{
    DeclaredTypeExtractor, DocBlockExtractor, ExtractorChain, TypeExtractor, ACCESSOR_PREFIXES,
};
pub use registry::{
    ClassDefinition, ClassRegistry, IntrospectionError, MethodDefinition, PropertyDefinition,
    Visibility,
};
