//! reflect::registry
//!
//! The class registry: per class, its parent and its own declared members.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::metadata::annotations::Annotation;
use crate::core::metadata::signature::{
    DateClassifier, DateKind, ExactDateClassifier, TypeDescriptor, DATE_TIME, DATE_TIME_IMMUTABLE,
};
use crate::core::types::{ClassName, TypeError};

/// Errors from class introspection.
///
/// Fatal to the metadata generation of the class concerned.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// The class is not registered.
    #[error("class not found: {class}")]
    ClassNotFound { class: String },

    /// A registered class names a parent that is not registered.
    #[error("parent class '{parent}' of '{class}' is not registered")]
    UnknownParent { class: String, parent: String },

    /// The parent chain loops back onto itself.
    #[error("cyclic class hierarchy detected at '{class}'")]
    CyclicHierarchy { class: String },

    /// A class was registered twice.
    #[error("class registered twice: {class}")]
    DuplicateClass { class: String },

    /// A class declares the same member twice.
    #[error("class '{class}' declares {member_kind} '{member}' more than once")]
    DuplicateMember {
        class: String,
        member_kind: &'static str,
        member: String,
    },

    /// A class name in the request is malformed.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error("failed to read class registry '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse class registry '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Member visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A property declared by a class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDefinition {
    pub name: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Language-level type hint.
    #[serde(default)]
    pub declared_type: Option<TypeDescriptor>,

    /// Documentation-level type, usually richer than the type hint.
    #[serde(default)]
    pub doc_type: Option<TypeDescriptor>,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            declared_type: None,
            doc_type: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_declared_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.declared_type = Some(descriptor);
        self
    }

    pub fn with_doc_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.doc_type = Some(descriptor);
        self
    }
}

/// A method declared by a class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDefinition {
    pub name: String,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub return_type: Option<TypeDescriptor>,

    #[serde(default)]
    pub doc_return_type: Option<TypeDescriptor>,
}

impl MethodDefinition {
    /// A public method without annotations or types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            annotations: Vec::new(),
            return_type: None,
            doc_return_type: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_return_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.return_type = Some(descriptor);
        self
    }

    pub fn with_doc_return_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.doc_return_type = Some(descriptor);
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// The first annotation of the virtual property kind, if any.
    pub fn virtual_property_marker(&self) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.is_virtual_property())
    }
}

/// A class: its parent and its own declared members.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDefinition {
    pub name: ClassName,

    #[serde(default)]
    pub parent: Option<ClassName>,

    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,

    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
}

impl ClassDefinition {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            parent: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: ClassName) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.iter().filter(|m| m.is_public())
    }

    fn check_members(&self) -> Result<(), IntrospectionError> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(IntrospectionError::DuplicateMember {
                    class: self.name.to_string(),
                    member_kind: "property",
                    member: property.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            if !seen.insert(method.name.as_str()) {
                return Err(IntrospectionError::DuplicateMember {
                    class: self.name.to_string(),
                    member_kind: "method",
                    member: method.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Registration file document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDocument {
    #[serde(default)]
    classes: Vec<ClassDefinition>,
}

/// All known classes, by name.
///
/// # Example
///
/// ```
/// use serialmeta::core::types::ClassName;
/// use serialmeta::reflect::{ClassDefinition, ClassRegistry};
///
/// let base = ClassName::new("App\\AbstractContent").unwrap();
/// let article = ClassName::new("App\\Article").unwrap();
///
/// let mut registry = ClassRegistry::new();
/// registry.register(ClassDefinition::new(base.clone())).unwrap();
/// registry
///     .register(ClassDefinition::new(article.clone()).extends(base.clone()))
///     .unwrap();
///
/// let chain: Vec<_> = registry
///     .hierarchy(&article)
///     .unwrap()
///     .iter()
///     .map(|c| c.name.clone())
///     .collect();
/// assert_eq!(chain, vec![base, article]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<ClassName, ClassDefinition>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from a YAML registration document.
    pub fn from_yaml_str(contents: &str, origin: &Path) -> Result<Self, IntrospectionError> {
        let document: RegistryDocument =
            serde_yaml::from_str(contents).map_err(|e| IntrospectionError::ParseError {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut registry = Self::new();
        for class in document.classes {
            registry.register(class)?;
        }
        Ok(registry)
    }

    /// Read and parse a YAML registration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, IntrospectionError> {
        let contents = fs::read_to_string(path).map_err(|e| IntrospectionError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&contents, path)
    }

    /// Register a class.
    ///
    /// # Errors
    ///
    /// - [`IntrospectionError::DuplicateClass`] if the name is taken
    /// - [`IntrospectionError::DuplicateMember`] if the class declares a
    ///   property or method twice
    pub fn register(&mut self, class: ClassDefinition) -> Result<(), IntrospectionError> {
        if self.classes.contains_key(&class.name) {
            return Err(IntrospectionError::DuplicateClass {
                class: class.name.to_string(),
            });
        }
        class.check_members()?;
        self.classes.insert(class.name.clone(), class);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&ClassName> {
        let mut names: Vec<_> = self.classes.keys().collect();
        names.sort();
        names
    }

    pub fn get(&self, class: &ClassName) -> Result<&ClassDefinition, IntrospectionError> {
        self.classes
            .get(class)
            .ok_or_else(|| IntrospectionError::ClassNotFound {
                class: class.to_string(),
            })
    }

    /// The ancestor chain of `class`, root-most ancestor first, ending with
    /// `class` itself.
    ///
    /// # Errors
    ///
    /// - [`IntrospectionError::ClassNotFound`] if `class` is unregistered
    /// - [`IntrospectionError::UnknownParent`] if a parent is unregistered
    /// - [`IntrospectionError::CyclicHierarchy`] if the chain loops
    pub fn hierarchy(&self, class: &ClassName) -> Result<Vec<&ClassDefinition>, IntrospectionError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get(class)?;

        loop {
            if !seen.insert(&current.name) {
                return Err(IntrospectionError::CyclicHierarchy {
                    class: current.name.to_string(),
                });
            }
            chain.push(current);

            let Some(parent) = &current.parent else {
                break;
            };
            current = self
                .classes
                .get(parent)
                .ok_or_else(|| IntrospectionError::UnknownParent {
                    class: current.name.to_string(),
                    parent: parent.to_string(),
                })?;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Ancestors of `class`, nearest first, excluding `class` itself.
    ///
    /// Stops silently at an unregistered parent or a cycle; use
    /// [`ClassRegistry::hierarchy`] when the chain must be complete.
    pub fn ancestors<'a>(&'a self, class: &ClassName) -> Vec<&'a ClassDefinition> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(class.clone());

        let mut parent = self.classes.get(class).and_then(|c| c.parent.as_ref());
        while let Some(name) = parent {
            if !seen.insert(name.clone()) {
                break;
            }
            let Some(def) = self.classes.get(name) else {
                break;
            };
            ancestors.push(def);
            parent = def.parent.as_ref();
        }

        ancestors
    }

    /// Whether `class` is `ancestor` or extends it.
    ///
    /// Parent names are compared as the chain is walked, so an unregistered
    /// base such as `DateTime` still matches as the last link.
    pub fn is_a(&self, class: &str, ancestor: &str) -> bool {
        let class = class.trim_start_matches('\\');
        let ancestor = ancestor.trim_start_matches('\\');
        if class == ancestor {
            return true;
        }

        let Ok(name) = ClassName::new(class) else {
            return false;
        };
        let mut seen = HashSet::new();
        seen.insert(name.clone());

        let mut parent = self.classes.get(&name).and_then(|c| c.parent.as_ref());
        while let Some(current) = parent {
            if current.as_str() == ancestor {
                return true;
            }
            if !seen.insert(current.clone()) {
                return false;
            }
            parent = self.classes.get(current).and_then(|c| c.parent.as_ref());
        }
        false
    }
}

impl DateClassifier for &ClassRegistry {
    fn date_kind(&self, class: &str) -> Option<DateKind> {
        if let Some(kind) = ExactDateClassifier.date_kind(class) {
            return Some(kind);
        }
        if self.is_a(class, DATE_TIME) {
            Some(DateKind::DateTime)
        } else if self.is_a(class, DATE_TIME_IMMUTABLE) {
            Some(DateKind::DateTimeImmutable)
        } else {
            None
        }
    }
}
