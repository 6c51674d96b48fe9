//! core::metadata::signature
//!
//! Canonical type signatures.
//!
//! # Grammar
//!
//! - `int`, `string`, ... for builtin types
//! - `ClassName` for objects
//! - `ClassName<sub, ...>` for collections backed by a class
//! - `array<sub, ...>` for plain collections, bare `array` when the element
//!   type is unknown
//! - `DateTime<'FORMAT'>` and `DateTimeImmutable<'FORMAT'>` for the two
//!   date types and anything extending them

use serde::{Deserialize, Serialize};

/// Base class of mutable dates.
pub const DATE_TIME: &str = "DateTime";

/// Base class of immutable dates.
pub const DATE_TIME_IMMUTABLE: &str = "DateTimeImmutable";

/// Runtime version id from which the extended RFC3339 format is available.
pub const RFC3339_EXTENDED_MIN_VERSION: u32 = 70300;

/// A type as reported by type introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A builtin scalar such as `int` or `string`.
    Builtin { name: String },

    /// An object of the named class.
    Class { name: String },

    /// A collection, optionally backed by a class.
    Collection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        value_types: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn builtin(name: impl Into<String>) -> Self {
        TypeDescriptor::Builtin { name: name.into() }
    }

    pub fn class(name: impl Into<String>) -> Self {
        TypeDescriptor::Class { name: name.into() }
    }

    /// A plain collection of `value_types`.
    pub fn array_of(value_types: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Collection {
            class: None,
            value_types,
        }
    }

    /// A collection class holding `value_types`.
    pub fn collection_of(class: impl Into<String>, value_types: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Collection {
            class: Some(class.into()),
            value_types,
        }
    }
}

/// Date format written into date type signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// RFC3339 with milliseconds: `Y-m-d\TH:i:s.vP`.
    Rfc3339Extended,
    /// Microsecond format for older runtimes: `Y-m-d\TH:i:s.uP`.
    Legacy,
}

impl DateFormat {
    /// Pick the format supported by the given runtime version id.
    ///
    /// # Example
    ///
    /// ```
    /// use serialmeta::core::metadata::signature::DateFormat;
    ///
    /// assert_eq!(DateFormat::for_runtime(80100), DateFormat::Rfc3339Extended);
    /// assert_eq!(DateFormat::for_runtime(70299), DateFormat::Legacy);
    /// ```
    pub fn for_runtime(version_id: u32) -> Self {
        if version_id >= RFC3339_EXTENDED_MIN_VERSION {
            DateFormat::Rfc3339Extended
        } else {
            DateFormat::Legacy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::Rfc3339Extended => "Y-m-d\\TH:i:s.vP",
            DateFormat::Legacy => "Y-m-d\\TH:i:s.uP",
        }
    }
}

/// Which date base class a class name resolves to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    DateTime,
    DateTimeImmutable,
}

impl DateKind {
    fn base_name(&self) -> &'static str {
        match self {
            DateKind::DateTime => DATE_TIME,
            DateKind::DateTimeImmutable => DATE_TIME_IMMUTABLE,
        }
    }
}

/// Resolves whether a class is (or extends) one of the date types.
pub trait DateClassifier {
    fn date_kind(&self, class: &str) -> Option<DateKind>;
}

/// Classifies only the date classes themselves, by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactDateClassifier;

impl DateClassifier for ExactDateClassifier {
    fn date_kind(&self, class: &str) -> Option<DateKind> {
        match class.trim_start_matches('\\') {
            DATE_TIME => Some(DateKind::DateTime),
            DATE_TIME_IMMUTABLE => Some(DateKind::DateTimeImmutable),
            _ => None,
        }
    }
}

/// Converts type descriptors to canonical signatures.
pub struct TypeStringifier<C> {
    date_format: DateFormat,
    classifier: C,
}

impl TypeStringifier<ExactDateClassifier> {
    /// Stringifier that only recognises `DateTime` and `DateTimeImmutable`
    /// by exact name.
    pub fn new(date_format: DateFormat) -> Self {
        Self::with_classifier(date_format, ExactDateClassifier)
    }
}

impl<C: DateClassifier> TypeStringifier<C> {
    pub fn with_classifier(date_format: DateFormat, classifier: C) -> Self {
        Self {
            date_format,
            classifier,
        }
    }

    pub fn date_format(&self) -> DateFormat {
        self.date_format
    }

    /// Stringify a descriptor.
    ///
    /// # Example
    ///
    /// ```
    /// use serialmeta::core::metadata::signature::{DateFormat, TypeDescriptor, TypeStringifier};
    ///
    /// let stringifier = TypeStringifier::new(DateFormat::Rfc3339Extended);
    /// let ints = TypeDescriptor::array_of(vec![TypeDescriptor::builtin("int")]);
    /// assert_eq!(stringifier.stringify(&ints), "array<int>");
    /// ```
    pub fn stringify(&self, descriptor: &TypeDescriptor) -> String {
        match descriptor {
            TypeDescriptor::Collection { class, value_types } => {
                if value_types.is_empty() {
                    return "array".to_string();
                }

                let sub_types = value_types
                    .iter()
                    .map(|t| self.stringify(t))
                    .collect::<Vec<_>>()
                    .join(", ");

                match class.as_deref() {
                    Some(class) if !class.is_empty() => format!("{class}<{sub_types}>"),
                    _ => format!("array<{sub_types}>"),
                }
            }
            TypeDescriptor::Class { name } => match self.classifier.date_kind(name) {
                Some(kind) => format!("{}<'{}'>", kind.base_name(), self.date_format.as_str()),
                None => name.clone(),
            },
            TypeDescriptor::Builtin { name } => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stringifier() -> TypeStringifier<ExactDateClassifier> {
        TypeStringifier::new(DateFormat::Rfc3339Extended)
    }

    #[test]
    fn builtin() {
        assert_eq!(stringifier().stringify(&TypeDescriptor::builtin("float")), "float");
    }

    #[test]
    fn class() {
        let t = TypeDescriptor::class("App\\Domain\\Author");
        assert_eq!(stringifier().stringify(&t), "App\\Domain\\Author");
    }

    #[test]
    fn plain_collection() {
        let t = TypeDescriptor::array_of(vec![TypeDescriptor::builtin("int")]);
        assert_eq!(stringifier().stringify(&t), "array<int>");
    }

    #[test]
    fn class_backed_collection() {
        let t = TypeDescriptor::collection_of("Collection", vec![TypeDescriptor::builtin("string")]);
        assert_eq!(stringifier().stringify(&t), "Collection<string>");
    }

    #[test]
    fn collection_without_element_type() {
        let t = TypeDescriptor::collection_of("Collection", vec![]);
        assert_eq!(stringifier().stringify(&t), "array");
        assert_eq!(stringifier().stringify(&TypeDescriptor::array_of(vec![])), "array");
    }

    #[test]
    fn multiple_value_types_joined() {
        let t = TypeDescriptor::array_of(vec![
            TypeDescriptor::builtin("int"),
            TypeDescriptor::builtin("string"),
        ]);
        assert_eq!(stringifier().stringify(&t), "array<int, string>");
    }

    #[test]
    fn nested_collections() {
        let t = TypeDescriptor::collection_of(
            "ObjectStorage",
            vec![TypeDescriptor::array_of(vec![TypeDescriptor::class("DateTime")])],
        );
        assert_eq!(
            stringifier().stringify(&t),
            "ObjectStorage<array<DateTime<'Y-m-d\\TH:i:s.vP'>>>"
        );
    }

    #[test]
    fn date_types() {
        assert_eq!(
            stringifier().stringify(&TypeDescriptor::class("DateTime")),
            "DateTime<'Y-m-d\\TH:i:s.vP'>"
        );
        assert_eq!(
            stringifier().stringify(&TypeDescriptor::class("\\DateTimeImmutable")),
            "DateTimeImmutable<'Y-m-d\\TH:i:s.vP'>"
        );
    }

    #[test]
    fn legacy_date_format() {
        let s = TypeStringifier::new(DateFormat::for_runtime(70200));
        assert_eq!(
            s.stringify(&TypeDescriptor::class("DateTime")),
            "DateTime<'Y-m-d\\TH:i:s.uP'>"
        );
    }

    #[test]
    fn custom_classifier() {
        struct AllDates;
        impl DateClassifier for AllDates {
            fn date_kind(&self, _class: &str) -> Option<DateKind> {
                Some(DateKind::DateTimeImmutable)
            }
        }

        let s = TypeStringifier::with_classifier(DateFormat::Legacy, AllDates);
        assert_eq!(
            s.stringify(&TypeDescriptor::class("App\\Chronos")),
            "DateTimeImmutable<'Y-m-d\\TH:i:s.uP'>"
        );
    }

    #[test]
    fn descriptor_from_yaml() {
        let t: TypeDescriptor = serde_yaml::from_str(
            "kind: collection\nclass: Collection\nvalue_types:\n  - kind: builtin\n    name: string\n",
        )
        .unwrap();
        assert_eq!(
            t,
            TypeDescriptor::collection_of("Collection", vec![TypeDescriptor::builtin("string")])
        );
    }
}
