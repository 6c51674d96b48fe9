//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ClassName`] - Validated fully-qualified class name
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so a cache artifact name can always be derived.
//!
//! # Examples
//!
//! ```
//! use serialmeta::core::types::ClassName;
//!
//! let class = ClassName::new("App\\Domain\\Article").unwrap();
//! assert_eq!(class.short_name(), "Article");
//! assert_eq!(class.cache_file_stem(), "App.Domain.Article");
//!
//! assert!(ClassName::new("").is_err());
//! assert!(ClassName::new("App\\\\Article").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace separator used in fully-qualified class names.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Delimiter that replaces namespace separators in cache file names.
pub const CACHE_NAME_DELIMITER: char = '.';

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid class name: {0}")]
    InvalidClassName(String),
}

/// A validated, fully-qualified class name.
///
/// Class names are namespace segments separated by `\`:
/// - Cannot be empty
/// - A single leading `\` is accepted and stripped
/// - Every segment must be a non-empty identifier (`[A-Za-z_][A-Za-z0-9_]*`)
///
/// # Example
///
/// ```
/// use serialmeta::core::types::ClassName;
///
/// let name = ClassName::new("\\DateTime").unwrap();
/// assert_eq!(name.as_str(), "DateTime");
///
/// assert!(ClassName::new("App\\").is_err());
/// assert!(ClassName::new("App\\9Lives").is_err());
/// assert!(ClassName::new("App\\Has Space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    /// Create a new validated class name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidClassName` if the name is not a valid
    /// fully-qualified class name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let name = match name.strip_prefix(NAMESPACE_SEPARATOR) {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidClassName(
                "class name cannot be empty".into(),
            ));
        }

        for segment in name.split(NAMESPACE_SEPARATOR) {
            if segment.is_empty() {
                return Err(TypeError::InvalidClassName(format!(
                    "'{name}' contains an empty namespace segment"
                )));
            }
            if !is_identifier(segment) {
                return Err(TypeError::InvalidClassName(format!(
                    "'{segment}' is not a valid identifier in '{name}'"
                )));
            }
        }

        Ok(())
    }

    /// Get the class name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last namespace segment.
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(NAMESPACE_SEPARATOR)
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// File stem of this class's cache artifact.
    ///
    /// Namespace separators are replaced with `.`, so the stem is unique
    /// per class and safe on every filesystem.
    pub fn cache_file_stem(&self) -> String {
        self.0.replace(NAMESPACE_SEPARATOR, &CACHE_NAME_DELIMITER.to_string())
    }
}

/// Check whether `s` is an identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl TryFrom<String> for ClassName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ClassName {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClassName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod class_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(ClassName::new("Article").is_ok());
            assert!(ClassName::new("App\\Domain\\Article").is_ok());
            assert!(ClassName::new("_Private\\Thing_2").is_ok());
        }

        #[test]
        fn leading_separator_stripped() {
            let name = ClassName::new("\\App\\Article").unwrap();
            assert_eq!(name.as_str(), "App\\Article");
        }

        #[test]
        fn empty_rejected() {
            assert!(ClassName::new("").is_err());
            assert!(ClassName::new("\\").is_err());
        }

        #[test]
        fn empty_segment_rejected() {
            assert!(ClassName::new("App\\\\Article").is_err());
            assert!(ClassName::new("App\\").is_err());
        }

        #[test]
        fn invalid_characters_rejected() {
            assert!(ClassName::new("App\\Ar-ticle").is_err());
            assert!(ClassName::new("App/Article").is_err());
            assert!(ClassName::new("1App").is_err());
        }

        #[test]
        fn cache_file_stem_replaces_separators() {
            let name = ClassName::new("Vendor\\Ext\\Domain\\Model\\News").unwrap();
            assert_eq!(name.cache_file_stem(), "Vendor.Ext.Domain.Model.News");
        }

        #[test]
        fn short_name() {
            let name = ClassName::new("Vendor\\Ext\\News").unwrap();
            assert_eq!(name.short_name(), "News");
            let root = ClassName::new("DateTime").unwrap();
            assert_eq!(root.short_name(), "DateTime");
        }

        #[test]
        fn serde_roundtrip() {
            let name = ClassName::new("App\\Article").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"App\\\\Article\"");
            let parsed: ClassName = serde_json::from_str(&json).unwrap();
            assert_eq!(name, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<ClassName, _> = serde_json::from_str("\"bad name\"");
            assert!(result.is_err());
        }
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("getTitle"));
        assert!(is_identifier("_x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9x"));
        assert!(!is_identifier("a.b"));
    }
}
