//! engine::cache
//!
//! Persisted per-class metadata artifacts.
//!
//! # Format
//!
//! Each artifact is a YAML document with a single top-level key, the
//! fully-qualified class name, mapping to the merged class metadata:
//!
//! ```yaml
//! App\Domain\Article:
//!   properties:
//!     rating:
//!       type: float
//!   virtual_properties: {}
//! ```
//!
//! Artifacts are written atomically (temp file, then rename) and are never
//! edited in place. Deleting them is left to the operator.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::core::paths::CachePaths;
use crate::core::types::ClassName;

/// Errors from cache artifact operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache artifact '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write cache artifact '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize metadata for '{class}': {message}")]
    Serialize { class: String, message: String },

    #[error("malformed cache artifact '{path}': {message}")]
    Malformed { path: PathBuf, message: String },
}

/// The artifact store of one cache directory.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    paths: CachePaths,
}

impl MetadataCache {
    pub fn new(paths: CachePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &CachePaths {
        &self.paths
    }

    pub fn artifact_path(&self, class: &ClassName) -> PathBuf {
        self.paths.artifact_path(class)
    }

    /// Whether an artifact exists for `class`.
    pub fn exists(&self, class: &ClassName) -> bool {
        self.artifact_path(class).is_file()
    }

    /// Render the artifact document for `class`.
    pub fn render(class: &ClassName, metadata: &Value) -> Result<String, CacheError> {
        let mut document = Mapping::new();
        document.insert(Value::String(class.to_string()), metadata.clone());
        serde_yaml::to_string(&document).map_err(|e| CacheError::Serialize {
            class: class.to_string(),
            message: e.to_string(),
        })
    }

    /// Write the artifact of `class`, replacing any existing one.
    ///
    /// Creates the cache directory if needed. Returns the artifact path.
    pub fn write(&self, class: &ClassName, metadata: &Value) -> Result<PathBuf, CacheError> {
        let contents = Self::render(class, metadata)?;
        let path = self.artifact_path(class);

        fs::create_dir_all(self.paths.cache_dir()).map_err(|e| CacheError::Write {
            path: self.paths.cache_dir().to_path_buf(),
            source: e,
        })?;

        let temp_path = self.paths.artifact_temp_path(class);
        write_synced(&temp_path, contents.as_bytes())?;

        fs::rename(&temp_path, &path).map_err(|e| CacheError::Write {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    /// Read back the class metadata of an artifact.
    ///
    /// Returns `Ok(None)` if no artifact exists.
    pub fn read(&self, class: &ClassName) -> Result<Option<Value>, CacheError> {
        let path = self.artifact_path(class);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| CacheError::Read {
            path: path.clone(),
            source: e,
        })?;

        let document: Value =
            serde_yaml::from_str(&contents).map_err(|e| CacheError::Malformed {
                path: path.clone(),
                message: e.to_string(),
            })?;

        match document {
            Value::Mapping(mut mapping) => mapping
                .remove(class.as_str())
                .map(Some)
                .ok_or_else(|| CacheError::Malformed {
                    path,
                    message: format!("missing top-level key '{class}'"),
                }),
            _ => Err(CacheError::Malformed {
                path,
                message: "document is not a mapping".to_string(),
            }),
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let to_err = |e| CacheError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(path).map_err(to_err)?;
    file.write_all(bytes).map_err(to_err)?;
    file.sync_all().map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn class(s: &str) -> ClassName {
        ClassName::new(s).unwrap()
    }

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn cache(temp: &TempDir) -> MetadataCache {
        MetadataCache::new(CachePaths::new(temp.path().join("cache")))
    }

    #[test]
    fn write_then_read() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        let article = class("App\\Article");
        let metadata = yaml("properties: {rating: {type: float}}\nvirtual_properties: {}");

        assert!(!cache.exists(&article));
        let path = cache.write(&article, &metadata).unwrap();

        assert!(cache.exists(&article));
        assert_eq!(path, temp.path().join("cache/App.Article.yml"));
        assert_eq!(cache.read(&article).unwrap(), Some(metadata));
    }

    #[test]
    fn artifact_is_keyed_by_class_name() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        let article = class("App\\Article");
        let path = cache.write(&article, &yaml("properties: {}")).unwrap();

        let document: Value = serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(document, yaml("'App\\Article': {properties: {}}"));
    }

    #[test]
    fn write_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        let article = class("App\\Article");
        cache.write(&article, &yaml("{a: 1}")).unwrap();
        cache.write(&article, &yaml("{b: 2}")).unwrap();
        assert_eq!(cache.read(&article).unwrap(), Some(yaml("{b: 2}")));
        assert!(!cache.paths().artifact_temp_path(&article).exists());
    }

    #[test]
    fn read_missing_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(cache(&temp).read(&class("App\\Nope")).unwrap(), None);
    }

    #[test]
    fn read_wrong_key_is_malformed() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        let article = class("App\\Article");
        fs::create_dir_all(cache.paths().cache_dir()).unwrap();
        fs::write(cache.artifact_path(&article), "Other: {}\n").unwrap();

        assert!(matches!(
            cache.read(&article),
            Err(CacheError::Malformed { .. })
        ));
    }

    #[test]
    fn unwritable_cache_dir_is_write_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();

        let cache = MetadataCache::new(CachePaths::new(blocker.join("cache")));
        assert!(matches!(
            cache.write(&class("App\\A"), &yaml("{}")),
            Err(CacheError::Write { .. })
        ));
    }
}
