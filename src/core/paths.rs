//! core::paths
//!
//! Centralized path routing for cache storage.
//!
//! # Storage Layout
//!
//! All generated data lives under the configured cache directory:
//! - `<Vendor.Package.Class>.yml` - One artifact per class
//! - `.lock` - Exclusive lock file held while generating
//!
//! **Hard rule:** No code outside this module computes artifact file
//! names. All paths go through `CachePaths`.
//!
//! # Example
//!
//! ```
//! use serialmeta::core::paths::CachePaths;
//! use serialmeta::core::types::ClassName;
//! use std::path::PathBuf;
//!
//! let paths = CachePaths::new(PathBuf::from("/var/cache/meta"));
//! let class = ClassName::new("App\\Domain\\Article").unwrap();
//!
//! assert_eq!(
//!     paths.artifact_path(&class),
//!     PathBuf::from("/var/cache/meta/App.Domain.Article.yml")
//! );
//! ```

use std::path::{Path, PathBuf};

use super::types::ClassName;

/// Extension of cache artifact files.
pub const ARTIFACT_EXTENSION: &str = "yml";

/// Name of the lock file inside the cache directory.
pub const LOCK_FILE_NAME: &str = ".lock";

/// Path routing for the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    cache_dir: PathBuf,
}

impl CachePaths {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The artifact file of `class`.
    pub fn artifact_path(&self, class: &ClassName) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", class.cache_file_stem(), ARTIFACT_EXTENSION))
    }

    /// Temporary file an artifact is written to before the atomic rename.
    pub fn artifact_temp_path(&self, class: &ClassName) -> PathBuf {
        self.cache_dir.join(format!(
            ".{}.{}.tmp",
            class.cache_file_stem(),
            ARTIFACT_EXTENSION
        ))
    }

    /// The lock file guarding cache writes.
    pub fn lock_path(&self) -> PathBuf {
        self.cache_dir.join(LOCK_FILE_NAME)
    }
}
