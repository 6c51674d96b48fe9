//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$SERIALMETA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/serialmeta/config.toml`
//! 3. `~/.serialmeta/config.toml` (canonical write location)
//!
//! # Project Config
//!
//! Located at `<project>/serialmeta.toml` (canonical).
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the overlay extension carries no leading dot).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// debug = false
/// log_filter = "serialmeta=info"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Debug mode default
    pub debug: Option<bool>,

    /// Log filter directive used when `SERIALMETA_LOG` is unset
    pub log_filter: Option<String>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "log_filter cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Project configuration.
///
/// Relative paths are resolved against the project directory.
///
/// # Example
///
/// ```toml
/// registry = "classes.yml"
/// cache_dir = "var/cache/serialmeta"
/// overlay_dirs = ["config/serializer"]
/// overlay_extension = "yml"
/// runtime_version_id = 80100
/// debug = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Class registration file
    pub registry: Option<PathBuf>,

    /// Directory cache artifacts are written to
    pub cache_dir: Option<PathBuf>,

    /// Directories scanned for overlay files, in merge order
    pub overlay_dirs: Option<Vec<PathBuf>>,

    /// Extension of overlay files, without the dot
    pub overlay_extension: Option<String>,

    /// Runtime version id selecting the date format
    pub runtime_version_id: Option<u32>,

    /// Debug mode (forces regeneration)
    pub debug: Option<bool>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(extension) = &self.overlay_extension {
            if extension.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "overlay_extension cannot be empty".to_string(),
                ));
            }
            if extension.starts_with('.') {
                return Err(ConfigError::InvalidValue(format!(
                    "overlay_extension '{}' must not start with a dot",
                    extension
                )));
            }
        }

        if self.runtime_version_id == Some(0) {
            return Err(ConfigError::InvalidValue(
                "runtime_version_id must be non-zero".to_string(),
            ));
        }

        if let Some(dirs) = &self.overlay_dirs {
            if dirs.iter().any(|d| d.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "overlay_dirs cannot contain empty paths".to_string(),
                ));
            }
        }

        for (field, path) in [("registry", &self.registry), ("cache_dir", &self.cache_dir)] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{} cannot be empty", field)));
            }
        }

        Ok(())
    }

    /// Config written by `config init`: every setting spelled out with its
    /// default.
    pub fn starter() -> Self {
        Self {
            registry: Some(PathBuf::from(super::DEFAULT_REGISTRY)),
            cache_dir: Some(PathBuf::from(super::DEFAULT_CACHE_DIR)),
            overlay_dirs: Some(Vec::new()),
            overlay_extension: Some(crate::engine::overlay::DEFAULT_OVERLAY_EXTENSION.to_string()),
            runtime_version_id: Some(super::DEFAULT_RUNTIME_VERSION_ID),
            debug: Some(false),
        }
    }
}
