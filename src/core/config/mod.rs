//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! serialmeta has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Project-level settings (registry, cache, overlays)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$SERIALMETA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/serialmeta/config.toml`
//! 3. `~/.serialmeta/config.toml` (canonical write location)
//!
//! # Project Config Locations
//!
//! Searched in order:
//! 1. `serialmeta.toml` (canonical)
//! 2. `.serialmeta/config.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use serialmeta::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Path::new("/path/to/project"), None).unwrap();
//! let config = result.config;
//!
//! println!("Cache: {}", config.cache_dir().display());
//! for dir in config.overlay_dirs() {
//!     println!("Overlays: {}", dir.display());
//! }
//! ```

pub mod schema;

pub use schema::{GlobalConfig, ProjectConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::metadata::signature::DateFormat;
use crate::engine::overlay::DEFAULT_OVERLAY_EXTENSION;

/// Default class registration file, relative to the project.
pub const DEFAULT_REGISTRY: &str = "classes.yml";

/// Default cache directory, relative to the project.
pub const DEFAULT_CACHE_DIR: &str = "var/cache/serialmeta";

/// Default runtime version id.
pub const DEFAULT_RUNTIME_VERSION_ID: u32 = 80100;

/// Canonical project config file name.
pub const PROJECT_CONFIG_FILE: &str = "serialmeta.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("config file already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence and resolve relative paths against the
/// project directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if a config file was found)
    pub project: Option<ProjectConfig>,
    /// The project directory
    project_dir: PathBuf,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the project at `project_dir`.
    ///
    /// `explicit` names a project config file to use instead of the
    /// standard locations; it must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// hold invalid values. Missing config files are not an error
    /// (defaults are used).
    pub fn load(
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global()?;

        let (project, project_path) = match explicit {
            Some(path) => (Some(Self::read_project_config(path)?), Some(path.to_path_buf())),
            None => Self::load_project(project_dir, &mut warnings)?,
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                project_dir: project_dir.to_path_buf(),
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// Configuration with defaults only.
    pub fn defaults(project_dir: &Path) -> Self {
        Self {
            global: GlobalConfig::default(),
            project: None,
            project_dir: project_dir.to_path_buf(),
            global_path: None,
            project_path: None,
        }
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $SERIALMETA_CONFIG
        if let Ok(path) = std::env::var("SERIALMETA_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_global_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/serialmeta/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("serialmeta/config.toml");
            if path.exists() {
                let config = Self::read_global_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.serialmeta/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".serialmeta/config.toml");
            if path.exists() {
                let config = Self::read_global_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Load project configuration from standard locations.
    fn load_project(
        project_dir: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<ProjectConfig>, Option<PathBuf>), ConfigError> {
        // 1. Check serialmeta.toml (canonical)
        let canonical = Self::project_config_path(project_dir);
        if canonical.exists() {
            let config = Self::read_project_config(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        // 2. Check .serialmeta/config.toml (compatibility)
        let compat = project_dir.join(".serialmeta/config.toml");
        if compat.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please move to '{}'",
                    canonical.display()
                ),
                path: compat.clone(),
            });
            let config = Self::read_project_config(&compat)?;
            return Ok((Some(config), Some(compat)));
        }

        Ok((None, None))
    }

    fn read_global_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = Self::read_file(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn read_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
        let contents = Self::read_file(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn read_file(path: &Path) -> Result<String, ConfigError> {
        fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the canonical path for project config.
    ///
    /// Returns `serialmeta.toml` inside the given project directory.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Write a starter project config atomically.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_project(
        project_dir: &Path,
        config: &ProjectConfig,
        force: bool,
    ) -> Result<PathBuf, ConfigError> {
        let path = Self::project_config_path(project_dir);
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path));
        }
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Get the class registration file.
    ///
    /// Defaults to `classes.yml` in the project.
    pub fn registry(&self) -> PathBuf {
        let configured = self.project.as_ref().and_then(|p| p.registry.as_deref());
        self.resolve(configured.unwrap_or(Path::new(DEFAULT_REGISTRY)))
    }

    /// Get the cache directory.
    ///
    /// Defaults to `var/cache/serialmeta` in the project.
    pub fn cache_dir(&self) -> PathBuf {
        let configured = self.project.as_ref().and_then(|p| p.cache_dir.as_deref());
        self.resolve(configured.unwrap_or(Path::new(DEFAULT_CACHE_DIR)))
    }

    /// Get the overlay directories, in merge order.
    ///
    /// Defaults to none.
    pub fn overlay_dirs(&self) -> Vec<PathBuf> {
        self.project
            .as_ref()
            .and_then(|p| p.overlay_dirs.as_ref())
            .map(|dirs| dirs.iter().map(|d| self.resolve(d)).collect())
            .unwrap_or_default()
    }

    /// Get the overlay file extension.
    ///
    /// Defaults to "yml".
    pub fn overlay_extension(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.overlay_extension.as_deref())
            .unwrap_or(DEFAULT_OVERLAY_EXTENSION)
    }

    /// Get the runtime version id.
    ///
    /// Defaults to 80100.
    pub fn runtime_version_id(&self) -> u32 {
        self.project
            .as_ref()
            .and_then(|p| p.runtime_version_id)
            .unwrap_or(DEFAULT_RUNTIME_VERSION_ID)
    }

    /// The date format selected by the runtime version id.
    pub fn date_format(&self) -> DateFormat {
        DateFormat::for_runtime(self.runtime_version_id())
    }

    /// Check if debug mode is enabled.
    ///
    /// Project overrides global. Defaults to `false`.
    pub fn debug(&self) -> bool {
        self.project
            .as_ref()
            .and_then(|p| p.debug)
            .or(self.global.debug)
            .unwrap_or(false)
    }

    /// Get the configured log filter, if any.
    pub fn log_filter(&self) -> Option<&str> {
        self.global.log_filter.as_deref()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}
