//! engine::overlay
//!
//! Externally authored metadata overlays.
//!
//! # Loading
//!
//! Every file with the configured extension directly inside each overlay
//! directory is parsed as a YAML document mapping class names to
//! class-metadata-shaped overlays. Documents are deep-merged in order
//! (directories in configured order, files in sorted path order); later
//! files win on conflicts.
//!
//! # Lifecycle
//!
//! The store loads once. [`OverlayStore::ensure_loaded`] is idempotent and
//! files are never re-read for the lifetime of the store: overlays are
//! operator-provided and not expected to change while a process runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::merge::merge_into;
use crate::core::types::ClassName;

/// Default overlay file extension.
pub const DEFAULT_OVERLAY_EXTENSION: &str = "yml";

/// Errors from loading overlays.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("invalid overlay directory pattern '{path}': {message}")]
    Pattern { path: PathBuf, message: String },

    #[error("failed to list overlay files in '{path}': {message}")]
    List { path: PathBuf, message: String },

    #[error("failed to read overlay file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse overlay file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// The document is not a mapping of class names.
    #[error("overlay file '{path}' must map class names to metadata")]
    NotAMapping { path: PathBuf },

    /// A class entry is present but not a mapping.
    #[error("overlay for class '{class}' must be a mapping")]
    InvalidEntry { class: String },
}

/// Overlay metadata, by fully-qualified class name.
#[derive(Debug)]
pub struct OverlayStore {
    dirs: Vec<PathBuf>,
    extension: String,
    loaded: Option<Mapping>,
}

impl OverlayStore {
    pub fn new(dirs: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dirs,
            extension: extension.into(),
            loaded: None,
        }
    }

    /// A store with no overlay directories.
    pub fn empty() -> Self {
        Self::new(Vec::new(), DEFAULT_OVERLAY_EXTENSION)
    }

    /// A store preloaded with `overlays`; no files are read.
    pub fn from_mapping(overlays: Mapping) -> Self {
        Self {
            dirs: Vec::new(),
            extension: DEFAULT_OVERLAY_EXTENSION.to_string(),
            loaded: Some(overlays),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Load all overlay files, once.
    ///
    /// # Errors
    ///
    /// Returns an [`OverlayError`] if a file cannot be read or parsed, or
    /// is not a mapping. On error nothing is memoized.
    pub fn ensure_loaded(&mut self) -> Result<&Mapping, OverlayError> {
        if self.loaded.is_none() {
            let loaded = self.load()?;
            self.loaded = Some(loaded);
        }
        Ok(self.loaded.get_or_insert_with(Mapping::new))
    }

    /// The overlay for `class`; an empty mapping when there is none.
    pub fn overlay_for(&mut self, class: &ClassName) -> Result<Value, OverlayError> {
        let overlays = self.ensure_loaded()?;
        match overlays.get(class.as_str()) {
            None => Ok(Value::Mapping(Mapping::new())),
            Some(Value::Mapping(entry)) => Ok(Value::Mapping(entry.clone())),
            Some(_) => Err(OverlayError::InvalidEntry {
                class: class.to_string(),
            }),
        }
    }

    /// Class names that have overlays, in load order.
    pub fn classes(&mut self) -> Result<Vec<String>, OverlayError> {
        let overlays = self.ensure_loaded()?;
        Ok(overlays
            .keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect())
    }

    fn load(&self) -> Result<Mapping, OverlayError> {
        let mut merged = Value::Mapping(Mapping::new());

        for dir in &self.dirs {
            if !dir.is_dir() {
                warn!(dir = %dir.display(), "overlay directory does not exist, skipping");
                continue;
            }

            for file in self.files_in(dir)? {
                if let Some(document) = Self::read_document(&file)? {
                    debug!(file = %file.display(), "loaded overlay file");
                    merge_into(&mut merged, Value::Mapping(document));
                }
            }
        }

        match merged {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Ok(Mapping::new()),
        }
    }

    /// Overlay files directly inside `dir`, sorted by path.
    fn files_in(&self, dir: &Path) -> Result<Vec<PathBuf>, OverlayError> {
        let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
        let pattern = format!(
            "{}/*.{}",
            escaped_dir.trim_end_matches('/'),
            glob::Pattern::escape(&self.extension)
        );

        let paths = glob::glob(&pattern).map_err(|e| OverlayError::Pattern {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| OverlayError::List {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse one overlay document. Empty documents yield `None`.
    fn read_document(path: &Path) -> Result<Option<Mapping>, OverlayError> {
        let contents = fs::read_to_string(path).map_err(|e| OverlayError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let value: Value = serde_yaml::from_str(&contents).map_err(|e| OverlayError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Null => Ok(None),
            Value::Mapping(mapping) => Ok(Some(normalize_class_keys(mapping))),
            _ => Err(OverlayError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Strip a leading namespace separator from class-name keys.
///
/// Keys that collide after stripping are deep-merged in document order.
fn normalize_class_keys(mapping: Mapping) -> Mapping {
    let mut normalized = Value::Mapping(Mapping::new());
    for (key, value) in mapping {
        let key = match key {
            Value::String(s) if s.starts_with('\\') => {
                Value::String(s.trim_start_matches('\\').to_string())
            }
            other => other,
        };
        let mut entry = Mapping::new();
        entry.insert(key, value);
        merge_into(&mut normalized, Value::Mapping(entry));
    }

    match normalized {
        Value::Mapping(mapping) => mapping,
        _ => Mapping::new(),
    }
}
