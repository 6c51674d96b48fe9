//! engine::generator
//!
//! The metadata generation pipeline: build, merge with overlays, persist.
//!
//! # Algorithm
//!
//! `generate_for(class)`:
//!
//! 1. In normal mode, an existing artifact for `class` makes the call a
//!    no-op. Only the requested class is checked.
//! 2. The hierarchy of `class` is walked root-most ancestor first.
//! 3. Every class not yet processed by this generator is built fresh,
//!    deep-merged with its overlay, and written as its own artifact.
//!
//! An artifact holds the metadata of its class only; inherited members
//! are never copied into subclass artifacts.
//!
//! # Concurrency
//!
//! The cache directory lock is held for the whole call. A generator is
//! not `Sync`; share one across threads through [`SharedGenerator`].
//!
//! # Example
//!
//! ```ignore
//! let mut generator = MetadataGenerator::new(registry, overlays, cache, mode, date_format);
//! let report = generator.generate_for(&ClassName::new("App\\Article")?)?;
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_yaml::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::builder::{BuildError, ClassMetadataBuilder};
use super::cache::{CacheError, MetadataCache};
use super::merge::deep_merge;
use super::modes::GenerationMode;
use super::overlay::{OverlayError, OverlayStore};
use crate::core::lock::{CacheLock, LockError};
use crate::core::metadata::schema::SchemaError;
use crate::core::metadata::signature::DateFormat;
use crate::core::types::ClassName;
use crate::reflect::{ClassDefinition, ClassRegistry, IntrospectionError};

/// Errors from the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Lock(#[from] LockError),

    /// The shared generator's mutex was poisoned by a panicking holder.
    #[error("metadata generator is poisoned")]
    Poisoned,
}

/// Outcome of one `generate_for` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// The requested class.
    pub class: ClassName,

    /// The requested class's artifact existed and was trusted.
    pub cache_hit: bool,

    /// Artifacts written, root-most ancestor first.
    pub written: Vec<PathBuf>,

    /// Classes skipped because this generator already processed them.
    pub skipped: Vec<ClassName>,
}

impl GenerationReport {
    fn new(class: ClassName) -> Self {
        Self {
            class,
            cache_hit: false,
            written: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Generates and caches serializer metadata for registered classes.
pub struct MetadataGenerator {
    registry: Arc<ClassRegistry>,
    builder: ClassMetadataBuilder,
    overlays: OverlayStore,
    cache: MetadataCache,
    mode: GenerationMode,
    processed: HashSet<ClassName>,
}

impl MetadataGenerator {
    pub fn new(
        registry: Arc<ClassRegistry>,
        overlays: OverlayStore,
        cache: MetadataCache,
        mode: GenerationMode,
        date_format: DateFormat,
    ) -> Self {
        let builder = ClassMetadataBuilder::new(Arc::clone(&registry), date_format);
        Self::with_builder(builder, overlays, cache, mode)
    }

    /// Generator with a preconfigured builder, e.g. a custom extractor chain.
    pub fn with_builder(
        builder: ClassMetadataBuilder,
        overlays: OverlayStore,
        cache: MetadataCache,
        mode: GenerationMode,
    ) -> Self {
        Self {
            registry: Arc::clone(builder.registry()),
            builder,
            overlays,
            cache,
            mode,
            processed: HashSet::new(),
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Whether this generator already wrote the artifact of `class`.
    pub fn is_processed(&self, class: &ClassName) -> bool {
        self.processed.contains(class)
    }

    /// Generate the artifacts of `class` and its ancestors.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::Introspection`] if the class or an ancestor is
    ///   not registered, or the hierarchy is cyclic
    /// - [`GenerateError::Build`] if annotations cannot be encoded
    /// - [`GenerateError::Overlay`] if overlays cannot be loaded
    /// - [`GenerateError::Cache`] / [`GenerateError::Lock`] on filesystem
    ///   failures
    pub fn generate_for(&mut self, class: &ClassName) -> Result<GenerationReport, GenerateError> {
        let mut report = GenerationReport::new(class.clone());
        let mut lock = self.lock_cache()?;

        if self.mode.trusts_cache() && self.cache.exists(class) {
            debug!(class = %class, "cache artifact exists, skipping generation");
            report.cache_hit = true;
            lock.release()?;
            return Ok(report);
        }

        let registry = Arc::clone(&self.registry);
        for definition in registry.hierarchy(class)? {
            if self.processed.contains(&definition.name) {
                debug!(class = %definition.name, "already processed in this run");
                report.skipped.push(definition.name.clone());
                continue;
            }

            let path = self.generate_one(definition)?;
            self.processed.insert(definition.name.clone());
            report.written.push(path);
        }

        lock.release()?;
        Ok(report)
    }

    /// Take the cache lock, waiting if another process holds it.
    fn lock_cache(&self) -> Result<CacheLock, LockError> {
        let paths = self.cache.paths();
        match CacheLock::try_acquire(paths) {
            Err(LockError::AlreadyLocked) => {
                info!(lock = %paths.lock_path().display(), "waiting for cache lock");
                CacheLock::acquire(paths)
            }
            other => other,
        }
    }

    /// Generate every class in `classes`, in order.
    ///
    /// Stops at the first failing class.
    pub fn generate_all<'a, I>(&mut self, classes: I) -> Result<Vec<GenerationReport>, GenerateError>
    where
        I: IntoIterator<Item = &'a ClassName>,
    {
        classes
            .into_iter()
            .map(|class| self.generate_for(class))
            .collect()
    }

    /// Build the metadata of `class` merged with its overlay, without
    /// writing anything.
    pub fn merged_metadata(&mut self, class: &ClassName) -> Result<Value, GenerateError> {
        let registry = Arc::clone(&self.registry);
        let definition = registry.get(class)?;
        self.merge_with_overlay(definition)
    }

    fn generate_one(&mut self, definition: &ClassDefinition) -> Result<PathBuf, GenerateError> {
        let merged = self.merge_with_overlay(definition)?;
        let path = self.cache.write(&definition.name, &merged)?;
        info!(class = %definition.name, path = %path.display(), "wrote cache artifact");
        Ok(path)
    }

    fn merge_with_overlay(&mut self, definition: &ClassDefinition) -> Result<Value, GenerateError> {
        let metadata = self.builder.build(definition)?;
        let overlay = self.overlays.overlay_for(&definition.name)?;
        Ok(deep_merge(metadata.to_value()?, overlay))
    }
}

/// A generator shared across threads.
///
/// The processed set and the overlay store live behind one mutex.
#[derive(Clone)]
pub struct SharedGenerator {
    inner: Arc<Mutex<MetadataGenerator>>,
}

impl SharedGenerator {
    pub fn new(generator: MetadataGenerator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(generator)),
        }
    }

    pub fn generate_for(&self, class: &ClassName) -> Result<GenerationReport, GenerateError> {
        let mut generator = self.inner.lock().map_err(|_| GenerateError::Poisoned)?;
        generator.generate_for(class)
    }
}
