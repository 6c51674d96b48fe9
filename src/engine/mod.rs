//! engine
//!
//! Orchestrates the metadata pipeline: Build -> Merge -> Persist.
//!
//! # Architecture
//!
//! 1. **Build**: Class metadata from the class's own declarations ([`builder`])
//! 2. **Merge**: Deep merge with the class's overlay ([`overlay`], [`merge`])
//! 3. **Persist**: One atomic artifact per class ([`cache`])
//!
//! [`generator`] drives the three stages over a class hierarchy.
//! [`Session`] wires configuration, registry, and CLI flags into a
//! ready-to-run generator.
//!
//! # Invariants
//!
//! - Each class in a hierarchy is cached independently, with its own
//!   members only
//! - Ancestors are generated before descendants
//! - Overlays are loaded at most once per generator
//!
//! # Example
//!
//! ```ignore
//! use serialmeta::engine::{Context, Session};
//!
//! let session = Session::open(&Context::default())?;
//! let mut generator = session.generator(false);
//! generator.generate_for(&ClassName::new("App\\Domain\\Article")?)?;
//! ```

pub mod builder;
pub mod cache;
pub mod generator;
pub mod merge;
pub mod modes;
pub mod overlay;

pub use builder::{accessor_name, BuildError, ClassMetadataBuilder};
pub use cache::{CacheError, MetadataCache};
pub use generator::{GenerateError, GenerationReport, MetadataGenerator, SharedGenerator};
pub use merge::deep_merge;
pub use modes::GenerationMode;
pub use overlay::{OverlayError, OverlayStore};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::core::config::{Config, ConfigError};
use crate::core::paths::CachePaths;
use crate::reflect::{ClassRegistry, IntrospectionError};

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Project directory override.
    pub project: Option<PathBuf>,
    /// Explicit project config file.
    pub config: Option<PathBuf>,
    /// Class registration file override.
    pub registry: Option<PathBuf>,
    /// Debug mode: forces regeneration and enables debug logging.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// The project directory: the override, or the current directory.
    pub fn project_dir(&self) -> Result<PathBuf, EngineError> {
        match &self.project {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(EngineError::CurrentDir),
        }
    }
}

/// Errors from engine setup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The current directory could not be determined.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(std::io::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The class registry could not be loaded.
    #[error("class registry error: {0}")]
    Registry(#[from] IntrospectionError),
}

/// Configuration and registry resolved for one command invocation.
#[derive(Debug)]
pub struct Session {
    config: Config,
    registry: Arc<ClassRegistry>,
    debug: bool,
}

impl Session {
    /// Load configuration and the class registry.
    ///
    /// Config warnings are logged. CLI flags override configured values.
    pub fn open(ctx: &Context) -> Result<Self, EngineError> {
        let project_dir = ctx.project_dir()?;
        let config = Self::load_config(&project_dir, ctx.config.as_deref())?;
        let registry_path = ctx.registry.clone().unwrap_or_else(|| config.registry());
        let registry = ClassRegistry::from_yaml_file(&registry_path)?;

        Ok(Self {
            debug: ctx.debug || config.debug(),
            config,
            registry: Arc::new(registry),
        })
    }

    /// Load configuration only, logging warnings.
    pub fn load_config(project_dir: &Path, explicit: Option<&Path>) -> Result<Config, EngineError> {
        let result = Config::load(project_dir, explicit)?;
        for warning in &result.warnings {
            warn!(path = %warning.path.display(), "{}", warning.message);
        }
        Ok(result.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Whether debug mode is in effect.
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn overlays(&self) -> OverlayStore {
        OverlayStore::new(self.config.overlay_dirs(), self.config.overlay_extension())
    }

    pub fn cache(&self) -> MetadataCache {
        MetadataCache::new(CachePaths::new(self.config.cache_dir()))
    }

    /// A generator for this session.
    pub fn generator(&self, force: bool) -> MetadataGenerator {
        MetadataGenerator::new(
            Arc::clone(&self.registry),
            self.overlays(),
            self.cache(),
            GenerationMode::resolve(self.debug, force),
            self.config.date_format(),
        )
    }
}
