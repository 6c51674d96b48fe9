//! engine::modes
//!
//! Generation modes.
//!
//! In normal mode an existing artifact for the requested class is trusted
//! and generation is a no-op. Force-regenerate mode never trusts existing
//! artifacts; it is selected by debug mode or by an explicit `--force`.

/// Whether existing cache artifacts are trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Reuse an existing artifact of the requested class.
    #[default]
    Normal,

    /// Rebuild regardless of existing artifacts.
    ForceRegenerate,
}

impl GenerationMode {
    /// Resolve the mode from the debug flag and an explicit force request.
    pub fn resolve(debug: bool, force: bool) -> Self {
        if debug || force {
            Self::ForceRegenerate
        } else {
            Self::Normal
        }
    }

    pub fn trusts_cache(&self) -> bool {
        matches!(self, Self::Normal)
    }
}
