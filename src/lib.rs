//! serialmeta - Serializer metadata generation, merging, and caching
//!
//! serialmeta builds per-class serializer metadata (property types, groups,
//! exclusion rules, serialized names, virtual properties) from declared
//! class structure, deep-merges it with operator-authored overlay files,
//! and persists one artifact per class for a downstream serializer.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Build -> Merge -> Persist pipeline
//! - [`reflect`] - Class registry and type extraction strategies
//! - [`core`] - Domain types, metadata schemas, config, and storage primitives
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Every class in a hierarchy gets its own artifact with its own members only
//! 2. Overlays win on conflicts; sequences are replaced, never concatenated
//! 3. Artifacts are written atomically under an exclusive cache lock
//! 4. Metadata for a given registry and overlay set is deterministic

pub mod cli;
pub mod core;
pub mod engine;
pub mod reflect;
pub mod ui;
