//! core
//!
//! Core domain types, schemas, and storage primitives for serialmeta.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ClassName
//! - [`metadata`] - Metadata records, type signatures, codec, annotations
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for the metadata cache
//! - [`lock`] - Exclusive lock on the cache directory
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Metadata building is deterministic

pub mod config;
pub mod lock;
pub mod metadata;
pub mod paths;
pub mod types;
