//! core::metadata
//!
//! Serializer metadata: records, type signatures, parameter codec, and
//! annotation extraction.
//!
//! # Modules
//!
//! - [`schema`] - Metadata record types
//! - [`signature`] - Type descriptors and canonical type signatures
//! - [`codec`] - Handler parameter encode/decode
//! - [`annotations`] - Declarative annotations and their extraction
//!
//! Everything here is pure: no filesystem access, no registry lookups.

pub mod annotations;
pub mod codec;
pub mod schema;
pub mod signature;

// Re-export commonly used types
pub use annotations::{extract, Annotation};
pub use codec::{decode, encode, encode_params, CodecError, HandlerParam};
pub use schema::{ClassMetadata, PropertyMetadata, SchemaError, VirtualPropertyMetadata};
pub use signature::{DateFormat, DateKind, TypeDescriptor, TypeStringifier};
