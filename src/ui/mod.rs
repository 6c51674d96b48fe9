//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All command output goes through this module so the quiet flag is
//! honored consistently. Diagnostics go through `tracing` instead.

pub mod output;
