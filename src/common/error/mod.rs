//! Unified error types for the converter.
//!
//! Parsing errors are reported as [`RtfError`](crate::rtf::RtfError); this
//! module wraps them together with I/O failures for the file-oriented API.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
