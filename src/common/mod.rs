//! Common types and utilities shared across the crate.

pub mod encoding;
pub mod error;

pub use error::{Error, Result};
