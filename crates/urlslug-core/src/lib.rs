//! Core types and formatting rules for the URL slug field.
//!
//! This crate is deliberately free of runtime dependencies: it knows how to
//! turn free text into a path-preserving slug, how to join it under a URL
//! prefix, and how a prefix is resolved from a source document. The
//! interactive controller lives in `urlslug-field`.

pub mod document;
pub mod error;
pub mod format;
pub mod generate;
pub mod options;
pub mod resolver;
pub mod table;
pub mod value;

pub use error::{Error, Result};
