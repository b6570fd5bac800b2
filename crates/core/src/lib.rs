//! Core types for collatedb
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: closed tagged-variant type for document field values
//! - Kind: per-comparison classification of a value
//! - Collation: universal total order, loose and temporal equality
//! - Collator: pluggable comparator seam (StandardCollator by default)
//! - PropertyPath: dotted path resolution into documents
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collation;
pub mod error;
pub mod path;
pub mod value;

pub use collation::{
    compare, loose_eq, parse_numeric_text, temporal_eq, CollationKey, Collator, StandardCollator,
    Tier,
};
pub use error::{Error, Result};
pub use path::{resolve, PathParseError, PropertyPath};
pub use value::{Kind, Value};

/// A document's slot in a collection's backing storage
pub type Position = usize;
