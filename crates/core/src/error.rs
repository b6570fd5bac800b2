//! Error types for collatedb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Note what is *not* an error here: unresolvable property paths (they
//! resolve to Absent), mixed-kind comparisons (the collator is total), and
//! lookups on a property without an index (they fall back to a scan).

use crate::path::PathParseError;
use thiserror::Error;

/// Result type alias for collatedb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for collatedb
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A property path could not be parsed
    #[error("Invalid property path: {0}")]
    InvalidPath(#[from] PathParseError),

    /// A binary index disagrees with the documents it indexes
    ///
    /// Raised by incremental maintenance when a position is inserted twice or
    /// removed while not present. The index must be rebuilt.
    #[error("Index corruption on '{property}' at position {position}: {reason}")]
    IndexCorruption {
        /// Indexed property
        property: String,
        /// Document position being maintained
        position: usize,
        /// What went wrong
        reason: String,
    },

    /// A document position is outside the collection
    #[error("Position {position} out of bounds (len {len})")]
    PositionOutOfBounds {
        /// Requested position
        position: usize,
        /// Number of documents
        len: usize,
    },

    /// A query value is not shaped like a query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A query names an operator this core does not evaluate
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// No binary index exists for the property
    #[error("No index on property '{0}'")]
    IndexNotFound(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an index corruption error
    pub fn corruption(
        property: impl Into<String>,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::IndexCorruption {
            property: property.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Whether this error means an index must be rebuilt
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::IndexCorruption { .. })
    }
}
