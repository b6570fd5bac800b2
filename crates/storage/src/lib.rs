//! Storage-side indexing for collatedb
//!
//! This crate implements the index structures that sit next to document
//! storage:
//! - BinaryIndex: positions sorted by a property's collated value
//! - DocumentSource: positional read access the index uses to fetch keys
//!
//! Indexes never own documents. The storage collaborator notifies them of
//! every insert, update and removal so they stay consistent.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod source;

pub use index::BinaryIndex;
pub use source::DocumentSource;
