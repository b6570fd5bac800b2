//! Collection engine for collatedb
//!
//! This crate ties documents, indexes and queries together:
//! - Collection: document slots plus index maintenance on every write
//! - ResultSet: the sort engine (simplesort, custom sort, compound sort)
//! - Query: `$aeq` / `$dteq` equality evaluation, index-backed when possible
//! - CollectionConfig: TOML-loadable index settings
//! - Database: registry of named collections
//!
//! The engine is the only component that knows when an index may be read
//! and when it must be rebuilt first.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod database;
pub mod query;
pub mod result_set;

pub use collection::Collection;
pub use config::{CollectionConfig, CONFIG_FILE_NAME};
pub use database::Database;
pub use query::{EqualityOp, EqualityQuery, Query};
pub use result_set::{ResultSet, SortKey};
