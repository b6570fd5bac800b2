//! Sorting and Indexing Test Suite
//!
//! End-to-end checks of the collation order, binary indexes and the sort
//! engine, driven through the public `collatedb` API.
//!
//! ## Modules
//!
//! - **simplesort**: single-key sorts, indexed and unindexed, nested paths
//! - **compoundsort**: multi-key sorts and custom comparators
//! - **mixed_types**: the fixed cross-kind collation order
//! - **temporal**: loose vs exact equality on instants
//! - **maintenance**: index consistency across writes
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test sorting_indexing
//!
//! # Only the mixed-kind ordering
//! cargo test --test sorting_indexing mixed
//! ```

mod test_utils;

mod compoundsort;
mod maintenance;
mod simplesort;
