//! collatedb - collation, binary indexing and sorting for in-memory documents
//!
//! collatedb orders heterogeneous document values under one universal
//! collation, keeps binary indexes over document properties, and sorts
//! result sets by one or many keys.
//!
//! # Quick Start
//!
//! ```ignore
//! use collatedb::{Collection, CollectionConfig, Value};
//! use serde_json::json;
//!
//! let mut coll = Collection::with_config("items", CollectionConfig::with_indices(["a"]))?;
//! coll.insert(json!({ "a": 4 }));
//! coll.insert(json!({ "a": "3" }));
//!
//! // Indexed sort: numeric text collates with numbers
//! let sorted = coll.chain().simplesort("a", false)?.into_positions();
//! assert_eq!(sorted, vec![1, 0]);
//!
//! // Loose equality: "4" matches 4
//! let hits = coll.find(&Value::from(json!({ "a": { "$aeq": "4" } })))?;
//! assert_eq!(hits, vec![0]);
//! ```
//!
//! # Architecture
//!
//! - `collatedb-core`: values, the collator, property paths, errors
//! - `collatedb-storage`: the binary index
//! - `collatedb-engine`: collections, result sets, queries, config

pub use collatedb_core::{
    compare, loose_eq, parse_numeric_text, resolve, temporal_eq, CollationKey, Collator, Error,
    Kind, PathParseError, Position, PropertyPath, Result, StandardCollator, Tier, Value,
};
pub use collatedb_engine::{
    Collection, CollectionConfig, Database, EqualityOp, EqualityQuery, Query, ResultSet, SortKey,
    CONFIG_FILE_NAME,
};
pub use collatedb_storage::{BinaryIndex, DocumentSource};
