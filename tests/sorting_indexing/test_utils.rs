//! Shared helpers for the sorting and indexing suite

#![allow(dead_code)]

pub use collatedb::{Collection, CollectionConfig, Position, Value};
pub use serde_json::json;
use tracing_subscriber::filter::LevelFilter;

/// Route engine logs to the test harness output
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Collection over `docs` with binary indexes on `indices`
pub fn collection_with(indices: &[&str], docs: Vec<Value>) -> Collection {
    let config = CollectionConfig::with_indices(indices.iter().copied());
    let mut coll = Collection::with_config("coll", config).expect("valid config");
    coll.insert_many(docs);
    coll
}

/// Collection over JSON documents with binary indexes on `indices`
pub fn json_collection(indices: &[&str], docs: Vec<serde_json::Value>) -> Collection {
    collection_with(indices, docs.into_iter().map(Value::from).collect())
}

/// The `a` field of each document, in order
pub fn field_a(docs: &[&Value]) -> Vec<Value> {
    docs.iter()
        .map(|d| d.get("a").cloned().unwrap_or_default())
        .collect()
}

/// Integer values as `Value`s
pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::from(v)).collect()
}

/// The documents used by the compound sort scenarios
pub fn abc_docs() -> Vec<serde_json::Value> {
    vec![
        json!({ "a": 1, "b": 9, "c": "first" }),
        json!({ "a": 5, "b": 7, "c": "second" }),
        json!({ "a": 2, "b": 9, "c": "third" }),
    ]
}
