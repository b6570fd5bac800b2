//! Database: a named registry of collections
//!
//! The database owns its collections and hands out references by name.
//! It adds no locking; an embedding system that shares a database across
//! threads wraps it in its own exclusion.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use collatedb_core::Result;
use tracing::info;

use crate::collection::Collection;
use crate::config::CollectionConfig;

/// Named set of collections
#[derive(Debug, Clone, Default)]
pub struct Database {
    name: String,
    collections: HashMap<String, Collection>,
}

impl Database {
    /// Empty database
    pub fn new(name: impl Into<String>) -> Self {
        Database {
            name: name.into(),
            collections: HashMap::new(),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get or create the collection called `name`
    ///
    /// An existing collection is returned as is; `config` only applies to
    /// a newly created one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if a new collection's config names an index
    /// property that does not parse.
    pub fn add_collection(
        &mut self,
        name: &str,
        config: CollectionConfig,
    ) -> Result<&mut Collection> {
        match self.collections.entry(name.to_string()) {
            Entry::Occupied(existing) => Ok(existing.into_mut()),
            Entry::Vacant(slot) => {
                let coll = Collection::with_config(name, config)?;
                info!(database = %self.name, collection = name, "Added collection");
                Ok(slot.insert(coll))
            }
        }
    }

    /// Register an already-built collection, replacing any of the same name
    pub fn insert_collection(&mut self, coll: Collection) -> Option<Collection> {
        info!(database = %self.name, collection = coll.name(), "Registered collection");
        self.collections.insert(coll.name().to_string(), coll)
    }

    /// Collection called `name`
    pub fn get_collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Mutable collection called `name`
    pub fn get_collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    /// Remove and return the collection called `name`
    pub fn remove_collection(&mut self, name: &str) -> Option<Collection> {
        let removed = self.collections.remove(name);
        if removed.is_some() {
            info!(database = %self.name, collection = name, "Removed collection");
        }
        removed
    }

    /// Collection names, sorted
    pub fn collection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
