//! Collections: document slots plus the binary indexes kept over them
//!
//! A `Collection` owns its documents in a dense `Vec`. A document's position
//! is its slot; removing a document compacts the slots above it down by one.
//!
//! Every write drives the index maintenance protocol:
//! - insert: push the document, then index the new slot
//! - update: unindex the slot under its old value, replace, reindex
//! - remove: unindex the slot, compact storage, shift every index
//!
//! With `adaptive_binary_indices = false` writes only flag indexes dirty, and
//! a dirty index is rebuilt before its next read. An index that reports
//! corruption during maintenance is flagged dirty the same way.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use collatedb_core::{Collator, Error, Position, PropertyPath, Result, StandardCollator, Value};
use collatedb_storage::BinaryIndex;
use tracing::{debug, error, info, warn};

use crate::config::CollectionConfig;
use crate::result_set::ResultSet;

/// Named set of documents with optional binary indexes
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    docs: Vec<Value>,
    /// Keyed by the property's dotted form
    indices: HashMap<String, BinaryIndex>,
    config: CollectionConfig,
    collator: Arc<dyn Collator>,
}

impl Collection {
    /// Empty collection with the default config
    pub fn new(name: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            docs: Vec::new(),
            indices: HashMap::new(),
            config: CollectionConfig::default(),
            collator: Arc::new(StandardCollator),
        }
    }

    /// Empty collection indexing every property named in `config`
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if a configured index property does not parse.
    pub fn with_config(name: impl Into<String>, config: CollectionConfig) -> Result<Self> {
        Self::with_collator(name, config, Arc::new(StandardCollator))
    }

    /// Empty collection ordered by a custom collator
    pub fn with_collator(
        name: impl Into<String>,
        config: CollectionConfig,
        collator: Arc<dyn Collator>,
    ) -> Result<Self> {
        let name = name.into();
        let paths = config.index_paths().map_err(|e| {
            warn!(collection = %name, error = %e, "Rejected collection config");
            e
        })?;

        let mut coll = Collection {
            name,
            docs: Vec::new(),
            indices: HashMap::new(),
            config,
            collator,
        };
        for path in paths {
            coll.install_index(path);
        }

        info!(
            collection = %coll.name,
            indices = coll.indices.len(),
            adaptive = coll.config.adaptive_binary_indices,
            "Created collection"
        );
        Ok(coll)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active config
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Collator ordering this collection
    pub fn collator(&self) -> &Arc<dyn Collator> {
        &self.collator
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Document at `position`
    pub fn get(&self, position: Position) -> Option<&Value> {
        self.docs.get(position)
    }

    /// Every document in position order
    pub fn documents(&self) -> &[Value] {
        &self.docs
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Append a document, returning its position
    pub fn insert(&mut self, doc: impl Into<Value>) -> Position {
        let position = self.docs.len();
        self.docs.push(doc.into());
        self.index_insert(position);
        position
    }

    /// Append several documents, returning the positions they took
    pub fn insert_many<I, T>(&mut self, docs: I) -> Range<Position>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let start = self.docs.len();
        for doc in docs {
            self.insert(doc);
        }
        start..self.docs.len()
    }

    /// Replace the document at `position`, returning the old one
    ///
    /// # Errors
    ///
    /// Returns `PositionOutOfBounds` if no document is stored there.
    pub fn update(&mut self, position: Position, doc: impl Into<Value>) -> Result<Value> {
        self.check_position(position)?;
        self.index_remove(position);
        let old = std::mem::replace(&mut self.docs[position], doc.into());
        self.index_insert(position);
        Ok(old)
    }

    /// Remove the document at `position`, returning it
    ///
    /// Documents above `position` move down one slot.
    ///
    /// # Errors
    ///
    /// Returns `PositionOutOfBounds` if no document is stored there.
    pub fn remove(&mut self, position: Position) -> Result<Value> {
        self.check_position(position)?;
        self.index_remove(position);
        let doc = self.docs.remove(position);
        for index in self.indices.values_mut() {
            if !index.is_dirty() {
                index.shift_after_removal(position);
            }
        }
        Ok(doc)
    }

    /// Remove every document
    ///
    /// Indexes added after creation are dropped; the configured ones stay,
    /// empty.
    pub fn clear(&mut self) {
        let configured: Vec<String> = self
            .config
            .index_paths()
            .unwrap_or_default()
            .iter()
            .map(PropertyPath::to_string)
            .collect();
        self.indices.retain(|name, _| configured.contains(name));
        for index in self.indices.values_mut() {
            index.clear();
        }
        self.docs.clear();
        debug!(collection = %self.name, "Cleared collection");
    }

    fn check_position(&self, position: Position) -> Result<()> {
        if position < self.docs.len() {
            Ok(())
        } else {
            Err(Error::PositionOutOfBounds {
                position,
                len: self.docs.len(),
            })
        }
    }

    fn index_insert(&mut self, position: Position) {
        let adaptive = self.config.adaptive_binary_indices;
        for index in self.indices.values_mut() {
            if !adaptive || index.is_dirty() {
                index.mark_dirty();
                continue;
            }
            if let Err(e) = index.insert(position, &self.docs) {
                error!(
                    collection = %self.name,
                    error = %e,
                    "Index insert failed, scheduling rebuild"
                );
                index.mark_dirty();
            }
        }
    }

    fn index_remove(&mut self, position: Position) {
        let adaptive = self.config.adaptive_binary_indices;
        for index in self.indices.values_mut() {
            if !adaptive || index.is_dirty() {
                index.mark_dirty();
                continue;
            }
            if let Err(e) = index.remove(position, &self.docs) {
                error!(
                    collection = %self.name,
                    error = %e,
                    "Index remove failed, scheduling rebuild"
                );
                index.mark_dirty();
            }
        }
    }

    // =========================================================================
    // Index management
    // =========================================================================

    fn install_index(&mut self, path: PropertyPath) {
        let index = BinaryIndex::build(path, Arc::clone(&self.collator), &self.docs);
        info!(
            collection = %self.name,
            property = %index.property(),
            entries = index.len(),
            "Built binary index"
        );
        self.indices.insert(index.property().to_string(), index);
    }

    /// Build the binary index on `property` from the current documents
    ///
    /// An existing index, clean or not, is rebuilt from scratch, so this
    /// also repairs an index that has drifted from the documents.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if `property` does not parse.
    pub fn ensure_index(&mut self, property: &str) -> Result<()> {
        let path: PropertyPath = property.parse()?;
        match self.indices.get_mut(&path.to_string()) {
            Some(index) => {
                index.rebuild(&self.docs);
                info!(collection = %self.name, property = %path, "Rebuilt binary index");
            }
            None => self.install_index(path),
        }
        Ok(())
    }

    /// Bring every index up to date
    ///
    /// Only dirty indexes are rebuilt unless `force` is set.
    pub fn ensure_all_indexes(&mut self, force: bool) {
        for index in self.indices.values_mut() {
            if force || index.is_dirty() {
                index.rebuild(&self.docs);
            }
        }
    }

    /// Drop the index on `property`, returning whether one existed
    pub fn drop_index(&mut self, property: &str) -> bool {
        let dropped = self.indices.remove(property).is_some();
        if dropped {
            info!(collection = %self.name, property, "Dropped binary index");
        }
        dropped
    }

    /// Whether `property` is indexed
    pub fn has_index(&self, property: &str) -> bool {
        self.indices.contains_key(property)
    }

    /// Index on `property`, dirty or not
    pub fn index(&self, property: &str) -> Option<&BinaryIndex> {
        self.indices.get(property)
    }

    /// Index order for `property`, rebuilding first if dirty
    ///
    /// # Errors
    ///
    /// Returns `IndexNotFound` if `property` is not indexed.
    pub fn index_positions(&mut self, property: &str) -> Result<&[Position]> {
        let index = self
            .indices
            .get_mut(property)
            .ok_or_else(|| Error::IndexNotFound(property.to_string()))?;
        if index.is_dirty() {
            debug!(collection = %self.name, property, "Lazy rebuild of dirty index");
            index.rebuild(&self.docs);
        }
        Ok(index.positions())
    }

    /// Verify the index on `property` against the documents
    ///
    /// A pending (dirty) index is rebuilt before it is checked. Returns
    /// whether the index was consistent; with `repair`, an inconsistent
    /// index is rebuilt.
    ///
    /// # Errors
    ///
    /// Returns `IndexNotFound` if `property` is not indexed.
    pub fn check_index(&mut self, property: &str, repair: bool) -> Result<bool> {
        let index = self
            .indices
            .get_mut(property)
            .ok_or_else(|| Error::IndexNotFound(property.to_string()))?;
        if index.is_dirty() {
            index.rebuild(&self.docs);
        }
        let valid = index.check(&self.docs);
        if !valid {
            warn!(collection = %self.name, property, repair, "Binary index failed validation");
            if repair {
                index.rebuild(&self.docs);
            }
        }
        Ok(valid)
    }

    /// Check every index, returning the properties that failed, sorted
    pub fn check_all_indexes(&mut self, repair: bool) -> Vec<String> {
        let mut names: Vec<String> = self.indices.keys().cloned().collect();
        names.sort();
        names
            .into_iter()
            .filter(|name| !matches!(self.check_index(name, repair), Ok(true)))
            .collect()
    }

    /// Rebuild every dirty index
    fn refresh(&mut self) {
        for index in self.indices.values_mut() {
            if index.is_dirty() {
                debug!(
                    collection = %self.name,
                    property = %index.property(),
                    "Lazy rebuild of dirty index"
                );
                index.rebuild(&self.docs);
            }
        }
    }

    /// Clean index on `path`, if any
    pub(crate) fn clean_index(&self, path: &PropertyPath) -> Option<&BinaryIndex> {
        self.indices
            .get(&path.to_string())
            .filter(|index| !index.is_dirty())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Start a result set over every document
    ///
    /// Dirty indexes are rebuilt first so the pipeline can read them.
    pub fn chain(&mut self) -> ResultSet<'_> {
        self.refresh();
        ResultSet::new(self)
    }

    /// Positions of documents matching `filter`, in position order
    pub fn find(&mut self, filter: &Value) -> Result<Vec<Position>> {
        Ok(self.chain().find(filter)?.into_positions())
    }
}
