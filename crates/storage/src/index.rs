//! Binary indexes: positions kept sorted by a property's collated value
//!
//! This module provides:
//! - BinaryIndex: ordered sequence of document positions for one property
//! - Eager build, incremental insert/remove maintenance, compaction shift
//! - Binary-search equality ranges under the collator's loose equality
//! - Consistency checking for repair
//!
//! # Invariants
//!
//! - For adjacent positions `p[i], p[i+1]`: `key(p[i]) <= key(p[i+1])`
//! - Equal keys are in ascending position order: a build is a stable sort
//!   over positions, and an insert is placed by (key, position), so
//!   incremental maintenance always matches a fresh build
//! - The index stores positions only, never documents or copies of values
//!
//! # Usage
//!
//! Indexing is OPTIONAL. Lookups and sorts work without it (via full scan).
//! The storage collaborator drives maintenance synchronously on every write:
//! `remove` before a document changes or leaves, `insert` after it lands.

use std::ops::Range;
use std::sync::Arc;

use collatedb_core::{Collator, Error, Position, PropertyPath, Result, StandardCollator, Value};
use tracing::debug;

use crate::source::DocumentSource;

// ============================================================================
// BinaryIndex
// ============================================================================

/// Sorted position index over one property
///
/// # Thread Safety
///
/// No internal locking. Writers must have exclusive access; the embedding
/// system serializes maintenance against reads of the same index.
#[derive(Debug, Clone)]
pub struct BinaryIndex {
    /// Indexed property
    property: PropertyPath,

    /// Positions in collation order
    values: Vec<Position>,

    /// Set when writes were not applied incrementally; rebuild before use
    dirty: bool,

    /// Order used for keys
    collator: Arc<dyn Collator>,
}

impl BinaryIndex {
    /// Create an empty index using the standard collator
    pub fn new(property: PropertyPath) -> Self {
        Self::with_collator(property, Arc::new(StandardCollator))
    }

    /// Create an empty index with a custom collator
    pub fn with_collator(property: PropertyPath, collator: Arc<dyn Collator>) -> Self {
        BinaryIndex {
            property,
            values: Vec::new(),
            dirty: false,
            collator,
        }
    }

    /// Build an index over every document in `docs`
    ///
    /// O(n log n) comparisons. Ties keep position order.
    pub fn build<D: DocumentSource + ?Sized>(
        property: PropertyPath,
        collator: Arc<dyn Collator>,
        docs: &D,
    ) -> Self {
        let mut index = Self::with_collator(property, collator);
        index.rebuild(docs);
        index
    }

    /// Rebuild from scratch, clearing the dirty flag
    pub fn rebuild<D: DocumentSource + ?Sized>(&mut self, docs: &D) {
        let keys: Vec<&Value> = (0..docs.len())
            .map(|p| docs.property(p, &self.property))
            .collect();
        let mut values: Vec<Position> = (0..keys.len()).collect();
        // slice::sort_by is stable, so equal keys stay in position order
        values.sort_by(|&a, &b| self.collator.compare(keys[a], keys[b]));

        debug!(property = %self.property, entries = values.len(), "Built binary index");
        self.values = values;
        self.dirty = false;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Indexed property
    pub fn property(&self) -> &PropertyPath {
        &self.property
    }

    /// Positions in ascending collation order
    pub fn positions(&self) -> &[Position] {
        &self.values
    }

    /// Number of indexed positions
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the index holds no positions
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Collator used for keys
    pub fn collator(&self) -> &Arc<dyn Collator> {
        &self.collator
    }

    /// Whether the index needs a rebuild before it can be read
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the index for rebuild
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Drop every position
    pub fn clear(&mut self) {
        self.values.clear();
        self.dirty = false;
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Index the document now stored at `position`
    ///
    /// Entries are ordered by key, then by position, which is exactly the
    /// order a fresh build produces. An append lands after every equal key;
    /// a reinsert after an update lands at its position within the run.
    ///
    /// Returns `IndexCorruption` if `position` is already indexed.
    pub fn insert<D: DocumentSource + ?Sized>(
        &mut self,
        position: Position,
        docs: &D,
    ) -> Result<()> {
        if position >= docs.len() {
            return Err(Error::PositionOutOfBounds {
                position,
                len: docs.len(),
            });
        }
        if self.values.contains(&position) {
            return Err(Error::corruption(
                self.property.to_string(),
                position,
                "position already indexed",
            ));
        }

        let key = docs.property(position, &self.property);
        let at = self.values.partition_point(|&p| {
            self.collator
                .compare(docs.property(p, &self.property), key)
                .then(p.cmp(&position))
                .is_lt()
        });
        self.values.insert(at, position);
        Ok(())
    }

    /// Remove `position` from the index
    ///
    /// Must be called while `docs` still holds the document being removed or
    /// replaced: the entry is located by binary search on its current key.
    ///
    /// Returns `IndexCorruption` if `position` is not found under its key.
    pub fn remove<D: DocumentSource + ?Sized>(
        &mut self,
        position: Position,
        docs: &D,
    ) -> Result<()> {
        let key = docs.property(position, &self.property);
        let range = self.range_for(key, docs);
        match self.values[range.clone()].iter().position(|&p| p == position) {
            Some(offset) => {
                self.values.remove(range.start + offset);
                Ok(())
            }
            None => Err(Error::corruption(
                self.property.to_string(),
                position,
                "position not indexed under its current value",
            )),
        }
    }

    /// Renumber positions after storage compacted away slot `removed`
    ///
    /// Every position above `removed` moves down by one.
    pub fn shift_after_removal(&mut self, removed: Position) {
        for p in self.values.iter_mut() {
            if *p > removed {
                *p -= 1;
            }
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Sub-range of `positions()` whose keys collate equal to `value`
    ///
    /// This is loose equality, so the range can be wider than strict
    /// equality (text `"7"` next to number `7`). Callers needing a stricter
    /// match confirm each candidate.
    pub fn range_for<D: DocumentSource + ?Sized>(
        &self,
        value: &Value,
        docs: &D,
    ) -> Range<usize> {
        self.lower_bound(value, docs)..self.upper_bound(value, docs)
    }

    /// Positions whose keys collate equal to `value`, in index order
    pub fn positions_for<D: DocumentSource + ?Sized>(
        &self,
        value: &Value,
        docs: &D,
    ) -> &[Position] {
        let range = self.range_for(value, docs);
        &self.values[range]
    }

    /// Positions in descending collation order
    ///
    /// Runs of equal keys are emitted from the highest down, each run kept
    /// in its ascending (insertion) order, so ties are not flipped.
    pub fn descending<D: DocumentSource + ?Sized>(&self, docs: &D) -> Vec<Position> {
        let mut out = Vec::with_capacity(self.values.len());
        let mut end = self.values.len();
        while end > 0 {
            let key = docs.property(self.values[end - 1], &self.property);
            let start = self.values[..end].partition_point(|&p| {
                self.collator
                    .compare(docs.property(p, &self.property), key)
                    .is_lt()
            });
            out.extend_from_slice(&self.values[start..end]);
            end = start;
        }
        out
    }

    /// First slot whose key is not less than `value`
    fn lower_bound<D: DocumentSource + ?Sized>(&self, value: &Value, docs: &D) -> usize {
        self.values.partition_point(|&p| {
            self.collator
                .compare(docs.property(p, &self.property), value)
                .is_lt()
        })
    }

    /// First slot whose key is greater than `value`
    fn upper_bound<D: DocumentSource + ?Sized>(&self, value: &Value, docs: &D) -> usize {
        self.values.partition_point(|&p| {
            self.collator
                .compare(docs.property(p, &self.property), value)
                .is_le()
        })
    }

    // ========================================================================
    // Consistency
    // ========================================================================

    /// Verify the index against the documents
    ///
    /// Checks that every document position appears exactly once, that
    /// adjacent entries are in collation order, and that equal keys are in
    /// ascending position order.
    pub fn check<D: DocumentSource + ?Sized>(&self, docs: &D) -> bool {
        if self.dirty || self.values.len() != docs.len() {
            return false;
        }

        let mut seen = vec![false; docs.len()];
        for &p in &self.values {
            match seen.get_mut(p) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }

        self.values.windows(2).all(|pair| {
            self.collator
                .compare(
                    docs.property(pair[0], &self.property),
                    docs.property(pair[1], &self.property),
                )
                .then(pair[0].cmp(&pair[1]))
                .is_lt()
        })
    }
}
