//! Result sets: ordered position sequences flowing through a query pipeline
//!
//! A `ResultSet` borrows its collection and owns its positions. Each stage
//! consumes the set and hands back a new one:
//!
//! ```ignore
//! let positions = coll
//!     .chain()
//!     .find(&query)?
//!     .compoundsort(&[("b", false), ("c", true)])?
//!     .limit(10)
//!     .into_positions();
//! ```
//!
//! # Sort strategies
//!
//! - `simplesort`: one property, collation order. Reads a clean binary index
//!   directly when one exists, otherwise sorts stably.
//! - `sort_by` / `try_sort_by`: caller-supplied comparator over documents.
//! - `compoundsort`: lexicographic multi-key stable sort, each key with its
//!   own direction.
//!
//! Descending order never flips ties: equal keys keep their relative order
//! on both the indexed and the unindexed path.

use std::cmp::Ordering;
use std::collections::HashSet;

use collatedb_core::{Collator, Position, PropertyPath, Result, Value};
use collatedb_storage::DocumentSource;
use tracing::debug;

use crate::collection::Collection;
use crate::query::{EqualityQuery, Query};

// =============================================================================
// SortKey
// =============================================================================

/// One level of a compound sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Property to sort on
    pub path: PropertyPath,
    /// Reverse this level
    pub descending: bool,
}

impl SortKey {
    /// Parse a key from a dotted path
    pub fn new(path: &str, descending: bool) -> Result<Self> {
        Ok(SortKey {
            path: path.parse()?,
            descending,
        })
    }

    /// Ascending key
    pub fn asc(path: PropertyPath) -> Self {
        SortKey {
            path,
            descending: false,
        }
    }

    /// Descending key
    pub fn desc(path: PropertyPath) -> Self {
        SortKey {
            path,
            descending: true,
        }
    }
}

// =============================================================================
// ResultSet
// =============================================================================

/// Ordered positions over a borrowed collection
#[derive(Debug, Clone)]
pub struct ResultSet<'a> {
    collection: &'a Collection,
    positions: Vec<Position>,
    /// False while `positions` is still every document in storage order
    filtered: bool,
}

impl<'a> ResultSet<'a> {
    /// Every document of the collection, in storage order
    pub fn new(collection: &'a Collection) -> Self {
        ResultSet {
            collection,
            positions: (0..collection.len()).collect(),
            filtered: false,
        }
    }

    fn document(&self, position: Position) -> &'a Value {
        self.collection
            .documents()
            .document(position)
            .unwrap_or(Value::absent())
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Narrow to documents matching a query value such as
    /// `{ "b": { "$aeq": 3 } }`
    pub fn find(self, filter: &Value) -> Result<Self> {
        let query = Query::parse(filter)?;
        Ok(self.find_query(&query))
    }

    /// Narrow to documents matching every clause of `query`
    ///
    /// The first clause on an unfiltered set may use a binary index; later
    /// clauses scan the surviving positions.
    pub fn find_query(mut self, query: &Query) -> Self {
        for clause in query.clauses() {
            self = self.find_clause(clause);
        }
        self
    }

    /// Narrow to documents matching one clause
    pub fn find_clause(mut self, clause: &EqualityQuery) -> Self {
        let collection = self.collection;
        let docs = collection.documents();
        let collator = collection.collator().as_ref();
        self.positions = if self.filtered {
            clause.evaluate(docs, collator, None, Some(self.positions.as_slice()))
        } else {
            let index = collection.clean_index(&clause.path);
            clause.evaluate(docs, collator, index, None)
        };
        self.filtered = true;
        self
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sort by one property in collation order
    pub fn simplesort(self, property: &str, descending: bool) -> Result<Self> {
        let path: PropertyPath = property.parse()?;
        Ok(self.simplesort_path(&path, descending))
    }

    /// Sort by one already-parsed property
    pub fn simplesort_path(mut self, path: &PropertyPath, descending: bool) -> Self {
        let collection = self.collection;
        let docs = collection.documents();

        if let Some(index) = collection.clean_index(path) {
            debug!(
                property = %path,
                descending,
                filtered = self.filtered,
                "Simple sort via binary index"
            );
            let ordered = if descending {
                index.descending(docs)
            } else {
                index.positions().to_vec()
            };
            self.positions = if self.filtered {
                let members: HashSet<Position> = self.positions.iter().copied().collect();
                ordered.into_iter().filter(|p| members.contains(p)).collect()
            } else {
                ordered
            };
            return self;
        }

        debug!(property = %path, descending, "Simple sort via collation");
        let collator = collection.collator();
        let mut keyed: Vec<(Position, &Value)> = self
            .positions
            .iter()
            .map(|&p| (p, docs.property(p, path)))
            .collect();
        keyed.sort_by(|a, b| {
            let ord = collator.compare(a.1, b.1);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        self.positions = keyed.into_iter().map(|(p, _)| p).collect();
        self
    }

    /// Sort with a caller-supplied comparator over whole documents
    ///
    /// A panicking comparator unwinds through this call untouched.
    pub fn sort_by<F>(mut self, mut compare: F) -> Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let collection = self.collection;
        let doc = |p: Position| {
            collection
                .documents()
                .document(p)
                .unwrap_or(Value::absent())
        };
        self.positions.sort_by(|&a, &b| compare(doc(a), doc(b)));
        self
    }

    /// Sort with a fallible comparator
    ///
    /// The first error the comparator returns is handed back unchanged; the
    /// set is consumed either way.
    pub fn try_sort_by<F, E>(mut self, mut compare: F) -> std::result::Result<Self, E>
    where
        F: FnMut(&Value, &Value) -> std::result::Result<Ordering, E>,
    {
        let collection = self.collection;
        let doc = |p: Position| {
            collection
                .documents()
                .document(p)
                .unwrap_or(Value::absent())
        };
        let mut failure = None;
        self.positions.sort_by(|&a, &b| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            match compare(doc(a), doc(b)) {
                Ok(ord) => ord,
                Err(e) => {
                    failure = Some(e);
                    Ordering::Equal
                }
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// Sort by several properties, each with its own direction
    ///
    /// `&[("b", false), ("c", true)]` orders by `b` ascending, then breaks
    /// ties on `c` descending.
    pub fn compoundsort(self, keys: &[(&str, bool)]) -> Result<Self> {
        let keys = keys
            .iter()
            .map(|&(path, descending)| SortKey::new(path, descending))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.compoundsort_keys(&keys))
    }

    /// Sort by already-parsed keys
    ///
    /// A single key is handed to `simplesort` so it can use an index.
    pub fn compoundsort_keys(mut self, keys: &[SortKey]) -> Self {
        match keys {
            [] => return self,
            [only] => return self.simplesort_path(&only.path, only.descending),
            _ => {}
        }

        debug!(levels = keys.len(), "Compound sort");
        let collection = self.collection;
        let docs = collection.documents();
        let collator = collection.collator();
        let mut keyed: Vec<(Position, Vec<&Value>)> = self
            .positions
            .iter()
            .map(|&p| (p, keys.iter().map(|k| docs.property(p, &k.path)).collect()))
            .collect();
        keyed.sort_by(|a, b| compare_levels(collator.as_ref(), keys, &a.1, &b.1));
        self.positions = keyed.into_iter().map(|(p, _)| p).collect();
        self
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Keep at most `n` positions
    pub fn limit(mut self, n: usize) -> Self {
        self.positions.truncate(n);
        self.filtered = true;
        self
    }

    /// Skip the first `n` positions
    pub fn offset(mut self, n: usize) -> Self {
        let n = n.min(self.positions.len());
        self.positions.drain(..n);
        self.filtered = true;
        self
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Number of positions
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Positions in result order
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Consume into positions
    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    /// Documents in result order
    pub fn data(&self) -> Vec<&'a Value> {
        self.positions.iter().map(|&p| self.document(p)).collect()
    }
}

fn compare_levels(
    collator: &dyn Collator,
    keys: &[SortKey],
    a: &[&Value],
    b: &[&Value],
) -> Ordering {
    for (level, key) in keys.iter().enumerate() {
        let ord = collator.compare(a[level], b[level]);
        let ord = if key.descending { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
