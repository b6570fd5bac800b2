//! Read access to documents by position
//!
//! Binary indexes store positions only. Whenever they need a key they read
//! the document back through a `DocumentSource`, which the storage
//! collaborator implements over its backing slots.

use collatedb_core::{Position, PropertyPath, Value};

/// Documents addressable by position
pub trait DocumentSource {
    /// Number of document slots
    fn len(&self) -> usize;

    /// Document at a position, if the slot exists
    fn document(&self, position: Position) -> Option<&Value>;

    /// Whether there are no documents
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a property of the document at `position`
    ///
    /// Out-of-range positions resolve to Absent like any other missing value.
    fn property(&self, position: Position, path: &PropertyPath) -> &Value {
        match self.document(position) {
            Some(doc) => path.resolve(doc),
            None => Value::absent(),
        }
    }
}

impl DocumentSource for [Value] {
    fn len(&self) -> usize {
        <[Value]>::len(self)
    }

    fn document(&self, position: Position) -> Option<&Value> {
        self.get(position)
    }
}

impl DocumentSource for Vec<Value> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn document(&self, position: Position) -> Option<&Value> {
        self.get(position)
    }
}
