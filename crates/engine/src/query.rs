//! Equality queries answered through binary indexes
//!
//! Two operators are evaluated here:
//!
//! | Operator | Names | Index path |
//! |----------|-------|------------|
//! | Loose | `$aeq`, `looseEquality` | equal-key range, no confirmation |
//! | Temporal | `$dteq`, `temporalEquality` | equal-key range, then exact instant check |
//!
//! Without an index both fall back to a linear scan applying the same
//! predicate, which yields the same positions.
//!
//! Queries are written as structured values:
//! `{ "b": { "$dteq": <instant> } }`. Several properties are conjunctive.

use std::fmt;

use collatedb_core::{Collator, Error, Position, PropertyPath, Result, Value};
use collatedb_storage::{BinaryIndex, DocumentSource};
use tracing::debug;

// =============================================================================
// EqualityOp
// =============================================================================

/// Equality operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqualityOp {
    /// Values collate equal (`"7"` matches `7`)
    Loose,
    /// Exact instant equality for temporal query values
    Temporal,
}

impl EqualityOp {
    /// Look up an operator by name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "$aeq" | "looseEquality" => Ok(EqualityOp::Loose),
            "$dteq" | "temporalEquality" => Ok(EqualityOp::Temporal),
            other => Err(Error::UnknownOperator(other.to_string())),
        }
    }

    /// Canonical operator name
    pub fn name(&self) -> &'static str {
        match self {
            EqualityOp::Loose => "$aeq",
            EqualityOp::Temporal => "$dteq",
        }
    }

    /// Whether `candidate` satisfies this operator against `query`
    ///
    /// Temporal equality on a non-temporal query value degrades to loose
    /// equality under the same collator.
    pub fn matches(&self, collator: &dyn Collator, candidate: &Value, query: &Value) -> bool {
        match (self, query) {
            (EqualityOp::Temporal, Value::Temporal(q)) => candidate.as_temporal() == Some(q),
            _ => collator.compare(candidate, query).is_eq(),
        }
    }

    /// Whether index candidates need a confirmation pass
    fn confirms(&self) -> bool {
        matches!(self, EqualityOp::Temporal)
    }
}

impl fmt::Display for EqualityOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// EqualityQuery
// =============================================================================

/// One `property op value` clause
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityQuery {
    /// Property to test
    pub path: PropertyPath,
    /// Operator
    pub op: EqualityOp,
    /// Query value
    pub value: Value,
}

impl EqualityQuery {
    /// Build a clause from a dotted path
    pub fn new(path: &str, op: EqualityOp, value: impl Into<Value>) -> Result<Self> {
        Ok(EqualityQuery {
            path: path.parse()?,
            op,
            value: value.into(),
        })
    }

    /// `path $aeq value`
    pub fn loose(path: &str, value: impl Into<Value>) -> Result<Self> {
        Self::new(path, EqualityOp::Loose, value)
    }

    /// `path $dteq value`
    pub fn temporal(path: &str, value: impl Into<Value>) -> Result<Self> {
        Self::new(path, EqualityOp::Temporal, value)
    }

    /// Evaluate this clause
    ///
    /// With `candidates`, only those positions are scanned and their order is
    /// kept. Otherwise the clause runs over every document, through `index`
    /// when one is given, and returns positions in ascending order.
    pub fn evaluate<D: DocumentSource + ?Sized>(
        &self,
        docs: &D,
        collator: &dyn Collator,
        index: Option<&BinaryIndex>,
        candidates: Option<&[Position]>,
    ) -> Vec<Position> {
        match (candidates, index) {
            (Some(candidates), _) => candidates
                .iter()
                .copied()
                .filter(|&p| self.matches_at(docs, collator, p))
                .collect(),
            (None, Some(index)) => {
                let range = index.positions_for(&self.value, docs);
                debug!(
                    property = %self.path,
                    op = %self.op,
                    candidates = range.len(),
                    "Equality lookup via binary index"
                );
                let mut hits: Vec<Position> = if self.op.confirms() {
                    range
                        .iter()
                        .copied()
                        .filter(|&p| self.matches_at(docs, collator, p))
                        .collect()
                } else {
                    range.to_vec()
                };
                hits.sort_unstable();
                hits
            }
            (None, None) => {
                debug!(property = %self.path, op = %self.op, "Equality lookup via full scan");
                (0..docs.len())
                    .filter(|&p| self.matches_at(docs, collator, p))
                    .collect()
            }
        }
    }

    fn matches_at<D: DocumentSource + ?Sized>(
        &self,
        docs: &D,
        collator: &dyn Collator,
        position: Position,
    ) -> bool {
        self.op
            .matches(collator, docs.property(position, &self.path), &self.value)
    }
}

// =============================================================================
// Query
// =============================================================================

/// Conjunction of equality clauses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<EqualityQuery>,
}

impl Query {
    /// Empty query (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause (builder pattern)
    pub fn and(mut self, clause: EqualityQuery) -> Self {
        self.clauses.push(clause);
        self
    }

    /// The clauses, in evaluation order
    pub fn clauses(&self) -> &[EqualityQuery] {
        &self.clauses
    }

    /// Parse `{ "prop": { "$op": value }, ... }`
    ///
    /// Clauses are ordered by property path so evaluation is deterministic.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` if the filter or a property's condition is not structured,
    ///   or a condition does not hold exactly one operator
    /// - `UnknownOperator` for operators other than the two equality operators
    /// - `InvalidPath` for unparseable property paths
    pub fn parse(filter: &Value) -> Result<Self> {
        let fields = filter
            .as_structured()
            .ok_or_else(|| {
                Error::InvalidQuery(format!("expected a structured query, got {}", filter.kind()))
            })?;

        let mut clauses = Vec::with_capacity(fields.len());
        for (property, condition) in fields {
            let ops = condition.as_structured().ok_or_else(|| {
                Error::InvalidQuery(format!(
                    "condition on '{}' must be {{operator: value}}",
                    property
                ))
            })?;
            let mut ops = ops.iter();
            let (name, value) = match (ops.next(), ops.next()) {
                (Some(only), None) => only,
                _ => {
                    return Err(Error::InvalidQuery(format!(
                        "condition on '{}' must hold exactly one operator",
                        property
                    )))
                }
            };
            clauses.push(EqualityQuery::new(
                property,
                EqualityOp::from_name(name)?,
                value.clone(),
            )?);
        }
        clauses.sort_by(|a, b| a.path.segments().cmp(b.path.segments()));

        Ok(Query { clauses })
    }
}

impl From<EqualityQuery> for Query {
    fn from(clause: EqualityQuery) -> Self {
        Query {
            clauses: vec![clause],
        }
    }
}
