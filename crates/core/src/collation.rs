//! Universal collation order over [`Value`]
//!
//! Every pair of values is comparable. Values are first ordered by tier, then
//! by a tier-specific rule:
//!
//! | Tier | Kinds | Intra-tier rule |
//! |------|-------|-----------------|
//! | Undefined | Absent, Null, NotANumber | all equal |
//! | Boolean | Boolean | `false < true` |
//! | Numeric | Number, NumericText | parsed numeric value |
//! | Temporal | Temporal | instant |
//! | Sequence | Sequence | first differing element, then length |
//! | Structured | Structured | all equal |
//! | Text | Text | lexicographic |
//!
//! The result is a total preorder: `compare` is antisymmetric and transitive,
//! and values that compare `Equal` are "loosely equal". Callers that need a
//! different order for their own data plug in a [`Collator`].

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

use crate::value::{Kind, Value};

// =============================================================================
// Numeric Text Normalization
// =============================================================================

/// Parse text as a number, if its content is numeric
///
/// Surrounding whitespace is ignored. Accepts an optional sign, decimal and
/// exponent forms, and the literal `Infinity`. Empty text, `NaN` and anything
/// else that is not a well-formed number yields `None`, which sends the value
/// to the Text tier.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);

    if unsigned == "Infinity" {
        return Some(if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    // f64::from_str also accepts "inf" and "nan"; only digit-led forms count
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

// =============================================================================
// Collation Key
// =============================================================================

/// Comparison tier of a value, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Absent, Null and NotANumber
    Undefined,
    /// Booleans
    Boolean,
    /// Numbers and numeric text
    Numeric,
    /// Date/time instants
    Temporal,
    /// Ordered composites
    Sequence,
    /// Keyed composites
    Structured,
    /// Non-numeric text
    Text,
}

impl Kind {
    /// The collation tier this kind belongs to
    pub fn tier(&self) -> Tier {
        match self {
            Kind::Absent | Kind::Null | Kind::NotANumber => Tier::Undefined,
            Kind::Boolean => Tier::Boolean,
            Kind::Number | Kind::NumericText => Tier::Numeric,
            Kind::Temporal => Tier::Temporal,
            Kind::Sequence => Tier::Sequence,
            Kind::Structured => Tier::Structured,
            Kind::Text => Tier::Text,
        }
    }
}

/// The normalized form of a value that the standard collator compares
///
/// Numeric text is parsed once here, so the Number/NumericText merge is an
/// explicit normalization rather than a coercion at every comparison site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollationKey<'a> {
    /// Absent, Null or NotANumber
    Undefined,
    /// Boolean
    Boolean(bool),
    /// Number or numeric text (never NaN)
    Numeric(f64),
    /// Instant
    Temporal(&'a DateTime<Utc>),
    /// Elements of a sequence
    Sequence(&'a [Value]),
    /// Any keyed composite
    Structured,
    /// Non-numeric text
    Text(&'a str),
}

impl<'a> CollationKey<'a> {
    /// Normalize a value into its collation key
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Absent | Value::Null => CollationKey::Undefined,
            Value::Number(n) if n.is_nan() => CollationKey::Undefined,
            Value::Number(n) => CollationKey::Numeric(*n),
            Value::Bool(b) => CollationKey::Boolean(*b),
            Value::Text(s) => match parse_numeric_text(s) {
                Some(n) => CollationKey::Numeric(n),
                None => CollationKey::Text(s),
            },
            Value::Temporal(t) => CollationKey::Temporal(t),
            Value::Sequence(items) => CollationKey::Sequence(items),
            Value::Structured(_) => CollationKey::Structured,
        }
    }

    /// The tier of this key
    pub fn tier(&self) -> Tier {
        match self {
            CollationKey::Undefined => Tier::Undefined,
            CollationKey::Boolean(_) => Tier::Boolean,
            CollationKey::Numeric(_) => Tier::Numeric,
            CollationKey::Temporal(_) => Tier::Temporal,
            CollationKey::Sequence(_) => Tier::Sequence,
            CollationKey::Structured => Tier::Structured,
            CollationKey::Text(_) => Tier::Text,
        }
    }

    /// Compare two keys under the universal order
    pub fn collate(&self, other: &CollationKey<'_>) -> Ordering {
        match (self, other) {
            (CollationKey::Undefined, CollationKey::Undefined)
            | (CollationKey::Structured, CollationKey::Structured) => Ordering::Equal,
            (CollationKey::Boolean(a), CollationKey::Boolean(b)) => a.cmp(b),
            // Neither side is NaN, so partial_cmp only folds -0.0 and 0.0
            (CollationKey::Numeric(a), CollationKey::Numeric(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CollationKey::Temporal(a), CollationKey::Temporal(b)) => a.cmp(b),
            (CollationKey::Sequence(a), CollationKey::Sequence(b)) => compare_sequences(a, b),
            (CollationKey::Text(a), CollationKey::Text(b)) => a.cmp(b),
            _ => self.tier().cmp(&other.tier()),
        }
    }
}

fn compare_sequences(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match compare(x, y) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    a.len().cmp(&b.len())
}

// =============================================================================
// Free Functions
// =============================================================================

/// Compare two values under the universal collation order
pub fn compare(a: &Value, b: &Value) -> Ordering {
    CollationKey::of(a).collate(&CollationKey::of(b))
}

/// Loose equality: the two values collate `Equal`
///
/// `7` and `"7"` are loosely equal, as are Null and Absent. Temporal values
/// are loosely equal only when they denote the same instant.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    compare(a, b) == Ordering::Equal
}

/// Exact temporal equality used to confirm index candidates
///
/// When `query` is temporal, `candidate` must be temporal and denote the same
/// instant. For any other query value this is loose equality.
pub fn temporal_eq(candidate: &Value, query: &Value) -> bool {
    match (candidate, query) {
        (Value::Temporal(c), Value::Temporal(q)) => c == q,
        (_, Value::Temporal(_)) => false,
        _ => loose_eq(candidate, query),
    }
}

// =============================================================================
// Collator
// =============================================================================

/// A three-way comparator over values
///
/// Implementations must be a total preorder (antisymmetric and transitive);
/// binary indexes and sorts rely on it. Loose equality under a collator is
/// always `compare(a, b) == Equal`, so an index's equal-key range and a
/// linear scan select the same documents.
pub trait Collator: Send + Sync + fmt::Debug {
    /// Compare two values
    fn compare(&self, a: &Value, b: &Value) -> Ordering;
}

/// The universal collation order described in the module docs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardCollator;

impl Collator for StandardCollator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        compare(a, b)
    }
}
