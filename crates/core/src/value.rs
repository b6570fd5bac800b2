//! Value types for collatedb
//!
//! This module defines:
//! - Value: closed tagged-variant type for every document field value
//! - Kind: the classification the collator switches on
//!
//! ## Kind Classification
//!
//! Kind is computed from a value on demand and never stored. Two variants
//! classify into more than one kind depending on their content:
//!
//! - `Number(n)` is `NotANumber` when `n` is NaN, `Number` otherwise
//! - `Text(s)` is `NumericText` when `s` parses as a number, `Text` otherwise
//!
//! Everything else maps one-to-one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::collation::parse_numeric_text;

/// A document field value
///
/// Documents themselves are `Structured` values. `Absent` stands for a field
/// that is missing, and is also what an explicitly stored "undefined" looks
/// like; both collate identically.
///
/// Equality (`==`) is strict structural equality: `Number(7.0) != Text("7")`
/// and `Number(NaN) != Number(NaN)`. Loose equality lives in the collator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing field
    #[default]
    Absent,
    /// Explicit null
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit floating point (IEEE-754); NaN classifies as `NotANumber`
    Number(f64),
    /// UTF-8 text; numeric-looking text classifies as `NumericText`
    Text(String),
    /// A date/time instant
    Temporal(DateTime<Utc>),
    /// Ordered composite of values
    Sequence(Vec<Value>),
    /// Keyed composite of values
    Structured(HashMap<String, Value>),
}

/// Classification of a [`Value`] used by the collator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Field missing
    Absent,
    /// Explicit null
    Null,
    /// Number that is not a well-formed number
    NotANumber,
    /// Boolean
    Boolean,
    /// Well-formed number
    Number,
    /// Text whose content parses as a number
    NumericText,
    /// Non-numeric text
    Text,
    /// Date/time instant
    Temporal,
    /// Ordered composite
    Sequence,
    /// Keyed composite
    Structured,
}

impl Kind {
    /// Get the kind name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Absent => "Absent",
            Kind::Null => "Null",
            Kind::NotANumber => "NotANumber",
            Kind::Boolean => "Boolean",
            Kind::Number => "Number",
            Kind::NumericText => "NumericText",
            Kind::Text => "Text",
            Kind::Temporal => "Temporal",
            Kind::Sequence => "Sequence",
            Kind::Structured => "Structured",
        }
    }

    /// Whether this kind belongs to the lowest (undefined-like) tier
    pub fn is_undefined_like(&self) -> bool {
        matches!(self, Kind::Absent | Kind::Null | Kind::NotANumber)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared absent value handed out by path resolution
pub(crate) static ABSENT: Value = Value::Absent;

impl Value {
    /// A shared `Absent` value with static lifetime
    pub fn absent() -> &'static Value {
        &ABSENT
    }

    /// Classify this value
    pub fn kind(&self) -> Kind {
        match self {
            Value::Absent => Kind::Absent,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(n) if n.is_nan() => Kind::NotANumber,
            Value::Number(_) => Kind::Number,
            Value::Text(s) if parse_numeric_text(s).is_some() => Kind::NumericText,
            Value::Text(_) => Kind::Text,
            Value::Temporal(_) => Kind::Temporal,
            Value::Sequence(_) => Kind::Sequence,
            Value::Structured(_) => Kind::Structured,
        }
    }

    /// Build a structured value from key/value pairs
    pub fn structured<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Structured(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if this is the absent value
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as f64 if this is a Number value (NaN included)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as &str if this is a Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the instant if this is a Temporal value
    pub fn as_temporal(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Temporal(t) => Some(t),
            _ => None,
        }
    }

    /// Get as &[Value] if this is a Sequence value
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get as &HashMap if this is a Structured value
    pub fn as_structured(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Structured(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a top-level field of a structured value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_structured().and_then(|fields| fields.get(key))
    }

    /// Set a top-level field, turning a non-structured value into an empty
    /// structured value first
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        if !matches!(self, Value::Structured(_)) {
            *self = Value::Structured(HashMap::new());
        }
        if let Value::Structured(fields) = self {
            fields.insert(key.into(), value);
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i as f64)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(f64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Temporal(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(fields: HashMap<String, Value>) -> Self {
        Value::Structured(fields)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Absent,
        }
    }
}

// ============================================================================
// serde_json interop for ergonomic document construction
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(arr) => {
                Value::Sequence(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Structured(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Value {
    /// Convert from a serde_json value (JSON has no temporal type)
    pub fn from_json(json: serde_json::Value) -> Self {
        Value::from(json)
    }

    /// Convert to a serde_json value
    ///
    /// Absent fields are dropped from structured values, NaN and absent
    /// scalars become null, temporal values become RFC 3339 text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Temporal(t) => serde_json::Value::String(t.to_rfc3339()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Structured(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .filter(|(_, v)| !v.is_absent())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}
