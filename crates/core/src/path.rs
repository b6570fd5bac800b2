//! Property paths into documents
//!
//! A `PropertyPath` is a dotted sequence of field names, e.g. `z.y.b`.
//! Resolution walks nested structured values one key at a time and never
//! fails: a missing key, or a non-structured intermediate value, resolves to
//! [`Value::Absent`]. Missing and partial paths are data, not errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::value::{Value, ABSENT};

/// Error type for property path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// The path string was empty
    #[error("empty property path")]
    Empty,
    /// A segment between dots was empty
    #[error("empty field name in path at position {0}")]
    EmptySegment(usize),
}

/// A path into a document
///
/// # Examples
///
/// ```
/// use collatedb_core::{PropertyPath, Value};
///
/// let doc = Value::from(serde_json::json!({"z": {"y": {"b": 9}}}));
/// let path: PropertyPath = "z.y.b".parse().unwrap();
/// assert_eq!(path.resolve(&doc), &Value::Number(9.0));
///
/// let missing: PropertyPath = "z.q".parse().unwrap();
/// assert!(missing.resolve(&doc).is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Create a single-segment path
    pub fn field(name: impl Into<String>) -> Self {
        PropertyPath {
            segments: vec![name.into()],
        }
    }

    /// Append a segment (builder pattern)
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    /// Get the path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a parsed path; provided for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path has more than one segment
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Resolve this path against a document
    pub fn resolve<'a>(&self, document: &'a Value) -> &'a Value {
        let mut current = document;
        for segment in &self.segments {
            current = match current {
                Value::Structured(fields) => match fields.get(segment) {
                    Some(next) => next,
                    None => return &ABSENT,
                },
                _ => return &ABSENT,
            };
        }
        current
    }
}

impl FromStr for PropertyPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }

        let mut segments = Vec::new();
        let mut offset = 0;
        for part in s.split('.') {
            if part.is_empty() {
                return Err(PathParseError::EmptySegment(offset));
            }
            segments.push(part.to_string());
            offset += part.len() + 1;
        }

        Ok(PropertyPath { segments })
    }
}

impl TryFrom<&str> for PropertyPath {
    type Error = PathParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Resolve a dotted path string against a document
///
/// An unparseable path resolves to [`Value::Absent`], same as a missing one.
pub fn resolve<'a>(document: &'a Value, path: &str) -> &'a Value {
    match path.parse::<PropertyPath>() {
        Ok(path) => path.resolve(document),
        Err(_) => &ABSENT,
    }
}
