//! The dynamic value type threaded through parsing, context, and evaluation.

mod coerce;
mod display;
mod equality;

use indexmap::IndexMap;

/// A dynamically typed value.
///
/// Mirrors spec §3.1: null, boolean, integer, float, string, ordered
/// sequence, or string-keyed mapping. Integer and float are kept distinct
/// rather than unified into one numeric variant, since arithmetic filters
/// and string coercion both care about the difference.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value. Also the fallback for lax undefined lookups.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A string-keyed, insertion-ordered mapping.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Truthiness per spec §4.7: only `Null` and `Bool(false)` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// Borrows the array elements, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the string contents, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces to `i64` for integer-indexing and range-endpoint contexts.
    ///
    /// Integers pass through; floats truncate; everything else is not
    /// integer-coercible.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Whether this value is numeric (`Integer` or `Float`).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Widens to `f64` for numeric comparison. `None` if non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
