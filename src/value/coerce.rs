//! Numeric comparison and coercion helpers backing `<`, `<=`, `>`, `>=`,
//! `contains`, and range-endpoint resolution (spec §4.5, §4.7).

use super::Value;
use std::cmp::Ordering;

impl Value {
    /// Numeric ordering comparison. `None` if either side is non-numeric —
    /// callers treat `None` as "comparison is false", never an error, per
    /// spec §4.7 (`<`/`<=`/`>`/`>=` never fail).
    pub fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        let a = self.as_f64()?;
        let b = other.as_f64()?;
        a.partial_cmp(&b)
    }

    /// `contains` per spec §4.7: substring test for two strings, membership
    /// test when the left operand is a sequence, `false` otherwise.
    pub fn contains(&self, needle: &Value) -> bool {
        match self {
            Value::Str(haystack) => match needle {
                Value::Str(n) => haystack.contains(n.as_str()),
                _ => false,
            },
            Value::Array(items) => items.iter().any(|item| item.structural_eq(needle)),
            _ => false,
        }
    }

    /// Resolves a range endpoint to an integer per spec §4.5: a non-numeric,
    /// non-null value is not integer-coercible (caller should treat this as
    /// a type error at the call site that invoked resolution, surfaced as a
    /// syntax-adjacent filter/lookup concern rather than here).
    pub fn as_range_endpoint(&self) -> Option<i64> {
        match self {
            Value::Null => Some(0),
            _ => self.as_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cmp_orders_mixed_int_float() {
        assert_eq!(
            Value::Integer(1).numeric_cmp(&Value::Float(2.0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn numeric_cmp_is_none_for_non_numeric() {
        assert_eq!(Value::Str("a".into()).numeric_cmp(&Value::Integer(1)), None);
    }

    #[test]
    fn contains_substring() {
        assert!(Value::Str("hello world".into()).contains(&Value::Str("world".into())));
        assert!(!Value::Str("hello".into()).contains(&Value::Str("world".into())));
    }

    #[test]
    fn contains_sequence_membership() {
        let seq = Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())]);
        assert!(seq.contains(&Value::Str("b".into())));
        assert!(!seq.contains(&Value::Str("c".into())));
    }

    #[test]
    fn null_endpoint_becomes_zero() {
        assert_eq!(Value::Null.as_range_endpoint(), Some(0));
    }
}
