//! Structural equality used by `==`/`!=` (spec §4.7) and `Case`/`When` (§4.6).

use super::Value;

impl Value {
    /// Structural equality across numeric and exact types.
    ///
    /// Integer and float compare equal by numeric value (`1 == 1.0`), since
    /// `Case`/`When` and `Assertion` both rely on this to match template
    /// literals against looked-up values regardless of which numeric
    /// subtype the source happened to produce.
    pub fn structural_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Array(a), Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structural_eq(y))
            }
            (Object(a), Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|bv| v.structural_eq(bv)))
            }
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64() == b.as_f64(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_compare_equal() {
        assert!(Value::Integer(1).structural_eq(&Value::Float(1.0)));
    }

    #[test]
    fn strings_compare_by_content() {
        assert!(Value::Str("a".into()).structural_eq(&Value::Str("a".into())));
        assert!(!Value::Str("a".into()).structural_eq(&Value::Str("b".into())));
    }

    #[test]
    fn mismatched_types_are_unequal() {
        assert!(!Value::Str("1".into()).structural_eq(&Value::Integer(1)));
    }

    #[test]
    fn arrays_compare_elementwise() {
        let a = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
        let b = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
        let c = Value::Array(vec![Value::Integer(1)]);
        assert!(a.structural_eq(&b));
        assert!(!a.structural_eq(&c));
    }
}
