//! String coercion rules for `Value`, per spec §4.6.

use super::Value;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                for item in items {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(map) => {
                // Underspecified per spec §9; a stable, readable repr is
                // enough since no test depends on the exact form.
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Canonical decimal form for a float: no trailing `.0` is dropped, but an
/// integral float still renders with one decimal place (`"3.0"`), matching
/// conventional Liquid number formatting and keeping floats visually
/// distinct from integers.
fn format_float(x: f64) -> String {
    if x.fract() == 0.0 && x.is_finite() {
        format!("{x:.1}")
    } else {
        let s = format!("{x}");
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_empty() {
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn bool_coercion() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn integer_has_no_decimal_point() {
        assert_eq!(Value::Integer(42).to_string(), "42");
    }

    #[test]
    fn float_keeps_fractional_digits() {
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
    }

    #[test]
    fn array_concatenates_elements() {
        let arr = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(arr.to_string(), "12");
    }
}
