//! Arithmetic built-in filters. Integer/float distinction is preserved: an
//! operation between two integers yields an integer, otherwise a float.

use super::{wrong_type, FilterFn, FilterResult};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub fn register(map: &mut HashMap<String, FilterFn>) {
    let entries: Vec<(&str, FilterFn)> = vec![
        ("plus", Arc::new(plus)),
        ("minus", Arc::new(minus)),
        ("times", Arc::new(times)),
        ("divided_by", Arc::new(divided_by)),
        ("modulo", Arc::new(modulo)),
        ("abs", Arc::new(abs)),
        ("ceil", Arc::new(ceil)),
        ("floor", Arc::new(floor)),
        ("round", Arc::new(round)),
    ];
    for (name, f) in entries {
        map.insert(name.to_string(), f);
    }
}

enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(filter: &str, v: &Value) -> std::result::Result<Num, String> {
    match v {
        Value::Integer(i) => Ok(Num::Int(*i)),
        Value::Float(f) => Ok(Num::Float(*f)),
        _ => Err(wrong_type(filter, "numeric")),
    }
}

fn binary(filter: &str, input: &Value, args: &[Value], op: fn(f64, f64) -> f64, int_op: fn(i64, i64) -> Option<i64>) -> FilterResult {
    let lhs = as_num(filter, input)?;
    let rhs = as_num(filter, args.first().unwrap_or(&Value::Integer(0)))?;
    match (lhs, rhs) {
        (Num::Int(a), Num::Int(b)) => match int_op(a, b) {
            Some(result) => Ok(Value::Integer(result)),
            None => Ok(Value::Float(op(a as f64, b as f64))),
        },
        (a, b) => {
            let af = match a {
                Num::Int(i) => i as f64,
                Num::Float(f) => f,
            };
            let bf = match b {
                Num::Int(i) => i as f64,
                Num::Float(f) => f,
            };
            Ok(Value::Float(op(af, bf)))
        }
    }
}

fn plus(input: &Value, args: &[Value]) -> FilterResult {
    binary("plus", input, args, |a, b| a + b, |a, b| a.checked_add(b))
}

fn minus(input: &Value, args: &[Value]) -> FilterResult {
    binary("minus", input, args, |a, b| a - b, |a, b| a.checked_sub(b))
}

fn times(input: &Value, args: &[Value]) -> FilterResult {
    binary("times", input, args, |a, b| a * b, |a, b| a.checked_mul(b))
}

fn divided_by(input: &Value, args: &[Value]) -> FilterResult {
    // Floor-toward-negative-infinity division for the integer path, not
    // toward-zero: kept consistent with `modulo` below rather than matched
    // to any particular host Liquid's negative-operand behavior.
    binary(
        "divided_by",
        input,
        args,
        |a, b| a / b,
        |a, b| if b == 0 { None } else { Some(a.div_euclid(b)) },
    )
}

fn modulo(input: &Value, args: &[Value]) -> FilterResult {
    // Euclidean remainder: always non-negative for a positive divisor, which
    // keeps this paired with `divided_by`'s `div_euclid` above.
    binary(
        "modulo",
        input,
        args,
        |a, b| a % b,
        |a, b| if b == 0 { None } else { Some(a.rem_euclid(b)) },
    )
}

fn abs(input: &Value, _args: &[Value]) -> FilterResult {
    match as_num("abs", input)? {
        Num::Int(i) => Ok(Value::Integer(i.abs())),
        Num::Float(f) => Ok(Value::Float(f.abs())),
    }
}

fn ceil(input: &Value, _args: &[Value]) -> FilterResult {
    match as_num("ceil", input)? {
        Num::Int(i) => Ok(Value::Integer(i)),
        Num::Float(f) => Ok(Value::Integer(f.ceil() as i64)),
    }
}

fn floor(input: &Value, _args: &[Value]) -> FilterResult {
    match as_num("floor", input)? {
        Num::Int(i) => Ok(Value::Integer(i)),
        Num::Float(f) => Ok(Value::Integer(f.floor() as i64)),
    }
}

fn round(input: &Value, args: &[Value]) -> FilterResult {
    let digits = args.first().and_then(Value::as_index).unwrap_or(0).max(0) as i32;
    match as_num("round", input)? {
        Num::Int(i) => Ok(Value::Integer(i)),
        Num::Float(f) => {
            if digits == 0 {
                Ok(Value::Integer(f.round() as i64))
            } else {
                let factor = 10f64.powi(digits);
                Ok(Value::Float((f * factor).round() / factor))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_preserves_integer_type() {
        assert_eq!(plus(&Value::Integer(2), &[Value::Integer(3)]).unwrap(), Value::Integer(5));
    }

    #[test]
    fn plus_promotes_to_float_when_mixed() {
        assert_eq!(plus(&Value::Integer(2), &[Value::Float(0.5)]).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn divided_by_zero_int_promotes_to_float_inf() {
        let result = divided_by(&Value::Integer(1), &[Value::Integer(0)]).unwrap();
        assert_eq!(result, Value::Float(f64::INFINITY));
    }

    #[test]
    fn abs_ceil_floor_round() {
        assert_eq!(abs(&Value::Integer(-4), &[]).unwrap(), Value::Integer(4));
        assert_eq!(ceil(&Value::Float(1.2), &[]).unwrap(), Value::Integer(2));
        assert_eq!(floor(&Value::Float(1.8), &[]).unwrap(), Value::Integer(1));
        assert_eq!(round(&Value::Float(1.5), &[]).unwrap(), Value::Integer(2));
    }
}
