//! Sequence- and string-length-oriented built-in filters: these operate
//! generically over `Array` and (where it makes sense) `Str` values.

use super::{wrong_type, FilterFn, FilterResult};
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

pub fn register(map: &mut HashMap<String, FilterFn>) {
    let entries: Vec<(&str, FilterFn)> = vec![
        ("size", Arc::new(size)),
        ("first", Arc::new(first)),
        ("last", Arc::new(last)),
        ("reverse", Arc::new(reverse)),
        ("sort", Arc::new(sort)),
        ("uniq", Arc::new(uniq)),
        ("map", Arc::new(map_filter)),
        ("where", Arc::new(where_filter)),
        ("slice", Arc::new(slice)),
        ("default", Arc::new(default)),
        ("join", Arc::new(join)),
    ];
    for (name, f) in entries {
        map.insert(name.to_string(), f);
    }
}

fn size(input: &Value, _args: &[Value]) -> FilterResult {
    let n = match input {
        Value::Str(s) => s.graphemes(true).count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    };
    Ok(Value::Integer(n as i64))
}

fn first(input: &Value, _args: &[Value]) -> FilterResult {
    match input {
        Value::Array(items) => Ok(items.first().cloned().unwrap_or(Value::Null)),
        Value::Str(s) => Ok(s
            .graphemes(true)
            .next()
            .map(|g| Value::Str(g.to_string()))
            .unwrap_or(Value::Null)),
        _ => Err(wrong_type("first", "array or string")),
    }
}

fn last(input: &Value, _args: &[Value]) -> FilterResult {
    match input {
        Value::Array(items) => Ok(items.last().cloned().unwrap_or(Value::Null)),
        Value::Str(s) => Ok(s
            .graphemes(true)
            .last()
            .map(|g| Value::Str(g.to_string()))
            .unwrap_or(Value::Null)),
        _ => Err(wrong_type("last", "array or string")),
    }
}

fn reverse(input: &Value, _args: &[Value]) -> FilterResult {
    match input {
        Value::Array(items) => {
            let mut items = items.clone();
            items.reverse();
            Ok(Value::Array(items))
        }
        Value::Str(s) => Ok(Value::Str(s.graphemes(true).rev().collect())),
        _ => Err(wrong_type("reverse", "array or string")),
    }
}

fn value_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        _ => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
    }
}

fn sort(input: &Value, _args: &[Value]) -> FilterResult {
    match input {
        Value::Array(items) => {
            let mut items = items.clone();
            items.sort_by(value_cmp);
            Ok(Value::Array(items))
        }
        _ => Err(wrong_type("sort", "array")),
    }
}

fn uniq(input: &Value, _args: &[Value]) -> FilterResult {
    match input {
        Value::Array(items) => {
            let mut out: Vec<Value> = Vec::new();
            for item in items {
                if !out.iter().any(|seen| seen.structural_eq(item)) {
                    out.push(item.clone());
                }
            }
            Ok(Value::Array(out))
        }
        _ => Err(wrong_type("uniq", "array")),
    }
}

fn map_filter(input: &Value, args: &[Value]) -> FilterResult {
    let items = match input {
        Value::Array(items) => items,
        _ => return Err(wrong_type("map", "array")),
    };
    let key = args.first().and_then(Value::as_str).ok_or_else(|| {
        "map requires a property-name argument".to_string()
    })?;
    let mapped = items
        .iter()
        .map(|item| match item {
            Value::Object(obj) => obj.get(key).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        })
        .collect();
    Ok(Value::Array(mapped))
}

fn where_filter(input: &Value, args: &[Value]) -> FilterResult {
    let items = match input {
        Value::Array(items) => items,
        _ => return Err(wrong_type("where", "array")),
    };
    let key = args.first().and_then(Value::as_str).ok_or_else(|| {
        "where requires a property-name argument".to_string()
    })?;
    let expected = args.get(1);
    let filtered = items
        .iter()
        .filter(|item| {
            let Value::Object(obj) = item else {
                return false;
            };
            match obj.get(key) {
                Some(v) => match expected {
                    Some(expected) => v.structural_eq(expected),
                    None => v.is_truthy(),
                },
                None => false,
            }
        })
        .cloned()
        .collect();
    Ok(Value::Array(filtered))
}

fn slice(input: &Value, args: &[Value]) -> FilterResult {
    let offset = args.first().and_then(Value::as_index).unwrap_or(0);
    let len = args.get(1).and_then(Value::as_index).unwrap_or(1).max(0) as usize;
    match input {
        Value::Array(items) => Ok(Value::Array(slice_items(items, offset, len))),
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let sliced = slice_items(&chars.iter().map(|c| Value::Str(c.to_string())).collect::<Vec<_>>(), offset, len);
            Ok(Value::Str(sliced.iter().map(|v| v.to_string()).collect()))
        }
        _ => Err(wrong_type("slice", "array or string")),
    }
}

fn slice_items(items: &[Value], offset: i64, len: usize) -> Vec<Value> {
    let size = items.len() as i64;
    let start = if offset < 0 { (size + offset).max(0) } else { offset.min(size) };
    let start = start as usize;
    items.iter().skip(start).take(len).cloned().collect()
}

fn default(input: &Value, args: &[Value]) -> FilterResult {
    let fallback = args.first().cloned().unwrap_or(Value::Null);
    let use_fallback = match input {
        Value::Null => true,
        Value::Bool(false) => true,
        Value::Str(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    Ok(if use_fallback { fallback } else { input.clone() })
}

fn join(input: &Value, args: &[Value]) -> FilterResult {
    let items = match input {
        Value::Array(items) => items,
        _ => return Err(wrong_type("join", "array")),
    };
    let sep = args.first().and_then(Value::as_str).unwrap_or(" ");
    let joined = items
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep);
    Ok(Value::Str(joined))
}
