//! Variable lookup resolution (spec §4.3).

use super::expr::eval_expr;
use crate::ast::{Lookup, PostfixOp};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::value::Value;

/// Resolves a `Lookup` against `ctx` per spec §4.3.
pub fn eval_lookup(lookup: &Lookup, ctx: &Context, opts: &Options) -> Result<Value> {
    let mut current = match ctx.get(&lookup.name) {
        Some(v) => v.clone(),
        None => {
            if opts.strict_variables {
                return Err(Error::undefined_variable(lookup.name.clone()));
            }
            log::debug!("lax lookup miss for '{}', resolving to null", lookup.name);
            Value::Null
        }
    };
    for op in &lookup.fns {
        match op {
            PostfixOp::Index(key_expr) => {
                let key = eval_expr(key_expr, ctx, opts)?;
                current = index_into(&current, &key);
            }
        }
    }
    Ok(current)
}

/// `[key]`/`.key` access per spec §4.3 step 3.
fn index_into(current: &Value, key: &Value) -> Value {
    match current {
        Value::Array(items) => match key.as_index() {
            Some(i) if i >= 0 => items.get(i as usize).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        },
        Value::Object(map) => {
            let key_str = key.to_string();
            map.get(&key_str).cloned().unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}
