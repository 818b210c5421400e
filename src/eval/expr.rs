//! Pure expression evaluation: `Expr` → `Value`, with no context mutation.

use super::lookup::eval_lookup;
use super::range::eval_range;
use crate::ast::Expr;
use crate::context::Context;
use crate::error::Result;
use crate::options::Options;
use crate::value::Value;

/// Resolves an expression to a value. Literals resolve to themselves,
/// lookups per spec §4.3, ranges per spec §4.5.
pub fn eval_expr(expr: &Expr, ctx: &Context, opts: &Options) -> Result<Value> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Lookup(lookup) => eval_lookup(lookup, ctx, opts),
        Expr::Range(range) => eval_range(range, ctx, opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        let result = eval_expr(&Expr::Literal(Value::Integer(5)), &Context::new(), &Options::new()).unwrap();
        assert_eq!(result, Value::Integer(5));
    }
}
