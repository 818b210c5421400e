//! Range materialization (spec §4.5).

use super::expr::eval_expr;
use crate::ast::Range;
use crate::context::Context;
use crate::error::{Error, Result, Span};
use crate::options::Options;
use crate::value::Value;

/// Resolves a `(start..end)` range into a materialized sequence of
/// integers: ascending inclusive if `end >= start`, descending inclusive
/// otherwise.
pub fn eval_range(range: &Range, ctx: &Context, opts: &Options) -> Result<Value> {
    let start = endpoint(&range.start, ctx, opts)?;
    let end = endpoint(&range.end, ctx, opts)?;
    let items = if end >= start {
        (start..=end).map(Value::Integer).collect()
    } else {
        (end..=start).rev().map(Value::Integer).collect()
    };
    Ok(Value::Array(items))
}

fn endpoint(expr: &crate::ast::Expr, ctx: &Context, opts: &Options) -> Result<i64> {
    let value = eval_expr(expr, ctx, opts)?;
    value.as_range_endpoint().ok_or_else(|| {
        Error::syntax(
            "range endpoint must be integer-coercible",
            Span::at(0),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::options::Options;

    fn range_of(a: i64, b: i64) -> Range {
        Range {
            start: Expr::Literal(Value::Integer(a)),
            end: Expr::Literal(Value::Integer(b)),
        }
    }

    #[test]
    fn ascending_inclusive() {
        let result = eval_range(&range_of(1, 5), &Context::new(), &Options::new()).unwrap();
        assert_eq!(
            result,
            Value::Array(vec![1, 2, 3, 4, 5].into_iter().map(Value::Integer).collect())
        );
    }

    #[test]
    fn descending_inclusive() {
        let result = eval_range(&range_of(5, 1), &Context::new(), &Options::new()).unwrap();
        assert_eq!(
            result,
            Value::Array(vec![5, 4, 3, 2, 1].into_iter().map(Value::Integer).collect())
        );
    }

    #[test]
    fn single_element_range() {
        let result = eval_range(&range_of(3, 3), &Context::new(), &Options::new()).unwrap();
        assert_eq!(result, Value::Array(vec![Value::Integer(3)]));
    }
}
