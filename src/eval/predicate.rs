//! Predicate (boolean guard) evaluation (spec §4.7).

use super::expr::eval_expr;
use crate::ast::{Operator, Predicate};
use crate::context::Context;
use crate::error::Result;
use crate::options::Options;
use std::cmp::Ordering;

/// Evaluates a `Predicate` to a boolean.
pub fn eval_predicate(pred: &Predicate, ctx: &Context, opts: &Options) -> Result<bool> {
    match pred {
        Predicate::Truthy(expr) => Ok(eval_expr(expr, ctx, opts)?.is_truthy()),
        Predicate::And(a, b) => Ok(eval_predicate(a, ctx, opts)? && eval_predicate(b, ctx, opts)?),
        Predicate::Or(a, b) => Ok(eval_predicate(a, ctx, opts)? || eval_predicate(b, ctx, opts)?),
        Predicate::Assertion { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, ctx, opts)?;
            let rhs = eval_expr(rhs, ctx, opts)?;
            Ok(match op {
                Operator::Eq => lhs.structural_eq(&rhs),
                Operator::Ne => !lhs.structural_eq(&rhs),
                Operator::Lt => lhs.numeric_cmp(&rhs) == Some(Ordering::Less),
                Operator::Le => matches!(
                    lhs.numeric_cmp(&rhs),
                    Some(Ordering::Less) | Some(Ordering::Equal)
                ),
                Operator::Gt => lhs.numeric_cmp(&rhs) == Some(Ordering::Greater),
                Operator::Ge => matches!(
                    lhs.numeric_cmp(&rhs),
                    Some(Ordering::Greater) | Some(Ordering::Equal)
                ),
                Operator::Contains => lhs.contains(&rhs),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::value::Value;

    fn opts() -> Options {
        Options::new()
    }

    #[test]
    fn equality_compares_structurally() {
        let pred = Predicate::Assertion {
            op: Operator::Eq,
            lhs: Expr::Literal(Value::Integer(1)),
            rhs: Expr::Literal(Value::Float(1.0)),
        };
        assert!(eval_predicate(&pred, &Context::new(), &opts()).unwrap());
    }

    #[test]
    fn ordering_never_fails_on_non_numeric() {
        let pred = Predicate::Assertion {
            op: Operator::Lt,
            lhs: Expr::Literal(Value::Str("a".into())),
            rhs: Expr::Literal(Value::Integer(1)),
        };
        assert!(!eval_predicate(&pred, &Context::new(), &opts()).unwrap());
    }

    #[test]
    fn and_or_short_circuit_values() {
        let t = Predicate::Truthy(Expr::Literal(Value::Bool(true)));
        let f = Predicate::Truthy(Expr::Literal(Value::Bool(false)));
        assert!(!eval_predicate(
            &Predicate::And(Box::new(t.clone()), Box::new(f.clone())),
            &Context::new(),
            &opts()
        )
        .unwrap());
        assert!(eval_predicate(
            &Predicate::Or(Box::new(t), Box::new(f)),
            &Context::new(),
            &opts()
        )
        .unwrap());
    }

    #[test]
    fn contains_operator() {
        let pred = Predicate::Assertion {
            op: Operator::Contains,
            lhs: Expr::Literal(Value::Str("hello world".into())),
            rhs: Expr::Literal(Value::Str("world".into())),
        };
        assert!(eval_predicate(&pred, &Context::new(), &opts()).unwrap());
    }
}
