//! Filter-pipeline application (spec §4.4).

use super::expr::eval_expr;
use crate::ast::{Filter, ObjectExpr};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::filters::resolve;
use crate::options::Options;
use crate::value::Value;

/// Evaluates an `ObjectExpr`: resolve `obj`, then fold each filter over the
/// result.
///
/// If any filter is unresolved while `strict_filters` is false, the whole
/// pipeline is "contaminated" (spec §4.4): remaining filters still run
/// against the last good value, but the final result collapses to
/// `Value::Null` (renders as empty) rather than surfacing the
/// last-resolved intermediate value.
pub fn eval_object_expr(obj_expr: &ObjectExpr, ctx: &Context, opts: &Options) -> Result<Value> {
    let mut current = eval_expr(&obj_expr.obj, ctx, opts)?;
    let mut contaminated = false;
    for filter in &obj_expr.filters {
        match apply_one(filter, &current, ctx, opts)? {
            Some(result) => current = result,
            None => contaminated = true,
        }
    }
    Ok(if contaminated { Value::Null } else { current })
}

/// Applies a single `Filter` to `current`. Returns `Ok(None)` when the
/// filter name is unresolved under lax mode (the contamination case);
/// `current` is left untouched by the caller in that case.
fn apply_one(filter: &Filter, current: &Value, ctx: &Context, opts: &Options) -> Result<Option<Value>> {
    let args = filter
        .args
        .iter()
        .map(|a| eval_expr(a, ctx, opts))
        .collect::<Result<Vec<_>>>()?;
    match resolve(&filter.name, &opts.custom_filters) {
        Some(f) => f(current, &args)
            .map(Some)
            .map_err(|msg| Error::filter(filter.name.clone(), msg)),
        None => {
            if opts.strict_filters {
                Err(Error::undefined_filter(filter.name.clone()))
            } else {
                log::debug!("lax: undefined filter '{}', pipeline contaminated", filter.name);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn applies_known_filter() {
        let obj = ObjectExpr {
            obj: Expr::Literal(Value::Str("abc".into())),
            filters: vec![Filter {
                name: "upcase".into(),
                args: vec![],
            }],
        };
        let result = eval_object_expr(&obj, &Context::new(), &Options::new()).unwrap();
        assert_eq!(result, Value::Str("ABC".into()));
    }

    #[test]
    fn lax_unknown_filter_collapses_to_null() {
        let obj = ObjectExpr {
            obj: Expr::Literal(Value::Str("abc".into())),
            filters: vec![Filter {
                name: "no_such_filter".into(),
                args: vec![],
            }],
        };
        let result = eval_object_expr(&obj, &Context::new(), &Options::new()).unwrap();
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn strict_unknown_filter_errors() {
        let obj = ObjectExpr {
            obj: Expr::Literal(Value::Str("abc".into())),
            filters: vec![Filter {
                name: "no_such_filter".into(),
                args: vec![],
            }],
        };
        let strict = Options::new().with_strict_filters(true);
        assert!(eval_object_expr(&obj, &Context::new(), &strict).is_err());
    }

    #[test]
    fn filters_apply_left_to_right() {
        let obj = ObjectExpr {
            obj: Expr::Literal(Value::Str("  abc  ".into())),
            filters: vec![
                Filter {
                    name: "strip".into(),
                    args: vec![],
                },
                Filter {
                    name: "upcase".into(),
                    args: vec![],
                },
            ],
        };
        let result = eval_object_expr(&obj, &Context::new(), &Options::new()).unwrap();
        assert_eq!(result, Value::Str("ABC".into()));
    }
}
