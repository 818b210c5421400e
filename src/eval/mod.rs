//! The tree-walking evaluator: AST × context → (output, context′) (spec
//! §4.6-§4.7).

mod expr;
mod filter_apply;
mod lookup;
mod predicate;
mod range;

pub use expr::eval_expr;

use crate::ast::{Case, ConditionalBlock, For, Node, Template};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::options::Options;
use filter_apply::eval_object_expr;
use predicate::eval_predicate;

/// A non-local control signal produced by `Break`/`Continue` and threaded
/// upward through body evaluation until a `For` node consumes it (spec
/// §4.6, §9: "an explicit evaluation result variant ... with `For` the
/// only node that consumes the signal and everything else propagating
/// it").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// No pending control signal.
    None,
    /// `{% break %}` is unwinding toward its enclosing `For`.
    Break,
    /// `{% continue %}` is unwinding toward its enclosing `For`.
    Continue,
}

/// Evaluates a top-level `Template`. A `Break`/`Continue` that escapes all
/// the way out (no enclosing `For` consumed it) is reported as a
/// structured authoring error rather than silently dropped (spec §7).
pub fn eval_template(template: &Template, ctx: Context, opts: &Options) -> Result<(String, Context)> {
    let (out, ctx, signal) = eval_nodes(&template.nodes, ctx, opts)?;
    match signal {
        Signal::None => Ok((out, ctx)),
        Signal::Break => Err(Error::stray("break")),
        Signal::Continue => Err(Error::stray("continue")),
    }
}

/// Folds a node list left-to-right, threading context and halting (but not
/// discarding already-produced output) as soon as a node produces a
/// non-`None` signal.
fn eval_nodes(nodes: &[Node], mut ctx: Context, opts: &Options) -> Result<(String, Context, Signal)> {
    let mut out = String::new();
    for node in nodes {
        let (frag, new_ctx, signal) = eval_node(node, ctx, opts)?;
        out.push_str(&frag);
        ctx = new_ctx;
        if signal != Signal::None {
            return Ok((out, ctx, signal));
        }
    }
    Ok((out, ctx, Signal::None))
}

fn eval_node(node: &Node, ctx: Context, opts: &Options) -> Result<(String, Context, Signal)> {
    match node {
        Node::Text(text) => Ok((text.clone(), ctx, Signal::None)),
        Node::Output(obj) => {
            let value = eval_object_expr(obj, &ctx, opts)?;
            Ok((value.to_string(), ctx, Signal::None))
        }
        Node::Assign(assign) => {
            let value = eval_expr(&assign.value, &ctx, opts)?;
            let ctx = ctx.set(assign.var.clone(), value);
            Ok((String::new(), ctx, Signal::None))
        }
        Node::Capture(capture) => {
            // Isolated: assignments inside the captured body do not leak
            // out, only the rendered string does (spec §4.6, P6).
            let (captured, _inner_ctx, signal) =
                eval_nodes(&capture.template.nodes, ctx.clone(), opts)?;
            let ctx = ctx.set(capture.var.clone(), crate::value::Value::Str(captured));
            Ok((String::new(), ctx, signal))
        }
        Node::Increment(var) => eval_counter(var, 1, ctx, opts),
        Node::Decrement(var) => eval_counter(var, -1, ctx, opts),
        Node::If(block) => eval_conditional(block, true, ctx, opts),
        Node::Unless(block) => eval_conditional(block, false, ctx, opts),
        Node::Case(case) => eval_case(case, ctx, opts),
        Node::For(for_node) => eval_for(for_node, ctx, opts),
        Node::Break => Ok((String::new(), ctx, Signal::Break)),
        Node::Continue => Ok((String::new(), ctx, Signal::Continue)),
    }
}

/// `{% increment %}`/`{% decrement %}` (spec §4.6). An absent counter is
/// treated as 0-initialized under lax mode; strict mode fails like any
/// other undefined-variable read.
fn eval_counter(var: &str, delta: i64, mut ctx: Context, opts: &Options) -> Result<(String, Context, Signal)> {
    let current = ctx.get(var).cloned();
    let base = match &current {
        Some(v) => v.as_index().unwrap_or(0),
        None => {
            if opts.strict_variables {
                return Err(Error::undefined_variable(var.to_string()));
            }
            0
        }
    };
    ctx.set_mut(var, crate::value::Value::Integer(base + delta));
    Ok((String::new(), ctx, Signal::None))
}

/// `if`/`unless` (spec §4.6). `is_if` selects polarity: `If` passes `true`
/// (branches match on plain truthiness); `Unless` passes `false`, which
/// flips only its first branch's truthiness (`elsif` branches, if any,
/// keep normal polarity, matching Liquid's own `unless` semantics).
fn eval_conditional(
    block: &ConditionalBlock,
    is_if: bool,
    ctx: Context,
    opts: &Options,
) -> Result<(String, Context, Signal)> {
    for (i, condition) in block.conditions.iter().enumerate() {
        let truthy = eval_predicate(&condition.pred, &ctx, opts)?;
        let matched = if !is_if && i == 0 { !truthy } else { truthy };
        if matched {
            return eval_nodes(&condition.template.nodes, ctx, opts);
        }
    }
    if let Some(else_branch) = &block.else_branch {
        return eval_nodes(&else_branch.template.nodes, ctx, opts);
    }
    Ok((String::new(), ctx, Signal::None))
}

/// `case`/`when`/`else` (spec §4.6): first `when` whose value structurally
/// equals the discriminant wins; otherwise `else` runs.
fn eval_case(case: &Case, ctx: Context, opts: &Options) -> Result<(String, Context, Signal)> {
    let discriminant = eval_expr(&case.val, &ctx, opts)?;
    for when in &case.whens {
        let when_val = eval_expr(&when.val, &ctx, opts)?;
        if discriminant.structural_eq(&when_val) {
            return eval_nodes(&when.template.nodes, ctx, opts);
        }
    }
    if let Some(else_branch) = &case.else_branch {
        return eval_nodes(&else_branch.template.nodes, ctx, opts);
    }
    Ok((String::new(), ctx, Signal::None))
}

/// `for`/`endfor` (spec §4.6): resolve the collection, apply
/// offset/limit/reversed in that fixed order, then iterate. `Break` stops
/// the loop; `Continue` only ends the current iteration's contribution
/// (already handled structurally by `eval_nodes`' early-return-on-signal).
/// The loop variable itself does not survive past the loop, but any
/// `assign`/counter mutation of other names made by the body does, since
/// the same `Context` is threaded across iterations and back out.
fn eval_for(for_node: &For, mut ctx: Context, opts: &Options) -> Result<(String, Context, Signal)> {
    let collection = eval_expr(&for_node.collection, &ctx, opts)?;
    let mut items = match collection {
        crate::value::Value::Array(items) => items,
        _ => Vec::new(),
    };
    if let Some(for_opts) = &for_node.for_opts {
        if let Some(offset) = for_opts.offset {
            let skip = offset.max(0) as usize;
            items = items.into_iter().skip(skip).collect();
        }
        if let Some(limit) = for_opts.limit {
            items.truncate(limit.max(0) as usize);
        }
        if for_opts.reversed {
            items.reverse();
        }
    }

    let prev_value = ctx.get(&for_node.var).cloned();
    let mut out = String::new();
    for item in items {
        ctx.set_mut(for_node.var.clone(), item);
        let (frag, new_ctx, signal) = eval_nodes(&for_node.template.nodes, ctx, opts)?;
        ctx = new_ctx;
        out.push_str(&frag);
        if signal == Signal::Break {
            break;
        }
    }
    match prev_value {
        Some(v) => ctx.set_mut(for_node.var.clone(), v),
        None => {
            ctx.remove(&for_node.var);
        }
    }
    Ok((out, ctx, Signal::None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn render(source: &str, ctx: Context) -> String {
        let tpl = crate::parser::parse(source).unwrap();
        eval_template(&tpl, ctx, &Options::new()).unwrap().0
    }

    #[test]
    fn assign_persists_past_the_node() {
        let ctx = Context::new();
        let out = render(r#"{% assign name = "world" %}Hello {{ name }}!"#, ctx);
        assert_eq!(out, "Hello world!");
    }

    #[test]
    fn capture_binds_rendered_string_without_leaking_assigns() {
        let ctx = Context::new();
        let tpl = crate::parser::parse(
            r#"{% capture greeting %}{% assign inner = 1 %}Hi{% endcapture %}{{ greeting }}-{{ inner }}"#,
        )
        .unwrap();
        let (out, _) = eval_template(&tpl, ctx, &Options::new()).unwrap();
        assert_eq!(out, "Hi-");
    }

    #[test]
    fn if_unless_polarity() {
        let ctx = Context::new().set("flag", Value::Bool(false));
        assert_eq!(render("{% if flag %}yes{% else %}no{% endif %}", ctx.clone()), "no");
        assert_eq!(
            render("{% unless flag %}yes{% else %}no{% endunless %}", ctx),
            "yes"
        );
    }

    #[test]
    fn case_matches_first_equal_when() {
        let ctx = Context::new().set("x", Value::Integer(2));
        let out = render(
            "{% case x %}{% when 1 %}one{% when 2 %}two{% else %}other{% endcase %}",
            ctx,
        );
        assert_eq!(out, "two");
    }

    #[test]
    fn for_loop_break_stops_early_and_drops_the_breaking_iteration() {
        let ctx = Context::new().set(
            "names",
            Value::Array(vec!["Chandler", "Phoebe", "Rachel"].into_iter().map(Value::from).collect()),
        );
        let out = render(
            r#"{% for n in names %}{% if n == "Phoebe" %}{% break %}{% endif %}{{ n }} {% endfor %}"#,
            ctx,
        );
        assert_eq!(out, "Chandler ");
    }

    #[test]
    fn for_loop_continue_skips_only_that_iterations_output() {
        let ctx = Context::new().set(
            "names",
            Value::Array(vec!["Chandler", "Joey", "Monica"].into_iter().map(Value::from).collect()),
        );
        let out = render(
            r#"{% for n in names %}{% if n == "Joey" %}{% continue %}{% endif %}{{ n }} {% endfor %}"#,
            ctx,
        );
        assert_eq!(out, "Chandler Monica ");
    }

    #[test]
    fn for_loop_variable_does_not_leak_but_assigns_inside_do() {
        let ctx = Context::new().set(
            "xs",
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
        );
        let tpl = crate::parser::parse("{% for x in xs %}{% assign last = x %}{% endfor %}").unwrap();
        let (_, ctx) = eval_template(&tpl, ctx, &Options::new()).unwrap();
        assert_eq!(ctx.get("x"), None);
        assert_eq!(ctx.get("last"), Some(&Value::Integer(2)));
    }

    #[test]
    fn increment_and_decrement_zero_initialize_under_lax_mode() {
        let ctx = Context::new();
        let out = render("{% increment foo %}{% increment foo %}", ctx);
        assert_eq!(out, "");
        let ctx = Context::new().set("foo", Value::Integer(42));
        let out = render("{% decrement foo %}{{ foo }}", ctx);
        assert_eq!(out, "41");
    }

    #[test]
    fn stray_break_outside_for_is_an_error() {
        let tpl = crate::parser::parse("{% break %}").unwrap();
        assert!(eval_template(&tpl, Context::new(), &Options::new()).is_err());
    }
}
