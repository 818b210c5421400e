//! Integration tests for the liquidust template engine.
//!
//! These exercise the complete pipeline from template source to rendered
//! output through the public `render_str`/`parse`/`render` API, rather than
//! reaching into `ast`/`eval` internals the way the unit tests beside each
//! module do.

use liquidust::{render_str, Context, Error, Options, Value};
use pretty_assertions::assert_eq;

fn render(source: &str, ctx: Context) -> String {
    render_str(source, ctx, &Options::new()).unwrap_or_else(|e| panic!("render failed: {e}"))
}

fn friends() -> Context {
    Context::new().set(
        "friends",
        Value::Array(
            ["Chandler", "Joey", "Monica", "Phoebe", "Rachel", "Ross"]
                .into_iter()
                .map(Value::from)
                .collect(),
        ),
    )
}

#[test]
fn plain_text_passes_through_unchanged() {
    assert_eq!(render("Hello world!", Context::new()), "Hello world!");
}

#[test]
fn assign_then_output() {
    assert_eq!(
        render(r#"{% assign bar = "world" %}Hello {{ bar }}!"#, Context::new()),
        "Hello world!"
    );
}

#[test]
fn capture_then_output() {
    assert_eq!(
        render("{% capture bar %}world{% endcapture %}Hello {{ bar }}!", Context::new()),
        "Hello world!"
    );
}

#[test]
fn decrement_then_increment_twice() {
    let ctx = Context::new().set("foo", Value::Integer(42));
    assert_eq!(
        render("{% decrement foo %}{{ foo }} {% increment foo %}{% increment foo %}{{ foo }}", ctx),
        "41 43"
    );
}

#[test]
fn filter_applies_to_looked_up_value() {
    let ctx = Context::new().set("x", Value::Str("world".into()));
    assert_eq!(render("Hello {{ x | upcase }}!", ctx), "Hello WORLD!");
}

#[test]
fn ascending_range_iterates_inclusive() {
    assert_eq!(
        render("{% for x in (1..5) %}{{ x }}{% endfor %}", Context::new()),
        "12345"
    );
}

#[test]
fn descending_range_iterates_inclusive() {
    assert_eq!(
        render("{% for x in (5..1) %}{{ x }}{% endfor %}", Context::new()),
        "54321"
    );
}

#[test]
fn break_terminates_the_loop_at_the_matching_element() {
    let out = render(
        r#"{% for f in friends %}{% if f == "Phoebe" %}{% break %}{% endif %}{{ f }} {% endfor %}"#,
        friends(),
    );
    assert_eq!(out, "Chandler Joey Monica ");
}

#[test]
fn continue_skips_only_the_matching_elements() {
    let out = render(
        r#"{% for f in friends %}{% if f == "Joey" or f == "Rachel" %}{% continue %}{% endif %}{{ f }} {% endfor %}"#,
        friends(),
    );
    assert_eq!(out, "Chandler Monica Phoebe Ross ");
}

#[test]
fn strict_variables_reports_undefined_variable() {
    let strict = Options::new().with_strict_variables(true);
    let err = render_str("Hello {{ z }}!", Context::new(), &strict).unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable { name } if name == "z"));
}

#[test]
fn lax_mode_degrades_undefined_variable_to_empty() {
    assert_eq!(render("Hello {{ z }}!", Context::new()), "Hello !");
}

#[test]
fn filters_apply_left_to_right_associatively() {
    let ctx = Context::new().set("x", Value::Str("  Hello  ".into()));
    let piecewise = render("{{ x | strip | upcase }}", ctx.clone());
    assert_eq!(piecewise, "HELLO");
    // (x | strip) | upcase, applied as a single pipeline, matches applying
    // strip first and feeding its result through upcase by hand.
    let pre_stripped = Context::new().set("x", Value::Str("Hello".into()));
    assert_eq!(render("{{ x | upcase }}", pre_stripped), render("{{ x | strip | upcase }}", ctx));
}

#[test]
fn for_options_apply_offset_then_limit_then_reversed() {
    let ctx = Context::new().set(
        "xs",
        Value::Array((1..=10).map(Value::Integer).collect()),
    );
    let out = render(
        "{% for x in xs offset: 2 limit: 3 reversed %}{{ x }}{% endfor %}",
        ctx,
    );
    // drop 2 -> [3..10], take 3 -> [3,4,5], reversed -> [5,4,3]
    assert_eq!(out, "543");
}

#[test]
fn case_when_selects_first_matching_branch() {
    let ctx = Context::new().set("grade", Value::Str("B".into()));
    let out = render(
        r#"{% case grade %}{% when "A" %}Excellent{% when "B" %}Good{% else %}Unknown{% endcase %}"#,
        ctx,
    );
    assert_eq!(out, "Good");
}

#[test]
fn nested_object_lookup_with_bracket_and_dot_access() {
    let mut person = indexmap::IndexMap::new();
    person.insert("name".to_string(), Value::Str("Ross".into()));
    let ctx = Context::new().set("person", Value::Object(person));
    assert_eq!(render("{{ person.name }} / {{ person[\"name\"] }}", ctx), "Ross / Ross");
}

#[test]
fn unknown_filter_in_lax_mode_collapses_the_whole_expression_to_empty() {
    let ctx = Context::new().set("x", Value::Str("abc".into()));
    assert_eq!(render("[{{ x | upcase | frobnicate | downcase }}]", ctx), "[]");
}
