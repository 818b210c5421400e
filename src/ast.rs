//! The typed abstract syntax tree (spec §3.4).
//!
//! A closed set of tagged variants built directly by the parser — there is
//! no separate transform pass over an intermediate parse tree, since the
//! recursive-descent grammar is simple enough that each production can
//! build its typed node directly (the same choice the teacher's parser
//! makes for its `Expr` tree).

use crate::value::Value;

/// The root of a parsed template: an ordered sequence of nodes whose
/// concatenated evaluation output is the render result.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The template's top-level nodes, in source order.
    pub nodes: Vec<Node>,
}

/// One statement-level construct in a `Template` or block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain text, emitted verbatim.
    Text(String),
    /// A `{{ ... }}` output expression.
    Output(ObjectExpr),
    /// `{% assign var = value %}`.
    Assign(Assign),
    /// `{% capture var %} ... {% endcapture %}`.
    Capture(Capture),
    /// `{% increment var %}`.
    Increment(String),
    /// `{% decrement var %}`.
    Decrement(String),
    /// `{% if %}`/`{% elsif %}`/`{% else %}`/`{% endif %}`.
    If(ConditionalBlock),
    /// `{% unless %}`/`{% elsif %}`/`{% else %}`/`{% endunless %}`.
    Unless(ConditionalBlock),
    /// `{% case %}`/`{% when %}`/`{% else %}`/`{% endcase %}`.
    Case(Case),
    /// `{% for %}`/`{% endfor %}`.
    For(For),
    /// `{% break %}` — a sentinel statement, meaningful only inside `For`.
    Break,
    /// `{% continue %}` — a sentinel statement, meaningful only inside `For`.
    Continue,
}

/// An expression usable as the subject of an `Output`, a `Filter` argument,
/// a `Range` endpoint, or a `Predicate` operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (integer, float, bool, or string).
    Literal(Value),
    /// A variable reference with optional postfix index/filter operations.
    Lookup(Lookup),
    /// A `(start..end)` range expression.
    Range(Box<Range>),
}

/// A `{{ obj | filter | filter }}` output expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    /// The expression being rendered.
    pub obj: Expr,
    /// Filters applied left-to-right over `obj`'s resolved value.
    pub filters: Vec<Filter>,
}

/// A variable reference: `name` followed by zero or more postfix
/// `.attr`/`[key]`/`| filter` operations, applied left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    /// The root variable name.
    pub name: String,
    /// Postfix operations, in source order. An empty list means the raw
    /// variable (spec §3.4 invariant iv).
    pub fns: Vec<PostfixOp>,
}

/// One postfix operation attached to a `Lookup`.
///
/// The grammar (spec §4.1) allows a lookup's own trailing `| filter`
/// pipeline as an alternative surface to `ObjectExpr.filters` for the same
/// semantics; this implementation picks the `ObjectExpr.filters` surface
/// exclusively; `PostfixOp` therefore only ever carries index operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PostfixOp {
    /// `[key]` or `.key` access. `key` may itself be a literal or a nested
    /// lookup, per the grammar's `'[' (int|string|lookup) ']'` production.
    Index(Expr),
}

/// One stage of a filter pipeline: `name` or `name: arg, arg, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The filter's registered name.
    pub name: String,
    /// Argument expressions, resolved before the filter function is called.
    pub args: Vec<Expr>,
}

/// A `(start..end)` range. Each endpoint resolves to an integer at
/// evaluation time (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    /// The inclusive start endpoint.
    pub start: Expr,
    /// The inclusive end endpoint.
    pub end: Expr,
}

/// `{% assign var = value %}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    /// The variable being bound.
    pub var: String,
    /// The value expression.
    pub value: Expr,
}

/// `{% capture var %} ... {% endcapture %}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// The variable bound to the captured output string.
    pub var: String,
    /// The body whose rendered output becomes the captured string.
    pub template: Template,
}

/// The `if`/`unless` conditional shape, shared by both tags — only their
/// first-condition polarity differs, which the evaluator handles by
/// dispatching on `Node::If` vs `Node::Unless`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBlock {
    /// `if`/`elsif` branches, in source order. Invariant (i): never empty.
    pub conditions: Vec<Condition>,
    /// The trailing `else` branch, if present. Invariant (ii): always last.
    pub else_branch: Option<Else>,
}

/// One `if`/`elsif`/`unless` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The guarding predicate.
    pub pred: Predicate,
    /// The body to evaluate when `pred` matches (polarity considered).
    pub template: Template,
}

/// A trailing `else` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Else {
    /// The body to evaluate when no preceding branch matched.
    pub template: Template,
}

/// `{% case val %} {% when ... %} ... {% else %} ... {% endcase %}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// The discriminant expression.
    pub val: Expr,
    /// `when` clauses, in source order. Invariant (iii): all precede `else`.
    pub whens: Vec<When>,
    /// The trailing `else` branch, if present.
    pub else_branch: Option<Else>,
}

/// One `{% when val %}` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct When {
    /// The value compared against the enclosing `Case`'s discriminant.
    pub val: Expr,
    /// The body to evaluate when `val` matches.
    pub template: Template,
}

/// `{% for var in collection [for_opts] %} ... {% endfor %}`.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    /// The per-iteration loop variable name.
    pub var: String,
    /// The expression producing the iterated sequence (a `Lookup` or a
    /// `Range`).
    pub collection: Expr,
    /// Optional `limit`/`offset`/`reversed` modifiers.
    pub for_opts: Option<ForOpts>,
    /// The loop body.
    pub template: Template,
}

/// `limit:`/`offset:`/`reversed` modifiers on a `for` loop.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForOpts {
    /// Drop the first `offset` items before taking `limit` (spec §4.6
    /// fixed order: offset, then limit, then reverse). Invariant (v):
    /// non-negative, rejected as a syntax error by the parser otherwise.
    pub offset: Option<i64>,
    /// Take at most `limit` items after applying `offset`. Invariant (v):
    /// non-negative, rejected as a syntax error by the parser otherwise.
    pub limit: Option<i64>,
    /// Reverse the (offset, limit)-adjusted sequence before iterating.
    pub reversed: bool,
}

/// A boolean-valued guard used by `If`/`Unless`/`Condition` (spec §4.7).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `lhs op rhs`.
    Assertion {
        /// The comparison operator.
        op: Operator,
        /// The left operand.
        lhs: Expr,
        /// The right operand.
        rhs: Expr,
    },
    /// `p1 and p2`, short-circuiting, left-associative.
    And(Box<Predicate>, Box<Predicate>),
    /// `p1 or p2`, short-circuiting, left-associative.
    Or(Box<Predicate>, Box<Predicate>),
    /// A bare expression (in practice always a `Lookup`) used as a
    /// predicate: truthy iff its resolved value is non-null, non-false.
    Truthy(Expr),
}

/// A comparison operator (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `contains`
    Contains,
}
