#![warn(missing_docs, rust_2018_idioms)]

//! liquidust: a Liquid-style template rendering engine.
//!
//! The pipeline is a classic three-stage interpreter (spec §2):
//!
//! 1. The lexer tokenizes template source.
//! 2. The parser builds a typed [`ast::Template`] directly from the token
//!    stream — there is no separate transform pass.
//! 3. The evaluator walks the AST, threading a [`Context`] and [`Options`]
//!    through evaluation, producing a rendered string.
//!
//! ```
//! use liquidust::{render_str, Context, Options};
//!
//! let ctx = Context::new().set("name", "world".into());
//! let out = render_str("Hello {{ name }}!", ctx, &Options::new()).unwrap();
//! assert_eq!(out, "Hello world!");
//! ```

/// The typed abstract syntax tree produced by [`parse`].
pub mod ast;
/// The rendering context: the variable environment threaded through
/// evaluation.
pub mod context;
/// Error handling and diagnostics.
pub mod error;
mod eval;
/// The filter registry: built-in filters plus custom-filter resolution.
pub mod filters;
mod lexer;
/// Render-time configuration: strictness flags and custom filters.
pub mod options;
mod parser;
/// The dynamic value type threaded through parsing, context, and
/// evaluation.
pub mod value;

pub use ast::Template;
pub use context::Context;
pub use error::{Error, Result, Span};
pub use options::Options;
pub use value::Value;

/// Parses template source into a [`Template`] (spec §6, entry point 1).
///
/// Fails with [`Error::Syntax`] carrying a human-readable message and
/// source span.
pub fn parse(source: &str) -> Result<Template> {
    parser::parse(source)
}

/// Renders a parsed [`Template`] against `ctx` and `options` (spec §6,
/// entry point 2).
///
/// Returns the rendered output, or an error per spec §7. Callers that need
/// the context after evaluation (e.g. to inspect `assign`ed variables)
/// should use [`render_with_context`] instead.
pub fn render(template: &Template, ctx: Context, options: &Options) -> Result<String> {
    eval::eval_template(template, ctx, options).map(|(out, _ctx)| out)
}

/// Like [`render`], but also returns the context after evaluation, which
/// reflects any top-level `assign`/`capture`/`increment`/`decrement`
/// mutations the template performed.
pub fn render_with_context(template: &Template, ctx: Context, options: &Options) -> Result<(String, Context)> {
    eval::eval_template(template, ctx, options)
}

/// Parses and renders `source` in one call (spec §6: "a convenience
/// wrapper `render(source, params, options)` composes the two").
pub fn render_str(source: &str, ctx: Context, options: &Options) -> Result<String> {
    let template = parse(source)?;
    render(&template, ctx, options)
}
