//! Error handling and diagnostics for the liquidust template engine.
//!
//! Mirrors the hand-rolled error taxonomy style used throughout this crate's
//! lineage: a single `Error` enum, manual `Display`, no `thiserror`.

use std::fmt;

/// A location in template source, expressed as a byte offset and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Starting byte offset.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Creates a zero-width span at the given offset.
    pub fn at(pos: usize) -> Self {
        Self::new(pos, 0)
    }

    /// Returns the end offset of the span.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Combines two spans into one covering both.
    pub fn combine(self, other: Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span::new(start, end - start)
    }

    /// Resolves this span's start offset to a 1-based (line, column) pair
    /// within `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for ch in source[..self.start.min(source.len())].chars() {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

/// A value tagged with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub inner: T,
    /// The source location of `inner`.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Wraps `inner` with `span`.
    pub fn new(inner: T, span: Span) -> Self {
        Self { inner, span }
    }
}

/// Result type used throughout liquidust.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by parsing and rendering.
///
/// Lax-mode lookup/filter misses never construct one of these; they resolve
/// locally to null/passthrough per spec §4.3-§4.4 instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The template source did not parse. Always fatal.
    Syntax {
        /// Human-readable description of what went wrong.
        message: String,
        /// Where in the source the problem was found.
        span: Span,
    },
    /// A `strict_variables` lookup found no binding for `name`.
    UndefinedVariable {
        /// The variable name that had no binding.
        name: String,
    },
    /// A `strict_filters` pipeline referenced a filter with no registration.
    UndefinedFilter {
        /// The unresolved filter name.
        name: String,
    },
    /// A built-in or custom filter function returned an error.
    Filter {
        /// The name of the filter that failed.
        name: String,
        /// The underlying failure message.
        message: String,
    },
    /// A `break` or `continue` appeared outside of any enclosing `for` loop.
    ///
    /// This is a template-authoring error, not an engine bug: it is reported
    /// structurally rather than allowed to silently vanish or panic.
    StrayControlSignal {
        /// Which of `break`/`continue` escaped.
        kind: &'static str,
    },
}

impl Error {
    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Creates an undefined-variable error.
    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::UndefinedVariable { name: name.into() }
    }

    /// Creates an undefined-filter error.
    pub fn undefined_filter(name: impl Into<String>) -> Self {
        Self::UndefinedFilter { name: name.into() }
    }

    /// Creates a filter-execution error.
    pub fn filter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Filter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a stray break/continue diagnostic.
    pub fn stray(kind: &'static str) -> Self {
        Self::StrayControlSignal { kind }
    }

    /// The byte offset into the source where this error originates, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { span, .. } => Some(span.start),
            _ => None,
        }
    }

    /// Renders this error against `source`, resolving a `Syntax` error's
    /// byte offset to a `line:column` position. The position is derived on
    /// demand rather than stored, since `Error` itself keeps no reference
    /// to the source it came from.
    pub fn render_with_source(&self, source: &str) -> String {
        match self {
            Self::Syntax { message, span } => {
                let (line, col) = span.line_col(source);
                format!("syntax error at {line}:{col}: {message}")
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { message, span } => {
                write!(f, "syntax error at byte {}: {message}", span.start)
            }
            Self::UndefinedVariable { name } => write!(f, "undefined variable '{name}'"),
            Self::UndefinedFilter { name } => write!(f, "undefined filter '{name}'"),
            Self::Filter { name, message } => write!(f, "filter '{name}' failed: {message}"),
            Self::StrayControlSignal { kind } => {
                write!(f, "stray '{kind}' outside of any enclosing for loop")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_combine_covers_both() {
        let a = Span::new(5, 3);
        let b = Span::new(10, 2);
        let combined = a.combine(b);
        assert_eq!(combined.start, 5);
        assert_eq!(combined.end(), 12);
    }

    #[test]
    fn line_col_counts_newlines() {
        let src = "ab\ncd\nef";
        let span = Span::at(6); // 'e'
        assert_eq!(span.line_col(src), (3, 1));
    }

    #[test]
    fn render_with_source_resolves_line_column() {
        let err = Error::syntax("unexpected end of input", Span::at(6));
        assert_eq!(
            err.render_with_source("ab\ncd\nef"),
            "syntax error at 3:1: unexpected end of input"
        );
    }

    #[test]
    fn display_messages_name_the_failing_identifier() {
        assert_eq!(
            Error::undefined_variable("z").to_string(),
            "undefined variable 'z'"
        );
        assert_eq!(
            Error::undefined_filter("frobnicate").to_string(),
            "undefined filter 'frobnicate'"
        );
    }
}
