//! Hand-rolled scanner. Walks the source a character at a time rather than
//! through a regex/generated-DFA lexer, since the grammar is context
//! sensitive: plain text, `{{ }}` expressions, and `{% %}` tags each need a
//! different scanning mode, and `raw` blocks need their body copied
//! verbatim regardless of what it contains.

use super::token::{Token, TokenKind};
use crate::error::{Error, Result, Span};

/// Scans a complete template source string into a flat token stream.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Builds a scanner over `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Scans the whole source into tokens, ending with `TokenKind::Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let text_start = self.pos;
            let text = self.scan_text();
            if !text.is_empty() {
                log::trace!("lexer: text run of {} bytes", text.len());
                tokens.push(Token::new(
                    TokenKind::Text(text),
                    Span::new(text_start, self.pos - text_start),
                ));
            }
            if self.rest().is_empty() {
                tokens.push(Token::new(TokenKind::Eof, Span::at(self.pos)));
                break;
            }
            if self.rest().starts_with("{{") {
                let start = self.pos;
                self.pos += 2;
                tokens.push(Token::new(TokenKind::OpenOutput, Span::new(start, 2)));
                self.scan_expr_until(&mut tokens, "}}")?;
            } else if self.rest().starts_with("{%") {
                let start = self.pos;
                self.pos += 2;
                tokens.push(Token::new(TokenKind::OpenTag, Span::new(start, 2)));
                let tag_start = tokens.len();
                self.scan_expr_until(&mut tokens, "%}")?;
                if is_raw_tag_open(&tokens[tag_start..]) {
                    self.scan_raw_block(&mut tokens)?;
                }
            }
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Scans plain text up to (not including) the next `{{` or `{%`.
    fn scan_text(&mut self) -> String {
        let start = self.pos;
        let rest = self.rest();
        let end = find_delim(rest).unwrap_or(rest.len());
        self.pos = start + end;
        rest[..end].to_string()
    }

    /// After a `raw` tag's `%}` has been consumed, copies everything up to
    /// (not including) the next `{% endraw %}` verbatim as a `Text` token,
    /// then scans that closing tag normally.
    fn scan_raw_block(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let start = self.pos;
        let rest = self.rest();
        let end = find_endraw(rest).ok_or_else(|| {
            Error::syntax("unterminated 'raw' block: no matching 'endraw'", Span::at(start))
        })?;
        self.pos = start + end;
        if end > 0 {
            tokens.push(Token::new(
                TokenKind::Text(rest[..end].to_string()),
                Span::new(start, end),
            ));
        }
        // The cursor now sits exactly at the `{%` of `{% endraw %}`.
        let tag_start = self.pos;
        self.pos += 2;
        tokens.push(Token::new(TokenKind::OpenTag, Span::new(tag_start, 2)));
        self.scan_expr_until(tokens, "%}")?;
        Ok(())
    }

    /// Scans expression tokens (identifiers, literals, operators) up to and
    /// including `close` (`"}}"` or `"%}"`).
    fn scan_expr_until(&mut self, tokens: &mut Vec<Token>, close: &str) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.rest().starts_with(close) {
                let start = self.pos;
                self.pos += close.len();
                let kind = if close == "}}" {
                    TokenKind::CloseOutput
                } else {
                    TokenKind::CloseTag
                };
                tokens.push(Token::new(kind, Span::new(start, close.len())));
                return Ok(());
            }
            if self.rest().is_empty() {
                return Err(Error::syntax(
                    format!("unterminated tag, expected '{close}'"),
                    Span::at(self.pos),
                ));
            }
            let token = self.scan_expr_token()?;
            log::trace!("lexer: token {:?}", token.kind);
            tokens.push(token);
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn scan_expr_token(&mut self) -> Result<Token> {
        let start = self.pos;
        let c = self.rest().chars().next().expect("checked non-empty");

        if c == '\'' || c == '"' {
            return self.scan_string(c);
        }
        if c.is_ascii_digit() || (c == '-' && self.peek_is_digit_after_sign()) {
            return self.scan_number();
        }
        if c.is_alphabetic() || c == '_' {
            return self.scan_ident();
        }

        macro_rules! two_char {
            ($a:expr, $b:expr, $kind:expr) => {
                if self.rest().starts_with(concat!($a, $b)) {
                    self.pos += 2;
                    return Ok(Token::new($kind, Span::new(start, 2)));
                }
            };
        }
        two_char!("=", "=", TokenKind::Eq);
        two_char!("!", "=", TokenKind::Ne);
        two_char!("<", "=", TokenKind::Le);
        two_char!(">", "=", TokenKind::Ge);
        if self.rest().starts_with("..") {
            self.pos += 2;
            return Ok(Token::new(TokenKind::DotDot, Span::new(start, 2)));
        }

        let kind = match c {
            '.' => TokenKind::Dot,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Assign,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            other => {
                return Err(Error::syntax(
                    format!("unexpected character '{other}'"),
                    Span::at(start),
                ))
            }
        };
        self.pos += c.len_utf8();
        Ok(Token::new(kind, Span::new(start, self.pos - start)))
    }

    fn peek_is_digit_after_sign(&self) -> bool {
        self.rest()
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_digit())
    }

    fn scan_number(&mut self) -> Result<Token> {
        let start = self.pos;
        if self.rest().starts_with('-') {
            self.pos += 1;
        }
        while self.rest().chars().next().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.rest().starts_with('.') && self.rest()[1..].chars().next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while self.rest().chars().next().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos - start);
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| Error::syntax(format!("invalid float literal '{text}'"), span))?;
            Ok(Token::new(TokenKind::Float(value), span))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| Error::syntax(format!("invalid integer literal '{text}'"), span))?;
            Ok(Token::new(TokenKind::Integer(value), span))
        }
    }

    fn scan_ident(&mut self) -> Result<Token> {
        let start = self.pos;
        while self
            .rest()
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let text = self.source[start..self.pos].to_string();
        Ok(Token::new(
            TokenKind::Ident(text),
            Span::new(start, self.pos - start),
        ))
    }

    fn scan_string(&mut self, quote: char) -> Result<Token> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.rest().chars().next() {
                None => {
                    return Err(Error::syntax(
                        "unterminated string literal",
                        Span::new(start, self.pos - start),
                    ))
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    match self.rest().chars().next() {
                        Some('n') => {
                            value.push('\n');
                            self.pos += 1;
                        }
                        Some('t') => {
                            value.push('\t');
                            self.pos += 1;
                        }
                        Some(esc) if esc == quote || esc == '\\' => {
                            value.push(esc);
                            self.pos += 1;
                        }
                        Some(other) => {
                            value.push(other);
                            self.pos += other.len_utf8();
                        }
                        None => {
                            return Err(Error::syntax(
                                "unterminated string literal",
                                Span::new(start, self.pos - start),
                            ))
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        Ok(Token::new(
            TokenKind::Str(value),
            Span::new(start, self.pos - start),
        ))
    }
}

/// Finds the byte offset of the next `{{` or `{%` in `s`, if any.
fn find_delim(s: &str) -> Option<usize> {
    let a = s.find("{{");
    let b = s.find("{%");
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Finds the byte offset where a `{% endraw %}` tag begins (allowing
/// arbitrary whitespace between `endraw` and `%}`).
fn find_endraw(s: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(rel) = s[search_from..].find("{%") {
        let idx = search_from + rel;
        let after = s[idx + 2..].trim_start();
        if let Some(rest) = after.strip_prefix("endraw") {
            if rest.trim_start().starts_with("%}") {
                return Some(idx);
            }
        }
        search_from = idx + 2;
    }
    None
}

/// Whether the tokens scanned for a just-opened `{% ... %}` tag are
/// `raw`'s — i.e. the first token after `OpenTag` is `Ident("raw")`.
fn is_raw_tag_open(tag_tokens: &[Token]) -> bool {
    matches!(
        tag_tokens.first(),
        Some(Token {
            kind: TokenKind::Ident(name),
            ..
        }) if name == "raw"
    )
}
