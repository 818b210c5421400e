//! Recursive-descent parser: token stream → typed AST (spec §4.1).
//!
//! There is no separate parse-tree-to-AST transform pass; each grammar
//! production builds its typed `ast` node directly as it descends, the same
//! shape the teacher's own recursive-descent parser uses for its `Expr`
//! tree. Parse errors are always fatal (spec §4.1): the parser never
//! attempts recovery.

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::Value;

/// Parses `source` into a `Template`.
pub fn parse(source: &str) -> Result<Template> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let template = parser.parse_block(&[])?;
    parser.expect_eof()?;
    Ok(template)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn expect_eof(&mut self) -> Result<()> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::syntax(
            format!("unexpected {}, expected {expected}", self.peek().kind),
            self.peek().span,
        )
    }

    /// The tag name of the upcoming `{% name ... %}`, if the parser is
    /// positioned right at its `OpenTag`.
    fn peek_tag_name(&self) -> Option<&str> {
        if !matches!(self.peek().kind, TokenKind::OpenTag) {
            return None;
        }
        match &self.tokens[self.pos + 1].kind {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn peek_ident(&self) -> Option<&str> {
        match &self.peek().kind {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn eat_ident(&mut self, expected: &str) -> Result<()> {
        if self.peek_ident() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn expect_close_tag(&mut self) -> Result<()> {
        if matches!(self.peek().kind, TokenKind::CloseTag) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("'%}'"))
        }
    }

    fn expect_close_output(&mut self) -> Result<()> {
        if matches!(self.peek().kind, TokenKind::CloseOutput) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("'}}'"))
        }
    }

    /// Consumes `{% name`, leaving the cursor right after the tag name,
    /// before any arguments.
    fn open_tag(&mut self, name: &str) -> Result<()> {
        if !matches!(self.peek().kind, TokenKind::OpenTag) {
            return Err(self.unexpected("'{%'"));
        }
        self.advance();
        self.eat_ident(name)
    }

    /// Parses nodes until a tag in `stops` is the next upcoming tag (not
    /// consumed) or end of input is reached (only valid when `stops` is
    /// empty, i.e. the top-level template).
    fn parse_block(&mut self, stops: &[&str]) -> Result<Template> {
        let mut nodes = Vec::new();
        loop {
            if let Some(name) = self.peek_tag_name() {
                if stops.contains(&name) {
                    return Ok(Template { nodes });
                }
            }
            if self.at_eof() {
                if stops.is_empty() {
                    return Ok(Template { nodes });
                }
                return Err(Error::syntax(
                    format!("unexpected end of input, expected '{{% {} %}}'", stops.join("' or '{% ")),
                    self.peek().span,
                ));
            }
            nodes.push(self.parse_node()?);
        }
    }

    fn parse_node(&mut self) -> Result<Node> {
        match &self.peek().kind {
            TokenKind::Text(text) => {
                let text = text.clone();
                self.advance();
                Ok(Node::Text(text))
            }
            TokenKind::OpenOutput => Ok(Node::Output(self.parse_object_expr()?)),
            TokenKind::OpenTag => {
                let name = self.peek_tag_name().unwrap_or_default().to_string();
                log::trace!("parser: tag '{name}'");
                match name.as_str() {
                    "assign" => self.parse_assign(),
                    "capture" => self.parse_capture(),
                    "increment" => self.parse_counter(true),
                    "decrement" => self.parse_counter(false),
                    "if" => Ok(Node::If(self.parse_conditional("if", "endif")?)),
                    "unless" => Ok(Node::Unless(self.parse_conditional("unless", "endunless")?)),
                    "case" => Ok(Node::Case(self.parse_case()?)),
                    "for" => Ok(Node::For(self.parse_for()?)),
                    "break" => {
                        self.open_tag("break")?;
                        self.expect_close_tag()?;
                        Ok(Node::Break)
                    }
                    "continue" => {
                        self.open_tag("continue")?;
                        self.expect_close_tag()?;
                        Ok(Node::Continue)
                    }
                    "raw" => self.parse_raw(),
                    other => Err(Error::syntax(
                        format!("unknown tag '{other}'"),
                        self.peek().span,
                    )),
                }
            }
            _ => Err(self.unexpected("text, '{{' or '{%'")),
        }
    }

    fn parse_raw(&mut self) -> Result<Node> {
        self.open_tag("raw")?;
        self.expect_close_tag()?;
        let text = match &self.peek().kind {
            TokenKind::Text(text) => {
                let text = text.clone();
                self.advance();
                text
            }
            _ => String::new(),
        };
        self.open_tag("endraw")?;
        self.expect_close_tag()?;
        Ok(Node::Text(text))
    }

    fn parse_object_expr(&mut self) -> Result<ObjectExpr> {
        self.advance(); // OpenOutput
        let obj = self.parse_expr()?;
        let mut filters = Vec::new();
        while matches!(self.peek().kind, TokenKind::Pipe) {
            self.advance();
            filters.push(self.parse_filter()?);
        }
        self.expect_close_output()?;
        Ok(ObjectExpr { obj, filters })
    }

    /// Parses a primary expression: a literal, a lookup (with its own
    /// `.attr`/`[key]` postfix chain), or a parenthesized range. Trailing
    /// `| filter` pipelines are handled by the caller (only `ObjectExpr`
    /// carries a filter pipeline in this implementation's choice of
    /// surface — see `ast::PostfixOp`).
    fn parse_expr(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Value::Integer(n)))
            }
            TokenKind::Float(x) => {
                self.advance();
                Ok(Expr::Literal(Value::Float(x)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Value::Str(s)))
            }
            TokenKind::Ident(name) if name == "true" => {
                self.advance();
                Ok(Expr::Literal(Value::Bool(true)))
            }
            TokenKind::Ident(name) if name == "false" => {
                self.advance();
                Ok(Expr::Literal(Value::Bool(false)))
            }
            TokenKind::Ident(_) => Ok(Expr::Lookup(self.parse_lookup()?)),
            TokenKind::LParen => self.parse_range(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_lookup(&mut self) -> Result<Lookup> {
        let name = self.expect_ident()?;
        let mut fns = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let attr = self.expect_ident()?;
                    fns.push(PostfixOp::Index(Expr::Literal(Value::Str(attr))));
                }
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_expr()?;
                    if !matches!(self.peek().kind, TokenKind::RBracket) {
                        return Err(self.unexpected("']'"));
                    }
                    self.advance();
                    fns.push(PostfixOp::Index(key));
                }
                _ => break,
            }
        }
        Ok(Lookup { name, fns })
    }

    fn parse_filter(&mut self) -> Result<Filter> {
        let name = self.expect_ident()?;
        let mut args = Vec::new();
        if matches!(self.peek().kind, TokenKind::Colon) {
            self.advance();
            args.push(self.parse_expr()?);
            while matches!(self.peek().kind, TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        Ok(Filter { name, args })
    }

    fn parse_range(&mut self) -> Result<Expr> {
        self.advance(); // LParen
        let start = self.parse_range_endpoint()?;
        if !matches!(self.peek().kind, TokenKind::DotDot) {
            return Err(self.unexpected("'..'"));
        }
        self.advance();
        let end = self.parse_range_endpoint()?;
        if !matches!(self.peek().kind, TokenKind::RParen) {
            return Err(self.unexpected("')'"));
        }
        self.advance();
        Ok(Expr::Range(Box::new(Range { start, end })))
    }

    fn parse_range_endpoint(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Value::Integer(n)))
            }
            TokenKind::Ident(_) => Ok(Expr::Lookup(self.parse_lookup()?)),
            _ => Err(self.unexpected("an integer or a variable")),
        }
    }

    fn parse_assign(&mut self) -> Result<Node> {
        self.open_tag("assign")?;
        let var = self.expect_ident()?;
        if !matches!(self.peek().kind, TokenKind::Assign) {
            return Err(self.unexpected("'='"));
        }
        self.advance();
        let value = self.parse_expr()?;
        self.expect_close_tag()?;
        Ok(Node::Assign(Assign { var, value }))
    }

    fn parse_capture(&mut self) -> Result<Node> {
        self.open_tag("capture")?;
        let var = self.expect_ident()?;
        self.expect_close_tag()?;
        let template = self.parse_block(&["endcapture"])?;
        self.open_tag("endcapture")?;
        self.expect_close_tag()?;
        Ok(Node::Capture(Capture { var, template }))
    }

    fn parse_counter(&mut self, increment: bool) -> Result<Node> {
        self.open_tag(if increment { "increment" } else { "decrement" })?;
        let var = self.expect_ident()?;
        self.expect_close_tag()?;
        Ok(if increment {
            Node::Increment(var)
        } else {
            Node::Decrement(var)
        })
    }

    fn parse_conditional(&mut self, open_name: &str, end_name: &str) -> Result<ConditionalBlock> {
        self.open_tag(open_name)?;
        let pred = self.parse_predicate()?;
        self.expect_close_tag()?;
        let template = self.parse_block(&["elsif", end_name, "else"])?;
        let mut conditions = vec![Condition { pred, template }];
        loop {
            match self.peek_tag_name() {
                Some("elsif") => {
                    self.open_tag("elsif")?;
                    let pred = self.parse_predicate()?;
                    self.expect_close_tag()?;
                    let template = self.parse_block(&["elsif", end_name, "else"])?;
                    conditions.push(Condition { pred, template });
                }
                Some("else") => {
                    self.open_tag("else")?;
                    self.expect_close_tag()?;
                    let template = self.parse_block(&[end_name])?;
                    self.open_tag(end_name)?;
                    self.expect_close_tag()?;
                    return Ok(ConditionalBlock {
                        conditions,
                        else_branch: Some(Else { template }),
                    });
                }
                Some(name) if name == end_name => {
                    self.open_tag(end_name)?;
                    self.expect_close_tag()?;
                    return Ok(ConditionalBlock {
                        conditions,
                        else_branch: None,
                    });
                }
                _ => return Err(self.unexpected(&format!("'elsif', 'else', or '{end_name}'"))),
            }
        }
    }

    fn parse_case(&mut self) -> Result<Case> {
        self.open_tag("case")?;
        let val = self.parse_expr()?;
        self.expect_close_tag()?;
        // Whitespace/text between `case` and the first `when` is ignored.
        let _ = self.parse_block(&["when", "else", "endcase"])?;
        let mut whens = Vec::new();
        loop {
            match self.peek_tag_name() {
                Some("when") => {
                    self.open_tag("when")?;
                    let when_val = self.parse_expr()?;
                    self.expect_close_tag()?;
                    let template = self.parse_block(&["when", "else", "endcase"])?;
                    whens.push(When {
                        val: when_val,
                        template,
                    });
                }
                Some("else") => {
                    self.open_tag("else")?;
                    self.expect_close_tag()?;
                    let template = self.parse_block(&["endcase"])?;
                    self.open_tag("endcase")?;
                    self.expect_close_tag()?;
                    return Ok(Case {
                        val,
                        whens,
                        else_branch: Some(Else { template }),
                    });
                }
                Some("endcase") => {
                    self.open_tag("endcase")?;
                    self.expect_close_tag()?;
                    return Ok(Case {
                        val,
                        whens,
                        else_branch: None,
                    });
                }
                _ => return Err(self.unexpected("'when', 'else', or 'endcase'")),
            }
        }
    }

    fn parse_for(&mut self) -> Result<For> {
        self.open_tag("for")?;
        let var = self.expect_ident()?;
        self.eat_ident("in")?;
        let collection = self.parse_expr()?;
        let for_opts = self.parse_for_opts()?;
        self.expect_close_tag()?;
        let template = self.parse_block(&["endfor"])?;
        self.open_tag("endfor")?;
        self.expect_close_tag()?;
        Ok(For {
            var,
            collection,
            for_opts,
            template,
        })
    }

    fn parse_for_opts(&mut self) -> Result<Option<ForOpts>> {
        let mut opts = ForOpts::default();
        let mut any = false;
        loop {
            match self.peek_ident() {
                Some("limit") => {
                    any = true;
                    self.advance();
                    self.expect_colon()?;
                    opts.limit = Some(self.expect_non_negative_integer("limit")?);
                }
                Some("offset") => {
                    any = true;
                    self.advance();
                    self.expect_colon()?;
                    opts.offset = Some(self.expect_non_negative_integer("offset")?);
                }
                Some("reversed") => {
                    any = true;
                    self.advance();
                    opts.reversed = true;
                }
                _ => break,
            }
        }
        Ok(if any { Some(opts) } else { None })
    }

    fn expect_colon(&mut self) -> Result<()> {
        if matches!(self.peek().kind, TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("':'"))
        }
    }

    fn expect_integer(&mut self) -> Result<i64> {
        match self.peek().kind.clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected("an integer")),
        }
    }

    /// `limit`/`offset` reject negative literals at parse time rather than
    /// silently clamping them at evaluation time (spec §4.6 invariant (v)).
    fn expect_non_negative_integer(&mut self, modifier: &str) -> Result<i64> {
        let span = self.peek().span;
        let n = self.expect_integer()?;
        if n < 0 {
            return Err(Error::syntax(
                format!("'{modifier}' must not be negative, found {n}"),
                span,
            ));
        }
        Ok(n)
    }

    fn parse_predicate(&mut self) -> Result<Predicate> {
        let mut left = self.parse_and_predicate()?;
        while self.peek_ident() == Some("or") {
            self.advance();
            let right = self.parse_and_predicate()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and_predicate(&mut self) -> Result<Predicate> {
        let mut left = self.parse_predicate_atom()?;
        while self.peek_ident() == Some("and") {
            self.advance();
            let right = self.parse_predicate_atom()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_predicate_atom(&mut self) -> Result<Predicate> {
        let operand = self.parse_expr()?;
        if let Some(op) = self.peek_relational_operator() {
            self.advance();
            let rhs = self.parse_expr()?;
            return Ok(Predicate::Assertion {
                op,
                lhs: operand,
                rhs,
            });
        }
        if self.peek_ident() == Some("contains") {
            self.advance();
            let rhs = self.parse_expr()?;
            return Ok(Predicate::Assertion {
                op: Operator::Contains,
                lhs: operand,
                rhs,
            });
        }
        Ok(Predicate::Truthy(operand))
    }

    fn peek_relational_operator(&self) -> Option<Operator> {
        match self.peek().kind {
            TokenKind::Eq => Some(Operator::Eq),
            TokenKind::Ne => Some(Operator::Ne),
            TokenKind::Lt => Some(Operator::Lt),
            TokenKind::Le => Some(Operator::Le),
            TokenKind::Gt => Some(Operator::Gt),
            TokenKind::Ge => Some(Operator::Ge),
            _ => None,
        }
    }
}
