//! Recursive descent parser producing the specification AST.
//!
//! ```text
//! spec    := expr EOF
//! expr    := primary ( '[' args ']' )*
//! primary := REFERENCE | NAME | STRING | INTEGER | FLOAT | REGEX | '[' args ']'
//! args    := ( expr ( ',' expr )* ','? )?
//! ```
pub mod lexer;

use crate::ast::{Node, NodeKind};
use crate::error::SyntaxError;
use crate::span::Span;
use lexer::{Spanned, Token};

/// Deepest bracket nesting accepted. One more `[` is a syntax error.
pub const MAX_DEPTH: usize = 256;

/// Parse `src` into an AST root. Blank (or comment-only) input has no root.
pub fn parse_text(src: &str) -> Result<Option<Node>, SyntaxError> {
    let tokens = lexer::tokenize(src)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser::new(&tokens, src.len());
    let root = parser.parse_expr()?;
    if let Some(extra) = parser.cur() {
        return Err(SyntaxError::new(
            format!("unexpected {} after end of specification", describe(&extra.token)),
            extra.span,
        ));
    }
    Ok(Some(root))
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    eof: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], eof: usize) -> Self {
        Parser { tokens, pos: 0, eof, depth: 0 }
    }

    fn cur(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.cur().map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn err_here(&self, expected: &str) -> SyntaxError {
        match self.cur() {
            Some(s) => SyntaxError::new(
                format!("expected {expected}, got {}", describe(&s.token)),
                s.span,
            ),
            None => SyntaxError::new(
                format!("expected {expected}, got end of input"),
                Span::at(self.eof),
            ),
        }
    }

    fn parse_expr(&mut self) -> Result<Node, SyntaxError> {
        let mut node = self.parse_primary()?;
        while let Some(open) = self.cur().filter(|s| s.token == Token::LBracket) {
            self.advance();
            let (arguments, close) = self.parse_args(open.span)?;
            let span = node.span.merge(close);
            node = Node::new(
                NodeKind::AccessExpression { target: Box::new(node), arguments },
                span,
            );
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node, SyntaxError> {
        let Some(s) = self.cur() else {
            return Err(self.err_here("a type or value"));
        };
        let kind = match &s.token {
            Token::Reference(r) => NodeKind::QualifiedReference(strip_root(r).to_lowercase()),
            Token::Name(n) => match n.as_str() {
                "default" => NodeKind::LiteralDefault,
                "true" => NodeKind::LiteralBoolean(true),
                "false" => NodeKind::LiteralBoolean(false),
                "undef" => NodeKind::LiteralUndef,
                _ => NodeKind::QualifiedName(strip_root(n).to_string()),
            },
            Token::Str(v) => NodeKind::LiteralString(v.clone()),
            Token::Integer(i) => NodeKind::LiteralInteger(*i),
            Token::Float(f) => NodeKind::LiteralFloat(*f),
            Token::Regex(r) => NodeKind::LiteralRegex(r.clone()),
            Token::LBracket => {
                self.advance();
                let (items, close) = self.parse_args(s.span)?;
                return Ok(Node::new(NodeKind::LiteralArray(items), s.span.merge(close)));
            }
            Token::RBracket | Token::Comma => return Err(self.err_here("a type or value")),
        };
        self.advance();
        Ok(Node::new(kind, s.span))
    }

    /// Parses a comma separated list after the opening `[` at `open`, consuming the
    /// closing `]`.
    fn parse_args(&mut self, open: Span) -> Result<(Vec<Node>, Span), SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::new("specification nested too deeply", open));
        }
        self.depth += 1;
        let result = self.parse_arg_list();
        self.depth -= 1;
        result
    }

    fn parse_arg_list(&mut self) -> Result<(Vec<Node>, Span), SyntaxError> {
        let mut args = Vec::new();
        loop {
            if let Some(Spanned { token: Token::RBracket, span }) = self.cur() {
                self.advance();
                return Ok((args, *span));
            }
            args.push(self.parse_expr()?);
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                }
                Some(Token::RBracket) => {}
                _ => return Err(self.err_here("',' or ']'")),
            }
        }
    }
}

fn strip_root(name: &str) -> &str {
    name.strip_prefix("::").unwrap_or(name)
}

fn describe(token: &Token) -> String {
    match token {
        Token::Name(n) => format!("name `{n}`"),
        Token::Reference(r) => format!("reference `{r}`"),
        Token::Str(_) => "string".to_string(),
        Token::Integer(i) => format!("integer {i}"),
        Token::Float(f) => format!("float {f}"),
        Token::Regex(_) => "regular expression".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::Comma => "','".to_string(),
    }
}
