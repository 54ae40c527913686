// Syntax tree handed from the parser to the interpreter. No type objects here.

use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    QualifiedName(String),       // bare lower-case identifier, `foo::bar`
    QualifiedReference(String),  // capitalized name, stored lower-cased
    LiteralString(String),
    LiteralInteger(i64),
    LiteralFloat(f64),
    LiteralRegex(String),        // body of `/.../`, delimiter escapes removed
    LiteralDefault,              // `default`
    LiteralBoolean(bool),
    LiteralUndef,
    LiteralArray(Vec<Node>),     // `[a, b]` not applied to anything
    AccessExpression {
        target: Box<Node>,
        arguments: Vec<Node>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Short human label for the node kind, used in trace output.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::QualifiedName(_) => "qualified name",
            NodeKind::QualifiedReference(_) => "qualified reference",
            NodeKind::LiteralString(_) => "string",
            NodeKind::LiteralInteger(_) => "integer",
            NodeKind::LiteralFloat(_) => "float",
            NodeKind::LiteralRegex(_) => "regex",
            NodeKind::LiteralDefault => "default",
            NodeKind::LiteralBoolean(_) => "boolean",
            NodeKind::LiteralUndef => "undef",
            NodeKind::LiteralArray(_) => "array literal",
            NodeKind::AccessExpression { .. } => "access expression",
        }
    }
}
