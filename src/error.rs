//! Error taxonomy for specification parsing.
//!
//! Every failure aborts the whole `parse` call. Each variant carries the span of the
//! offending node and the verbatim text that span covers, so the message always
//! quotes what the user wrote.

use std::fmt;

use thiserror::Error;

use crate::span::Span;

/// Failure raised by the lexer/parser before any interpretation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("The expression <{text}> is not a valid type specification.{}", detail_suffix(.detail))]
    InvalidSpecification {
        text: String,
        span: Span,
        detail: Option<String>,
    },

    #[error("Invalid number of type parameters specified: {type_name} requires {required}, {given} provided in <{text}>")]
    InvalidParameterCount {
        type_name: String,
        required: Arity,
        given: usize,
        text: String,
        span: Span,
    },

    #[error("Not a parameterized type <{text}>")]
    UnparameterizedType { text: String, span: Span },

    #[error("Unknown type <{text}>")]
    UnknownType { text: String, span: Span },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" {d}"),
        None => String::new(),
    }
}

/// Fieldless discriminant of [`TypeParseError`], handy for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSpecification,
    InvalidParameterCount,
    UnparameterizedType,
    UnknownType,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidSpecification => "InvalidSpecification",
            ErrorKind::InvalidParameterCount => "InvalidParameterCount",
            ErrorKind::UnparameterizedType => "UnparameterizedType",
            ErrorKind::UnknownType => "UnknownType",
        }
    }
}

impl TypeParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSpecification { .. } => ErrorKind::InvalidSpecification,
            Self::InvalidParameterCount { .. } => ErrorKind::InvalidParameterCount,
            Self::UnparameterizedType { .. } => ErrorKind::UnparameterizedType,
            Self::UnknownType { .. } => ErrorKind::UnknownType,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::InvalidSpecification { span, .. }
            | Self::InvalidParameterCount { span, .. }
            | Self::UnparameterizedType { span, .. }
            | Self::UnknownType { span, .. } => *span,
        }
    }

    /// The source text the error quotes.
    pub fn text(&self) -> &str {
        match self {
            Self::InvalidSpecification { text, .. }
            | Self::InvalidParameterCount { text, .. }
            | Self::UnparameterizedType { text, .. }
            | Self::UnknownType { text, .. } => text,
        }
    }
}

/// Number of parameters a parameterized reference accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn admits(self, n: usize) -> bool {
        match self {
            Arity::Exactly(k) => n == k,
            Arity::Between(lo, hi) => lo <= n && n <= hi,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(k) => write!(f, "{k}"),
            Arity::Between(lo, hi) => write!(f, "{lo} or {hi}"),
            Arity::AtLeast(k) => write!(f, "{k} or more"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_descriptions() {
        assert_eq!(Arity::Exactly(1).to_string(), "1");
        assert_eq!(Arity::Between(1, 2).to_string(), "1 or 2");
        assert_eq!(Arity::AtLeast(2).to_string(), "2 or more");
    }

    #[test]
    fn arity_admits() {
        assert!(Arity::Exactly(1).admits(1));
        assert!(!Arity::Exactly(1).admits(2));
        assert!(Arity::Between(1, 2).admits(2));
        assert!(!Arity::Between(1, 2).admits(0));
        assert!(Arity::AtLeast(2).admits(7));
        assert!(!Arity::AtLeast(2).admits(1));
    }

    #[test]
    fn parameter_count_message() {
        let e = TypeParseError::InvalidParameterCount {
            type_name: "Array".into(),
            required: Arity::Exactly(1),
            given: 2,
            text: "Array[String,Integer]".into(),
            span: Span::new(0, 21),
        };
        assert_eq!(
            e.to_string(),
            "Invalid number of type parameters specified: Array requires 1, 2 provided in <Array[String,Integer]>"
        );
        assert_eq!(e.kind(), ErrorKind::InvalidParameterCount);
    }

    #[test]
    fn invalid_specification_with_detail() {
        let e = TypeParseError::InvalidSpecification {
            text: "Array[".into(),
            span: Span::new(0, 6),
            detail: Some("(expected ']')".into()),
        };
        assert_eq!(
            e.to_string(),
            "The expression <Array[> is not a valid type specification. (expected ']')"
        );
    }
}
