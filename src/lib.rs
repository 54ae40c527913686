//! Parse textual type specifications such as `Hash[Integer, Array[String]]` into an
//! immutable [`PType`].
//!
//! ```
//! use type_spec::{factory, parse};
//!
//! let ty = parse("Array[Integer[1, 10]]").unwrap();
//! assert_eq!(ty, factory::array_of(factory::integer_range(Some(1), Some(10))));
//! assert_eq!(ty.to_string(), "Array[Integer[1, 10]]");
//! ```
pub mod ast;
pub mod error;
pub mod factory;
pub mod interpreter;
pub mod parser;
pub mod report;
pub mod span;
pub mod types;

pub use error::{Arity, ErrorKind, SyntaxError, TypeParseError};
pub use interpreter::TypeParser;
pub use span::Span;
pub use types::{PType, ResourceRef};

/// Parse one specification with a fresh [`TypeParser`].
pub fn parse(text: &str) -> Result<PType, TypeParseError> {
    TypeParser::new().parse(text)
}
