//! Specification interpreter: walks the parsed AST and builds a [`PType`].
//!
//! The interpreter holds no per-call state. The text being parsed travels as a
//! [`Source`] argument through every recursive step, so one [`TypeParser`] can be
//! shared by any number of threads.
pub mod names;

use tracing::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::error::{Arity, TypeParseError};
use crate::factory;
use crate::parser;
use crate::report::Source;
use crate::span::Span;
use crate::types::{PType, ResourceRef};
use names::TypeName;

// ------------------------------- Values ---------------------------------- //

/// Result of dispatching one node. Only `Type` may escape `parse`; the rest are raw
/// arguments for an enclosing parameterized reference.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Type(PType),
    String(String),
    Integer(i64),
    Float(f64),
    Regex(String),
    /// `default`: an open range bound. Its own variant, never equal to a number or string.
    Default,
}

/// A dispatched argument together with the node it came from, for diagnostics.
struct Arg<'n> {
    value: Value,
    node: &'n Node,
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug, Default, Clone, Copy)]
pub struct TypeParser;

impl TypeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a type specification such as `Hash[Integer, Array[String]]`.
    pub fn parse(&self, text: &str) -> Result<PType, TypeParseError> {
        debug!(text, "parsing type specification");
        let source = Source::new(text);
        let root = match parser::parse_text(text) {
            Ok(Some(root)) => root,
            Ok(None) => return Err(whole_input_invalid(source, None)),
            Err(e) => {
                let at = source.line_col(e.span.start);
                let detail = format!("(syntax error at {}:{}: {})", at.line, at.col, e.message);
                debug!(%e, "specification did not parse");
                return Err(whole_input_invalid(source, Some(detail)));
            }
        };
        self.interpret_in(&root, source)
    }

    /// Interpret an AST built elsewhere. `text` must be the input the spans refer to.
    pub fn interpret(&self, root: &Node, text: &str) -> Result<PType, TypeParseError> {
        self.interpret_in(root, Source::new(text))
    }

    /// Parse a batch, one result per input, in order.
    pub fn parse_all<'t, I>(&self, texts: I) -> Vec<Result<PType, TypeParseError>>
    where
        I: IntoIterator<Item = &'t str>,
    {
        texts.into_iter().map(|t| self.parse(t)).collect()
    }

    fn interpret_in(&self, root: &Node, source: Source<'_>) -> Result<PType, TypeParseError> {
        match dispatch(root, source, 0)? {
            Value::Type(ty) => Ok(ty),
            other => {
                debug!(?other, "specification evaluated to a non-type value");
                Err(whole_input_invalid(source, None))
            }
        }
    }
}

// ------------------------------- Dispatch --------------------------------- //

/// `depth` counts the access expressions enclosing `node`. Parsed trees never exceed
/// [`parser::MAX_DEPTH`]; trees handed to `interpret` are held to the same bound.
fn dispatch(node: &Node, source: Source<'_>, depth: usize) -> Result<Value, TypeParseError> {
    trace!(kind = node.kind_name(), depth, text = source.slice(node.span), "dispatch");
    match &node.kind {
        NodeKind::QualifiedName(name) => Ok(Value::String(name.clone())),
        NodeKind::LiteralString(s) => Ok(Value::String(s.clone())),
        NodeKind::LiteralInteger(i) => Ok(Value::Integer(*i)),
        NodeKind::LiteralFloat(f) => Ok(Value::Float(*f)),
        NodeKind::LiteralRegex(r) => Ok(Value::Regex(r.clone())),
        NodeKind::LiteralDefault => Ok(Value::Default),
        NodeKind::QualifiedReference(name) => resolve_bare(name, node, source).map(Value::Type),
        NodeKind::AccessExpression { target, arguments } => {
            let NodeKind::QualifiedReference(name) = &target.kind else {
                return Err(invalid_node(target, source));
            };
            if depth >= parser::MAX_DEPTH {
                debug!(depth, "access expressions nested too deeply");
                return Err(invalid_node(node, source));
            }
            let args = arguments
                .iter()
                .map(|a| dispatch(a, source, depth + 1).map(|value| Arg { value, node: a }))
                .collect::<Result<Vec<_>, _>>()?;
            resolve_parameterized(name, args, node, source).map(Value::Type)
        }
        NodeKind::LiteralBoolean(_) | NodeKind::LiteralUndef | NodeKind::LiteralArray(_) => {
            Err(invalid_node(node, source))
        }
    }
}

// ----------------------------- Bare names -------------------------------- //

fn resolve_bare(name: &str, node: &Node, source: Source<'_>) -> Result<PType, TypeParseError> {
    let ty = match TypeName::from_lowercase(name) {
        TypeName::Integer => factory::integer(),
        TypeName::Float => factory::float(),
        TypeName::Numeric => factory::numeric(),
        TypeName::String => factory::string(),
        TypeName::Enum => factory::enum_(),
        TypeName::Boolean => factory::boolean(),
        TypeName::Pattern => factory::pattern(),
        TypeName::Regexp => factory::regexp(),
        TypeName::Data => factory::data(),
        TypeName::Array => factory::array(),
        TypeName::Hash => factory::hash(),
        TypeName::Class => factory::class(),
        TypeName::Resource => factory::resource(None, None),
        TypeName::Collection => factory::collection(),
        TypeName::Literal => factory::literal(),
        TypeName::CatalogEntry => factory::catalog_entry(),
        TypeName::Undef => factory::undef(),
        TypeName::Object => factory::object(),
        TypeName::Variant => factory::variant(),
        TypeName::Ruby | TypeName::Type => return Err(unknown_type(node, source)),
        TypeName::Other(resource_type) => factory::resource(Some(resource_type.as_str()), None),
    };
    Ok(ty)
}

// -------------------------- Parameterized names --------------------------- //

/// Arguments are consumed: each one's value moves into the type being built.
fn resolve_parameterized(
    name: &str,
    args: Vec<Arg<'_>>,
    node: &Node,
    source: Source<'_>,
) -> Result<PType, TypeParseError> {
    let type_name = TypeName::from_lowercase(name);
    let given = args.len();
    trace!(?type_name, given, "resolve parameterized");
    let arity = |required: Arity| check_arity(&type_name, required, given, node, source);

    match &type_name {
        TypeName::Array => {
            arity(Arity::Exactly(1))?;
            let [element] = split::<1>(args, node, source)?;
            Ok(factory::array_of(structural(element, source)?))
        }

        TypeName::Hash => {
            arity(Arity::Between(1, 2))?;
            if given == 1 {
                let [value] = split::<1>(args, node, source)?;
                Ok(factory::hash_of(structural(value, source)?))
            } else {
                let [key, value] = split::<2>(args, node, source)?;
                let key = structural(key, source)?;
                let value = structural(value, source)?;
                Ok(factory::hash_of_with_key(value, key))
            }
        }

        TypeName::Class => {
            arity(Arity::Exactly(1))?;
            let [class_name] = split::<1>(args, node, source)?;
            let class_name = string_arg(class_name, source)?;
            Ok(factory::class_of(Some(class_name.as_str())))
        }

        TypeName::Resource => {
            arity(Arity::Between(1, 2))?;
            let (resource_type, title) = if given == 1 {
                let [resource_type] = split::<1>(args, node, source)?;
                (resource_type, None)
            } else {
                let [resource_type, title] = split::<2>(args, node, source)?;
                (resource_type, Some(title))
            };
            let resource_type = resource_type_arg(resource_type, source)?;
            let title = title.map(|t| title_arg(t, source)).transpose()?;
            Ok(factory::resource(Some(resource_type.as_str()), title.as_deref()))
        }

        TypeName::Regexp => {
            arity(Arity::Exactly(1))?;
            let [pattern] = split::<1>(args, node, source)?;
            let pattern = pattern_arg(pattern, source)?;
            Ok(factory::regexp_of(Some(pattern.as_str())))
        }

        TypeName::Enum => {
            arity(Arity::AtLeast(2))?;
            let values = args
                .into_iter()
                .map(|a| string_arg(a, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(factory::enum_of(values))
        }

        // a single pattern is not a parameterization of Pattern
        TypeName::Pattern if given == 1 => Err(unparameterized(node, source)),
        TypeName::Pattern => {
            arity(Arity::AtLeast(2))?;
            let patterns = args
                .into_iter()
                .map(|a| pattern_arg(a, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(factory::pattern_of(patterns))
        }

        TypeName::Variant => {
            arity(Arity::AtLeast(2))?;
            let types = args
                .into_iter()
                .map(|a| type_arg(a, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(factory::variant_of(types))
        }

        TypeName::Integer => {
            arity(Arity::Between(1, 2))?;
            if given == 1 {
                let [point] = split::<1>(args, node, source)?;
                match point.value {
                    Value::Integer(n) => Ok(factory::integer_range(Some(n), Some(n))),
                    Value::Default => Ok(factory::integer()),
                    _ => Err(invalid_node(point.node, source)),
                }
            } else {
                let [min, max] = split::<2>(args, node, source)?;
                let min = integer_bound(&min, source)?;
                let max = integer_bound(&max, source)?;
                Ok(factory::integer_range(min, max))
            }
        }

        TypeName::Float => {
            arity(Arity::Between(1, 2))?;
            if given == 1 {
                let [point] = split::<1>(args, node, source)?;
                match float_bound(&point, source)? {
                    Some(x) => Ok(factory::float_range(Some(x), Some(x))),
                    None => Ok(factory::float()),
                }
            } else {
                let [min, max] = split::<2>(args, node, source)?;
                let min = float_bound(&min, source)?;
                let max = float_bound(&max, source)?;
                Ok(factory::float_range(min, max))
            }
        }

        TypeName::Object
        | TypeName::Collection
        | TypeName::Data
        | TypeName::CatalogEntry
        | TypeName::Boolean
        | TypeName::Literal
        | TypeName::Undef
        | TypeName::Numeric
        | TypeName::String => Err(unparameterized(node, source)),

        TypeName::Ruby | TypeName::Type => Err(unknown_type(node, source)),

        // `File['/tmp/foo']`: a titled reference to a user defined resource type
        TypeName::Other(resource_type) => {
            arity(Arity::Exactly(1))?;
            let [title] = split::<1>(args, node, source)?;
            let title = title_arg(title, source)?;
            Ok(factory::resource(Some(resource_type.as_str()), Some(title.as_str())))
        }
    }
}

fn check_arity(
    type_name: &TypeName,
    required: Arity,
    given: usize,
    node: &Node,
    source: Source<'_>,
) -> Result<(), TypeParseError> {
    if required.admits(given) {
        return Ok(());
    }
    debug!(?type_name, %required, given, "wrong number of type parameters");
    Err(TypeParseError::InvalidParameterCount {
        type_name: type_name.display_name(),
        required,
        given,
        text: source.slice(node.span).to_string(),
        span: node.span,
    })
}

/// Destructure an argument list whose length `check_arity` has already fixed.
fn split<'n, const N: usize>(
    args: Vec<Arg<'n>>,
    node: &Node,
    source: Source<'_>,
) -> Result<[Arg<'n>; N], TypeParseError> {
    args.try_into().map_err(|_| invalid_node(node, source))
}

// ---------------------------- Argument kinds ------------------------------ //

fn type_arg(arg: Arg<'_>, source: Source<'_>) -> Result<PType, TypeParseError> {
    match arg.value {
        Value::Type(t) => Ok(t),
        _ => Err(invalid_node(arg.node, source)),
    }
}

/// Element and key positions need a structural type.
fn structural(arg: Arg<'_>, source: Source<'_>) -> Result<PType, TypeParseError> {
    match arg.value {
        Value::Type(t) if t.is_structural() => Ok(t),
        _ => Err(invalid_node(arg.node, source)),
    }
}

fn string_arg(arg: Arg<'_>, source: Source<'_>) -> Result<String, TypeParseError> {
    match arg.value {
        Value::String(s) => Ok(s),
        _ => Err(invalid_node(arg.node, source)),
    }
}

/// Strings and regex literals, or an already built `Regexp[...]`.
fn pattern_arg(arg: Arg<'_>, source: Source<'_>) -> Result<String, TypeParseError> {
    match arg.value {
        Value::String(s) | Value::Regex(s) => Ok(s),
        Value::Type(PType::Regexp { pattern: Some(p) }) => Ok(p),
        _ => Err(invalid_node(arg.node, source)),
    }
}

/// `Resource[file]`, `Resource['file']` and `Resource[File]` all name the same type.
fn resource_type_arg(arg: Arg<'_>, source: Source<'_>) -> Result<String, TypeParseError> {
    match arg.value {
        Value::String(s) => Ok(s),
        Value::Type(PType::Resource {
            reference: Some(ResourceRef { type_name, title: None }),
        }) => Ok(type_name),
        _ => Err(invalid_node(arg.node, source)),
    }
}

fn title_arg(arg: Arg<'_>, source: Source<'_>) -> Result<String, TypeParseError> {
    match arg.value {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        _ => Err(invalid_node(arg.node, source)),
    }
}

fn integer_bound(arg: &Arg<'_>, source: Source<'_>) -> Result<Option<i64>, TypeParseError> {
    match arg.value {
        Value::Integer(n) => Ok(Some(n)),
        Value::Default => Ok(None),
        _ => Err(invalid_node(arg.node, source)),
    }
}

fn float_bound(arg: &Arg<'_>, source: Source<'_>) -> Result<Option<f64>, TypeParseError> {
    match arg.value {
        Value::Integer(n) => Ok(Some(n as f64)),
        Value::Float(x) => Ok(Some(x)),
        Value::Default => Ok(None),
        _ => Err(invalid_node(arg.node, source)),
    }
}

// -------------------------------- Errors ---------------------------------- //

fn whole_input_invalid(source: Source<'_>, detail: Option<String>) -> TypeParseError {
    TypeParseError::InvalidSpecification {
        text: source.text().to_string(),
        span: Span::new(0, source.text().len()),
        detail,
    }
}

fn invalid_node(node: &Node, source: Source<'_>) -> TypeParseError {
    debug!(kind = node.kind_name(), "not a valid type specification");
    TypeParseError::InvalidSpecification {
        text: source.slice(node.span).to_string(),
        span: node.span,
        detail: None,
    }
}

fn unparameterized(node: &Node, source: Source<'_>) -> TypeParseError {
    TypeParseError::UnparameterizedType {
        text: source.slice(node.span).to_string(),
        span: node.span,
    }
}

fn unknown_type(node: &Node, source: Source<'_>) -> TypeParseError {
    TypeParseError::UnknownType {
        text: source.slice(node.span).to_string(),
        span: node.span,
    }
}

// ------------------------------- Tests ------------------------------------ //
