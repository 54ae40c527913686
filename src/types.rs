//! Type model produced by the interpreter.
//!
//! Values are immutable once built and carry no reference back to the syntax tree, so
//! they can be cloned, compared, hashed and interned freely. `Display` renders the
//! canonical specification text; parsing that text yields an equal value.

use std::fmt;

use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde::Serialize;

use crate::interpreter::names::{capitalized, TypeName};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind")]
pub enum PType {
    Integer { min: Option<i64>, max: Option<i64> },
    Float { min: Option<OrderedFloat<f64>>, max: Option<OrderedFloat<f64>> },
    Numeric,
    String,
    Boolean,
    Pattern { patterns: Vec<String> },
    Regexp { pattern: Option<String> },
    Data,
    Literal,
    Undef,
    Object,
    Collection,
    CatalogEntry,
    Array { element: Box<PType> },
    Hash { key: Box<PType>, value: Box<PType> },
    Class { name: Option<String> },
    Resource { reference: Option<ResourceRef> },
    Enum { values: Vec<String> },
    Variant { types: Vec<PType> },
}

/// Named resource type, optionally narrowed to a single titled instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRef {
    pub type_name: String,
    pub title: Option<String>,
}

impl PType {
    /// Element and key positions of collections require this.
    pub fn is_structural(&self) -> bool {
        !matches!(self, PType::Undef)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            PType::Integer { .. } => "Integer",
            PType::Float { .. } => "Float",
            PType::Numeric => "Numeric",
            PType::String => "String",
            PType::Boolean => "Boolean",
            PType::Pattern { .. } => "Pattern",
            PType::Regexp { .. } => "Regexp",
            PType::Data => "Data",
            PType::Literal => "Literal",
            PType::Undef => "Undef",
            PType::Object => "Object",
            PType::Collection => "Collection",
            PType::CatalogEntry => "CatalogEntry",
            PType::Array { .. } => "Array",
            PType::Hash { .. } => "Hash",
            PType::Class { .. } => "Class",
            PType::Resource { .. } => "Resource",
            PType::Enum { .. } => "Enum",
            PType::Variant { .. } => "Variant",
        }
    }
}

// ------------------------------ Rendering -------------------------------- //

static PLAIN_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*(?:::[a-z_][a-z0-9_]*)*$").expect("static regex")
});

static REFERENCE_SEGMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*(?:::[a-z][a-z0-9_]*)*$").expect("static regex")
});

const NAME_KEYWORDS: [&str; 4] = ["default", "true", "false", "undef"];

/// Single-quoted literal that lexes back to `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// A class name renders bare when it would lex back as the same name.
fn name_arg(name: &str) -> String {
    if PLAIN_NAME.is_match(name) && !NAME_KEYWORDS.contains(&name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Reference spelling of a resource type, when that reference would resolve back to
/// the same resource.
fn as_reference(type_name: &str) -> Option<String> {
    if !REFERENCE_SEGMENTS.is_match(type_name) || TypeName::from_lowercase(type_name).is_reserved() {
        return None;
    }
    Some(capitalized(type_name))
}

fn bound<T: fmt::Display>(b: &Option<T>) -> String {
    match b {
        Some(v) => v.to_string(),
        None => "default".to_string(),
    }
}

fn float_bound(b: &Option<OrderedFloat<f64>>) -> String {
    match b {
        Some(v) => format!("{:?}", v.0), // `{:?}` keeps the `.0` so it lexes as a float
        None => "default".to_string(),
    }
}

fn join<T, F: Fn(&T) -> String>(items: &[T], f: F) -> String {
    items.iter().map(f).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for PType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PType::Integer { min: None, max: None } => f.write_str("Integer"),
            PType::Integer { min, max } => write!(f, "Integer[{}, {}]", bound(min), bound(max)),
            PType::Float { min: None, max: None } => f.write_str("Float"),
            PType::Float { min, max } => {
                write!(f, "Float[{}, {}]", float_bound(min), float_bound(max))
            }
            PType::Pattern { patterns } if patterns.is_empty() => f.write_str("Pattern"),
            PType::Pattern { patterns } => write!(f, "Pattern[{}]", join(patterns, |p| quote(p))),
            PType::Regexp { pattern: None } => f.write_str("Regexp"),
            PType::Regexp { pattern: Some(p) } => write!(f, "Regexp[{}]", quote(p)),
            PType::Array { element } => write!(f, "Array[{element}]"),
            PType::Hash { key, value } => write!(f, "Hash[{key}, {value}]"),
            PType::Class { name: None } => f.write_str("Class"),
            PType::Class { name: Some(n) } => write!(f, "Class[{}]", name_arg(n)),
            PType::Resource { reference: None } => f.write_str("Resource"),
            PType::Resource { reference: Some(r) } => {
                match (as_reference(&r.type_name), &r.title) {
                    (Some(reference), None) => f.write_str(&reference),
                    (Some(reference), Some(title)) => write!(f, "{reference}[{}]", quote(title)),
                    (None, None) => write!(f, "Resource[{}]", quote(&r.type_name)),
                    (None, Some(title)) => {
                        write!(f, "Resource[{}, {}]", quote(&r.type_name), quote(title))
                    }
                }
            }
            PType::Enum { values } if values.is_empty() => f.write_str("Enum"),
            PType::Enum { values } => write!(f, "Enum[{}]", join(values, |v| quote(v))),
            PType::Variant { types } if types.is_empty() => f.write_str("Variant"),
            PType::Variant { types } => write!(f, "Variant[{}]", join(types, |t| t.to_string())),
            other => f.write_str(other.kind_name()),
        }
    }
}

// ------------------------------- Tests ----------------------------------- //
