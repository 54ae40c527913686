//! Constructors for every type kind.
//!
//! All constructors are total: the interpreter validates arity and argument kinds
//! before calling in, so nothing here can fail.

use ordered_float::OrderedFloat;

use crate::types::{PType, ResourceRef};

pub fn integer() -> PType {
    PType::Integer { min: None, max: None }
}

pub fn float() -> PType {
    PType::Float { min: None, max: None }
}

pub fn numeric() -> PType {
    PType::Numeric
}

pub fn string() -> PType {
    PType::String
}

pub fn boolean() -> PType {
    PType::Boolean
}

pub fn pattern() -> PType {
    PType::Pattern { patterns: Vec::new() }
}

pub fn regexp() -> PType {
    PType::Regexp { pattern: None }
}

pub fn data() -> PType {
    PType::Data
}

pub fn literal() -> PType {
    PType::Literal
}

pub fn undef() -> PType {
    PType::Undef
}

pub fn object() -> PType {
    PType::Object
}

pub fn collection() -> PType {
    PType::Collection
}

pub fn catalog_entry() -> PType {
    PType::CatalogEntry
}

pub fn enum_() -> PType {
    PType::Enum { values: Vec::new() }
}

pub fn variant() -> PType {
    PType::Variant { types: Vec::new() }
}

pub fn class() -> PType {
    PType::Class { name: None }
}

/// Unparameterized `Array` holds data.
pub fn array() -> PType {
    array_of(data())
}

/// Unparameterized `Hash` maps literals to data.
pub fn hash() -> PType {
    hash_of(data())
}

pub fn array_of(element: PType) -> PType {
    PType::Array { element: Box::new(element) }
}

/// Hash with the default `Literal` key.
pub fn hash_of(value: PType) -> PType {
    hash_of_with_key(value, literal())
}

pub fn hash_of_with_key(value: PType, key: PType) -> PType {
    PType::Hash { key: Box::new(key), value: Box::new(value) }
}

/// Class names are case insensitive and stored lower-cased.
pub fn class_of(name: Option<&str>) -> PType {
    PType::Class { name: name.map(str::to_lowercase) }
}

/// A title without a type name is meaningless, so it is dropped.
pub fn resource(type_name: Option<&str>, title: Option<&str>) -> PType {
    let reference = type_name.map(|t| ResourceRef {
        type_name: t.to_lowercase(),
        title: title.map(str::to_string),
    });
    PType::Resource { reference }
}

pub fn regexp_of(pattern: Option<&str>) -> PType {
    PType::Regexp { pattern: pattern.map(str::to_string) }
}

pub fn enum_of(values: Vec<String>) -> PType {
    PType::Enum { values }
}

pub fn pattern_of(patterns: Vec<String>) -> PType {
    PType::Pattern { patterns }
}

pub fn variant_of(types: Vec<PType>) -> PType {
    PType::Variant { types }
}

/// Bounds are stored as given; reversed bounds are not reordered here.
pub fn integer_range(min: Option<i64>, max: Option<i64>) -> PType {
    PType::Integer { min, max }
}

pub fn float_range(min: Option<f64>, max: Option<f64>) -> PType {
    PType::Float {
        min: min.map(OrderedFloat),
        max: max.map(OrderedFloat),
    }
}
