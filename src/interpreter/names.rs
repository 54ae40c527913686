/// Closed set of reference names the interpreter knows, plus the open-world arm for
/// user defined resource types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Integer,
    Float,
    Numeric,
    String,
    Enum,
    Boolean,
    Pattern,
    Regexp,
    Data,
    Array,
    Hash,
    Class,
    Resource,
    Collection,
    Literal,
    CatalogEntry,
    Undef,
    Object,
    Variant,
    /// Recognized but unsupported.
    Ruby,
    /// Recognized but unsupported.
    Type,
    /// Anything else names a resource type, e.g. `file`.
    Other(std::string::String),
}

impl TypeName {
    /// Resolve the lower-cased spelling a reference carries.
    pub fn from_lowercase(name: &str) -> Self {
        match name {
            "integer" => Self::Integer,
            "float" => Self::Float,
            "numeric" => Self::Numeric,
            "string" => Self::String,
            "enum" => Self::Enum,
            "boolean" => Self::Boolean,
            "pattern" => Self::Pattern,
            "regexp" => Self::Regexp,
            "data" => Self::Data,
            "array" => Self::Array,
            "hash" => Self::Hash,
            "class" => Self::Class,
            "resource" => Self::Resource,
            "collection" => Self::Collection,
            "literal" => Self::Literal,
            "catalogentry" => Self::CatalogEntry,
            "undef" => Self::Undef,
            "object" => Self::Object,
            "variant" => Self::Variant,
            "ruby" => Self::Ruby,
            "type" => Self::Type,
            other => Self::Other(other.to_string()),
        }
    }

    /// True for every name the table reserves, i.e. anything that does not fall
    /// through to a resource reference.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Display spelling used in arity diagnostics.
    pub fn display_name(&self) -> std::string::String {
        let name = match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Numeric => "Numeric",
            Self::String => "String",
            Self::Enum => "Enum",
            Self::Boolean => "Boolean",
            Self::Pattern => "Pattern",
            Self::Regexp => "Regexp",
            Self::Data => "Data",
            Self::Array => "Array",
            Self::Hash => "Hash",
            Self::Class => "Class",
            Self::Resource => "Resource",
            Self::Collection => "Collection",
            Self::Literal => "Literal",
            Self::CatalogEntry => "CatalogEntry",
            Self::Undef => "Undef",
            Self::Object => "Object",
            Self::Variant => "Variant",
            Self::Ruby => "Ruby",
            Self::Type => "Type",
            Self::Other(n) => return capitalized(n),
        };
        name.to_string()
    }
}

/// `foo::bar` -> `Foo::Bar`
pub fn capitalized(name: &str) -> std::string::String {
    name.split("::")
        .map(|seg| {
            let mut cs = seg.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().collect::<std::string::String>() + cs.as_str(),
                None => std::string::String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_case_sensitive_on_lower_case_spelling() {
        assert_eq!(TypeName::from_lowercase("catalogentry"), TypeName::CatalogEntry);
        assert_eq!(
            TypeName::from_lowercase("CatalogEntry"),
            TypeName::Other("CatalogEntry".into())
        );
    }

    #[test]
    fn unknown_names_fall_through_to_resources() {
        let n = TypeName::from_lowercase("file");
        assert_eq!(n, TypeName::Other("file".into()));
        assert!(!n.is_reserved());
        assert!(TypeName::from_lowercase("ruby").is_reserved());
    }

    #[test]
    fn display_names() {
        assert_eq!(TypeName::CatalogEntry.display_name(), "CatalogEntry");
        assert_eq!(TypeName::Other("apache::vhost".into()).display_name(), "Apache::Vhost");
    }
}
