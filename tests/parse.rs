use type_spec::{factory, parse, ErrorKind, PType, TypeParser};

const BARE_NAMES: [&str; 19] = [
    "integer", "float", "numeric", "string", "enum", "boolean", "pattern", "regexp", "data",
    "array", "hash", "class", "resource", "collection", "literal", "catalogentry", "undef",
    "object", "variant",
];

fn capitalize(s: &str) -> String {
    let mut cs = s.chars();
    match cs.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + cs.as_str(),
        None => String::new(),
    }
}

#[test]
fn every_bare_name_parses_in_any_case() {
    for name in BARE_NAMES {
        let canonical = parse(&capitalize(name)).unwrap();
        let shouted = parse(&name.to_uppercase()).unwrap();
        assert_eq!(canonical, shouted, "{name}");
        // not a user defined resource
        assert!(
            !matches!(canonical, PType::Resource { reference: Some(_) }),
            "{name} fell through to a resource reference"
        );
    }
}

#[test]
fn documented_examples() {
    assert_eq!(parse("Array[String]").unwrap(), factory::array_of(factory::string()));
    assert_eq!(
        parse("Hash[Integer, Array[String]]").unwrap(),
        factory::hash_of_with_key(factory::array_of(factory::string()), factory::integer())
    );
    assert_eq!(parse("Integer[1,10]").unwrap(), factory::integer_range(Some(1), Some(10)));
    assert_eq!(parse("Integer[default,10]").unwrap(), factory::integer_range(None, Some(10)));
    assert_eq!(parse("Integer").unwrap(), factory::integer_range(None, None));
    assert_eq!(
        parse("File['/tmp/foo']").unwrap(),
        factory::resource(Some("file"), Some("/tmp/foo"))
    );
    assert_eq!(parse("MyThing").unwrap(), factory::resource(Some("mything"), None));
}

#[test]
fn documented_failures() {
    let cases = [
        ("Array[String,Integer]", ErrorKind::InvalidParameterCount),
        ("Boolean[1]", ErrorKind::UnparameterizedType),
        ("Ruby", ErrorKind::UnknownType),
        ("Type", ErrorKind::UnknownType),
        ("Ruby[Integer]", ErrorKind::UnknownType),
        ("Type['x']", ErrorKind::UnknownType),
        ("", ErrorKind::InvalidSpecification),
        ("   ", ErrorKind::InvalidSpecification),
    ];
    for (text, kind) in cases {
        assert_eq!(parse(text).unwrap_err().kind(), kind, "{text:?}");
    }
}

#[test]
fn failure_messages_quote_offending_text() {
    let cases = [
        ("Array[String,Integer]", "Array[String,Integer]"),
        ("Hash[String, Boolean[1]]", "Boolean[1]"),
        ("Variant[Integer, Ruby]", "Ruby"),
        ("Array[Integer['x']]", "'x'"),
        ("Enum[a, String]", "String"),
        ("Class[Integer]", "Integer"),
        ("Array[String", "Array[String"),
        ("'just a string'", "'just a string'"),
        ("Hash[Integer, Type[String]]", "Type[String]"),
    ];
    for (text, offending) in cases {
        let err = parse(text).unwrap_err();
        assert_eq!(err.text(), offending, "{text}");
        assert!(err.to_string().contains(offending), "{err} does not quote {offending}");
        assert_eq!(&text[err.span().start..err.span().end], offending, "{text}");
    }
}

#[test]
fn canonical_rendering_round_trips() {
    let corpus = [
        "Integer",
        "Integer[1, 10]",
        "Integer[default, 10]",
        "Integer[-5]",
        "Integer[10, 1]",
        "Float",
        "Float[1, 2]",
        "Float[default, 0.5]",
        "Float[-1.5e-3]",
        "Numeric",
        "String",
        "Boolean",
        "Data",
        "Literal",
        "Undef",
        "Object",
        "Collection",
        "CatalogEntry",
        "Array",
        "Array[String]",
        "Hash",
        "Hash[String]",
        "Hash[Integer, Array[Hash[String, Float[0.0, 1.0]]]]",
        "Class",
        "Class[apache::mod]",
        "Class['Default']",
        "Resource",
        "Resource[file]",
        "Resource['my-type', 'title']",
        "Resource['integer']",
        "File",
        "File['/tmp/it\\'s']",
        "Apache::Vhost[80]",
        "MyThing",
        "Regexp",
        r"Regexp[/^\d+\/x$/]",
        r"Regexp['back\\slash']",
        "Enum",
        "Enum[a, 'b c', \"d\"]",
        "Pattern",
        r"Pattern[/^a/, 'b+', Regexp[/c/]]",
        "Variant",
        "Variant[Integer, Undef, Array[String]]",
    ];
    for text in corpus {
        let ty = parse(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        let rendered = ty.to_string();
        let reparsed = parse(&rendered).unwrap_or_else(|e| panic!("{rendered}: {e}"));
        assert_eq!(reparsed, ty, "{text} rendered as {rendered}");
        assert_eq!(reparsed.to_string(), rendered);
    }
}

#[test]
fn shared_parser_across_threads() {
    let parser = TypeParser::new();
    let inputs: Vec<String> = (0..64)
        .map(|i| match i % 3 {
            0 => format!("Integer[{i}, {}]", i * 2),
            1 => format!("Array[Integer[{i}]]"),
            _ => format!("Hash[String, Boolean[{i}]]"),
        })
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|text| {
                let parser = &parser;
                scope.spawn(move || (text, parser.parse(text)))
            })
            .collect();
        for handle in handles {
            let (text, result) = handle.join().unwrap();
            match result {
                Ok(ty) => assert_eq!(parse(&ty.to_string()).unwrap(), ty),
                Err(err) => {
                    assert_eq!(err.kind(), ErrorKind::UnparameterizedType);
                    // each failure quotes its own input, not a neighbour's
                    assert!(text.contains(err.text()), "{text} vs {}", err.text());
                }
            }
        }
    });
}

#[test]
fn deeply_nested_input_fails_cleanly() {
    let depth = 5000;
    let text = format!("{}String{}", "Array[".repeat(depth), "]".repeat(depth));
    // default 2 MiB thread stack, like a rayon worker
    let result = std::thread::spawn(move || parse(&text).map_err(|e| e.kind()))
        .join()
        .unwrap();
    assert_eq!(result, Err(ErrorKind::InvalidSpecification));
}

#[test]
fn types_can_be_interned() {
    use std::collections::HashSet;
    let mut seen = HashSet::new();
    for text in ["Array[String]", "Array[ String ]", "Array[String,]", "Hash", "Hash[Literal, Data]"] {
        seen.insert(parse(text).unwrap());
    }
    assert_eq!(seen.len(), 2);
}
