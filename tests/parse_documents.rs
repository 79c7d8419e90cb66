use gamble::{Mapping, ParseOptions, ParseReason, Value, parse, parse_with_options};
use indoc::indoc;

fn mapping<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    pairs.into_iter().collect()
}

fn strings(items: &[&str]) -> Value {
    items.iter().copied().collect()
}

#[test]
fn empty_document_is_null() {
    assert_eq!(parse("").unwrap(), Value::Null);
    assert_eq!(parse("# only a comment\n").unwrap(), Value::Null);
}

#[test]
fn single_scalar() {
    assert_eq!(parse("the_string").unwrap(), Value::from("the_string"));
}

#[test]
fn sequence_of_strings() {
    let yaml = indoc! {"
        - foo
        - bar
        - baz
    "};
    assert_eq!(parse(yaml).unwrap(), strings(&["foo", "bar", "baz"]));
}

#[test]
fn mapping_of_strings() {
    let yaml = indoc! {"
        key1: value1
        key2: value2
    "};
    assert_eq!(
        parse(yaml).unwrap(),
        mapping([("key1", "value1".into()), ("key2", "value2".into())])
    );
}

#[test]
fn nested_document() {
    let yaml = indoc! {"
        ---
        globals:
        - taco
        - burrito
        - kimchi
        collections:
        - name: oceans
          locals:
            foo: bar
            bar: baz
          sequences:
          - one
          - two
          - three
        - name: seas
          age: 55
    "};
    let expected = mapping([
        ("globals", strings(&["taco", "burrito", "kimchi"])),
        (
            "collections",
            Value::Sequence(vec![
                mapping([
                    ("name", "oceans".into()),
                    (
                        "locals",
                        mapping([("foo", "bar".into()), ("bar", "baz".into())]),
                    ),
                    ("sequences", strings(&["one", "two", "three"])),
                ]),
                mapping([("name", "seas".into()), ("age", "55".into())]),
            ]),
        ),
    ]);
    let tree = parse(yaml).unwrap();
    assert_eq!(tree, expected);

    let keys: Vec<&str> = tree.as_mapping().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["globals", "collections"]);
}

#[test]
fn plain_null_forms_are_null() {
    for yaml in ["some_key: null", "some_key: ~", "some_key:"] {
        assert_eq!(
            parse(yaml).unwrap(),
            mapping([("some_key", Value::Null)]),
            "{yaml}"
        );
    }
}

#[test]
fn quoted_null_is_text() {
    for yaml in ["some_key: \"null\"", "some_key: 'null'"] {
        assert_eq!(
            parse(yaml).unwrap(),
            mapping([("some_key", "null".into())]),
            "{yaml}"
        );
    }
}

#[test]
fn scalars_keep_their_text() {
    let tree = parse("[5, 10.0, true, 0x1F, 'x y']").unwrap();
    assert_eq!(tree, strings(&["5", "10.0", "true", "0x1F", "x y"]));
}

#[test]
fn null_elements_do_not_end_sequences() {
    let tree = parse("- a\n- null\n- b\n-\n- c\n").unwrap();
    assert_eq!(
        tree,
        Value::Sequence(vec![
            "a".into(),
            Value::Null,
            "b".into(),
            Value::Null,
            "c".into()
        ])
    );
}

#[test]
fn legacy_mode_stops_at_null() {
    let options = gamble::parse_options! { legacy_null_terminator: true };
    let yaml = indoc! {"
        items:
          - a
          - null
          - b
        after: kept
    "};
    let tree = parse_with_options(yaml, options).unwrap();
    assert_eq!(
        tree,
        mapping([("items", strings(&["a"])), ("after", "kept".into())])
    );
}

#[test]
fn duplicate_keys_last_wins_first_position() {
    let tree = parse("a: 1\nb: 2\na: 3\n").unwrap();
    let map: &Mapping = tree.as_mapping().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_index(0), Some((&"a".to_string(), &Value::from("3"))));
    assert_eq!(map.get_index(1), Some((&"b".to_string(), &Value::from("2"))));
}

#[test]
fn keys_are_verbatim() {
    let tree = parse("null: x\n'5': y\n").unwrap();
    assert_eq!(tree.get("null"), Some(&Value::from("x")));
    assert_eq!(tree.get("5"), Some(&Value::from("y")));
}

#[test]
fn only_first_document_is_read() {
    let tree = parse("--- first\n--- second\n").unwrap();
    assert_eq!(tree, Value::from("first"));
}

#[test]
fn anchors_and_tags_are_ignored_aliases_rejected() {
    let tree = parse("a: &x !!str value\n").unwrap();
    assert_eq!(tree, mapping([("a", "value".into())]));

    let err = parse("a: &x value\nb: *x\n").unwrap_err();
    assert_eq!(err.reason(), &ParseReason::Unsupported("aliases"));
}

#[test]
fn flow_collection_key_is_rejected() {
    let err = parse("? [a, b]\n: v\n").unwrap_err();
    assert_eq!(err.reason(), &ParseReason::NonScalarKey);
}

#[test]
fn invalid_document_has_fixed_message() {
    let yaml = "\n---\n-\n  -\n\t\t-\n";
    let err = parse(yaml).expect_err("tabs in indentation must fail");
    assert_eq!(err.to_string(), "Error parsing YAML.");
    assert!(matches!(err.reason(), ParseReason::Syntax(_)));
    assert!(err.location().is_some());

    let detailed = format!("{err:#}");
    assert!(detailed.starts_with("Error parsing YAML. "), "{detailed}");
    assert!(detailed.contains(" at line "), "{detailed}");
}

#[test]
fn content_after_the_root_is_an_error() {
    for yaml in ["[a]\n- b\n", "the_string\n: x: y\n"] {
        let err = parse(yaml).expect_err(yaml);
        assert_eq!(err.to_string(), "Error parsing YAML.");
    }
}

#[test]
fn empty_explicit_key_reads_as_tilde() {
    let tree = parse("? \n: v\n").unwrap();
    assert_eq!(tree, mapping([("~", "v".into())]));
    assert_eq!(parse("~: v\n").unwrap(), tree);
}

#[test]
fn nesting_limit() {
    let deep = format!("{}{}", "[".repeat(40), "]".repeat(40));
    let shallow = ParseOptions {
        max_depth: Some(8),
        ..ParseOptions::default()
    };
    let err = parse_with_options(&deep, shallow).unwrap_err();
    assert_eq!(err.reason(), &ParseReason::TooDeep(8));
    assert!(parse(&deep).is_ok());
}
