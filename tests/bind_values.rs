use std::collections::BTreeMap;

use gamble::{BindError, BindOptions, Error, Value, bind, from_str, from_value, from_value_with_options, parse};
use indoc::indoc;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Person {
    #[serde(rename = "Age")]
    age: i32,
    #[serde(rename = "Name")]
    name: String,
}

const STRICT: BindOptions = BindOptions { strict: true };

#[test]
fn keys_match_fields_ignoring_case() -> anyhow::Result<()> {
    let person: Person = from_str("age: 54\nname: john")?;
    assert_eq!(
        person,
        Person {
            age: 54,
            name: "john".into()
        }
    );

    let shouting: Person = from_str("AGE: 7\nNAME: ann")?;
    assert_eq!(shouting.age, 7);
    assert_eq!(shouting.name, "ann");
    Ok(())
}

#[test]
fn exact_match_and_last_duplicate() -> anyhow::Result<()> {
    #[derive(Deserialize)]
    struct Named {
        name: String,
    }
    let named: Named = from_str("NAME: first\nName: second\n")?;
    assert_eq!(named.name, "second");
    Ok(())
}

#[test]
fn lenient_numbers_fall_back_to_zero() -> anyhow::Result<()> {
    let person: Person = from_str("age: fifty\nname: john")?;
    assert_eq!(person.age, 0);

    let tree = parse("age: [1, 2]\nname: x")?;
    let person: Person = from_value(&tree)?;
    assert_eq!(person.age, 0);
    Ok(())
}

#[test]
fn strict_numbers_fail() {
    let tree = parse("age: fifty\nname: john").unwrap();
    let err = from_value_with_options::<Person>(&tree, STRICT).unwrap_err();
    assert_eq!(
        err,
        BindError::InvalidNumber {
            text: "fifty".into(),
            ty: "i32"
        }
    );
    assert_eq!(err.to_string(), "invalid i32: `fifty`");
}

#[test]
fn non_mapping_into_struct() {
    let tree = parse("- a\n- b\n").unwrap();
    let lenient: Result<BTreeMap<String, String>, _> = from_value(&tree);
    assert!(lenient.unwrap().is_empty());

    let err = from_value_with_options::<Person>(&tree, STRICT).unwrap_err();
    assert_eq!(
        err,
        BindError::Mismatch {
            expected: "struct",
            found: "sequence"
        }
    );
}

#[test]
fn strings_need_scalars() {
    let tree = parse("name: [a]\nage: 1").unwrap();
    let err = from_value::<Person>(&tree).unwrap_err();
    assert_eq!(err.to_string(), "cannot bind sequence into string");
}

#[test]
fn missing_fields_use_serde_defaults() -> anyhow::Result<()> {
    #[derive(Debug, Deserialize)]
    struct Config {
        #[serde(default)]
        retries: u8,
        host: Option<String>,
        ports: Vec<u16>,
    }
    let config: Config = from_str(indoc! {"
        PORTS:
          - 80
          - 443
    "})?;
    assert_eq!(config.retries, 0);
    assert_eq!(config.host, None);
    assert_eq!(config.ports, [80, 443]);
    Ok(())
}

#[test]
fn booleans_floats_and_options() -> anyhow::Result<()> {
    #[derive(Debug, Deserialize)]
    struct Flags {
        enabled: bool,
        ratio: f64,
        note: Option<String>,
    }
    let flags: Flags = from_str("enabled: TRUE\nratio: 0.25\nnote: null\n")?;
    assert!(flags.enabled);
    assert_eq!(flags.ratio, 0.25);
    assert_eq!(flags.note, None);
    Ok(())
}

#[test]
fn enums_from_scalars_and_single_entry_mappings() -> anyhow::Result<()> {
    #[derive(Debug, Deserialize, PartialEq)]
    enum Shape {
        Point,
        Circle(f64),
        Rect { w: u32, h: u32 },
    }
    let shapes: Vec<Shape> = from_str(indoc! {"
        - Point
        - Circle: 1.5
        - Rect:
            W: 2
            h: 3
    "})?;
    assert_eq!(
        shapes,
        [Shape::Point, Shape::Circle(1.5), Shape::Rect { w: 2, h: 3 }]
    );
    Ok(())
}

#[test]
fn bind_replaces_destination_only_on_success() {
    let mut person = Person {
        age: 1,
        name: "old".into(),
    };
    let tree = parse("age: 54\nname: john").unwrap();
    bind(&tree, &mut person, BindOptions::default()).unwrap();
    assert_eq!(person.name, "john");

    let bad = parse("- x").unwrap();
    assert!(bind(&bad, &mut person, STRICT).is_err());
    assert_eq!(person.age, 54);
}

#[test]
fn unmarshal_reports_parse_errors() {
    let mut person = Person::default();
    let err = gamble::unmarshal("a: [\n", &mut person).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.to_string(), "Error parsing YAML.");
}

#[test]
fn value_binds_into_value() -> anyhow::Result<()> {
    let tree = parse("a: [1, null]\nb: x\n")?;
    let copy: Value = from_value(&tree)?;
    assert_eq!(copy, tree);
    Ok(())
}
