use super::*;
use grz_solver::ClassResolver;
use std::io::Write;
use tempfile::NamedTempFile;

const ANIMALS: &str = r#"{
  "classes": [
    { "name": "p.Animal" },
    { "name": "p.Walker", "kind": "interface" },
    { "name": "p.Box", "typeParams": ["T"], "supertypes": ["java.lang.Comparable<T>"] }
  ],
  "types": ["p.Box<String>", "[int, String]"]
}"#;

#[test]
fn test_fixture_defaults() {
    let fixture = Fixture::from_json(r#"{"classes": [{"name": "p.Animal"}]}"#).unwrap();
    assert_eq!(fixture.classes.len(), 1);
    assert_eq!(fixture.classes[0].kind, FixtureClassKind::Class);
    assert!(fixture.classes[0].type_params.is_empty());
    assert!(fixture.types.is_empty());

    assert_eq!(Fixture::from_json("{}").unwrap(), Fixture::default());
    assert!(Fixture::from_json(r#"{"classes": [{"name": "p.A", "kind": "struct"}]}"#).is_err());
}

#[test]
fn test_build_table_registers_classes() {
    let fixture = Fixture::from_json(ANIMALS).unwrap();
    let table = fixture.build_table().unwrap();
    let scope = SearchScope::all();

    let animal = table.find_class("p.Animal", &scope).unwrap();
    assert_eq!(animal.supertypes(), &[TypeValue::object()]);
    assert_eq!(animal.kind(), ClassKind::Class);

    let walker = table.find_class("p.Walker", &scope).unwrap();
    assert_eq!(walker.kind(), ClassKind::Interface);

    let boxed = table.find_class("p.Box", &scope).unwrap();
    let t = boxed.type_param_value(0).unwrap();
    assert_eq!(
        boxed.supertypes(),
        &[TypeValue::class("java.lang.Comparable", vec![t])]
    );
}

#[test]
fn test_parse_types_against_table() {
    let fixture = Fixture::from_json(ANIMALS).unwrap();
    let table = fixture.build_table().unwrap();
    let types = fixture.parse_types(&table).unwrap();
    assert_eq!(
        types,
        vec![
            TypeValue::class("p.Box", vec![TypeValue::string()]),
            TypeValue::tuple(vec![
                Some(TypeValue::primitive(grz_solver::types::PrimitiveKind::Int)),
                Some(TypeValue::string()),
            ]),
        ]
    );
}

#[test]
fn test_invalid_fixtures() {
    let blank = Fixture::from_json(r#"{"classes": [{"name": "  "}], "types": ["int"]}"#).unwrap();
    let err = blank.build_table().unwrap_err();
    assert!(err.to_string().contains("invalid class name"), "{err:#}");

    let broken = Fixture::from_json(
        r#"{"classes": [{"name": "p.A", "supertypes": ["java.util.List<"]}], "types": ["int"]}"#,
    )
    .unwrap();
    let err = broken.build_table().unwrap_err();
    assert!(err.to_string().contains("invalid supertype"), "{err:#}");

    let empty = Fixture::from_json(r#"{"types": []}"#).unwrap();
    let table = empty.build_table().unwrap();
    assert!(empty.parse_types(&table).is_err());

    let truncated = Fixture::from_json(r#"{"types": ["[int, java.lang.Object,...]"]}"#).unwrap();
    let err = truncated.parse_types(&table).unwrap_err();
    assert!(err.to_string().contains("invalid type"), "{err:#}");
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(ANIMALS.as_bytes()).unwrap();
    let fixture = Fixture::load(file.path()).unwrap();
    assert_eq!(fixture.classes.len(), 3);

    let missing = file.path().with_extension("missing");
    let err = Fixture::load(&missing).unwrap_err();
    assert!(err.to_string().contains("failed to read fixture"), "{err:#}");
}
