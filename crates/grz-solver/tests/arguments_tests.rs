use super::*;
use crate::types::PrimitiveKind;

fn int() -> TypeValue {
    TypeValue::primitive(PrimitiveKind::Int)
}

#[test]
fn test_named_arguments_become_a_leading_map() {
    let named = [
        NamedArgument::new("size", Some(int())),
        NamedArgument::new("label", Some(TypeValue::string())),
    ];
    let types = argument_types(
        &named,
        &[ArgumentExpr::Plain(Some(TypeValue::string()))],
        &[],
        false,
    )
    .expect("known argument list");

    assert_eq!(types.len(), 2);
    let Some(TypeValue::Map(map)) = &types[0] else {
        panic!("expected a map literal, got {:?}", types[0]);
    };
    assert_eq!(map.type_by_key("size"), Some(&int()));
    assert_eq!(map.type_by_key("label"), Some(&TypeValue::string()));
    assert_eq!(types[1], Some(TypeValue::string()));
}

#[test]
fn test_tuple_spread_expands() {
    let tuple = TypeValue::tuple(vec![Some(int()), Some(TypeValue::string())]);
    let types = argument_types(
        &[],
        &[ArgumentExpr::Spread(Some(tuple)), ArgumentExpr::Plain(Some(int()))],
        &[],
        false,
    );
    assert_eq!(
        types,
        Some(vec![Some(int()), Some(TypeValue::string()), Some(int())])
    );
}

#[test]
fn test_non_tuple_spread_is_unknown() {
    let list = TypeValue::class("java.util.List", vec![int()]);
    assert_eq!(
        argument_types(&[], &[ArgumentExpr::Spread(Some(list))], &[], false),
        None
    );
    assert_eq!(
        argument_types(&[], &[ArgumentExpr::Spread(None)], &[], false),
        None
    );
}

#[test]
fn test_untyped_arguments() {
    let expressions = [ArgumentExpr::Plain(None)];
    assert_eq!(
        argument_types(&[], &expressions, &[], false),
        Some(vec![Some(TypeValue::object())])
    );
    assert_eq!(
        argument_types(&[], &expressions, &[], true),
        Some(vec![None])
    );
}

#[test]
fn test_closures_trail() {
    let named = [NamedArgument::new("flag", None)];
    let types = argument_types(
        &named,
        &[ArgumentExpr::Plain(Some(int()))],
        &[Some(TypeValue::raw("groovy.lang.Closure"))],
        true,
    )
    .expect("known argument list");

    assert_eq!(types.len(), 3);
    assert!(matches!(types[0], Some(TypeValue::Map(_))));
    assert_eq!(types[1], Some(int()));
    assert_eq!(types[2], Some(TypeValue::raw("groovy.lang.Closure")));
    assert!(argument_types(&[], &[], &[], false).is_some_and(|types| types.is_empty()));
}

#[test]
fn test_untyped_spread_components_are_kept_as_is() {
    let tuple = TypeValue::tuple(vec![None, Some(int())]);
    let expressions = [ArgumentExpr::Spread(Some(tuple)), ArgumentExpr::Plain(None)];
    assert_eq!(
        argument_types(&[], &expressions, &[], false),
        Some(vec![None, Some(int()), Some(TypeValue::object())])
    );
}

#[test]
fn test_untyped_closures_are_skipped() {
    let closure = TypeValue::raw("groovy.lang.Closure");
    let types = argument_types(
        &[],
        &[ArgumentExpr::Plain(Some(int()))],
        &[None, Some(closure.clone()), None],
        false,
    );
    assert_eq!(types, Some(vec![Some(int()), Some(closure)]));
    assert_eq!(argument_types(&[], &[], &[None], true), Some(Vec::new()));
}
