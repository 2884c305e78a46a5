use super::*;
use crate::decl::DeclId;
use crate::hierarchy::ClassTable;
use crate::types::PrimitiveKind;

fn param(name: &str, index: u32) -> TypeParamRef {
    TypeParamRef::new(DeclId(900), index, name)
}

fn int() -> TypeValue {
    TypeValue::primitive(PrimitiveKind::Int)
}

#[test]
fn test_for_class_binds_declared_parameters() {
    let table = ClassTable::with_jdk_basics();
    let map = table
        .find_class("java.util.Map", &SearchScope::all())
        .expect("Map is defined");
    let (key, value) = (map.type_params()[0].clone(), map.type_params()[1].clone());

    let bound = Substitution::for_class(&map, &[TypeValue::string(), int()]);
    assert_eq!(bound.len(), 2);
    assert_eq!(bound.get(&key), Some(Some(&TypeValue::string())));
    assert_eq!(bound.get(&value), Some(Some(&int())));

    let raw = Substitution::for_class(&map, &[]);
    assert_eq!(raw.get(&key), Some(None));
    assert_eq!(raw.get(&value), Some(None));
}

#[test]
fn test_for_class_ref_of_unknown_class_is_identity() {
    let table = ClassTable::with_jdk_basics();
    let unknown = ClassRef::new("p.Missing", vec![TypeValue::string()]);
    assert!(Substitution::for_class_ref(&unknown, &table, &SearchScope::all()).is_empty());
}

#[test]
fn test_empty_substitution_is_identity() {
    let t = TypeValue::TypeParam(param("T", 0));
    let ty = TypeValue::class("java.util.List", vec![t.clone()]);
    let empty = Substitution::empty();
    assert_eq!(empty.substitute(&ty), Some(ty));
    assert_eq!(empty.substitute(&t), Some(t));
}

#[test]
fn test_substitutes_class_arguments() {
    let t = param("T", 0);
    let substitution = Substitution::empty().with(t.clone(), Some(TypeValue::string()));
    let list_of_t = TypeValue::class("java.util.List", vec![TypeValue::TypeParam(t)]);
    assert_eq!(
        substitution.substitute(&list_of_t),
        Some(TypeValue::class("java.util.List", vec![TypeValue::string()]))
    );
}

#[test]
fn test_erased_parameter_makes_class_raw() {
    let t = param("T", 0);
    let substitution = Substitution::empty().with(t.clone(), None);
    let param_ty = TypeValue::TypeParam(t.clone());
    assert_eq!(substitution.substitute(&param_ty), None);

    let nested = TypeValue::class(
        "java.util.Map",
        vec![TypeValue::string(), TypeValue::class("java.util.List", vec![param_ty])],
    );
    assert_eq!(
        substitution.substitute(&nested),
        Some(TypeValue::class(
            "java.util.Map",
            vec![TypeValue::string(), TypeValue::raw("java.util.List")]
        ))
    );
}

#[test]
fn test_unbound_parameter_is_kept() {
    let substitution = Substitution::empty().with(param("T", 0), Some(TypeValue::string()));
    let other = TypeValue::TypeParam(param("U", 1));
    assert_eq!(substitution.substitute(&other), Some(other));
}

#[test]
fn test_substitutes_structural_components() {
    let t = param("T", 0);
    let t_ty = TypeValue::TypeParam(t.clone());
    let substitution = Substitution::empty().with(t, Some(int()));

    let tuple = TypeValue::tuple(vec![Some(t_ty.clone()), None]);
    assert_eq!(
        substitution.substitute(&tuple),
        Some(TypeValue::tuple(vec![Some(int()), None]))
    );

    let map = TypeValue::Map(
        MapType::new()
            .with_string_entry("a", Some(t_ty.clone()))
            .with_other_entry(Some(t_ty.clone()), Some(TypeValue::string())),
    );
    let expected = TypeValue::Map(
        MapType::new()
            .with_string_entry("a", Some(int()))
            .with_other_entry(Some(int()), Some(TypeValue::string())),
    );
    assert_eq!(substitution.substitute(&map), Some(expected));

    let range = TypeValue::range(Some(t_ty), None);
    assert_eq!(
        substitution.substitute(&range),
        Some(TypeValue::range(Some(int()), None))
    );
}

#[test]
fn test_intersection_substitution_stays_flat() {
    let t = param("T", 0);
    let runnable = TypeValue::raw("java.lang.Runnable");
    let serializable = TypeValue::raw("java.io.Serializable");
    let trait_type = create_intersection(vec![TypeValue::TypeParam(t.clone()), runnable.clone()])
        .expect("two conjuncts");

    let bound = create_intersection(vec![TypeValue::string(), serializable.clone()]);
    let substitution = Substitution::empty().with(t.clone(), bound);
    let expected = create_intersection(vec![TypeValue::string(), serializable, runnable.clone()]);
    assert_eq!(substitution.substitute(&trait_type), expected);

    // An erased conjunct drops out.
    let erasing = Substitution::empty().with(t, None);
    assert_eq!(erasing.substitute(&trait_type), Some(runnable));
}

#[test]
fn test_closure_signatures_are_substituted() {
    let t = param("T", 0);
    let t_ty = TypeValue::TypeParam(t.clone());
    let closure = TypeValue::closure(vec![
        Signature::returning(vec![Parameter::new("it", Some(t_ty.clone()))], Some(t_ty.clone()))
            .with_name("call"),
    ])
    .expect("one signature");

    let substitution = Substitution::empty().with(t, Some(TypeValue::string()));
    let substituted = substitution.substitute(&closure).expect("closure stays");
    let signature = substituted
        .as_closure()
        .and_then(|closure| closure.single_signature())
        .expect("single signature");
    assert_eq!(signature.name(), Some("call"));
    assert_eq!(signature.parameters()[0].ty(), Some(&TypeValue::string()));
    assert_eq!(signature.return_type(), Some(TypeValue::string()));
}

#[test]
fn test_inferred_return_is_substituted_lazily() {
    let t = param("T", 0);
    let returned = TypeValue::TypeParam(t.clone());
    let closure = TypeValue::closure(vec![Signature::new(
        Vec::new(),
        SignatureReturn::inferred(move || Some(returned.clone())),
    )])
    .expect("one signature");

    let substitution = Substitution::empty().with(t, Some(int()));
    let substituted = substitution.substitute(&closure).expect("closure stays");
    let signature = substituted
        .as_closure()
        .and_then(|closure| closure.single_signature())
        .expect("single signature");
    assert!(matches!(signature.declared_return(), SignatureReturn::Inferred(_)));
    assert_eq!(signature.return_type(), Some(int()));
}

#[test]
fn test_compose_applies_in_order() {
    let (t, u) = (param("T", 0), param("U", 1));
    let first = Substitution::empty().with(
        t.clone(),
        Some(TypeValue::class("java.util.List", vec![TypeValue::TypeParam(u.clone())])),
    );
    let second = Substitution::empty().with(u.clone(), Some(TypeValue::string()));

    let composed = first.compose(&second);
    assert_eq!(
        composed.get(&t),
        Some(Some(&TypeValue::class("java.util.List", vec![TypeValue::string()])))
    );
    assert_eq!(composed.get(&u), Some(Some(&TypeValue::string())));
}

#[test]
fn test_put_all_overrides() {
    let t = param("T", 0);
    let mut base = Substitution::empty().with(t.clone(), Some(int()));
    base.put_all(&Substitution::empty().with(t.clone(), Some(TypeValue::string())));
    assert_eq!(base.get(&t), Some(Some(&TypeValue::string())));
    assert_eq!(base.iter().count(), 1);
    assert!(base.contains(&t));
}
