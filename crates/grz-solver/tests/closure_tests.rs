use super::*;
use crate::hierarchy::ClassTable;
use crate::types::PrimitiveKind;
use std::sync::atomic::{AtomicUsize, Ordering};

fn scope() -> SearchScope {
    SearchScope::all()
}

fn int() -> TypeValue {
    TypeValue::primitive(PrimitiveKind::Int)
}

fn integer() -> TypeValue {
    TypeValue::raw("java.lang.Integer")
}

#[test]
fn test_closure_requires_a_signature() {
    assert_eq!(
        ClosureType::new(Vec::new()).unwrap_err(),
        SolverError::EmptySignatures
    );
    let closure = ClosureType::new(vec![Signature::returning(Vec::new(), None)]).expect("one signature");
    assert!(closure.single_signature().is_some());
}

#[test]
fn test_parameter_builders() {
    let param = Parameter::new("xs", Some(int())).varargs();
    assert_eq!(param.name(), Some("xs"));
    assert!(param.is_varargs());
    assert!(!param.is_optional());

    let retyped = param.with_type(None);
    assert_eq!(retyped.ty(), None);
    assert!(retyped.is_varargs());

    let unnamed = Parameter::unnamed(Some(int())).optional();
    assert_eq!(unnamed.name(), None);
    assert!(unnamed.is_optional());
}

#[test]
fn test_inferred_return_is_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let signature = Signature::new(
        Vec::new(),
        SignatureReturn::inferred(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(TypeValue::string())
        }),
    );

    assert_eq!(signature.return_type(), Some(TypeValue::string()));
    assert_eq!(signature.return_type(), Some(TypeValue::string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_inferred_returns_compare_by_function() {
    let shared = SignatureReturn::inferred(|| None);
    let a = Signature::new(Vec::new(), shared.clone());
    let b = Signature::new(Vec::new(), shared);
    let c = Signature::new(Vec::new(), SignatureReturn::inferred(|| None));
    assert_eq!(a, b);
    assert_ne!(a, c);

    // Memoized results do not take part in equality.
    let d = Signature::new(Vec::new(), SignatureReturn::inferred(|| Some(TypeValue::string())));
    let e = Signature::new(Vec::new(), SignatureReturn::inferred(|| Some(TypeValue::string())));
    assert_eq!(d.return_type(), e.return_type());
    assert_ne!(d, e);
    assert_eq!(
        Signature::returning(Vec::new(), Some(TypeValue::string())),
        Signature::returning(Vec::new(), Some(TypeValue::string()))
    );
}

#[test]
fn test_applicability_with_optional_and_varargs() {
    let table = ClassTable::with_jdk_basics();
    let signature = Signature::returning(
        vec![
            Parameter::new("s", Some(TypeValue::string())),
            Parameter::new("n", Some(integer())).optional(),
            Parameter::new("rest", Some(TypeValue::object())).varargs(),
        ],
        None,
    );
    let check = |args: &[Option<TypeValue>]| signature.applicability(args, &table, &scope());

    assert_eq!(check(&[]), Applicability::Inapplicable);
    assert_eq!(check(&[Some(TypeValue::string())]), Applicability::Applicable);
    assert_eq!(
        check(&[Some(TypeValue::string()), Some(int())]),
        Applicability::Applicable
    );
    assert_eq!(
        check(&[
            Some(TypeValue::string()),
            Some(integer()),
            Some(TypeValue::string()),
            Some(int()),
        ]),
        Applicability::Applicable
    );
    assert_eq!(check(&[Some(integer())]), Applicability::Inapplicable);
    assert_eq!(check(&[None]), Applicability::CanBeApplicable);
    assert_eq!(
        check(&[Some(TypeValue::raw("groovy.lang.GString"))]),
        Applicability::Applicable
    );
}

#[test]
fn test_fixed_arity_rejects_extra_arguments() {
    let table = ClassTable::with_jdk_basics();
    let signature = Signature::returning(vec![Parameter::new("it", None)], None);
    assert_eq!(
        signature.applicability(&[Some(int())], &table, &scope()),
        Applicability::Applicable
    );
    assert_eq!(
        signature.applicability(&[Some(int()), Some(int())], &table, &scope()),
        Applicability::Inapplicable
    );
}

#[test]
fn test_return_type_for_picks_applicable_signatures() {
    let table = ClassTable::with_jdk_basics();
    let long = TypeValue::raw("java.lang.Long");
    let closure = ClosureType::new(vec![
        Signature::returning(vec![Parameter::new("s", Some(TypeValue::string()))], Some(integer())),
        Signature::returning(vec![Parameter::new("i", Some(integer()))], Some(long.clone())),
    ])
    .expect("two signatures");

    assert_eq!(
        closure.return_type_for(&[Some(TypeValue::string())], &table, &scope()),
        Some(integer())
    );
    assert_eq!(
        closure.return_type_for(&[Some(int())], &table, &scope()),
        Some(long.clone())
    );
    // Untyped argument: both can apply, returns are joined.
    assert_eq!(closure.return_type_for(&[None], &table, &scope()), Some(long));
    assert_eq!(
        closure.return_type_for(&[Some(TypeValue::raw("java.lang.Boolean"))], &table, &scope()),
        None
    );
    assert!(!closure.is_applicable(&[Some(TypeValue::raw("java.lang.Boolean"))], &table, &scope()));
    assert!(closure.is_applicable(&[Some(TypeValue::string())], &table, &scope()));
}

#[test]
fn test_single_signature_answers_directly() {
    let table = ClassTable::with_jdk_basics();
    let closure = ClosureType::single(Signature::returning(
        vec![Parameter::new("s", Some(TypeValue::string()))],
        Some(int()),
    ));
    assert_eq!(
        closure.return_type_for(&[Some(integer())], &table, &scope()),
        Some(int())
    );
}

#[test]
fn test_validity_checks_parameter_and_return_types() {
    let table = ClassTable::with_jdk_basics();
    let decl = table.define("p.Payload", crate::decl::ClassKind::Class, &[] as &[&str], |_| Vec::new());
    let payload = TypeValue::Class(crate::types::ClassRef::from_decl(Arc::clone(&decl), Vec::new()));
    let closure = ClosureType::single(Signature::returning(Vec::new(), Some(payload)));
    assert!(closure.is_valid());
    decl.invalidate();
    assert!(!closure.is_valid());
}
