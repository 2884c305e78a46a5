use super::*;
use crate::closure::{Parameter, SignatureReturn};
use crate::decl::ClassKind;
use crate::hierarchy::ClassTable;
use crate::intersection::create_intersection;
use crate::recursion::in_flight_depth;
use crate::types::PrimitiveKind;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

fn scope() -> SearchScope {
    SearchScope::all()
}

fn int() -> TypeValue {
    TypeValue::primitive(PrimitiveKind::Int)
}

fn long() -> TypeValue {
    TypeValue::primitive(PrimitiveKind::Long)
}

fn boxed(name: &str) -> TypeValue {
    TypeValue::raw(name)
}

// =============================================================================
// Tuples, maps, ranges
// =============================================================================

#[test]
fn test_tuple_parameters() {
    let table = ClassTable::with_jdk_basics();
    let tuple = TupleType::new(vec![Some(int()), Some(long())]);
    assert!(!tuple.params.is_computed());
    assert_eq!(
        tuple.parameters(&table, &scope()),
        vec![Some(boxed(names::JAVA_LANG_LONG))]
    );
    assert!(tuple.params.is_computed());

    let empty = TupleType::new(Vec::new());
    assert_eq!(empty.parameters(&table, &scope()), vec![None]);
}

#[test]
fn test_map_parameters() {
    let table = ClassTable::with_jdk_basics();
    let strings = MapType::new()
        .with_string_entry("a", Some(int()))
        .with_string_entry("b", Some(long()));
    assert_eq!(
        strings.parameters(&table, &scope()),
        vec![Some(TypeValue::string()), Some(boxed(names::JAVA_LANG_LONG))]
    );

    let keyed = MapType::new()
        .with_other_entry(Some(int()), Some(TypeValue::string()))
        .with_other_entry(Some(long()), Some(TypeValue::string()));
    assert_eq!(
        keyed.parameters(&table, &scope()),
        vec![Some(boxed(names::JAVA_LANG_LONG)), Some(TypeValue::string())]
    );

    assert_eq!(MapType::new().parameters(&table, &scope()), vec![None, None]);
}

#[test]
fn test_range_iteration_type() {
    let table = ClassTable::with_jdk_basics();
    let ints = RangeType::new(Some(int()), Some(int()));
    assert_eq!(
        ints.iteration_type(&table, &scope()),
        boxed(names::JAVA_LANG_INTEGER)
    );
    assert_eq!(
        ints.parameters(&table, &scope()),
        vec![Some(boxed(names::JAVA_LANG_INTEGER))]
    );

    let mixed = RangeType::new(Some(int()), Some(long()));
    assert_eq!(
        mixed.iteration_type(&table, &scope()),
        boxed(names::JAVA_LANG_LONG)
    );

    let open = RangeType::new(Some(int()), None);
    assert_eq!(
        open.iteration_type(&table, &scope()),
        boxed(names::JAVA_LANG_INTEGER)
    );
    assert_eq!(
        RangeType::new(None, None).iteration_type(&table, &scope()),
        TypeValue::object()
    );
}

#[test]
fn test_nominal_and_intersection_parameters() {
    let table = ClassTable::with_jdk_basics();
    let list = TypeValue::class(names::JAVA_UTIL_LIST, vec![TypeValue::string()]);
    assert_eq!(
        list.parameters(&table, &scope()),
        vec![Some(TypeValue::string())]
    );
    assert!(int().parameters(&table, &scope()).is_empty());

    let traited = create_intersection(vec![list, TypeValue::raw(names::JAVA_LANG_RUNNABLE)])
        .expect("two conjuncts");
    assert_eq!(
        traited.parameters(&table, &scope()),
        vec![Some(TypeValue::string())]
    );
}

// =============================================================================
// Closures
// =============================================================================

#[test]
fn test_closure_parameters_join_returns() {
    let table = ClassTable::with_jdk_basics();
    let closure = ClosureType::new(vec![
        Signature::returning(vec![Parameter::new("a", None)], Some(int())),
        Signature::returning(Vec::new(), Some(long())),
    ])
    .expect("two signatures");
    assert_eq!(
        closure.parameters(&table, &scope()),
        vec![Some(boxed(names::JAVA_LANG_LONG))]
    );
    assert_eq!(
        closure.return_type(&table, &scope()),
        Some(boxed(names::JAVA_LANG_LONG))
    );
}

#[test]
fn test_closure_without_known_return() {
    let table = ClassTable::with_jdk_basics();
    let closure = ClosureType::single(Signature::returning(Vec::new(), None));
    assert_eq!(closure.parameters(&table, &scope()), vec![None]);
    assert_eq!(closure.return_type(&table, &scope()), None);
}

#[test]
fn test_closure_parameters_need_the_closure_class() {
    let closure = ClosureType::single(Signature::returning(Vec::new(), Some(int())));

    let empty = ClassTable::new();
    assert!(closure.parameters(&empty, &scope()).is_empty());

    let closure = ClosureType::single(Signature::returning(Vec::new(), Some(int())));
    let odd = ClassTable::new();
    odd.define(names::GROOVY_LANG_CLOSURE, ClassKind::Class, &["A", "B"], |_| Vec::new());
    assert!(closure.parameters(&odd, &scope()).is_empty());
}

#[test]
fn test_self_referential_closure_does_not_loop() {
    let table = Arc::new(ClassTable::with_jdk_basics());
    let calls = Arc::new(AtomicUsize::new(0));

    let closure: Arc<ClosureType> = Arc::new_cyclic(|this: &Weak<ClosureType>| {
        let this = this.clone();
        let table = Arc::clone(&table);
        let calls = Arc::clone(&calls);
        // The body returns the closure's own element type.
        ClosureType::single(Signature::new(
            Vec::new(),
            SignatureReturn::inferred(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                let this = this.upgrade()?;
                this.parameters(&*table, &SearchScope::all())
                    .into_iter()
                    .next()
                    .flatten()
            }),
        ))
    });

    assert_eq!(closure.parameters(&*table, &scope()), vec![None]);
    assert_eq!(in_flight_depth(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // The result observed a cut cycle, so it was not memoized.
    assert!(!closure.params.is_computed());
    assert_eq!(closure.parameters(&*table, &scope()), vec![None]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_closure_parameters_are_memoized() {
    let table = ClassTable::with_jdk_basics();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let closure = ClosureType::single(Signature::new(
        Vec::new(),
        SignatureReturn::inferred(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(TypeValue::string())
        }),
    ));

    for _ in 0..3 {
        assert_eq!(
            closure.parameters(&table, &scope()),
            vec![Some(TypeValue::string())]
        );
    }
    assert!(closure.params.is_computed());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
