use super::*;
use crate::types::{MapType, PrimitiveKind};

fn scope() -> SearchScope {
    SearchScope::all()
}

fn list_of(arg: TypeValue) -> TypeValue {
    TypeValue::class(names::JAVA_UTIL_LIST, vec![arg])
}

fn names_of(refs: &[ClassRef]) -> Vec<&str> {
    refs.iter().map(ClassRef::qualified_name).collect()
}

// =============================================================================
// ClassTable
// =============================================================================

#[test]
fn test_class_table_register_and_find() {
    let table = ClassTable::new();
    assert!(table.is_empty());
    let id = table.allocate();
    assert!(id.is_valid());
    let decl = table.register(ClassDecl::new(id, "p.Widget", ClassKind::Class));

    assert_eq!(table.len(), 1);
    assert!(table.contains(id));
    let found = table.find_class("p.Widget", &scope()).expect("registered");
    assert_eq!(found.id(), decl.id());
    assert!(table.find_class("p.Gadget", &scope()).is_none());

    let debug = format!("{table:?}");
    assert!(debug.contains("p.Widget"), "{debug}");
}

#[test]
fn test_invalidated_class_is_not_found() {
    let table = ClassTable::with_jdk_basics();
    let decl = table.define("p.Stale", ClassKind::Class, &[] as &[&str], |_| Vec::new());
    assert!(table.invalidate(decl.id()));
    assert!(!decl.is_valid());
    assert!(table.find_class("p.Stale", &scope()).is_none());
    assert!(!table.invalidate(DeclId(99_999)));
}

#[test]
fn test_jdk_basics_are_defined() {
    let table = ClassTable::with_jdk_basics();
    for name in [
        names::JAVA_LANG_OBJECT,
        names::JAVA_LANG_STRING,
        names::JAVA_UTIL_LIST,
        names::JAVA_UTIL_LINKED_HASH_MAP,
        names::GROOVY_LANG_CLOSURE,
        names::GROOVY_LANG_RANGE,
    ] {
        assert!(table.find_class(name, &scope()).is_some(), "{name} is defined");
    }
    let closure = table
        .find_class(names::GROOVY_LANG_CLOSURE, &scope())
        .expect("Closure is defined");
    assert_eq!(closure.type_params().len(), 1);
}

// =============================================================================
// Supertype queries
// =============================================================================

#[test]
fn test_supertype_closure_instantiates_arguments() {
    let table = ClassTable::with_jdk_basics();
    let hierarchy = Hierarchy::new(&table, scope());
    let array_list = ClassRef::new(names::JAVA_UTIL_ARRAY_LIST, vec![TypeValue::string()]);

    let closure = hierarchy.supertype_closure(&array_list);
    assert_eq!(closure[0].qualified_name(), names::JAVA_UTIL_ARRAY_LIST);
    let found = names_of(&closure);
    for expected in [
        names::JAVA_UTIL_LIST,
        names::JAVA_UTIL_COLLECTION,
        names::JAVA_LANG_ITERABLE,
        names::JAVA_LANG_OBJECT,
    ] {
        assert!(found.contains(&expected), "missing {expected}");
    }

    let iterable = hierarchy
        .find_supertype(&array_list, names::JAVA_LANG_ITERABLE)
        .expect("ArrayList is Iterable");
    assert_eq!(iterable.type_args(), &[TypeValue::string()]);
}

#[test]
fn test_raw_reference_has_raw_supertypes() {
    let table = ClassTable::with_jdk_basics();
    let hierarchy = Hierarchy::new(&table, scope());
    let list = hierarchy
        .find_supertype(&ClassRef::raw(names::JAVA_UTIL_ARRAY_LIST), names::JAVA_UTIL_LIST)
        .expect("ArrayList is a List");
    assert!(list.is_raw());
}

#[test]
fn test_unresolvable_class_still_reaches_object() {
    let table = ClassTable::with_jdk_basics();
    let hierarchy = Hierarchy::new(&table, scope());
    let closure = hierarchy.supertype_closure(&ClassRef::raw("com.example.Missing"));
    assert_eq!(names_of(&closure), ["com.example.Missing", names::JAVA_LANG_OBJECT]);
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let table = ClassTable::with_jdk_basics();
    let none: &[&str] = &[];
    table.define("p.A", ClassKind::Class, none, |_| vec![TypeValue::raw("p.B")]);
    table.define("p.B", ClassKind::Class, none, |_| vec![TypeValue::raw("p.A")]);

    let hierarchy = Hierarchy::new(&table, scope());
    let closure = hierarchy.supertype_closure(&ClassRef::raw("p.A"));
    assert_eq!(names_of(&closure), ["p.A", "p.B", names::JAVA_LANG_OBJECT]);
}

#[test]
fn test_structural_types_view_as_host_classes() {
    let table = ClassTable::with_jdk_basics();
    let hierarchy = Hierarchy::new(&table, scope());
    let int = TypeValue::primitive(PrimitiveKind::Int);

    let tuple = TypeValue::tuple(vec![Some(int.clone()), Some(TypeValue::raw("java.lang.Integer"))]);
    let iterable = hierarchy
        .instantiate_as_supertype(&tuple, names::JAVA_LANG_ITERABLE)
        .expect("tuples are lists");
    assert_eq!(iterable.type_args(), &[TypeValue::raw("java.lang.Integer")]);

    let map = TypeValue::Map(MapType::new().with_string_entry("a", Some(int)));
    let view = hierarchy.nominal_view(&map);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].qualified_name(), names::JAVA_UTIL_LINKED_HASH_MAP);
    assert_eq!(
        view[0].type_args(),
        &[TypeValue::string(), TypeValue::raw("java.lang.Integer")]
    );
    assert!(
        hierarchy
            .instantiate_as_supertype(&map, names::JAVA_UTIL_MAP)
            .is_some()
    );
}

#[test]
fn test_is_subclass() {
    let table = ClassTable::with_jdk_basics();
    let hierarchy = Hierarchy::new(&table, scope());
    let integer = ClassRef::raw("java.lang.Integer");
    assert!(hierarchy.is_subclass(&integer, names::JAVA_LANG_NUMBER));
    assert!(hierarchy.is_subclass(&integer, names::JAVA_LANG_COMPARABLE));
    assert!(!hierarchy.is_subclass(&integer, names::JAVA_LANG_STRING));
}

// =============================================================================
// Assignability
// =============================================================================

#[test]
fn test_assignability() {
    let table = ClassTable::with_jdk_basics();
    let hierarchy = Hierarchy::new(&table, scope());
    let string = TypeValue::string();
    let int = TypeValue::primitive(PrimitiveKind::Int);
    let long = TypeValue::primitive(PrimitiveKind::Long);

    assert!(hierarchy.is_assignable(&TypeValue::object(), &string));
    assert!(hierarchy.is_assignable(&TypeValue::raw(names::JAVA_LANG_NUMBER), &int));
    assert!(hierarchy.is_assignable(&long, &int));
    assert!(!hierarchy.is_assignable(&int, &long));
    assert!(hierarchy.is_assignable(&string, &TypeValue::raw(names::GROOVY_LANG_GSTRING)));
    assert!(!hierarchy.is_assignable(&string, &int));

    let array_list = TypeValue::class(names::JAVA_UTIL_ARRAY_LIST, vec![string.clone()]);
    assert!(hierarchy.is_assignable(&list_of(string.clone()), &array_list));
    assert!(!hierarchy.is_assignable(&list_of(TypeValue::raw("java.lang.Integer")), &array_list));
    assert!(hierarchy.is_assignable(&TypeValue::raw(names::JAVA_UTIL_LIST), &array_list));

    let t = TypeValue::TypeParam(crate::types::TypeParamRef::new(DeclId(5), 0, "T"));
    assert!(hierarchy.is_assignable(&t, &string));
}

struct ExtraSupertypes {
    table: ClassTable,
}

impl ClassResolver for ExtraSupertypes {
    fn find_class(&self, qualified_name: &str, scope: &SearchScope) -> Option<Arc<ClassDecl>> {
        self.table.find_class(qualified_name, scope)
    }

    fn resolve_supertypes(&self, decl: &ClassDecl) -> Vec<TypeValue> {
        let mut supertypes = decl.supertypes().to_vec();
        if decl.qualified_name() == "p.Plain" {
            supertypes.push(TypeValue::raw(names::JAVA_LANG_RUNNABLE));
        }
        supertypes
    }
}

#[test]
fn test_resolver_supplies_supertypes() {
    let table = ClassTable::with_jdk_basics();
    table.define("p.Plain", ClassKind::Class, &[] as &[&str], |_| Vec::new());
    let resolver = ExtraSupertypes { table };
    let hierarchy = Hierarchy::new(&resolver, scope());
    assert!(hierarchy.is_subclass(&ClassRef::raw("p.Plain"), names::JAVA_LANG_RUNNABLE));
}
