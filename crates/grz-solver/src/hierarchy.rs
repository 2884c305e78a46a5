//! Class hierarchy collaborator and supertype queries.
//!
//! The kernel never owns class declarations: it asks a [`ClassResolver`] for a
//! class by qualified name and for its declared supertypes. [`ClassTable`] is
//! an in-memory resolver for hosts without their own index (and for tests).
//!
//! [`Hierarchy`] answers the questions the LUB engine and applicability checks
//! need: the instantiated supertype closure of a class reference, the view of a
//! type as a given supertype, and assignability.

use crate::decl::{ClassDecl, ClassKind, DeclId, SearchScope};
use crate::lub::numeric_rank;
use crate::substitution::Substitution;
use crate::types::{ClassRef, TypeValue};
use dashmap::DashMap;
use grz_common::limits;
use grz_common::names;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, trace};

// =============================================================================
// ClassResolver
// =============================================================================

/// Host class-resolution service.
pub trait ClassResolver: Send + Sync {
    /// Find a valid class by qualified name within `scope`.
    fn find_class(&self, qualified_name: &str, scope: &SearchScope) -> Option<Arc<ClassDecl>>;

    /// Direct supertypes of `decl`, expressed over its own type parameters.
    fn resolve_supertypes(&self, decl: &ClassDecl) -> Vec<TypeValue> {
        decl.supertypes().to_vec()
    }
}

// =============================================================================
// ClassTable
// =============================================================================

/// Thread-safe in-memory class index.
///
/// ```ignore
/// let table = ClassTable::with_jdk_basics();
/// let list = table.find_class("java.util.List", &SearchScope::all());
/// ```
#[derive(Debug)]
pub struct ClassTable {
    classes: DashMap<DeclId, Arc<ClassDecl>>,
    by_name: DashMap<Arc<str>, DeclId>,
    next_id: AtomicU32,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
            by_name: DashMap::new(),
            next_id: AtomicU32::new(DeclId::FIRST_VALID),
        }
    }

    /// Table pre-populated with the `java.lang`, `java.util` and `groovy.lang`
    /// classes the kernel refers to by name.
    pub fn with_jdk_basics() -> Self {
        let table = Self::new();
        table.define_jdk_basics();
        table
    }

    /// Allocate a fresh `DeclId`.
    pub fn allocate(&self) -> DeclId {
        DeclId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a declaration built with an id from [`allocate`](Self::allocate).
    ///
    /// A later registration under the same qualified name shadows the earlier one.
    pub fn register(&self, decl: ClassDecl) -> Arc<ClassDecl> {
        let decl = Arc::new(decl);
        trace!(
            decl_id = decl.id().0,
            class = decl.qualified_name(),
            "ClassTable::register"
        );
        self.by_name.insert(decl.qualified_name_arc(), decl.id());
        self.classes.insert(decl.id(), Arc::clone(&decl));
        decl
    }

    /// Allocate, build and register a class.
    ///
    /// `supertypes` receives the class's own type parameters as type values.
    pub fn define<S: AsRef<str>>(
        &self,
        qualified_name: &str,
        kind: ClassKind,
        type_params: &[S],
        supertypes: impl FnOnce(&[TypeValue]) -> Vec<TypeValue>,
    ) -> Arc<ClassDecl> {
        let decl = ClassDecl::new(self.allocate(), qualified_name, kind).with_type_params(type_params);
        let params: Vec<TypeValue> = decl
            .type_params()
            .iter()
            .cloned()
            .map(TypeValue::TypeParam)
            .collect();
        let supertypes = supertypes(&params);
        self.register(decl.with_supertypes(supertypes))
    }

    pub fn get(&self, id: DeclId) -> Option<Arc<ClassDecl>> {
        self.classes.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: DeclId) -> bool {
        self.classes.contains_key(&id)
    }

    /// Invalidate a declaration (it was edited). Returns `false` if unknown.
    pub fn invalidate(&self, id: DeclId) -> bool {
        let Some(decl) = self.get(id) else {
            return false;
        };
        decl.invalidate();
        self.by_name
            .remove_if(&decl.qualified_name_arc(), |_, current| *current == id);
        debug!(decl_id = id.0, class = decl.qualified_name(), "Class invalidated");
        true
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn define_jdk_basics(&self) {
        use ClassKind::{Class, Interface};
        let raw = |name: &str| TypeValue::raw(name);
        let of = |name: &str, arg: &TypeValue| TypeValue::class(name, vec![arg.clone()]);
        let comparable_self = |name: &str| of(names::JAVA_LANG_COMPARABLE, &raw(name));
        let none: &[&str] = &[];

        self.define(names::JAVA_LANG_OBJECT, Class, none, |_| Vec::new());
        self.define(names::JAVA_IO_SERIALIZABLE, Interface, none, |_| Vec::new());
        self.define(names::JAVA_LANG_CLONEABLE, Interface, none, |_| Vec::new());
        self.define(names::JAVA_LANG_RUNNABLE, Interface, none, |_| Vec::new());
        self.define(names::JAVA_LANG_CHAR_SEQUENCE, Interface, none, |_| Vec::new());
        self.define(names::JAVA_LANG_COMPARABLE, Interface, &["T"], |_| Vec::new());
        self.define(names::JAVA_LANG_ITERABLE, Interface, &["T"], |_| Vec::new());

        self.define(names::JAVA_LANG_NUMBER, Class, none, |_| {
            vec![raw(names::JAVA_LANG_OBJECT), raw(names::JAVA_IO_SERIALIZABLE)]
        });
        for name in [
            names::JAVA_LANG_BYTE,
            names::JAVA_LANG_SHORT,
            names::JAVA_LANG_INTEGER,
            names::JAVA_LANG_LONG,
            names::JAVA_LANG_FLOAT,
            names::JAVA_LANG_DOUBLE,
            names::JAVA_MATH_BIG_INTEGER,
            names::JAVA_MATH_BIG_DECIMAL,
        ] {
            self.define(name, Class, none, |_| {
                vec![raw(names::JAVA_LANG_NUMBER), comparable_self(name)]
            });
        }
        for name in [names::JAVA_LANG_BOOLEAN, names::JAVA_LANG_CHARACTER] {
            self.define(name, Class, none, |_| {
                vec![
                    raw(names::JAVA_LANG_OBJECT),
                    raw(names::JAVA_IO_SERIALIZABLE),
                    comparable_self(name),
                ]
            });
        }
        self.define(names::JAVA_LANG_VOID, Class, none, |_| {
            vec![raw(names::JAVA_LANG_OBJECT)]
        });
        self.define(names::JAVA_LANG_STRING, Class, none, |_| {
            vec![
                raw(names::JAVA_LANG_OBJECT),
                raw(names::JAVA_IO_SERIALIZABLE),
                comparable_self(names::JAVA_LANG_STRING),
                raw(names::JAVA_LANG_CHAR_SEQUENCE),
            ]
        });
        self.define(names::GROOVY_LANG_GSTRING, Class, none, |_| {
            vec![
                raw(names::JAVA_LANG_OBJECT),
                raw(names::JAVA_LANG_COMPARABLE),
                raw(names::JAVA_LANG_CHAR_SEQUENCE),
                raw(names::JAVA_IO_SERIALIZABLE),
            ]
        });

        self.define(names::JAVA_UTIL_COLLECTION, Interface, &["E"], |p| {
            vec![of(names::JAVA_LANG_ITERABLE, &p[0])]
        });
        self.define(names::JAVA_UTIL_LIST, Interface, &["E"], |p| {
            vec![of(names::JAVA_UTIL_COLLECTION, &p[0])]
        });
        for name in [names::JAVA_UTIL_ARRAY_LIST, names::JAVA_UTIL_LINKED_LIST] {
            self.define(name, Class, &["E"], |p| {
                vec![
                    raw(names::JAVA_LANG_OBJECT),
                    of(names::JAVA_UTIL_LIST, &p[0]),
                    raw(names::JAVA_LANG_CLONEABLE),
                    raw(names::JAVA_IO_SERIALIZABLE),
                ]
            });
        }
        self.define(names::JAVA_UTIL_MAP, Interface, &["K", "V"], |_| Vec::new());
        self.define(names::JAVA_UTIL_HASH_MAP, Class, &["K", "V"], |p| {
            vec![
                raw(names::JAVA_LANG_OBJECT),
                TypeValue::class(names::JAVA_UTIL_MAP, p.to_vec()),
                raw(names::JAVA_LANG_CLONEABLE),
                raw(names::JAVA_IO_SERIALIZABLE),
            ]
        });
        self.define(names::JAVA_UTIL_LINKED_HASH_MAP, Class, &["K", "V"], |p| {
            vec![
                TypeValue::class(names::JAVA_UTIL_HASH_MAP, p.to_vec()),
                TypeValue::class(names::JAVA_UTIL_MAP, p.to_vec()),
            ]
        });

        self.define(names::GROOVY_LANG_RANGE, Interface, &["T"], |p| {
            vec![of(names::JAVA_UTIL_LIST, &p[0])]
        });
        self.define(names::GROOVY_LANG_INT_RANGE, Class, none, |_| {
            vec![
                raw(names::JAVA_LANG_OBJECT),
                of(names::GROOVY_LANG_RANGE, &raw(names::JAVA_LANG_INTEGER)),
            ]
        });
        self.define(names::GROOVY_LANG_OBJECT_RANGE, Class, none, |_| {
            vec![
                raw(names::JAVA_LANG_OBJECT),
                of(names::GROOVY_LANG_RANGE, &raw(names::JAVA_LANG_COMPARABLE)),
            ]
        });
        self.define(names::GROOVY_LANG_CLOSURE, Class, &["V"], |_| {
            vec![
                raw(names::JAVA_LANG_OBJECT),
                raw(names::JAVA_LANG_CLONEABLE),
                raw(names::JAVA_LANG_RUNNABLE),
                raw(names::JAVA_IO_SERIALIZABLE),
            ]
        });
    }
}

impl ClassResolver for ClassTable {
    fn find_class(&self, qualified_name: &str, _scope: &SearchScope) -> Option<Arc<ClassDecl>> {
        let id = *self.by_name.get(qualified_name)?;
        self.get(id).filter(|decl| decl.is_valid())
    }
}

// =============================================================================
// Hierarchy
// =============================================================================

/// Supertype queries over a resolver within one scope.
#[derive(Copy, Clone)]
pub struct Hierarchy<'a> {
    resolver: &'a dyn ClassResolver,
    scope: SearchScope,
}

impl<'a> Hierarchy<'a> {
    pub fn new(resolver: &'a dyn ClassResolver, scope: SearchScope) -> Self {
        Self { resolver, scope }
    }

    pub fn resolver(&self) -> &'a dyn ClassResolver {
        self.resolver
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    /// `class_ref` and all of its supertypes, instantiated with its arguments.
    ///
    /// Breadth-first; each class appears once (first path wins).
    /// `java.lang.Object` is always included, last unless declared earlier.
    /// Raw references yield raw supertypes. Unresolvable classes contribute
    /// themselves without supertypes.
    pub fn supertype_closure(&self, class_ref: &ClassRef) -> Vec<ClassRef> {
        let mut out: Vec<ClassRef> = Vec::new();
        let mut seen_ids: FxHashSet<DeclId> = FxHashSet::default();
        let mut seen_names: FxHashSet<String> = FxHashSet::default();
        let mut queue: SmallVec<[ClassRef; 8]> = SmallVec::new();
        queue.push(class_ref.clone());
        let mut head = 0;
        let mut visits = 0u32;

        while head < queue.len() {
            let current = queue[head].clone();
            head += 1;
            visits += 1;
            if visits > limits::MAX_SUPERTYPE_VISITS {
                debug!(
                    class = class_ref.qualified_name(),
                    "Supertype walk budget exhausted"
                );
                break;
            }

            let decl = current.resolve(self.resolver, &self.scope);
            let first_visit = match &decl {
                Some(decl) => seen_ids.insert(decl.id()),
                None => seen_names.insert(current.qualified_name().to_string()),
            };
            if !first_visit {
                continue;
            }

            if let Some(decl) = decl {
                let substitution = Substitution::for_class(&decl, current.type_args());
                for supertype in self.resolver.resolve_supertypes(&decl) {
                    if let Some(TypeValue::Class(super_ref)) = substitution.substitute(&supertype) {
                        queue.push(super_ref);
                    }
                }
                out.push(ClassRef::from_decl(decl, current.type_args().to_vec()));
            } else {
                out.push(current);
            }
        }

        if !out.iter().any(ClassRef::is_object) {
            out.push(ClassRef::object());
        }
        out
    }

    /// `class_ref` viewed as `target`, with arguments recovered through the
    /// supertype chain (`ArrayList<String>` as `java.util.List` is `List<String>`).
    pub fn find_supertype(&self, class_ref: &ClassRef, target: &str) -> Option<ClassRef> {
        if class_ref.qualified_name() == target {
            return Some(class_ref.clone());
        }
        self.supertype_closure(class_ref)
            .into_iter()
            .find(|candidate| candidate.qualified_name() == target)
    }

    /// Any type viewed as the class `target`.
    pub fn instantiate_as_supertype(&self, ty: &TypeValue, target: &str) -> Option<ClassRef> {
        self.nominal_view(ty)
            .iter()
            .find_map(|view| self.find_supertype(view, target))
    }

    /// Whether `class_ref` is `target` or one of its subclasses.
    pub fn is_subclass(&self, class_ref: &ClassRef, target: &str) -> bool {
        self.find_supertype(class_ref, target).is_some()
    }

    /// Class references a type is an instance of.
    ///
    /// Structural types map onto their host classes with inferred arguments:
    /// a tuple is a `java.util.List`, a map literal a
    /// `java.util.LinkedHashMap`, a range a `groovy.lang.Range`, a closure a
    /// `groovy.lang.Closure`. Intersections yield one view per conjunct.
    pub fn nominal_view(&self, ty: &TypeValue) -> Vec<ClassRef> {
        match ty {
            TypeValue::Primitive(kind) => vec![ClassRef::raw(kind.boxed_name())],
            TypeValue::TypeParam(_) => vec![ClassRef::object()],
            TypeValue::Class(class_ref) => vec![class_ref.clone()],
            TypeValue::Closure(_) | TypeValue::Tuple(_) | TypeValue::Map(_) | TypeValue::Range(_) => {
                let Some(host) = ty.host_class_name() else {
                    return vec![ClassRef::object()];
                };
                let params = ty.parameters(self.resolver, &self.scope);
                vec![generic_ref(host, params)]
            }
            TypeValue::Intersection(intersection) => intersection
                .conjuncts()
                .flat_map(|conjunct| self.nominal_view(conjunct))
                .collect(),
            TypeValue::Anonymous(anonymous) => vec![anonymous.base().clone()],
        }
    }

    /// Whether a value of type `source` can be assigned to `target`.
    ///
    /// Groovy-lenient: type parameters accept anything, numeric types widen
    /// along the Groovy numeric ranking, a `GString` converts to `String` and
    /// type arguments are compared covariantly.
    pub fn is_assignable(&self, target: &TypeValue, source: &TypeValue) -> bool {
        if target == source || target.is_object() {
            return true;
        }
        match (target, source) {
            (TypeValue::TypeParam(_), _) | (_, TypeValue::TypeParam(_)) => return true,
            (TypeValue::Intersection(intersection), _) => {
                return intersection
                    .conjuncts()
                    .all(|conjunct| self.is_assignable(conjunct, source));
            }
            (TypeValue::Tuple(target), TypeValue::Tuple(source)) => {
                return target.len() == source.len()
                    && target.components().iter().zip(source.components()).all(
                        |(target, source)| match (target, source) {
                            (Some(target), Some(source)) => self.is_assignable(target, source),
                            _ => true,
                        },
                    );
            }
            (TypeValue::Closure(_), TypeValue::Closure(_)) => return true,
            _ => {}
        }

        let (boxed_target, boxed_source) = (target.boxed(), source.boxed());
        if let (Some(target_rank), Some(source_rank)) =
            (numeric_rank(&boxed_target), numeric_rank(&boxed_source))
        {
            return source_rank <= target_rank;
        }

        let Some(target_class) = self.nominal_view(&boxed_target).into_iter().next() else {
            return false;
        };
        if target_class.qualified_name() == names::JAVA_LANG_STRING
            && boxed_source.host_class_name() == Some(names::GROOVY_LANG_GSTRING)
        {
            return true;
        }

        self.nominal_view(&boxed_source).iter().any(|view| {
            self.find_supertype(view, target_class.qualified_name())
                .is_some_and(|found| self.arguments_compatible(&target_class, &found))
        })
    }

    fn arguments_compatible(&self, target: &ClassRef, found: &ClassRef) -> bool {
        if target.is_raw() || found.is_raw() {
            return true;
        }
        target.type_args().len() == found.type_args().len()
            && target
                .type_args()
                .iter()
                .zip(found.type_args())
                .all(|(target, found)| self.is_assignable(target, found))
    }
}

/// `host<params>`, raw when any parameter is unknown.
pub(crate) fn generic_ref(host: &str, params: Vec<Option<TypeValue>>) -> ClassRef {
    match params.into_iter().collect::<Option<Vec<TypeValue>>>() {
        Some(args) => ClassRef::new(host, args),
        None => ClassRef::raw(host),
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
