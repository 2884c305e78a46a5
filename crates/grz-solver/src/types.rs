//! Structural type values.
//!
//! `TypeValue` is the single sum type covering every type the kernel infers or
//! reads from declarations: nominal class references, primitive types, type
//! parameters, closures, tuples, map literals, ranges, trait intersections and
//! anonymous classes. Values are immutable and shared freely; the only interior
//! state is the memoized parameter cell of composite variants, which equality
//! and hashing ignore.
//!
//! Equality rules:
//! - class references compare by resolved declaration identity when both are
//!   resolved, by qualified name otherwise, and then by type arguments;
//! - tuples compare component-wise and order-sensitively;
//! - maps compare string-keyed entries as a map (insertion order is kept for
//!   rendering but is not significant for equality) and other-keyed entries
//!   pairwise;
//! - closures compare their signature lists structurally, with inferred
//!   return types compared by inference function (see [`SignatureReturn`](crate::closure::SignatureReturn)).
//!
//! Hashing of class references uses the short name only, so partially
//! resolved references still land in the same bucket.

use crate::closure::{ClosureType, Signature};
use crate::decl::{ClassDecl, DeclId, SearchScope};
use crate::error::{SolverError, SolverResult};
use crate::hierarchy::ClassResolver;
use crate::lazy::LazyCell;
use grz_common::names;
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

// =============================================================================
// PrimitiveKind
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        Self::Boolean,
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Void,
    ];

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    pub const fn boxed_name(self) -> &'static str {
        match self {
            Self::Boolean => names::JAVA_LANG_BOOLEAN,
            Self::Byte => names::JAVA_LANG_BYTE,
            Self::Char => names::JAVA_LANG_CHARACTER,
            Self::Short => names::JAVA_LANG_SHORT,
            Self::Int => names::JAVA_LANG_INTEGER,
            Self::Long => names::JAVA_LANG_LONG,
            Self::Float => names::JAVA_LANG_FLOAT,
            Self::Double => names::JAVA_LANG_DOUBLE,
            Self::Void => names::JAVA_LANG_VOID,
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    pub fn from_boxed_name(qualified_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.boxed_name() == qualified_name)
    }
}

// =============================================================================
// TypeParamRef
// =============================================================================

/// A declared type parameter: `index`-th parameter of declaration `owner`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamRef {
    owner: DeclId,
    index: u32,
    name: Arc<str>,
}

impl TypeParamRef {
    pub fn new(owner: DeclId, index: u32, name: &str) -> Self {
        Self {
            owner,
            index,
            name: Arc::from(name),
        }
    }

    pub fn owner(&self) -> DeclId {
        self.owner
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// TypeValue
// =============================================================================

#[derive(Clone, Debug)]
pub enum TypeValue {
    Primitive(PrimitiveKind),
    TypeParam(TypeParamRef),
    Class(ClassRef),
    Closure(Arc<ClosureType>),
    Tuple(TupleType),
    Map(MapType),
    Range(RangeType),
    Intersection(IntersectionType),
    Anonymous(AnonymousClassRef),
}

impl TypeValue {
    /// `java.lang.Object`, looked up by name when first needed.
    pub fn object() -> Self {
        Self::Class(ClassRef::object())
    }

    pub fn class(qualified_name: &str, type_args: Vec<TypeValue>) -> Self {
        Self::Class(ClassRef::new(qualified_name, type_args))
    }

    pub fn raw(qualified_name: &str) -> Self {
        Self::Class(ClassRef::raw(qualified_name))
    }

    pub fn string() -> Self {
        Self::raw(names::JAVA_LANG_STRING)
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }

    pub fn tuple(components: Vec<Option<TypeValue>>) -> Self {
        Self::Tuple(TupleType::new(components))
    }

    pub fn range(left: Option<TypeValue>, right: Option<TypeValue>) -> Self {
        Self::Range(RangeType::new(left, right))
    }

    /// Closure type over `signatures`; at least one signature is required.
    pub fn closure(signatures: Vec<Signature>) -> SolverResult<Self> {
        Ok(Self::Closure(Arc::new(ClosureType::new(signatures)?)))
    }

    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Self::Class(class_ref) => Some(class_ref),
            _ => None,
        }
    }

    pub fn as_closure(&self) -> Option<&Arc<ClosureType>> {
        match self {
            Self::Closure(closure) => Some(closure),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&TupleType> {
        match self {
            Self::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapType> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Class(class_ref) if class_ref.is_object())
    }

    /// Qualified name of the class this value is an instance of, if any.
    ///
    /// Structural variants report their host class: closures are
    /// `groovy.lang.Closure`, tuples `java.util.List`, map literals
    /// `java.util.LinkedHashMap` and ranges `groovy.lang.Range`.
    pub fn host_class_name(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) | Self::TypeParam(_) => None,
            Self::Class(class_ref) => Some(class_ref.qualified_name()),
            Self::Closure(_) => Some(names::GROOVY_LANG_CLOSURE),
            Self::Tuple(_) => Some(names::JAVA_UTIL_LIST),
            Self::Map(_) => Some(names::JAVA_UTIL_LINKED_HASH_MAP),
            Self::Range(_) => Some(names::GROOVY_LANG_RANGE),
            Self::Intersection(intersection) => intersection.primary().host_class_name(),
            Self::Anonymous(anonymous) => Some(anonymous.base().qualified_name()),
        }
    }

    /// Box a primitive type; every other value is returned unchanged.
    pub fn boxed(&self) -> Self {
        match self {
            Self::Primitive(kind) => Self::raw(kind.boxed_name()),
            other => other.clone(),
        }
    }

    /// The primitive kind this value is or boxes.
    pub fn unboxed_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            Self::Class(class_ref) if class_ref.is_raw() => {
                PrimitiveKind::from_boxed_name(class_ref.qualified_name())
            }
            _ => None,
        }
    }

    /// Host validity: false once any declaration this value resolved to was
    /// invalidated. Unresolved references are always valid.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Primitive(_) | Self::TypeParam(_) => true,
            Self::Class(class_ref) => class_ref.is_valid(),
            Self::Closure(closure) => closure.is_valid(),
            Self::Tuple(tuple) => tuple.components().iter().flatten().all(TypeValue::is_valid),
            Self::Map(map) => {
                map.string_entries().values().flatten().all(TypeValue::is_valid)
                    && map
                        .other_entries()
                        .iter()
                        .flat_map(|(key, value)| key.iter().chain(value.iter()))
                        .all(TypeValue::is_valid)
            }
            Self::Range(range) => range.left().into_iter().chain(range.right()).all(TypeValue::is_valid),
            Self::Intersection(intersection) => intersection.conjuncts().all(TypeValue::is_valid),
            Self::Anonymous(anonymous) => {
                anonymous.body().decl().is_valid() && anonymous.base().is_valid()
            }
        }
    }
}

impl PartialEq for TypeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::TypeParam(a), Self::TypeParam(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => a == b,
            (Self::Closure(a), Self::Closure(b)) => {
                Arc::ptr_eq(a, b) || a.signatures() == b.signatures()
            }
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Range(a), Self::Range(b)) => a == b,
            (Self::Intersection(a), Self::Intersection(b)) => a == b,
            (Self::Anonymous(a), Self::Anonymous(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeValue {}

impl Hash for TypeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Primitive(kind) => kind.hash(state),
            Self::TypeParam(param) => param.hash(state),
            Self::Class(class_ref) => class_ref.hash(state),
            Self::Closure(closure) => closure.signatures().hash(state),
            Self::Tuple(tuple) => tuple.hash(state),
            Self::Map(map) => map.hash(state),
            Self::Range(range) => range.hash(state),
            Self::Intersection(intersection) => intersection.hash(state),
            Self::Anonymous(anonymous) => anonymous.hash(state),
        }
    }
}

impl From<ClassRef> for TypeValue {
    fn from(class_ref: ClassRef) -> Self {
        Self::Class(class_ref)
    }
}

impl From<PrimitiveKind> for TypeValue {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

// =============================================================================
// ClassRef
// =============================================================================

/// Nominal class reference with type arguments.
///
/// A reference may carry its resolved declaration or only a qualified name; in
/// the latter case it is resolved by name through the host resolver when a
/// computation needs the declaration. Empty `type_args` means a raw type.
#[derive(Clone, Debug)]
pub struct ClassRef {
    qualified_name: Arc<str>,
    type_args: Vec<TypeValue>,
    resolved: Option<Arc<ClassDecl>>,
}

impl ClassRef {
    /// Unresolved reference. `qualified_name` must not be empty.
    pub fn new(qualified_name: impl Into<Arc<str>>, type_args: Vec<TypeValue>) -> Self {
        let qualified_name = qualified_name.into();
        debug_assert!(
            !qualified_name.is_empty(),
            "class reference must have a non-empty qualified name"
        );
        Self {
            qualified_name,
            type_args,
            resolved: None,
        }
    }

    /// Checked variant of [`ClassRef::new`] for names coming from outside.
    pub fn try_new(qualified_name: &str, type_args: Vec<TypeValue>) -> SolverResult<Self> {
        if qualified_name.trim().is_empty() {
            return Err(SolverError::EmptyQualifiedName);
        }
        Ok(Self::new(qualified_name, type_args))
    }

    pub fn raw(qualified_name: impl Into<Arc<str>>) -> Self {
        Self::new(qualified_name, Vec::new())
    }

    pub fn object() -> Self {
        Self::raw(names::JAVA_LANG_OBJECT)
    }

    /// Reference bound to `decl`.
    ///
    /// Arguments whose count does not match the declaration's type parameters
    /// are dropped: the reference degrades to the raw type.
    pub fn from_decl(decl: Arc<ClassDecl>, type_args: Vec<TypeValue>) -> Self {
        let type_args = if type_args.is_empty() || type_args.len() == decl.type_params().len() {
            type_args
        } else {
            trace!(
                class = decl.qualified_name(),
                expected = decl.type_params().len(),
                actual = type_args.len(),
                "Type argument count mismatch, using raw type"
            );
            Vec::new()
        };
        Self {
            qualified_name: decl.qualified_name_arc(),
            type_args,
            resolved: Some(decl),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn short_name(&self) -> &str {
        names::short_name(&self.qualified_name)
    }

    pub fn type_args(&self) -> &[TypeValue] {
        &self.type_args
    }

    pub fn is_raw(&self) -> bool {
        self.type_args.is_empty()
    }

    pub fn is_object(&self) -> bool {
        &*self.qualified_name == names::JAVA_LANG_OBJECT
    }

    /// The declaration carried by this reference, without consulting a resolver.
    pub fn resolved_decl(&self) -> Option<&Arc<ClassDecl>> {
        self.resolved.as_ref()
    }

    /// Resolve the declaration: the carried one, or a lookup by name.
    pub fn resolve(&self, resolver: &dyn ClassResolver, scope: &SearchScope) -> Option<Arc<ClassDecl>> {
        match &self.resolved {
            Some(decl) => Some(Arc::clone(decl)),
            None => resolver.find_class(&self.qualified_name, scope),
        }
    }

    /// Same class, different arguments.
    pub fn with_type_args(&self, type_args: Vec<TypeValue>) -> Self {
        match &self.resolved {
            Some(decl) => Self::from_decl(Arc::clone(decl), type_args),
            None => Self {
                qualified_name: Arc::clone(&self.qualified_name),
                type_args,
                resolved: None,
            },
        }
    }

    /// The raw form of this reference.
    pub fn erased(&self) -> Self {
        self.with_type_args(Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.resolved.as_ref().is_none_or(|decl| decl.is_valid())
            && self.type_args.iter().all(TypeValue::is_valid)
    }

    /// Same class as `other`, ignoring type arguments.
    pub fn same_class(&self, other: &ClassRef) -> bool {
        match (&self.resolved, &other.resolved) {
            (Some(a), Some(b)) => a.id() == b.id(),
            _ => self.qualified_name == other.qualified_name,
        }
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_class(other) && self.type_args == other.type_args
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.short_name().hash(state);
    }
}

// =============================================================================
// TupleType
// =============================================================================

/// Fixed-length, ordered, heterogeneous list literal type.
///
/// A `None` component is untyped (`Object`).
#[derive(Clone, Debug)]
pub struct TupleType {
    components: Vec<Option<TypeValue>>,
    pub(crate) params: LazyCell<Vec<Option<TypeValue>>>,
}

impl TupleType {
    pub fn new(components: Vec<Option<TypeValue>>) -> Self {
        Self {
            components,
            params: LazyCell::new(),
        }
    }

    pub fn components(&self) -> &[Option<TypeValue>] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&TypeValue> {
        self.components.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl PartialEq for TupleType {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for TupleType {}

impl Hash for TupleType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

// =============================================================================
// MapType
// =============================================================================

/// Map literal type.
///
/// String-keyed entries keep insertion order (rendering shows the first ones);
/// entries keyed by arbitrary expressions keep their key type.
#[derive(Clone, Debug)]
pub struct MapType {
    string_entries: IndexMap<Arc<str>, Option<TypeValue>>,
    other_entries: Vec<(Option<TypeValue>, Option<TypeValue>)>,
    pub(crate) params: LazyCell<Vec<Option<TypeValue>>>,
}

impl MapType {
    pub fn new() -> Self {
        Self {
            string_entries: IndexMap::new(),
            other_entries: Vec::new(),
            params: LazyCell::new(),
        }
    }

    pub fn from_entries(
        string_entries: IndexMap<Arc<str>, Option<TypeValue>>,
        other_entries: Vec<(Option<TypeValue>, Option<TypeValue>)>,
    ) -> Self {
        Self {
            string_entries,
            other_entries,
            params: LazyCell::new(),
        }
    }

    pub fn from_string_entries<K, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Option<TypeValue>)>,
    {
        let mut map = Self::new();
        for (key, ty) in entries {
            map.string_entries.insert(Arc::from(key.as_ref()), ty);
        }
        map
    }

    /// Add or overwrite a string-keyed entry. An overwritten key keeps its position.
    pub fn with_string_entry(mut self, key: &str, ty: Option<TypeValue>) -> Self {
        self.string_entries.insert(Arc::from(key), ty);
        self.params = LazyCell::new();
        self
    }

    pub fn with_other_entry(mut self, key: Option<TypeValue>, value: Option<TypeValue>) -> Self {
        self.other_entries.push((key, value));
        self.params = LazyCell::new();
        self
    }

    pub fn string_entries(&self) -> &IndexMap<Arc<str>, Option<TypeValue>> {
        &self.string_entries
    }

    pub fn other_entries(&self) -> &[(Option<TypeValue>, Option<TypeValue>)] {
        &self.other_entries
    }

    /// Value type of the string key `key`, if the key is present and typed.
    pub fn type_by_key(&self, key: &str) -> Option<&TypeValue> {
        self.string_entries.get(key).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.string_entries.is_empty() && self.other_entries.is_empty()
    }

    pub fn has_only_string_keys(&self) -> bool {
        self.other_entries.is_empty()
    }

    /// Merge two map literal types: string entries of `right` overwrite those
    /// of `left`, other entries are concatenated.
    pub fn merge(left: &MapType, right: &MapType) -> MapType {
        let mut string_entries = left.string_entries.clone();
        for (key, ty) in &right.string_entries {
            string_entries.insert(Arc::clone(key), ty.clone());
        }
        let mut other_entries = left.other_entries.clone();
        other_entries.extend(right.other_entries.iter().cloned());
        Self::from_entries(string_entries, other_entries)
    }
}

impl Default for MapType {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MapType {
    fn eq(&self, other: &Self) -> bool {
        self.string_entries == other.string_entries && self.other_entries == other.other_entries
    }
}

impl Eq for MapType {}

impl Hash for MapType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string_entries.len().hash(state);
        self.other_entries.len().hash(state);
        // String entries compare as a map: combine key hashes order-independently.
        let keys = self.string_entries.keys().fold(0u64, |acc, key| {
            let mut hasher = FxHasher::default();
            key.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        keys.hash(state);
    }
}

// =============================================================================
// RangeType
// =============================================================================

/// Range literal type `[left..right]`.
#[derive(Clone, Debug)]
pub struct RangeType {
    left: Option<Box<TypeValue>>,
    right: Option<Box<TypeValue>>,
    pub(crate) params: LazyCell<Vec<Option<TypeValue>>>,
}

impl RangeType {
    pub fn new(left: Option<TypeValue>, right: Option<TypeValue>) -> Self {
        Self {
            left: left.map(Box::new),
            right: right.map(Box::new),
            params: LazyCell::new(),
        }
    }

    pub fn left(&self) -> Option<&TypeValue> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TypeValue> {
        self.right.as_deref()
    }
}

impl PartialEq for RangeType {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for RangeType {}

impl Hash for RangeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

// =============================================================================
// IntersectionType
// =============================================================================

/// Trait type: an expression type that also satisfies additional trait types.
///
/// Built through [`crate::intersection::create_intersection`], which keeps the
/// conjunct list flat and duplicate-free.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntersectionType {
    primary: Box<TypeValue>,
    additional: Vec<TypeValue>,
}

impl IntersectionType {
    pub(crate) fn from_flat(primary: TypeValue, additional: Vec<TypeValue>) -> Self {
        Self {
            primary: Box::new(primary),
            additional,
        }
    }

    pub fn primary(&self) -> &TypeValue {
        &self.primary
    }

    pub fn additional(&self) -> &[TypeValue] {
        &self.additional
    }

    /// All conjuncts, primary first.
    pub fn conjuncts(&self) -> impl Iterator<Item = &TypeValue> {
        std::iter::once(&*self.primary).chain(self.additional.iter())
    }
}

// =============================================================================
// Anonymous classes
// =============================================================================

/// Body of an anonymous class expression.
///
/// The class name shown for an anonymous class is synthesized from its base
/// class reference as written at the call site. The synthesized name is cached
/// and the cache is dropped by the mutation hook that rewrites the base
/// reference text.
#[derive(Debug)]
pub struct AnonymousBody {
    decl: Arc<ClassDecl>,
    base_reference_text: RwLock<Arc<str>>,
    synthesized_name: RwLock<Option<Arc<str>>>,
}

impl AnonymousBody {
    pub fn new(decl: Arc<ClassDecl>, base_reference_text: &str) -> Self {
        Self {
            decl,
            base_reference_text: RwLock::new(Arc::from(base_reference_text)),
            synthesized_name: RwLock::new(None),
        }
    }

    pub fn decl(&self) -> &Arc<ClassDecl> {
        &self.decl
    }

    pub fn base_reference_text(&self) -> Arc<str> {
        Arc::clone(
            &self
                .base_reference_text
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Mutation hook: the base class reference was edited.
    pub fn set_base_reference_text(&self, text: &str) {
        *self
            .base_reference_text
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::from(text);
        self.invalidate();
    }

    /// Drop the cached synthesized name.
    pub fn invalidate(&self) {
        *self
            .synthesized_name
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_name_cached(&self) -> bool {
        self.synthesized_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Class name text of the base reference, without type arguments.
    pub fn synthesized_name(&self) -> Arc<str> {
        if let Some(name) = self
            .synthesized_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(name);
        }
        let text = self.base_reference_text();
        let without_args = match text.find('<') {
            Some(open) => &text[..open],
            None => &text[..],
        };
        let name: Arc<str> = Arc::from(
            without_args
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>(),
        );
        *self
            .synthesized_name
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&name));
        name
    }
}

/// Type of an anonymous class expression: its base class plus its own body.
#[derive(Clone, Debug)]
pub struct AnonymousClassRef {
    base: ClassRef,
    body: Arc<AnonymousBody>,
}

impl AnonymousClassRef {
    pub fn new(base: ClassRef, body: Arc<AnonymousBody>) -> Self {
        Self { base, body }
    }

    pub fn base(&self) -> &ClassRef {
        &self.base
    }

    pub fn body(&self) -> &Arc<AnonymousBody> {
        &self.body
    }
}

impl PartialEq for AnonymousClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.body.decl().id() == other.body.decl().id()
    }
}

impl Eq for AnonymousClassRef {}

impl Hash for AnonymousClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.body.decl().id().hash(state);
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
