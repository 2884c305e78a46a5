//! Declaration identifiers and declaration records.
//!
//! Declarations are owned by the host. The kernel only needs a stable
//! identity (`DeclId`), a name, the declared type parameters and, for members,
//! the declared type or return type. Host invalidation (a concurrent edit made
//! the declaration stale) is modelled by an atomic validity flag: the kernel
//! never throws on staleness, callers check `is_valid()` before trusting cached
//! results.

use crate::closure::Parameter;
use crate::types::{TypeParamRef, TypeValue};
use grz_common::names;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// DeclId
// =============================================================================

/// Host-assigned declaration identifier.
///
/// Identity of a declaration is identity of its `DeclId`: two class
/// references resolving to the same `DeclId` are the same class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    /// Sentinel value for invalid `DeclId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DeclId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DeclId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// SearchScope
// =============================================================================

/// Opaque resolve scope token.
///
/// The host unions and intersects scopes; the kernel only threads the token
/// through every resolution call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchScope(u64);

impl SearchScope {
    /// Scope covering everything the host knows about.
    pub const fn all() -> Self {
        Self(0)
    }

    pub const fn from_token(token: u64) -> Self {
        Self(token)
    }

    pub const fn token(self) -> u64 {
        self.0
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::all()
    }
}

// =============================================================================
// ClassDecl
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    /// Groovy trait: an interface with state, the conjunct kind of trait types.
    Trait,
    Enum,
    Annotation,
    /// Body of an anonymous class expression.
    Anonymous,
}

impl ClassKind {
    /// Interface-like kinds sort after classes when several common supertypes
    /// are joined into an intersection.
    pub const fn is_interface_like(self) -> bool {
        matches!(self, Self::Interface | Self::Trait | Self::Annotation)
    }
}

/// A class declaration as reported by the host.
///
/// Supertypes are expressed in terms of the class's own type parameters, e.g.
/// `ArrayList<E>` declares `List<E>`.
#[derive(Debug)]
pub struct ClassDecl {
    id: DeclId,
    qualified_name: Arc<str>,
    kind: ClassKind,
    type_params: Vec<TypeParamRef>,
    supertypes: Vec<TypeValue>,
    valid: AtomicBool,
}

impl ClassDecl {
    pub fn new(id: DeclId, qualified_name: impl Into<Arc<str>>, kind: ClassKind) -> Self {
        Self {
            id,
            qualified_name: qualified_name.into(),
            kind,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            valid: AtomicBool::new(true),
        }
    }

    /// Declare type parameters by name, in order.
    pub fn with_type_params<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.type_params = names
            .iter()
            .enumerate()
            .map(|(index, name)| TypeParamRef::new(self.id, index as u32, name.as_ref()))
            .collect();
        self
    }

    pub fn with_supertypes(mut self, supertypes: Vec<TypeValue>) -> Self {
        self.supertypes = supertypes;
        self
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub(crate) fn qualified_name_arc(&self) -> Arc<str> {
        Arc::clone(&self.qualified_name)
    }

    pub fn short_name(&self) -> &str {
        names::short_name(&self.qualified_name)
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn type_params(&self) -> &[TypeParamRef] {
        &self.type_params
    }

    /// Type parameter `index` as a type value, for building supertypes.
    pub fn type_param_value(&self, index: usize) -> Option<TypeValue> {
        self.type_params.get(index).cloned().map(TypeValue::TypeParam)
    }

    /// Type parameter named `name` as a type value.
    pub fn type_param_named(&self, name: &str) -> Option<TypeValue> {
        self.type_params
            .iter()
            .find(|tp| tp.name() == name)
            .cloned()
            .map(TypeValue::TypeParam)
    }

    pub fn supertypes(&self) -> &[TypeValue] {
        &self.supertypes
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Host hook: the declaration was invalidated by an edit.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

// =============================================================================
// Declaration
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    Method,
    Constructor,
    Field,
    Property,
    Variable,
    Parameter,
}

/// A resolvable declaration: the element of a resolve result.
///
/// `ty` is the declared type for fields, properties and variables and the
/// return type for methods.
#[derive(Debug)]
pub struct Declaration {
    id: DeclId,
    kind: DeclKind,
    name: Option<Arc<str>>,
    type_params: Vec<TypeParamRef>,
    parameters: Vec<Parameter>,
    ty: Option<TypeValue>,
    is_static: bool,
    origin: Option<DeclId>,
    valid: AtomicBool,
}

impl Declaration {
    pub fn new(id: DeclId, kind: DeclKind, name: Option<&str>) -> Self {
        Self {
            id,
            kind,
            name: name.map(Arc::from),
            type_params: Vec::new(),
            parameters: Vec::new(),
            ty: None,
            is_static: false,
            origin: None,
            valid: AtomicBool::new(true),
        }
    }

    /// Create a method declaration.
    pub fn method(
        id: DeclId,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: Option<TypeValue>,
    ) -> Self {
        let mut decl = Self::new(id, DeclKind::Method, Some(name));
        decl.parameters = parameters;
        decl.ty = return_type;
        decl
    }

    /// Create a field declaration.
    pub fn field(id: DeclId, name: &str, ty: Option<TypeValue>) -> Self {
        let mut decl = Self::new(id, DeclKind::Field, Some(name));
        decl.ty = ty;
        decl
    }

    /// Create a property declaration.
    pub fn property(id: DeclId, name: &str, ty: Option<TypeValue>) -> Self {
        let mut decl = Self::new(id, DeclKind::Property, Some(name));
        decl.ty = ty;
        decl
    }

    /// Declare method type parameters by name, in order.
    pub fn with_type_params<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.type_params = names
            .iter()
            .enumerate()
            .map(|(index, name)| TypeParamRef::new(self.id, index as u32, name.as_ref()))
            .collect();
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_type(mut self, ty: Option<TypeValue>) -> Self {
        self.ty = ty;
        self
    }

    pub const fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Mark this declaration as a view of `origin` (e.g. a copy produced from
    /// a different tree of the same source).
    pub const fn with_origin(mut self, origin: DeclId) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn type_params(&self) -> &[TypeParamRef] {
        &self.type_params
    }

    /// Type parameter named `name` as a type value.
    pub fn type_param_named(&self, name: &str) -> Option<TypeValue> {
        self.type_params
            .iter()
            .find(|tp| tp.name() == name)
            .cloned()
            .map(TypeValue::TypeParam)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn ty(&self) -> Option<&TypeValue> {
        self.ty.as_ref()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The declaration this one stands for.
    pub fn origin_id(&self) -> DeclId {
        self.origin.unwrap_or(self.id)
    }

    pub fn is_method_like(&self) -> bool {
        matches!(self.kind, DeclKind::Method | DeclKind::Constructor)
    }

    /// Resolution equivalence: the same declaration, or two views of the same
    /// origin carrying the same name.
    pub fn is_equivalent_to(&self, other: &Declaration) -> bool {
        if self.id == other.id {
            return true;
        }
        self.origin_id() == other.origin_id() && self.name == other.name
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Host hook: the declaration was invalidated by an edit.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}
