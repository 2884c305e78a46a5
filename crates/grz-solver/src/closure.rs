//! Closure types and their signatures.
//!
//! A closure carries one or more call signatures. A signature's return type is
//! either declared or inferred from the closure body on demand; inferred
//! returns are memoized per signature through a recursion-guarded
//! [`LazyCell`], so a body whose type mentions the closure itself resolves to
//! "unknown" instead of looping.

use crate::decl::SearchScope;
use crate::error::{SolverError, SolverResult};
use crate::hierarchy::{ClassResolver, Hierarchy};
use crate::lazy::LazyCell;
use crate::lub::LubCalculator;
use crate::recursion::{GuardKey, GuardKind};
use crate::types::TypeValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::trace;

// =============================================================================
// Parameter
// =============================================================================

/// A closure or method parameter.
///
/// For a varargs parameter `ty` is the element type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: Option<Arc<str>>,
    ty: Option<TypeValue>,
    optional: bool,
    varargs: bool,
}

impl Parameter {
    pub fn new(name: &str, ty: Option<TypeValue>) -> Self {
        Self {
            name: Some(Arc::from(name)),
            ty,
            optional: false,
            varargs: false,
        }
    }

    pub fn unnamed(ty: Option<TypeValue>) -> Self {
        Self {
            name: None,
            ty,
            optional: false,
            varargs: false,
        }
    }

    /// Parameter with a default value: may be omitted at the call site.
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    /// Same parameter, different type.
    pub fn with_type(&self, ty: Option<TypeValue>) -> Self {
        Self {
            name: self.name.clone(),
            ty,
            optional: self.optional,
            varargs: self.varargs,
        }
    }

    /// Join with a parameter of the same name: optional if either side is,
    /// varargs only if both are.
    pub fn joined(&self, other: &Parameter, ty: Option<TypeValue>) -> Self {
        Self {
            name: self.name.clone(),
            ty,
            optional: self.optional || other.optional,
            varargs: self.varargs && other.varargs,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ty(&self) -> Option<&TypeValue> {
        self.ty.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_varargs(&self) -> bool {
        self.varargs
    }
}

// =============================================================================
// SignatureReturn
// =============================================================================

type InferReturn = dyn Fn() -> Option<TypeValue> + Send + Sync;

/// Declared or body-inferred return type of a signature.
///
/// Equality and hashing never run inference. Declared returns compare by type;
/// inferred returns compare by the identity of their inference function, so two
/// closures whose bodies infer the same type are still unequal, memoized or
/// not.
#[derive(Clone)]
pub enum SignatureReturn {
    Known(Option<TypeValue>),
    /// Computed on first use.
    Inferred(Arc<InferReturn>),
}

impl SignatureReturn {
    pub fn inferred(infer: impl Fn() -> Option<TypeValue> + Send + Sync + 'static) -> Self {
        Self::Inferred(Arc::new(infer))
    }
}

impl fmt::Debug for SignatureReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(ty) => f.debug_tuple("Known").field(ty).finish(),
            Self::Inferred(infer) => write!(f, "Inferred({:p})", Arc::as_ptr(infer)),
        }
    }
}

impl PartialEq for SignatureReturn {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a == b,
            (Self::Inferred(a), Self::Inferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for SignatureReturn {}

impl Hash for SignatureReturn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Known(ty) => ty.hash(state),
            Self::Inferred(infer) => Arc::as_ptr(infer).cast::<()>().hash(state),
        }
    }
}

// =============================================================================
// Signature
// =============================================================================

/// How well a signature accepts an argument list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Applicability {
    Applicable,
    /// Applicable if the untyped arguments have suitable types.
    CanBeApplicable,
    Inapplicable,
}

#[derive(Clone, Debug)]
pub struct Signature {
    name: Option<Arc<str>>,
    parameters: Vec<Parameter>,
    ret: SignatureReturn,
    inferred_return: LazyCell<Option<TypeValue>>,
}

impl Signature {
    pub fn new(parameters: Vec<Parameter>, ret: SignatureReturn) -> Self {
        Self {
            name: None,
            parameters,
            ret,
            inferred_return: LazyCell::new(),
        }
    }

    /// Signature with a declared return type.
    pub fn returning(parameters: Vec<Parameter>, return_type: Option<TypeValue>) -> Self {
        Self::new(parameters, SignatureReturn::Known(return_type))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    pub(crate) fn with_name_opt(mut self, name: Option<&str>) -> Self {
        self.name = name.map(Arc::from);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn declared_return(&self) -> &SignatureReturn {
        &self.ret
    }

    pub fn is_varargs(&self) -> bool {
        self.parameters.last().is_some_and(Parameter::is_varargs)
    }

    /// Return type, inferring and memoizing it on first use.
    ///
    /// Inference that re-enters itself yields `None`.
    pub fn return_type(&self) -> Option<TypeValue> {
        match &self.ret {
            SignatureReturn::Known(ty) => ty.clone(),
            SignatureReturn::Inferred(infer) => self.inferred_return.get_or_compute(
                GuardKey::of(self, GuardKind::SignatureReturn),
                || None,
                || infer(),
            ),
        }
    }

    pub fn is_valid(&self) -> bool {
        let params_valid = self
            .parameters
            .iter()
            .filter_map(Parameter::ty)
            .all(TypeValue::is_valid);
        let ret_valid = match &self.ret {
            SignatureReturn::Known(ty) => ty.as_ref().is_none_or(TypeValue::is_valid),
            SignatureReturn::Inferred(_) => self
                .inferred_return
                .get()
                .and_then(Option::as_ref)
                .is_none_or(TypeValue::is_valid),
        };
        params_valid && ret_valid
    }

    /// Check `args` against the parameters.
    ///
    /// Optional parameters are filled left to right with the arguments left
    /// over after every required parameter got one; the rest go to a trailing
    /// varargs parameter. An untyped argument (`None`) makes the result at
    /// best [`Applicability::CanBeApplicable`].
    pub fn applicability(
        &self,
        args: &[Option<TypeValue>],
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Applicability {
        let varargs = self.is_varargs();
        let fixed = if varargs {
            &self.parameters[..self.parameters.len() - 1]
        } else {
            &self.parameters[..]
        };
        let required = fixed.iter().filter(|param| !param.is_optional()).count();
        let optional = fixed.len() - required;

        if args.len() < required || (!varargs && args.len() > fixed.len()) {
            return Applicability::Inapplicable;
        }
        let mut optional_budget = (args.len() - required).min(optional);

        let mut targets: Vec<Option<&TypeValue>> = Vec::with_capacity(args.len());
        for param in fixed {
            if param.is_optional() {
                if optional_budget == 0 {
                    continue;
                }
                optional_budget -= 1;
            }
            targets.push(param.ty());
        }
        if let Some(vararg) = self.parameters.last().filter(|_| varargs) {
            while targets.len() < args.len() {
                targets.push(vararg.ty());
            }
        }

        let hierarchy = Hierarchy::new(resolver, *scope);
        let mut result = Applicability::Applicable;
        for (target, arg) in targets.iter().zip(args) {
            let (Some(target), Some(arg)) = (target, arg) else {
                if arg.is_none() {
                    result = Applicability::CanBeApplicable;
                }
                continue;
            };
            if !hierarchy.is_assignable(target, arg) {
                trace!(signature = ?self.name, "Argument not assignable to parameter");
                return Applicability::Inapplicable;
            }
        }
        result
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parameters == other.parameters && self.ret == other.ret
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.parameters.hash(state);
        self.ret.hash(state);
    }
}

// =============================================================================
// ClosureType
// =============================================================================

#[derive(Debug)]
pub struct ClosureType {
    signatures: Vec<Signature>,
    pub(crate) params: LazyCell<Vec<Option<TypeValue>>>,
}

impl ClosureType {
    /// Closure over `signatures`; the list must not be empty.
    pub fn new(signatures: Vec<Signature>) -> SolverResult<Self> {
        if signatures.is_empty() {
            return Err(SolverError::EmptySignatures);
        }
        Ok(Self::from_nonempty(signatures))
    }

    pub fn single(signature: Signature) -> Self {
        Self::from_nonempty(vec![signature])
    }

    pub(crate) fn from_nonempty(signatures: Vec<Signature>) -> Self {
        debug_assert!(!signatures.is_empty());
        Self {
            signatures,
            params: LazyCell::new(),
        }
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// The only signature, if there is exactly one.
    pub fn single_signature(&self) -> Option<&Signature> {
        match self.signatures.as_slice() {
            [signature] => Some(signature),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.signatures.iter().all(Signature::is_valid)
    }

    /// Whether any signature accepts `args`.
    pub fn is_applicable(
        &self,
        args: &[Option<TypeValue>],
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> bool {
        self.signatures.iter().any(|signature| {
            signature.applicability(args, resolver, scope) != Applicability::Inapplicable
        })
    }

    /// Return type of a call with `args`.
    ///
    /// A single signature answers directly. Otherwise the return types of the
    /// applicable signatures (or, failing any, of those that can be
    /// applicable) are joined; `None` when no signature fits.
    pub fn return_type_for(
        &self,
        args: &[Option<TypeValue>],
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Option<TypeValue> {
        if let Some(signature) = self.single_signature() {
            return signature.return_type();
        }
        let rated: Vec<(Applicability, &Signature)> = self
            .signatures
            .iter()
            .map(|signature| (signature.applicability(args, resolver, scope), signature))
            .collect();
        let pick = |wanted: Applicability| -> Vec<&Signature> {
            rated
                .iter()
                .filter(|(applicability, _)| *applicability == wanted)
                .map(|(_, signature)| *signature)
                .collect()
        };
        let mut chosen = pick(Applicability::Applicable);
        if chosen.is_empty() {
            chosen = pick(Applicability::CanBeApplicable);
        }
        if chosen.is_empty() {
            return None;
        }
        let returns: Vec<Option<TypeValue>> =
            chosen.iter().map(|signature| signature.return_type()).collect();
        if returns.iter().all(Option::is_none) {
            return None;
        }
        Some(LubCalculator::new(resolver, *scope).lub_all(returns.iter().map(Option::as_ref)))
    }
}

#[cfg(test)]
#[path = "../tests/closure_tests.rs"]
mod tests;
