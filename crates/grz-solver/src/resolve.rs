//! Resolve results.
//!
//! A [`ResolveResult`] couples the declaration a reference resolved to with
//! the substitution known at the use site and the validity flags computed by
//! the resolver. [`MethodResolveResult`] additionally infers the full
//! substitution (method type parameters from argument types) on first access:
//!
//! ```text
//! Unsubstituted --substitution()--> Substituted (memoized)
//! ```
//!
//! Re-entering `substitution()` during that inference yields the empty
//! substitution, and the result computed around it is not memoized.

use crate::decl::{Declaration, SearchScope};
use crate::hierarchy::ClassResolver;
use crate::infer::SubstitutorInference;
use crate::lazy::LazyCell;
use crate::recursion::{GuardKey, GuardKind};
use crate::substitution::Substitution;
use crate::types::TypeValue;
use grz_common::names;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use tracing::trace;

// =============================================================================
// SpreadState
// =============================================================================

/// Nesting of spread-dot (`*.`) access a result was obtained through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpreadState {
    levels: u32,
}

impl SpreadState {
    /// One level of spreading.
    pub const fn single() -> Self {
        Self { levels: 1 }
    }

    /// `outer` spread one level deeper (or a single level without `outer`).
    pub const fn nested(outer: Option<SpreadState>) -> Self {
        match outer {
            Some(outer) => Self {
                levels: outer.levels + 1,
            },
            None => Self::single(),
        }
    }

    pub const fn levels(self) -> u32 {
        self.levels
    }

    /// Wrap `ty` in `java.util.List<_>` once per level. An unknown type
    /// becomes a raw list.
    pub fn apply(self, ty: Option<TypeValue>) -> Option<TypeValue> {
        let mut ty = ty;
        for _ in 0..self.levels {
            ty = Some(match ty {
                Some(element) => TypeValue::class(names::JAVA_UTIL_LIST, vec![element.boxed()]),
                None => TypeValue::raw(names::JAVA_UTIL_LIST),
            });
        }
        ty
    }
}

// =============================================================================
// ResolveResult
// =============================================================================

#[derive(Clone, Debug)]
pub struct ResolveResult {
    element: Option<Arc<Declaration>>,
    substitution: Substitution,
    accessible: bool,
    statics_ok: bool,
    applicable: bool,
    invoked_on_property: bool,
    spread_state: Option<SpreadState>,
    resolve_context: Option<Arc<Declaration>>,
}

impl ResolveResult {
    /// A result for `element` with every flag set.
    pub fn new(element: Arc<Declaration>) -> Self {
        Self {
            element: Some(element),
            substitution: Substitution::empty(),
            accessible: true,
            statics_ok: true,
            applicable: true,
            invoked_on_property: false,
            spread_state: None,
            resolve_context: None,
        }
    }

    /// The "nothing found" sentinel.
    pub fn empty() -> Self {
        Self {
            element: None,
            substitution: Substitution::empty(),
            accessible: false,
            statics_ok: true,
            applicable: false,
            invoked_on_property: false,
            spread_state: None,
            resolve_context: None,
        }
    }

    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    pub fn with_accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    pub fn with_statics_ok(mut self, statics_ok: bool) -> Self {
        self.statics_ok = statics_ok;
        self
    }

    pub fn with_applicable(mut self, applicable: bool) -> Self {
        self.applicable = applicable;
        self
    }

    pub fn with_invoked_on_property(mut self, invoked_on_property: bool) -> Self {
        self.invoked_on_property = invoked_on_property;
        self
    }

    pub fn with_spread_state(mut self, spread_state: Option<SpreadState>) -> Self {
        self.spread_state = spread_state;
        self
    }

    pub fn with_resolve_context(mut self, context: Arc<Declaration>) -> Self {
        self.resolve_context = Some(context);
        self
    }

    pub fn element(&self) -> Option<&Arc<Declaration>> {
        self.element.as_ref()
    }

    /// Substitution known when the result was created.
    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    pub fn is_statics_ok(&self) -> bool {
        self.statics_ok
    }

    pub fn is_applicable(&self) -> bool {
        self.applicable
    }

    pub fn is_invoked_on_property(&self) -> bool {
        self.invoked_on_property
    }

    pub fn spread_state(&self) -> Option<SpreadState> {
        self.spread_state
    }

    pub fn resolve_context(&self) -> Option<&Arc<Declaration>> {
        self.resolve_context.as_ref()
    }

    /// Accessible, applicable and statics-correct.
    pub fn is_valid(&self) -> bool {
        self.accessible && self.applicable && self.statics_ok
    }

    /// Host validity: the element (and context) were not invalidated since
    /// resolution. Callers re-resolve when this turns false.
    pub fn is_element_valid(&self) -> bool {
        self.element.as_ref().is_none_or(|element| element.is_valid())
            && self
                .resolve_context
                .as_ref()
                .is_none_or(|context| context.is_valid())
    }
}

impl PartialEq for ResolveResult {
    fn eq(&self, other: &Self) -> bool {
        let same_element = match (&self.element, &other.element) {
            (Some(a), Some(b)) => a.is_equivalent_to(b),
            (None, None) => true,
            _ => false,
        };
        same_element && self.accessible == other.accessible
    }
}

impl Eq for ResolveResult {}

impl Hash for ResolveResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.element.as_ref().and_then(|element| element.name()) {
            Some(name) => name.hash(state),
            None => 0u32.hash(state),
        }
    }
}

// =============================================================================
// MethodResolveResult
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubstitutionState {
    /// Only the use-site substitution is known.
    Unsubstituted,
    /// The full substitution was inferred and memoized.
    Substituted,
}

/// Method candidate whose full substitution is inferred on demand.
#[derive(Clone)]
pub struct MethodResolveResult {
    base: ResolveResult,
    argument_types: Option<Vec<Option<TypeValue>>>,
    type_arguments: Vec<TypeValue>,
    inference: Option<Arc<dyn SubstitutorInference>>,
    full: LazyCell<Substitution>,
}

impl MethodResolveResult {
    pub fn new(base: ResolveResult) -> Self {
        Self {
            base,
            argument_types: None,
            type_arguments: Vec::new(),
            inference: None,
            full: LazyCell::new(),
        }
    }

    /// Argument types of the call; `None` when unknown.
    pub fn with_argument_types(mut self, argument_types: Option<Vec<Option<TypeValue>>>) -> Self {
        self.argument_types = argument_types;
        self
    }

    /// Explicit method type arguments (`foo.<String>bar()`).
    pub fn with_type_arguments(mut self, type_arguments: Vec<TypeValue>) -> Self {
        self.type_arguments = type_arguments;
        self
    }

    pub fn with_inference(mut self, inference: Arc<dyn SubstitutorInference>) -> Self {
        self.inference = Some(inference);
        self
    }

    pub fn argument_types(&self) -> Option<&[Option<TypeValue>]> {
        self.argument_types.as_deref()
    }

    pub fn type_arguments(&self) -> &[TypeValue] {
        &self.type_arguments
    }

    /// The use-site substitution, before inference.
    pub fn partial_substitution(&self) -> &Substitution {
        self.base.substitution()
    }

    pub fn state(&self) -> SubstitutionState {
        if self.full.is_computed() {
            SubstitutionState::Substituted
        } else {
            SubstitutionState::Unsubstituted
        }
    }

    /// The full substitution: explicit type arguments, or inferred bindings of
    /// the method's type parameters, on top of the use-site substitution.
    pub fn substitution(&self) -> Substitution {
        self.full.get_or_compute(
            GuardKey::of(self, GuardKind::Substitutor),
            Substitution::empty,
            || self.compute_substitution(),
        )
    }

    fn compute_substitution(&self) -> Substitution {
        let mut substitution = self.partial_substitution().clone();
        let Some(method) = self.base.element() else {
            return substitution;
        };
        let type_params = method.type_params();
        if type_params.is_empty() {
            return substitution;
        }

        if !self.type_arguments.is_empty() {
            if self.type_arguments.len() == type_params.len() {
                for (param, arg) in type_params.iter().zip(&self.type_arguments) {
                    substitution.put(param.clone(), Some(arg.clone()));
                }
            } else {
                trace!(
                    method = ?method.name(),
                    "Explicit type argument count mismatch, erasing type parameters"
                );
                for param in type_params {
                    substitution.put(param.clone(), None);
                }
            }
            return substitution;
        }

        if let Some(inference) = &self.inference {
            substitution.put_all(&inference.infer(self));
        }
        substitution
    }
}

impl Deref for MethodResolveResult {
    type Target = ResolveResult;

    fn deref(&self) -> &ResolveResult {
        &self.base
    }
}

impl fmt::Debug for MethodResolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodResolveResult")
            .field("base", &self.base)
            .field("argument_types", &self.argument_types)
            .field("type_arguments", &self.type_arguments)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PartialEq for MethodResolveResult {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl Eq for MethodResolveResult {}

impl Hash for MethodResolveResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
    }
}

// =============================================================================
// Candidates
// =============================================================================

/// A resolve result a call's type can be read from.
pub trait ResolvedCandidate {
    fn result(&self) -> &ResolveResult;

    /// Substitution to apply to the element's declared types.
    fn candidate_substitution(&self) -> Substitution {
        self.result().substitution().clone()
    }
}

impl ResolvedCandidate for ResolveResult {
    fn result(&self) -> &ResolveResult {
        self
    }
}

impl ResolvedCandidate for MethodResolveResult {
    fn result(&self) -> &ResolveResult {
        &self.base
    }

    fn candidate_substitution(&self) -> Substitution {
        self.substitution()
    }
}

/// Type of calling `candidate` with `args`.
///
/// A method not reached through a property returns its substituted return
/// type. A field, property or variable holding a closure returns the
/// closure's return type for `args`; one typed `groovy.lang.Closure<R>`
/// returns `R`. The result is wrapped once per spread level.
pub fn extract_return_type(
    candidate: &dyn ResolvedCandidate,
    args: &[Option<TypeValue>],
    resolver: &dyn ClassResolver,
    scope: &SearchScope,
) -> Option<TypeValue> {
    let result = candidate.result();
    let element = result.element()?;
    let substitution = candidate.candidate_substitution();
    let declared = substitution.substitute_opt(element.ty());

    let return_type = if element.is_method_like() && !result.is_invoked_on_property() {
        declared
    } else {
        match declared {
            Some(TypeValue::Closure(closure)) => closure.return_type_for(args, resolver, scope),
            Some(TypeValue::Class(class_ref))
                if class_ref.qualified_name() == names::GROOVY_LANG_CLOSURE =>
            {
                class_ref.type_args().first().cloned()
            }
            _ => None,
        }
    };

    match result.spread_state() {
        Some(spread) => spread.apply(return_type),
        None => return_type,
    }
}

#[cfg(test)]
#[path = "../tests/resolve_tests.rs"]
mod tests;
