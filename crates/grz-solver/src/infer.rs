//! Inference of method type parameters from argument types.
//!
//! [`ArgumentInference`] matches each parameter type of the resolved method
//! against the corresponding argument type and records a binding whenever a
//! method type parameter is reached. Several bindings of one parameter are
//! joined with LUB; parameters without a binding are erased.

use crate::closure::Parameter;
use crate::decl::SearchScope;
use crate::hierarchy::{ClassResolver, Hierarchy};
use crate::lub::LubCalculator;
use crate::resolve::MethodResolveResult;
use crate::substitution::Substitution;
use crate::types::{TypeParamRef, TypeValue};
use grz_common::names;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::trace;

/// Computes the full substitution of a method candidate.
pub trait SubstitutorInference: Send + Sync {
    fn infer(&self, result: &MethodResolveResult) -> Substitution;
}

pub struct ArgumentInference {
    resolver: Arc<dyn ClassResolver>,
    scope: SearchScope,
}

impl ArgumentInference {
    pub fn new(resolver: Arc<dyn ClassResolver>, scope: SearchScope) -> Self {
        Self { resolver, scope }
    }

    /// Bindings of `targets` obtained by matching `parameters` against `args`.
    pub fn infer_bindings(
        &self,
        targets: &[TypeParamRef],
        parameters: &[Parameter],
        args: &[Option<TypeValue>],
        partial: &Substitution,
    ) -> Substitution {
        let mut unifier = Unifier {
            hierarchy: Hierarchy::new(&*self.resolver, self.scope),
            targets,
            bindings: IndexMap::new(),
        };

        for (index, arg) in args.iter().enumerate() {
            let Some(arg) = arg else {
                continue;
            };
            let param = match parameters.get(index) {
                Some(param) => param,
                None => match parameters.last().filter(|param| param.is_varargs()) {
                    Some(vararg) => vararg,
                    None => break,
                },
            };
            let Some(param_ty) = partial.substitute_opt(param.ty()) else {
                continue;
            };
            unifier.unify(&param_ty, arg);
        }

        let lub = LubCalculator::new(&*self.resolver, self.scope);
        let mut substitution = Substitution::empty();
        for target in targets {
            let bound = unifier.bindings.get(target).map(|candidates| {
                lub.lub_all(candidates.iter().map(Some))
            });
            trace!(param = target.name(), bound = ?bound, "Inferred type parameter");
            substitution.put(target.clone(), bound);
        }
        substitution
    }
}

impl SubstitutorInference for ArgumentInference {
    fn infer(&self, result: &MethodResolveResult) -> Substitution {
        let (Some(method), Some(args)) = (result.element(), result.argument_types()) else {
            return Substitution::empty();
        };
        self.infer_bindings(
            method.type_params(),
            method.parameters(),
            args,
            result.partial_substitution(),
        )
    }
}

struct Unifier<'h, 't> {
    hierarchy: Hierarchy<'h>,
    targets: &'t [TypeParamRef],
    bindings: IndexMap<TypeParamRef, Vec<TypeValue>>,
}

impl Unifier<'_, '_> {
    fn bind(&mut self, param: &TypeParamRef, ty: &TypeValue) {
        let candidates = self.bindings.entry(param.clone()).or_default();
        let ty = ty.boxed();
        if !candidates.contains(&ty) {
            candidates.push(ty);
        }
    }

    fn unify(&mut self, param: &TypeValue, arg: &TypeValue) {
        match param {
            TypeValue::TypeParam(target) if self.targets.contains(target) => self.bind(target, arg),
            TypeValue::Class(class_ref) if !class_ref.is_raw() => {
                let Some(view) = self
                    .hierarchy
                    .instantiate_as_supertype(arg, class_ref.qualified_name())
                else {
                    return;
                };
                for (param_arg, arg_arg) in class_ref.type_args().iter().zip(view.type_args()) {
                    self.unify(param_arg, arg_arg);
                }
            }
            TypeValue::Closure(param_closure) => {
                let Some(param_sig) = param_closure.single_signature() else {
                    return;
                };
                let (resolver, scope) = (self.hierarchy.resolver(), *self.hierarchy.scope());
                if let (Some(param_ret), Some(arg_ret)) =
                    (param_sig.return_type(), closure_return(arg, resolver, &scope))
                {
                    self.unify(&param_ret, &arg_ret);
                }
            }
            TypeValue::Tuple(param_tuple) => {
                if let TypeValue::Tuple(arg_tuple) = arg {
                    for (p, a) in param_tuple.components().iter().zip(arg_tuple.components()) {
                        if let (Some(p), Some(a)) = (p, a) {
                            self.unify(p, a);
                        }
                    }
                }
            }
            TypeValue::Intersection(intersection) => {
                for conjunct in intersection.conjuncts() {
                    self.unify(conjunct, arg);
                }
            }
            _ => {}
        }
    }
}

/// Return type of a closure-like argument.
fn closure_return(
    arg: &TypeValue,
    resolver: &dyn ClassResolver,
    scope: &SearchScope,
) -> Option<TypeValue> {
    match arg {
        TypeValue::Closure(closure) => closure.return_type(resolver, scope),
        TypeValue::Class(class_ref)
            if class_ref.qualified_name() == names::GROOVY_LANG_CLOSURE =>
        {
            class_ref.type_args().first().cloned()
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/infer_tests.rs"]
mod tests;
