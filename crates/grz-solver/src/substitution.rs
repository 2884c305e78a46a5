//! Type-parameter substitution.
//!
//! A `Substitution` maps declared type parameters to type values. A parameter
//! bound to `None` is *erased*: substituting it yields no type, and a class
//! reference with an erased argument degrades to its raw form.

use crate::closure::{ClosureType, Parameter, Signature, SignatureReturn};
use crate::decl::{ClassDecl, SearchScope};
use crate::hierarchy::ClassResolver;
use crate::intersection::create_intersection;
use crate::types::{
    AnonymousClassRef, ClassRef, MapType, RangeType, TupleType, TypeParamRef, TypeValue,
};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<TypeParamRef, Option<TypeValue>>,
}

impl Substitution {
    /// The identity substitution.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Substitution binding `decl`'s type parameters to `type_args`.
    ///
    /// A raw reference (no arguments, or a mismatched count) erases every
    /// parameter.
    pub fn for_class(decl: &ClassDecl, type_args: &[TypeValue]) -> Self {
        let mut substitution = Self::empty();
        let raw = type_args.len() != decl.type_params().len();
        for (index, param) in decl.type_params().iter().enumerate() {
            let bound = if raw { None } else { type_args.get(index).cloned() };
            substitution.put(param.clone(), bound);
        }
        substitution
    }

    /// Substitution of a class reference; unresolvable references give the
    /// identity substitution.
    pub fn for_class_ref(
        class_ref: &ClassRef,
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Self {
        match class_ref.resolve(resolver, scope) {
            Some(decl) => Self::for_class(&decl, class_ref.type_args()),
            None => Self::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn put(&mut self, param: TypeParamRef, ty: Option<TypeValue>) {
        self.map.insert(param, ty);
    }

    pub fn with(mut self, param: TypeParamRef, ty: Option<TypeValue>) -> Self {
        self.put(param, ty);
        self
    }

    pub fn put_all(&mut self, other: &Substitution) {
        for (param, ty) in &other.map {
            self.map.insert(param.clone(), ty.clone());
        }
    }

    /// `Some(None)` for an erased parameter, `None` for an unbound one.
    pub fn get(&self, param: &TypeParamRef) -> Option<Option<&TypeValue>> {
        self.map.get(param).map(Option::as_ref)
    }

    pub fn contains(&self, param: &TypeParamRef) -> bool {
        self.map.contains_key(param)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeParamRef, Option<&TypeValue>)> {
        self.map.iter().map(|(param, ty)| (param, ty.as_ref()))
    }

    /// Apply `self`, then `next`: values of `self` are substituted by `next`,
    /// and bindings only `next` knows are added.
    pub fn compose(&self, next: &Substitution) -> Substitution {
        let mut out = Substitution::empty();
        for (param, ty) in &self.map {
            out.put(param.clone(), next.substitute_opt(ty.as_ref()));
        }
        for (param, ty) in &next.map {
            if !out.contains(param) {
                out.put(param.clone(), ty.clone());
            }
        }
        out
    }

    pub fn substitute_opt(&self, ty: Option<&TypeValue>) -> Option<TypeValue> {
        ty.and_then(|ty| self.substitute(ty))
    }

    /// Substitute every bound type parameter occurring in `ty`.
    ///
    /// Returns `None` only when `ty` itself is an erased parameter.
    pub fn substitute(&self, ty: &TypeValue) -> Option<TypeValue> {
        if self.is_empty() {
            return Some(ty.clone());
        }
        match ty {
            TypeValue::Primitive(_) => Some(ty.clone()),
            TypeValue::TypeParam(param) => match self.map.get(param) {
                Some(bound) => bound.clone(),
                None => Some(ty.clone()),
            },
            TypeValue::Class(class_ref) => Some(TypeValue::Class(self.substitute_class(class_ref))),
            TypeValue::Closure(closure) => Some(TypeValue::Closure(Arc::new(
                self.substitute_closure(closure),
            ))),
            TypeValue::Tuple(tuple) => Some(TypeValue::Tuple(TupleType::new(
                tuple
                    .components()
                    .iter()
                    .map(|component| self.substitute_opt(component.as_ref()))
                    .collect(),
            ))),
            TypeValue::Map(map) => {
                let string_entries: IndexMap<_, _> = map
                    .string_entries()
                    .iter()
                    .map(|(key, value)| (Arc::clone(key), self.substitute_opt(value.as_ref())))
                    .collect();
                let other_entries = map
                    .other_entries()
                    .iter()
                    .map(|(key, value)| {
                        (
                            self.substitute_opt(key.as_ref()),
                            self.substitute_opt(value.as_ref()),
                        )
                    })
                    .collect();
                Some(TypeValue::Map(MapType::from_entries(string_entries, other_entries)))
            }
            TypeValue::Range(range) => Some(TypeValue::Range(RangeType::new(
                self.substitute_opt(range.left()),
                self.substitute_opt(range.right()),
            ))),
            TypeValue::Intersection(intersection) => {
                let conjuncts: Vec<TypeValue> = intersection
                    .conjuncts()
                    .filter_map(|conjunct| self.substitute(conjunct))
                    .collect();
                create_intersection(conjuncts)
            }
            TypeValue::Anonymous(anonymous) => Some(TypeValue::Anonymous(AnonymousClassRef::new(
                self.substitute_class(anonymous.base()),
                Arc::clone(anonymous.body()),
            ))),
        }
    }

    /// Substituted class reference; an erased argument makes it raw.
    pub fn substitute_class(&self, class_ref: &ClassRef) -> ClassRef {
        if class_ref.is_raw() {
            return class_ref.clone();
        }
        let args: Option<Vec<TypeValue>> = class_ref
            .type_args()
            .iter()
            .map(|arg| self.substitute(arg))
            .collect();
        match args {
            Some(args) => class_ref.with_type_args(args),
            None => class_ref.erased(),
        }
    }

    fn substitute_closure(&self, closure: &ClosureType) -> ClosureType {
        let signatures = closure
            .signatures()
            .iter()
            .map(|signature| self.substitute_signature(signature))
            .collect();
        ClosureType::from_nonempty(signatures)
    }

    fn substitute_signature(&self, signature: &Signature) -> Signature {
        let parameters: Vec<Parameter> = signature
            .parameters()
            .iter()
            .map(|param| param.with_type(self.substitute_opt(param.ty())))
            .collect();
        let ret = match signature.declared_return() {
            SignatureReturn::Known(ty) => SignatureReturn::Known(self.substitute_opt(ty.as_ref())),
            SignatureReturn::Inferred(_) => {
                let substitution = self.clone();
                let original = signature.clone();
                SignatureReturn::inferred(move || {
                    substitution.substitute_opt(original.return_type().as_ref())
                })
            }
        };
        Signature::new(parameters, ret).with_name_opt(signature.name())
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
