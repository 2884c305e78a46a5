//! Lazily inferred type parameters of structural types.
//!
//! Every structural type stands for a generic host class and infers that
//! class's type arguments from its contents:
//!
//! | type        | host class                | parameters                     |
//! |-------------|---------------------------|--------------------------------|
//! | closure     | `groovy.lang.Closure<V>`  | `[lub(signature returns)]`     |
//! | tuple       | `java.util.List<E>`       | `[lub(components)]`            |
//! | map literal | `java.util.LinkedHashMap` | `[lub(keys), lub(values)]`     |
//! | range       | `groovy.lang.Range<T>`    | `[iteration type]`             |
//!
//! Results are memoized in the type's own cell. Inference is keyed by the
//! type instance on the in-flight stack: asking a type for its parameters
//! while they are being inferred yields an empty list, and the outer result is
//! then not memoized.

use crate::closure::{ClosureType, Signature};
use crate::decl::SearchScope;
use crate::hierarchy::ClassResolver;
use crate::lub::LubCalculator;
use crate::recursion::{GuardKey, GuardKind};
use crate::types::{MapType, RangeType, TupleType, TypeValue};
use grz_common::names;
use tracing::trace;

impl TypeValue {
    /// Type arguments of this type's host class.
    ///
    /// `None` entries are unknown arguments. Unresolvable host classes and
    /// recursive inference give an empty list.
    pub fn parameters(
        &self,
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Vec<Option<TypeValue>> {
        match self {
            Self::Primitive(_) | Self::TypeParam(_) => Vec::new(),
            Self::Class(class_ref) => class_ref.type_args().iter().cloned().map(Some).collect(),
            Self::Closure(closure) => closure.parameters(resolver, scope),
            Self::Tuple(tuple) => tuple.parameters(resolver, scope),
            Self::Map(map) => map.parameters(resolver, scope),
            Self::Range(range) => range.parameters(resolver, scope),
            Self::Intersection(intersection) => intersection.primary().parameters(resolver, scope),
            Self::Anonymous(anonymous) => anonymous
                .base()
                .type_args()
                .iter()
                .cloned()
                .map(Some)
                .collect(),
        }
    }
}

impl ClosureType {
    /// `[V]` of `groovy.lang.Closure<V>`: the boxed join of all signature
    /// return types, `[None]` when no return type is known.
    pub fn parameters(
        &self,
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Vec<Option<TypeValue>> {
        self.params.get_or_compute(
            GuardKey::of(self, GuardKind::TypeParameters),
            Vec::new,
            || {
                let Some(decl) = resolver.find_class(names::GROOVY_LANG_CLOSURE, scope) else {
                    trace!("groovy.lang.Closure not found, closure parameters are empty");
                    return Vec::new();
                };
                if decl.type_params().len() != 1 {
                    return Vec::new();
                }
                let returns: Vec<TypeValue> = self
                    .signatures()
                    .iter()
                    .filter_map(Signature::return_type)
                    .collect();
                if returns.is_empty() {
                    return vec![None];
                }
                let lub = LubCalculator::new(resolver, *scope).lub_all(returns.iter().map(Some));
                vec![Some(lub)]
            },
        )
    }

    /// The inferred `V` of `Closure<V>`.
    pub fn return_type(&self, resolver: &dyn ClassResolver, scope: &SearchScope) -> Option<TypeValue> {
        self.parameters(resolver, scope).into_iter().next().flatten()
    }
}

impl TupleType {
    /// `[E]` of `List<E>`; `[None]` for the empty tuple.
    pub fn parameters(
        &self,
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Vec<Option<TypeValue>> {
        self.params.get_or_compute(
            GuardKey::of(self, GuardKind::TypeParameters),
            Vec::new,
            || {
                if self.is_empty() {
                    return vec![None];
                }
                let lub = LubCalculator::new(resolver, *scope)
                    .lub_all(self.components().iter().map(Option::as_ref));
                vec![Some(lub)]
            },
        )
    }
}

impl MapType {
    /// `[K, V]` of `LinkedHashMap<K, V>`; `[None, None]` for the empty map.
    ///
    /// String keys contribute `java.lang.String` to the key type.
    pub fn parameters(
        &self,
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Vec<Option<TypeValue>> {
        self.params.get_or_compute(
            GuardKey::of(self, GuardKind::TypeParameters),
            Vec::new,
            || {
                if self.is_empty() {
                    return vec![None, None];
                }
                let lub = LubCalculator::new(resolver, *scope);
                let string = TypeValue::string();
                let string_key = (!self.string_entries().is_empty()).then_some(&string);
                let key = lub.lub_all(
                    string_key
                        .into_iter()
                        .map(Some)
                        .chain(self.other_entries().iter().map(|(key, _)| key.as_ref())),
                );
                let value = lub.lub_all(
                    self.string_entries()
                        .values()
                        .map(Option::as_ref)
                        .chain(self.other_entries().iter().map(|(_, value)| value.as_ref())),
                );
                vec![Some(key), Some(value)]
            },
        )
    }
}

impl RangeType {
    /// Element type of the range: the boxed join of both endpoints.
    pub fn iteration_type(&self, resolver: &dyn ClassResolver, scope: &SearchScope) -> TypeValue {
        LubCalculator::new(resolver, *scope)
            .lub(self.left(), self.right())
            .boxed()
    }

    /// `[T]` of `Range<T>`.
    pub fn parameters(
        &self,
        resolver: &dyn ClassResolver,
        scope: &SearchScope,
    ) -> Vec<Option<TypeValue>> {
        self.params.get_or_compute(
            GuardKey::of(self, GuardKind::TypeParameters),
            Vec::new,
            || vec![Some(self.iteration_type(resolver, scope))],
        )
    }
}

#[cfg(test)]
#[path = "../tests/parameters_tests.rs"]
mod tests;
