//! Least upper bound of type values.
//!
//! `lub(a, b)` is commutative. `None` is the identity (`lub(None, x)` is `x`
//! boxed) except that `lub(None, None)` is `java.lang.Object`. Primitive types
//! are boxed before comparison.
//!
//! Rules, in order:
//! 1. equal types join to themselves, anything joined with `Object` is `Object`;
//! 2. structural types of the same shape join component-wise (tuples of equal
//!    length, map literals, single-signature closures of equal arity, ranges);
//! 3. `GString` and `String` join to `String`;
//! 4. numeric types join along the Groovy widening ranking;
//! 5. otherwise the minimal common supertypes are collected from both
//!    supertype closures, their type arguments merged recursively (bounded by
//!    [`RecursionProfile::LubArguments`]); one result is returned as a class,
//!    several as an intersection ordered classes first, then by name.

use crate::closure::{ClosureType, Parameter, Signature};
use crate::config::SolverConfig;
use crate::decl::SearchScope;
use crate::format::TypeFormatter;
use crate::hierarchy::{ClassResolver, Hierarchy};
use crate::intersection::create_intersection;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{ClassRef, MapType, RangeType, TupleType, TypeValue};
use grz_common::names;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::trace;

/// Groovy numeric widening rank of a boxed numeric type.
///
/// `Float` ranks with `Double`.
pub fn numeric_rank(ty: &TypeValue) -> Option<u8> {
    let class_ref = ty.as_class()?;
    let rank = match class_ref.qualified_name() {
        names::JAVA_LANG_BYTE => 1,
        names::JAVA_LANG_SHORT => 2,
        names::JAVA_LANG_INTEGER => 3,
        names::JAVA_LANG_LONG => 4,
        names::JAVA_MATH_BIG_INTEGER => 5,
        names::JAVA_MATH_BIG_DECIMAL => 6,
        names::JAVA_LANG_FLOAT | names::JAVA_LANG_DOUBLE => 7,
        _ => return None,
    };
    Some(rank)
}

fn numeric_class(rank: u8) -> &'static str {
    match rank {
        1 => names::JAVA_LANG_BYTE,
        2 => names::JAVA_LANG_SHORT,
        3 => names::JAVA_LANG_INTEGER,
        4 => names::JAVA_LANG_LONG,
        5 => names::JAVA_MATH_BIG_INTEGER,
        6 => names::JAVA_MATH_BIG_DECIMAL,
        _ => names::JAVA_LANG_DOUBLE,
    }
}

pub struct LubCalculator<'a> {
    hierarchy: Hierarchy<'a>,
    max_argument_depth: u32,
}

impl<'a> LubCalculator<'a> {
    pub fn new(resolver: &'a dyn ClassResolver, scope: SearchScope) -> Self {
        Self {
            hierarchy: Hierarchy::new(resolver, scope),
            max_argument_depth: RecursionProfile::LubArguments.max_depth(),
        }
    }

    pub fn with_config(mut self, config: &SolverConfig) -> Self {
        self.max_argument_depth = config.max_lub_argument_depth;
        self
    }

    /// Least upper bound of two optional types.
    pub fn lub(&self, a: Option<&TypeValue>, b: Option<&TypeValue>) -> TypeValue {
        match (a, b) {
            (None, None) => TypeValue::object(),
            (Some(ty), None) | (None, Some(ty)) => ty.boxed(),
            (Some(a), Some(b)) => {
                let mut depth = DepthCounter::new(self.max_argument_depth);
                self.lub_boxed(&a.boxed(), &b.boxed(), &mut depth)
            }
        }
    }

    /// Left fold of [`lub`](Self::lub) starting from `None`.
    pub fn lub_all<'t>(&self, types: impl IntoIterator<Item = Option<&'t TypeValue>>) -> TypeValue {
        let mut acc: Option<TypeValue> = None;
        for ty in types {
            acc = Some(self.lub(acc.as_ref(), ty));
        }
        acc.unwrap_or_else(TypeValue::object)
    }

    /// Join of two optional components that stays untyped when both are.
    fn lub_component(
        &self,
        a: Option<&TypeValue>,
        b: Option<&TypeValue>,
        depth: &mut DepthCounter,
    ) -> Option<TypeValue> {
        match (a, b) {
            (None, None) => None,
            (Some(ty), None) | (None, Some(ty)) => Some(ty.boxed()),
            (Some(a), Some(b)) => Some(self.lub_boxed(&a.boxed(), &b.boxed(), depth)),
        }
    }

    fn lub_boxed(&self, a: &TypeValue, b: &TypeValue, depth: &mut DepthCounter) -> TypeValue {
        if a == b {
            return a.clone();
        }
        if a.is_object() || b.is_object() {
            return TypeValue::object();
        }

        match (a, b) {
            (TypeValue::Tuple(left), TypeValue::Tuple(right)) if left.len() == right.len() => {
                let components = left
                    .components()
                    .iter()
                    .zip(right.components())
                    .map(|(l, r)| self.lub_component(l.as_ref(), r.as_ref(), depth))
                    .collect();
                return TypeValue::Tuple(TupleType::new(components));
            }
            (TypeValue::Map(left), TypeValue::Map(right)) => {
                return TypeValue::Map(self.lub_maps(left, right, depth));
            }
            (TypeValue::Closure(left), TypeValue::Closure(right)) => {
                if let Some(joined) = self.lub_closures(left, right, depth) {
                    return TypeValue::Closure(Arc::new(joined));
                }
            }
            (TypeValue::Range(left), TypeValue::Range(right)) => {
                return TypeValue::Range(RangeType::new(
                    self.lub_component(left.left(), right.left(), depth),
                    self.lub_component(left.right(), right.right(), depth),
                ));
            }
            _ => {}
        }

        let (a_name, b_name) = (a.host_class_name(), b.host_class_name());
        if matches!(
            (a_name, b_name),
            (Some(names::GROOVY_LANG_GSTRING), Some(names::JAVA_LANG_STRING))
                | (Some(names::JAVA_LANG_STRING), Some(names::GROOVY_LANG_GSTRING))
        ) && a.as_class().is_some()
            && b.as_class().is_some()
        {
            return TypeValue::string();
        }

        if let (Some(a_rank), Some(b_rank)) = (numeric_rank(a), numeric_rank(b)) {
            return TypeValue::raw(numeric_class(a_rank.max(b_rank)));
        }

        self.nominal_lub(a, b, depth)
    }

    /// String entries join key-wise (keys sorted), other entries are unioned
    /// and ordered by their canonical text.
    fn lub_maps(&self, left: &MapType, right: &MapType, depth: &mut DepthCounter) -> MapType {
        let mut keys: Vec<&Arc<str>> = left
            .string_entries()
            .keys()
            .chain(right.string_entries().keys())
            .collect();
        keys.sort();
        keys.dedup();

        let mut string_entries: IndexMap<Arc<str>, Option<TypeValue>> = IndexMap::new();
        for key in keys {
            let ty = match (left.string_entries().get(key), right.string_entries().get(key)) {
                (Some(l), Some(r)) => self.lub_component(l.as_ref(), r.as_ref(), depth),
                (Some(ty), None) | (None, Some(ty)) => ty.clone(),
                (None, None) => None,
            };
            string_entries.insert(Arc::clone(key), ty);
        }

        let formatter = TypeFormatter::new(self.hierarchy.resolver(), *self.hierarchy.scope());
        let text = |ty: &Option<TypeValue>| formatter.opt_canonical_text(ty.as_ref());
        let mut other_entries: Vec<(Option<TypeValue>, Option<TypeValue>)> = Vec::new();
        for entry in left.other_entries().iter().chain(right.other_entries()) {
            if !other_entries.contains(entry) {
                other_entries.push(entry.clone());
            }
        }
        other_entries.sort_by_cached_key(|(key, value)| (text(key), text(value)));

        MapType::from_entries(string_entries, other_entries)
    }

    /// Single signatures of equal arity: equal parameter types are kept,
    /// differing ones become untyped; same-named parameters merge their flags
    /// through [`Parameter::joined`]; return types are joined.
    fn lub_closures(
        &self,
        left: &ClosureType,
        right: &ClosureType,
        depth: &mut DepthCounter,
    ) -> Option<ClosureType> {
        let (l, r) = (left.single_signature()?, right.single_signature()?);
        if l.parameters().len() != r.parameters().len() {
            return None;
        }
        let parameters: Vec<Parameter> = l
            .parameters()
            .iter()
            .zip(r.parameters())
            .map(|(lp, rp)| {
                let ty = if lp.ty() == rp.ty() { lp.ty().cloned() } else { None };
                if lp.name() == rp.name() {
                    lp.joined(rp, ty)
                } else {
                    Parameter::unnamed(ty)
                }
            })
            .collect();
        let ret = self.lub_component(l.return_type().as_ref(), r.return_type().as_ref(), depth);
        Some(ClosureType::single(Signature::returning(parameters, ret)))
    }

    fn nominal_lub(&self, a: &TypeValue, b: &TypeValue, depth: &mut DepthCounter) -> TypeValue {
        let closure_of = |ty: &TypeValue| -> Vec<ClassRef> {
            let mut out: Vec<ClassRef> = Vec::new();
            for view in self.hierarchy.nominal_view(ty) {
                for class_ref in self.hierarchy.supertype_closure(&view) {
                    if !out.iter().any(|seen| seen.same_class(&class_ref)) {
                        out.push(class_ref);
                    }
                }
            }
            out
        };
        let (a_supers, b_supers) = (closure_of(a), closure_of(b));

        let common: Vec<(ClassRef, ClassRef)> = a_supers
            .iter()
            .filter(|class_ref| !class_ref.is_object())
            .filter_map(|class_ref| {
                b_supers
                    .iter()
                    .find(|other| other.same_class(class_ref))
                    .map(|other| (class_ref.clone(), other.clone()))
            })
            .collect();

        let minimal: Vec<&(ClassRef, ClassRef)> = common
            .iter()
            .filter(|(candidate, _)| {
                !common.iter().any(|(other, _)| {
                    !other.same_class(candidate)
                        && self.hierarchy.is_subclass(&other.erased(), candidate.qualified_name())
                })
            })
            .collect();

        if minimal.is_empty() {
            trace!("No common supertype besides Object");
            return TypeValue::object();
        }

        let mut joined: Vec<(bool, ClassRef)> = minimal
            .into_iter()
            .map(|(left, right)| {
                let interface_like = left
                    .resolve(self.hierarchy.resolver(), self.hierarchy.scope())
                    .is_some_and(|decl| decl.kind().is_interface_like());
                (interface_like, self.merge_arguments(left, right, depth))
            })
            .collect();
        joined.sort_by(|(a_iface, a_ref), (b_iface, b_ref)| {
            a_iface
                .cmp(b_iface)
                .then_with(|| a_ref.qualified_name().cmp(b_ref.qualified_name()))
        });

        let mut conjuncts: Vec<TypeValue> = joined
            .into_iter()
            .map(|(_, class_ref)| TypeValue::Class(class_ref))
            .collect();
        if conjuncts.len() == 1 {
            return conjuncts.remove(0);
        }
        create_intersection(conjuncts).unwrap_or_else(TypeValue::object)
    }

    /// Arguments of the same class reached from both sides.
    fn merge_arguments(&self, left: &ClassRef, right: &ClassRef, depth: &mut DepthCounter) -> ClassRef {
        if left.type_args() == right.type_args() {
            return left.clone();
        }
        if left.is_raw() || right.is_raw() || left.type_args().len() != right.type_args().len() {
            return left.erased();
        }
        if !depth.enter() {
            trace!(
                class = left.qualified_name(),
                "LUB argument depth exceeded, using raw type"
            );
            return left.erased();
        }
        let args = left
            .type_args()
            .iter()
            .zip(right.type_args())
            .map(|(l, r)| {
                if l == r {
                    l.clone()
                } else {
                    self.lub_boxed(&l.boxed(), &r.boxed(), depth)
                }
            })
            .collect();
        depth.leave();
        left.with_type_args(args)
    }
}

#[cfg(test)]
#[path = "../tests/lub_tests.rs"]
mod tests;
