//! Trait (intersection) type construction.
//!
//! Conjunct lists are always flat: intersecting an intersection with further
//! types splices its conjuncts in. Duplicates are removed keeping the position
//! of the last occurrence, and a single remaining conjunct is returned as-is.

use crate::types::{IntersectionType, TypeValue};
use smallvec::SmallVec;

/// Flat, duplicate-free conjunct list of `types`.
pub fn flatten_intersection(types: &[TypeValue]) -> Vec<TypeValue> {
    let mut flat: SmallVec<[&TypeValue; 8]> = SmallVec::new();
    let mut stack: Vec<&TypeValue> = types.iter().rev().collect();
    while let Some(ty) = stack.pop() {
        match ty {
            TypeValue::Intersection(intersection) => {
                let conjuncts: SmallVec<[&TypeValue; 8]> = intersection.conjuncts().collect();
                stack.extend(conjuncts.into_iter().rev());
            }
            other => flat.push(other),
        }
    }

    let mut out = Vec::with_capacity(flat.len());
    for (index, ty) in flat.iter().enumerate() {
        if !flat[index + 1..].contains(ty) {
            out.push(TypeValue::clone(ty));
        }
    }
    out
}

/// Trait type over `types`; `None` when no conjunct is left.
pub fn create_intersection(types: Vec<TypeValue>) -> Option<TypeValue> {
    let mut flat = flatten_intersection(&types);
    match flat.len() {
        0 => None,
        1 => flat.pop(),
        _ => {
            let primary = flat.remove(0);
            Some(TypeValue::Intersection(IntersectionType::from_flat(primary, flat)))
        }
    }
}

/// `ty as trait_1, trait_2, ...`.
pub fn with_traits(ty: &TypeValue, traits: &[TypeValue]) -> TypeValue {
    let mut types = Vec::with_capacity(traits.len() + 1);
    types.push(ty.clone());
    types.extend(traits.iter().cloned());
    create_intersection(types).unwrap_or_else(|| ty.clone())
}

#[cfg(test)]
#[path = "../tests/intersection_tests.rs"]
mod tests;
