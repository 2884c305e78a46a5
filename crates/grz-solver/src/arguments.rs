//! Argument-type assembly for calls.
//!
//! A Groovy call `foo(a: 1, x, *list) { ... }` passes, in order:
//! named arguments collected into one leading map literal, the positional
//! arguments (spread tuples expanded into their components) and the trailing
//! closure arguments.

use crate::types::{MapType, TypeValue};
use std::sync::Arc;
use tracing::trace;

/// A positional argument expression and its inferred type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentExpr {
    Plain(Option<TypeValue>),
    /// `*expr`: contributes the components of a tuple-typed expression.
    Spread(Option<TypeValue>),
}

/// A `label: value` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedArgument {
    label: Arc<str>,
    ty: Option<TypeValue>,
}

impl NamedArgument {
    pub fn new(label: &str, ty: Option<TypeValue>) -> Self {
        Self {
            label: Arc::from(label),
            ty,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ty(&self) -> Option<&TypeValue> {
        self.ty.as_ref()
    }
}

/// Types of the arguments a call passes.
///
/// Returns `None` when the list cannot be known (a spread of something other
/// than a tuple). Untyped plain arguments become `java.lang.Object`, or `None`
/// (bottom) when `null_as_bottom` is set. Components of a spread tuple are
/// passed as they are, untyped ones included. Closures whose type is unknown
/// are left out.
pub fn argument_types(
    named: &[NamedArgument],
    expressions: &[ArgumentExpr],
    closures: &[Option<TypeValue>],
    null_as_bottom: bool,
) -> Option<Vec<Option<TypeValue>>> {
    let untyped = |ty: Option<&TypeValue>| -> Option<TypeValue> {
        match ty {
            Some(ty) => Some(ty.clone()),
            None if null_as_bottom => None,
            None => Some(TypeValue::object()),
        }
    };

    let mut out: Vec<Option<TypeValue>> = Vec::with_capacity(expressions.len() + closures.len() + 1);
    if !named.is_empty() {
        let map = MapType::from_string_entries(
            named
                .iter()
                .map(|argument| (argument.label(), argument.ty().cloned())),
        );
        out.push(Some(TypeValue::Map(map)));
    }

    for expression in expressions {
        match expression {
            ArgumentExpr::Plain(ty) => out.push(untyped(ty.as_ref())),
            ArgumentExpr::Spread(Some(TypeValue::Tuple(tuple))) => {
                out.extend(tuple.components().iter().cloned());
            }
            ArgumentExpr::Spread(other) => {
                trace!(spread = ?other, "Spread of a non-tuple argument, argument types unknown");
                return None;
            }
        }
    }

    out.extend(closures.iter().flatten().map(|ty| Some(ty.clone())));
    Some(out)
}

#[cfg(test)]
#[path = "../tests/arguments_tests.rs"]
mod tests;
