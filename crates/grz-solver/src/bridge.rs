//! Source-text bridge.
//!
//! Callers that need a type as editable syntax render it to canonical text
//! and hand the text to a host parser ([`SourceBridge`]). A parse failure is
//! reported as [`MalformedText`] and surfaces from the materializing helpers
//! as [`SolverError::CannotConstructDeclaration`].

use crate::closure::Parameter;
use crate::decl::{ClassDecl, Declaration};
use crate::error::{SolverError, SolverResult};
use crate::format::TypeFormatter;
use crate::types::{TypeParamRef, TypeValue};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed text at offset {offset}: {message}")]
pub struct MalformedText {
    pub offset: usize,
    pub message: String,
}

impl MalformedText {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// What a snippet is expected to contain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Type,
    /// `(Type name, ...)`
    ParameterList,
}

/// Syntactic context a snippet is parsed in: the type parameters in scope.
#[derive(Clone, Debug, Default)]
pub struct SyntaxContext {
    type_params: Vec<TypeParamRef>,
}

impl SyntaxContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of_class(decl: &ClassDecl) -> Self {
        Self {
            type_params: decl.type_params().to_vec(),
        }
    }

    /// Method scope: the method's type parameters shadow `class`'s.
    pub fn of_member(class: Option<&ClassDecl>, member: &Declaration) -> Self {
        let mut type_params = member.type_params().to_vec();
        if let Some(class) = class {
            type_params.extend(class.type_params().iter().cloned());
        }
        Self { type_params }
    }

    pub fn type_param(&self, name: &str) -> Option<&TypeParamRef> {
        self.type_params.iter().find(|param| param.name() == name)
    }
}

/// Host parser turning text into syntax.
pub trait SourceBridge {
    type Fragment;

    fn parse(
        &self,
        text: &str,
        kind: FragmentKind,
        context: &SyntaxContext,
    ) -> Result<Self::Fragment, MalformedText>;
}

/// Materialize `ty` as syntax through its canonical text.
pub fn materialize_type<B: SourceBridge>(
    bridge: &B,
    formatter: &TypeFormatter<'_>,
    ty: &TypeValue,
    context: &SyntaxContext,
) -> SolverResult<B::Fragment> {
    let text = formatter.canonical_text(ty);
    parse_or_report(bridge, text, FragmentKind::Type, context)
}

/// `(T0 name0, T1... rest)`; untyped parameters are written by name only,
/// unnamed ones get `p<index>`.
pub fn parameter_list_text(formatter: &TypeFormatter<'_>, parameters: &[Parameter]) -> String {
    let mut out = String::from("(");
    for (index, param) in parameters.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        if let Some(ty) = param.ty() {
            out.push_str(&formatter.canonical_text(ty));
            if param.is_varargs() {
                out.push_str("...");
            }
            out.push(' ');
        }
        match param.name() {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("p{index}")),
        }
    }
    out.push(')');
    out
}

/// Materialize a synthetic parameter list.
pub fn materialize_parameter_list<B: SourceBridge>(
    bridge: &B,
    formatter: &TypeFormatter<'_>,
    parameters: &[Parameter],
    context: &SyntaxContext,
) -> SolverResult<B::Fragment> {
    let text = parameter_list_text(formatter, parameters);
    parse_or_report(bridge, text, FragmentKind::ParameterList, context)
}

fn parse_or_report<B: SourceBridge>(
    bridge: &B,
    text: String,
    kind: FragmentKind,
    context: &SyntaxContext,
) -> SolverResult<B::Fragment> {
    bridge.parse(&text, kind, context).map_err(|source| {
        debug!(%text, ?kind, %source, "Cannot construct declaration from text");
        SolverError::CannotConstructDeclaration { text, source }
    })
}

#[cfg(test)]
#[path = "../tests/bridge_tests.rs"]
mod tests;
