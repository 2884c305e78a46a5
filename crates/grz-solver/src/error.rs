//! Typed errors surfaced by the kernel.
//!
//! Unresolvable references and recursive definitions are never errors: they
//! degrade to `Object` types, raw class references or empty lists. Only
//! construction-time invariant violations and failed materialization of a type
//! as source text reach callers as `Err`.

use crate::bridge::MalformedText;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("class reference must have a non-empty qualified name")]
    EmptyQualifiedName,

    #[error("closure type must have at least one signature")]
    EmptySignatures,

    #[error("cannot construct declaration from type `{text}`")]
    CannotConstructDeclaration {
        text: String,
        #[source]
        source: MalformedText,
    },
}

pub type SolverResult<T> = Result<T, SolverError>;
