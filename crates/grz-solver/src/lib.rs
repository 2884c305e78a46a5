//! Structural Type Kernel for Groovy
//!
//! This crate implements the type representation and lazy unification layer
//! a dynamic language needs on top of a nominal host type system:
//!
//! - **Type values**: class references plus the structural types Groovy
//!   infers (closures, tuples, map literals, ranges, trait types, anonymous
//!   classes), compared structurally
//! - **Lazy parameters**: host-class type arguments inferred on demand,
//!   memoized per value and safe against self-referential types
//! - **LUB**: least upper bound over class hierarchies and structural shapes
//! - **Rendering**: deterministic canonical text that parses back
//! - **Resolve results**: declarations bundled with substitutions and
//!   validity flags, with lazily inferred method substitutions
//!
//! Class declarations are owned by the host and reached through
//! [`ClassResolver`]. Nothing here spawns threads or blocks; recursion is cut
//! by a thread-local in-flight stack ([`recursion`]).
pub mod annotation;
pub mod arguments;
pub mod bridge;
pub mod closure;
pub mod config;
pub mod decl;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod infer;
pub mod intersection;
pub mod lazy;
pub mod lub;
mod parameters;
pub mod recursion;
pub mod resolve;
pub mod substitution;
pub mod type_text;
pub mod types;

pub use closure::{Applicability, ClosureType, Parameter, Signature, SignatureReturn};
pub use config::SolverConfig;
pub use decl::{ClassDecl, ClassKind, DeclId, DeclKind, Declaration, SearchScope};
pub use error::{SolverError, SolverResult};
pub use format::TypeFormatter;
pub use hierarchy::{ClassResolver, ClassTable, Hierarchy};
pub use intersection::{create_intersection, flatten_intersection};
pub use lub::LubCalculator;
pub use resolve::{MethodResolveResult, ResolveResult, SpreadState, SubstitutionState};
pub use substitution::Substitution;
pub use types::{
    AnonymousBody, AnonymousClassRef, ClassRef, IntersectionType, MapType, PrimitiveKind,
    RangeType, TupleType, TypeParamRef, TypeValue,
};
