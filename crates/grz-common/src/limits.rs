//! Centralized limits and thresholds for the type kernel.
//!
//! Recursion limits for guarded computations (lazy parameter inference,
//! substitutor inference, rendering, type-text parsing) and the truncation
//! counts of canonical text live here so that the solver, the formatter and
//! the CLI agree on them.
//!
//! # Categories
//!
//! - **Recursion Depths**: nesting limits for recursive algorithms
//! - **Operation Counts**: iteration budgets for worklist walks
//! - **Rendering**: how much of a composite type canonical text shows

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth when merging type arguments during LUB computation.
///
/// `lub(List<List<...>>, List<List<...>>)` recurses into the arguments of the
/// common supertype. Past this depth the common supertype is returned raw.
pub const MAX_LUB_ARGUMENT_DEPTH: u32 = 8;

/// Maximum nesting depth of composite types rendered as text.
///
/// Deeper components are rendered with their simple class name.
pub const MAX_RENDER_DEPTH: u32 = 32;

/// Maximum nesting depth of type text accepted by the type-text parser.
///
/// Deeper text is rejected as malformed.
pub const MAX_TYPE_TEXT_DEPTH: u32 = 128;

/// Maximum number of lazy computations simultaneously in flight on one thread.
///
/// Reaching this depth is treated like a cycle: the innermost computation
/// short-circuits to its neutral default and nothing on the stack is cached.
pub const MAX_IN_FLIGHT_DEPTH: u32 = 256;

// =============================================================================
// Operation Counts
// =============================================================================

/// Maximum number of supertype visits in one hierarchy walk.
///
/// Protects against malformed (cyclic or enormous) hierarchies reported by the
/// host resolver.
pub const MAX_SUPERTYPE_VISITS: u32 = 10_000;

/// Maximum number of guarded entries on one thread before the in-flight stack
/// becomes idle again.
pub const MAX_IN_FLIGHT_ITERATIONS: u32 = 1_000_000;

// =============================================================================
// Rendering
// =============================================================================

/// Number of string-keyed entries a map literal type shows in canonical text
/// before the `,...` marker.
pub const MAP_LITERAL_RENDERED_ENTRIES: usize = 2;

/// Number of components a tuple type shows in canonical text before the
/// `,...` marker.
pub const TUPLE_RENDERED_COMPONENTS: usize = 2;
