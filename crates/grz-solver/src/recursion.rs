//! Recursion guards for depth limiting and cycle detection in recursive type
//! computations.
//!
//! # Design
//!
//! Two kinds of guards live here:
//!
//! 1. [`DepthCounter`]: an owned depth limit threaded through one algorithm
//!    (argument merging during LUB, rendering, parsing type text).
//! 2. The **in-flight stack**: a thread-local stack of [`GuardKey`]s checked at
//!    entry to every lazy computation ([`prevent_recursion`]). Lazy cells are
//!    re-entered through arbitrary call chains (a closure's return type asking
//!    for the closure's own parameters), so their guard cannot be threaded as a
//!    parameter.
//!
//! # Memoization stamps
//!
//! When a key is found already in flight, every frame from that key's frame to
//! the top of the stack is marked *incomplete*: those computations observed a
//! neutral default instead of a real value, so their results must not be
//! memoized. [`prevent_recursion`] reports this as [`Guarded::Incomplete`].
//! Once the stack is empty again the iteration budget is reset.
//!
//! # Safety
//!
//! - **Debug leak detection**: dropping a [`DepthCounter`] with active levels
//!   panics in debug builds.
//! - **Unwind safety**: in-flight frames are popped by a drop guard, so a panic
//!   inside a guarded computation does not leave a stale key behind.

use grz_common::limits;
use std::cell::RefCell;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Merging type arguments of a common supertype during LUB.
    ///
    /// depth = 8
    LubArguments,

    /// Rendering nested composite types as text.
    ///
    /// depth = 32
    Rendering,

    /// Parsing nested type text.
    ///
    /// depth = 128
    TypeText,

    /// Lazy computations in flight on one thread.
    ///
    /// depth = 256, iterations = 1,000,000
    InFlight,
}

impl RecursionProfile {
    /// Maximum recursion depth for this profile.
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::LubArguments => limits::MAX_LUB_ARGUMENT_DEPTH,
            Self::Rendering => limits::MAX_RENDER_DEPTH,
            Self::TypeText => limits::MAX_TYPE_TEXT_DEPTH,
            Self::InFlight => limits::MAX_IN_FLIGHT_DEPTH,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to push a key on the in-flight stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already in flight: cycle detected.
    Cycle,
    /// Maximum in-flight depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

// ---------------------------------------------------------------------------
// DepthCounter
// ---------------------------------------------------------------------------

/// Depth-only guard: limits nesting without tracking keys.
///
/// Used where the same value may legitimately be revisited, e.g. merging
/// `List<List<T>>` arguments during LUB.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Try to enter a deeper level. On `false` the depth is not incremented and
    /// `leave()` must not be called.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() called at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky: stays `true` once a limit was hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!(
                "DepthCounter dropped with depth {} > 0: leaked enter() calls",
                self.depth
            );
        }
    }
}

// ---------------------------------------------------------------------------
// In-flight stack
// ---------------------------------------------------------------------------

/// Which lazy computation a guard key protects.
///
/// The same value may be in flight for different computations at once (a
/// closure rendering itself while its parameters are inferred), so the kind is
/// part of the key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GuardKind {
    TypeParameters,
    Substitutor,
    SignatureReturn,
    Rendering,
}

/// Identity of one lazy computation: the address of the value that owns it
/// plus the computation kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GuardKey {
    addr: usize,
    kind: GuardKind,
}

impl GuardKey {
    /// Key for `value`'s computation of `kind`. Valid while `value` is alive
    /// and not moved.
    pub fn of<T: ?Sized>(value: &T, kind: GuardKind) -> Self {
        Self {
            addr: std::ptr::from_ref(value).cast::<()>() as usize,
            kind,
        }
    }

    pub fn kind(self) -> GuardKind {
        self.kind
    }
}

/// Outcome of a guarded computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// Computed without observing any short-circuited cycle: safe to memoize.
    Complete(T),
    /// Computed, but some nested computation hit a cycle involving this frame:
    /// usable now, must not be memoized.
    Incomplete(T),
    /// The key was already in flight (or a limit was hit): the computation
    /// did not run.
    Cycle,
}

impl<T> Guarded<T> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle)
    }

    /// The computed value, if the computation ran.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Complete(value) | Self::Incomplete(value) => Some(value),
            Self::Cycle => None,
        }
    }
}

struct Frame {
    key: GuardKey,
    incomplete: bool,
}

struct InFlight {
    frames: Vec<Frame>,
    iterations: u32,
}

impl InFlight {
    const fn new() -> Self {
        Self {
            frames: Vec::new(),
            iterations: 0,
        }
    }

    fn enter(&mut self, key: GuardKey) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > limits::MAX_IN_FLIGHT_ITERATIONS {
            self.mark_incomplete_from(0);
            return RecursionResult::IterationExceeded;
        }
        if let Some(position) = self.frames.iter().position(|frame| frame.key == key) {
            self.mark_incomplete_from(position);
            return RecursionResult::Cycle;
        }
        if self.frames.len() as u32 >= RecursionProfile::InFlight.max_depth() {
            self.mark_incomplete_from(0);
            return RecursionResult::DepthExceeded;
        }
        self.frames.push(Frame {
            key,
            incomplete: false,
        });
        RecursionResult::Entered
    }

    /// Pop the top frame; returns whether it was marked incomplete.
    fn leave(&mut self, key: GuardKey) -> bool {
        let frame = self.frames.pop();
        debug_assert!(
            frame.as_ref().is_some_and(|frame| frame.key == key),
            "in-flight stack out of order: leaving {key:?}"
        );
        if self.frames.is_empty() {
            self.iterations = 0;
        }
        frame.is_some_and(|frame| frame.incomplete)
    }

    fn mark_incomplete_from(&mut self, position: usize) {
        for frame in &mut self.frames[position..] {
            frame.incomplete = true;
        }
    }
}

thread_local! {
    static IN_FLIGHT: RefCell<InFlight> = const { RefCell::new(InFlight::new()) };
}

/// Pops its frame when dropped, including during unwinding.
struct FrameGuard {
    key: GuardKey,
    left: bool,
}

impl FrameGuard {
    fn leave(mut self) -> bool {
        self.left = true;
        IN_FLIGHT.with(|stack| stack.borrow_mut().leave(self.key))
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        if !self.left {
            let _ = IN_FLIGHT.try_with(|stack| stack.borrow_mut().leave(self.key));
        }
    }
}

/// Run `f` unless `key` is already in flight on this thread.
///
/// Re-entrant and non-blocking: the only state is the calling thread's stack.
pub fn prevent_recursion<T>(key: GuardKey, f: impl FnOnce() -> T) -> Guarded<T> {
    let entered = IN_FLIGHT.with(|stack| stack.borrow_mut().enter(key));
    match entered {
        RecursionResult::Entered => {}
        RecursionResult::Cycle => {
            trace!(?key, "Recursive lazy computation, using default");
            return Guarded::Cycle;
        }
        exceeded => {
            debug!(?key, ?exceeded, "In-flight guard limit reached, using default");
            return Guarded::Cycle;
        }
    }

    let frame = FrameGuard { key, left: false };
    let value = f();
    if frame.leave() {
        Guarded::Incomplete(value)
    } else {
        Guarded::Complete(value)
    }
}

/// Run `f`, or return `default` if `key` is already being computed higher on
/// this thread's stack. Caches nothing.
pub fn do_preventing_recursion<T>(key: GuardKey, default: T, f: impl FnOnce() -> T) -> T {
    prevent_recursion(key, f).into_value().unwrap_or(default)
}

/// Whether `key` is currently in flight on this thread.
pub fn is_in_flight(key: GuardKey) -> bool {
    IN_FLIGHT.with(|stack| stack.borrow().frames.iter().any(|frame| frame.key == key))
}

/// Number of lazy computations currently in flight on this thread.
pub fn in_flight_depth() -> usize {
    IN_FLIGHT.with(|stack| stack.borrow().frames.len())
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
