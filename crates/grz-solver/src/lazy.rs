//! Memoization cell for lazily computed type information.
//!
//! A `LazyCell` is owned by the value that declares it (a composite type, a
//! closure signature, a method resolve result). The wrapped computation runs
//! under [`prevent_recursion`], keyed by the owner:
//!
//! - a complete result is stored and returned from then on;
//! - re-entry during the computation yields the caller's neutral default;
//! - a result that observed such a short-circuit is returned but not stored,
//!   so a later non-recursive call computes again.
//!
//! The cell never blocks: two threads racing on the same empty cell both
//! compute, and the first complete result wins.

use crate::recursion::{GuardKey, Guarded, prevent_recursion};
use std::sync::OnceLock;

#[derive(Clone, Debug, Default)]
pub struct LazyCell<T> {
    value: OnceLock<T>,
}

impl<T> LazyCell<T> {
    pub const fn new() -> Self {
        Self {
            value: OnceLock::new(),
        }
    }

    /// The memoized value, if computed.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }

    /// Drop the memoized value.
    pub fn invalidate(&mut self) {
        self.value.take();
    }
}

impl<T: Clone> LazyCell<T> {
    /// The memoized value, or the result of `compute` guarded by `key`.
    ///
    /// Returns `default()` when `key` is already in flight.
    pub fn get_or_compute(
        &self,
        key: GuardKey,
        default: impl FnOnce() -> T,
        compute: impl FnOnce() -> T,
    ) -> T {
        if let Some(value) = self.value.get() {
            return value.clone();
        }
        match prevent_recursion(key, compute) {
            Guarded::Complete(value) => {
                let _ = self.value.set(value.clone());
                value
            }
            Guarded::Incomplete(value) => value,
            Guarded::Cycle => default(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/lazy_tests.rs"]
mod tests;
