//! Kernel configuration.
//!
//! All fields have defaults from `grz_common::limits`, so a partial JSON
//! document (or `{}`) is a valid configuration.

use grz_common::limits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    /// Nesting depth of type-argument merging during LUB.
    pub max_lub_argument_depth: u32,
    /// Nesting depth of rendered composite types.
    pub max_render_depth: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_lub_argument_depth: limits::MAX_LUB_ARGUMENT_DEPTH,
            max_render_depth: limits::MAX_RENDER_DEPTH,
        }
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
