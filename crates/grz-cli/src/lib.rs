//! Command-line driver for the grz type kernel.
//!
//! The `grz` binary loads a JSON fixture of class declarations and type
//! texts and renders, joins, inspects or compares the types with
//! `grz-solver`.

pub mod args;
pub mod driver;
pub mod fixture;
pub mod tracing_config;
