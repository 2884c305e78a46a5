//! Common constants and utilities for the grz Groovy type kernel.
//!
//! This crate provides foundational items used across all grz crates:
//! - Centralized recursion limits and rendering thresholds
//! - Well-known qualified class names and name helpers

// Centralized limits and thresholds
pub mod limits;

// Well-known class names and qualified-name helpers
pub mod names;
pub use names::{package_name, short_name};
