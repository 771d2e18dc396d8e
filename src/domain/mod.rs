//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the missing-value marker and `is_missing`
//! - the per-step output (`Estimate`)
//! - run configuration (`AssimilationConfig`, `UncertaintyMethod`)

pub mod types;

pub use types::*;
