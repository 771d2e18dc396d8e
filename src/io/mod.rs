//! File input.
//!
//! The core never touches the filesystem; this module only loads run
//! configuration for callers that keep it on disk.

pub mod config;

pub use config::*;
