//! Reporting utilities: run metrics and their text rendering.
//!
//! Kept apart from the filters so scoring never feeds back into estimation.

pub mod format;
pub mod metrics;

pub use format::*;
pub use metrics::*;
