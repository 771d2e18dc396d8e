//! Numerical building blocks: recursive least squares and running moments.

pub mod rls;
pub mod stats;

pub use rls::*;
pub use stats::*;
