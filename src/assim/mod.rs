//! Assimilation of preprocessed sources.
//!
//! Responsibilities:
//!
//! - blend two sources with a correlation-aware coefficient (`Assimilator`)
//! - optionally smooth any stage's output against its own AR(1) prediction
//!   (`SequentialAssimilator`)
//! - the coefficient and uncertainty formulas both paths share

pub mod assimilator;
pub mod sequential;
pub mod uncertainty;

pub use assimilator::*;
pub use sequential::*;
pub use uncertainty::*;
