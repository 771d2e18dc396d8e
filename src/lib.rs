//! `rls-assimilation` library crate.
//!
//! Online fusion of two noisy, gappy time series:
//!
//! - `source`: per-stream AR(1) imputation and optional R(1) calibration
//! - `assim`: two-source blending and sequential (temporal) smoothing
//! - `pipeline`: whole-series and batch drivers over the online core
//! - `report`: accuracy and uncertainty metrics
//!
//! Every stage consumes one observation per call and keeps its own state, so
//! observation order matters and instances are not shared across threads.

pub mod assim;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod report;
pub mod source;

pub use assim::{Assimilator, SequentialAssimilator, SequentialOneSource, SequentialTwoSources};
pub use domain::{AssimilationConfig, Estimate, MISSING, UncertaintyMethod, is_missing};
pub use error::AssimilationError;
pub use math::RecursiveLeastSquares;
pub use source::DataSource;
