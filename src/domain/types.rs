//! Shared domain types.
//!
//! These are small value types that flow between the filter stages and out to
//! callers. They are serializable so a caller can persist or ship results
//! without wrapping them.

use serde::{Deserialize, Serialize};

/// The marker used for a missing observation.
pub const MISSING: f64 = f64::NAN;

/// Whether `x` is the missing-value marker.
///
/// Only NaN counts as missing. Infinite values are treated as observations and
/// propagate through the models unchanged.
#[inline]
pub fn is_missing(x: f64) -> bool {
    x.is_nan()
}

/// A point estimate and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
    pub error: f64,
}

impl Estimate {
    pub fn new(value: f64, error: f64) -> Self {
        Self { value, error }
    }
}

impl From<(f64, f64)> for Estimate {
    fn from((value, error): (f64, f64)) -> Self {
        Self { value, error }
    }
}

/// How the uncertainty of a two-source blend is computed.
///
/// Both forms give the same number up to rounding; `Direct` is the reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyMethod {
    /// `sqrt(|k²e1² + (1-k)²e2² + 2k(1-k)cov|)`.
    #[default]
    Direct,
    /// Interpolation between the L1 (fully correlated) and L2 (uncorrelated)
    /// bounds.
    L1L2,
}

/// Run configuration for an assimilation unit.
///
/// Every field has a default so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssimilationConfig {
    /// Map source2 onto source1's scale with an R(1) calibration model.
    pub calibrate_second_source: bool,
    pub uncertainty: UncertaintyMethod,
    /// Smooth the fused series against its own AR(1) prediction.
    pub sequential: bool,
}

impl Default for AssimilationConfig {
    fn default() -> Self {
        Self {
            calibrate_second_source: false,
            uncertainty: UncertaintyMethod::Direct,
            sequential: false,
        }
    }
}
