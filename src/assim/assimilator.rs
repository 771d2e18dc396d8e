//! Two-source assimilation.
//!
//! Each step:
//! 1. source1 preprocesses its observation (never calibrated);
//! 2. source2 preprocesses its observation, calibrating toward source1's
//!    latest value when enabled;
//! 3. the running covariance of the two error series is updated and turned
//!    into a correlation;
//! 4. the two estimates are blended with the correlation-aware coefficient.

use tracing::trace;

use crate::assim::uncertainty::{combined_uncertainty, pair_coefficient};
use crate::domain::{AssimilationConfig, Estimate, UncertaintyMethod};
use crate::math::RunningCovariance;
use crate::source::DataSource;

#[derive(Debug, Clone)]
pub struct Assimilator {
    source1: DataSource,
    source2: DataSource,
    covariance: RunningCovariance,
    t: usize,
    method: UncertaintyMethod,
    last_coefficient: Option<f64>,
}

impl Assimilator {
    /// `calibrate` enables R(1) calibration of source2 toward source1.
    pub fn new(calibrate: bool) -> Self {
        Self {
            source1: DataSource::new(),
            source2: DataSource::from_flag(calibrate),
            covariance: RunningCovariance::new(),
            t: 0,
            method: UncertaintyMethod::default(),
            last_coefficient: None,
        }
    }

    /// Builds the plain blend. `config.sequential` is not read here; wrap the
    /// result with [`SequentialTwoSources::from_config`] to honour it.
    ///
    /// [`SequentialTwoSources::from_config`]: crate::assim::SequentialTwoSources::from_config
    pub fn from_config(config: &AssimilationConfig) -> Self {
        Self::new(config.calibrate_second_source).with_uncertainty(config.uncertainty)
    }

    pub fn with_uncertainty(mut self, method: UncertaintyMethod) -> Self {
        self.method = method;
        self
    }

    /// Fuse one pair of observations. Either may be missing (NaN).
    pub fn assimilate(&mut self, obs1: f64, obs2: f64) -> Estimate {
        self.t += 1;

        let a = self.source1.estimate(obs1);
        let b = self.source2.estimate_with_reference(obs2, a.value);
        let m1 = self.source1.error_moments();
        let m2 = self.source2.error_moments();

        self.covariance.push(a.error - m1.mean(), b.error - m2.mean());
        let (var1, var2) = (m1.variance(), m2.variance());
        let corr = if var1 == 0.0 || var2 == 0.0 {
            0.0
        } else {
            self.covariance.covariance() / (var1.sqrt() * var2.sqrt())
        };

        // Instantaneous error covariance; distinct from the running estimate.
        let cov_pair = corr * a.error * b.error;
        let k = pair_coefficient(a.error, b.error, cov_pair);
        self.last_coefficient = Some(k);

        let value = k * a.value + (1.0 - k) * b.value;
        let error = combined_uncertainty(self.method, a.error, b.error, k, cov_pair);
        trace!(t = self.t, k, corr, value, error, "assimilation step");

        Estimate::new(value, error)
    }

    /// Number of completed `assimilate` calls.
    pub fn len(&self) -> usize {
        self.t
    }

    pub fn is_empty(&self) -> bool {
        self.t == 0
    }

    /// Running covariance between the two sources' errors.
    pub fn covariance(&self) -> f64 {
        self.covariance.covariance()
    }

    /// Blend coefficient applied to source1 in the latest step.
    pub fn last_coefficient(&self) -> Option<f64> {
        self.last_coefficient
    }

    pub fn uncertainty_method(&self) -> UncertaintyMethod {
        self.method
    }

    pub fn source1(&self) -> &DataSource {
        &self.source1
    }

    pub fn source2(&self) -> &DataSource {
        &self.source2
    }

    /// Error histories of both sources, aligned by step.
    pub fn assimilation_errors(&self) -> (&[f64], &[f64]) {
        (self.source1.errors(), self.source2.errors())
    }
}
