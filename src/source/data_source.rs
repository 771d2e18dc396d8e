//! One input stream: AR(1) imputation plus optional R(1) calibration.
//!
//! Per observation a source:
//! - fills a missing value from its AR(1) model (or the last value / 0 while
//!   the model is still cold)
//! - refits the AR(1) model on consecutive non-missing values
//! - records the model's absolute innovation as the step's error
//! - optionally maps the corrected value onto a reference scale with a second
//!   RLS model and propagates the AR error through that mapping
//!
//! When calibration is enabled its outputs replace the AR-only view in every
//! public accessor.

use tracing::{debug, trace};

use crate::domain::{Estimate, MISSING, is_missing};
use crate::error::AssimilationError;
use crate::math::{RecursiveLeastSquares, RunningMoments};

/// AR(1) model lifecycle. Cold until two consecutive observations arrive,
/// warm for the rest of the run.
#[derive(Debug, Clone, Default)]
enum ArModel {
    #[default]
    Cold,
    Warm(RecursiveLeastSquares),
}

impl ArModel {
    fn is_warm(&self) -> bool {
        matches!(self, ArModel::Warm(_))
    }

    fn model(&self) -> Option<&RecursiveLeastSquares> {
        match self {
            ArModel::Cold => None,
            ArModel::Warm(model) => Some(model),
        }
    }

    fn error(&self) -> f64 {
        self.model().map_or(0.0, RecursiveLeastSquares::error)
    }

    fn update(&mut self, x_past: f64, x_new: f64) {
        match self {
            ArModel::Cold => {
                let mut model = RecursiveLeastSquares::new();
                model.update(x_past, x_new);
                debug!(x_past, x_new, "AR(1) model warmed up");
                *self = ArModel::Warm(model);
            }
            ArModel::Warm(model) => model.update(x_past, x_new),
        }
    }
}

/// R(1) calibration state: the mapping model and its output series.
#[derive(Debug, Clone, Default)]
struct Calibration {
    model: RecursiveLeastSquares,
    values: Vec<f64>,
    errors: Vec<f64>,
    moments: RunningMoments,
}

impl Calibration {
    fn step(&mut self, x_corr: f64, ar_err: f64, x_ref: f64) -> Estimate {
        let out = if self.values.is_empty() {
            debug!(x_corr, "calibration started; first value passes through");
            Estimate::new(x_corr, ar_err)
        } else {
            // Predict with the mapping as it was before seeing this reference.
            let value = self.model.predict(x_corr);
            let error = self.model.slope().abs() * ar_err + self.model.error();
            if !is_missing(x_ref) {
                self.model.update(x_corr, x_ref);
            }
            Estimate::new(value, error)
        };

        self.values.push(out.value);
        self.errors.push(out.error);
        self.moments.push(out.error);
        out
    }
}

/// A single observation stream.
#[derive(Debug, Clone, Default)]
pub struct DataSource {
    raw: Vec<f64>,
    corrected: Vec<f64>,
    errors: Vec<f64>,
    moments: RunningMoments,
    ar: ArModel,
    calibration: Option<Calibration>,
}

impl DataSource {
    /// AR(1)-only source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose outputs are calibrated toward a reference series.
    pub fn with_calibration() -> Self {
        Self {
            calibration: Some(Calibration::default()),
            ..Self::default()
        }
    }

    pub fn from_flag(calibrate: bool) -> Self {
        if calibrate {
            Self::with_calibration()
        } else {
            Self::new()
        }
    }

    /// Fill a missing value given the previous corrected value.
    pub fn impute(&self, x_past: f64) -> f64 {
        match &self.ar {
            ArModel::Warm(model) => model.predict(x_past),
            ArModel::Cold if is_missing(x_past) => 0.0,
            ArModel::Cold => x_past,
        }
    }

    /// Consume one observation without a calibration reference.
    pub fn estimate(&mut self, x_new: f64) -> Estimate {
        self.estimate_with_reference(x_new, MISSING)
    }

    /// Consume one observation; `x_ref` is the value the calibration model
    /// maps toward (ignored when calibration is disabled, skipped when missing).
    ///
    /// Returns the externally visible estimate for this step.
    pub fn estimate_with_reference(&mut self, x_new: f64, x_ref: f64) -> Estimate {
        self.raw.push(x_new);
        let x_past = self.corrected.last().copied().unwrap_or(MISSING);

        let x_corr = if is_missing(x_new) {
            self.impute(x_past)
        } else {
            if !is_missing(x_past) {
                self.ar.update(x_past, x_new);
            }
            x_new
        };
        self.corrected.push(x_corr);

        let err = self.ar.error();
        self.errors.push(err);
        self.moments.push(err);
        trace!(t = self.raw.len(), x_new, x_corr, err, "source step");

        match self.calibration.as_mut() {
            Some(calibration) => calibration.step(x_corr, err, x_ref),
            None => Estimate::new(x_corr, err),
        }
    }

    /// Number of observations consumed.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Whether the AR(1) model exists.
    pub fn is_warm(&self) -> bool {
        self.ar.is_warm()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn ar_model(&self) -> Option<&RecursiveLeastSquares> {
        self.ar.model()
    }

    pub fn calibration_model(&self) -> Option<&RecursiveLeastSquares> {
        self.calibration.as_ref().map(|c| &c.model)
    }

    pub fn latest_value(&self) -> Result<f64, AssimilationError> {
        self.corrected_data()
            .last()
            .copied()
            .ok_or_else(|| AssimilationError::empty("data points"))
    }

    pub fn latest_error(&self) -> Result<f64, AssimilationError> {
        self.errors()
            .last()
            .copied()
            .ok_or_else(|| AssimilationError::empty("errors"))
    }

    pub fn latest_estimate(&self) -> Result<Estimate, AssimilationError> {
        Ok(Estimate::new(self.latest_value()?, self.latest_error()?))
    }

    /// Running mean of the active error series.
    pub fn latest_avg_error(&self) -> Result<f64, AssimilationError> {
        self.active_moments().map(|m| m.mean())
    }

    /// Running population variance of the active error series.
    pub fn latest_error_variance(&self) -> Result<f64, AssimilationError> {
        self.active_moments().map(|m| m.variance())
    }

    pub fn errors(&self) -> &[f64] {
        match &self.calibration {
            Some(c) => &c.errors,
            None => &self.errors,
        }
    }

    pub fn raw_data(&self) -> &[f64] {
        &self.raw
    }

    pub fn corrected_data(&self) -> &[f64] {
        match &self.calibration {
            Some(c) => &c.values,
            None => &self.corrected,
        }
    }

    /// AR(1) errors regardless of calibration.
    pub fn ar_errors(&self) -> &[f64] {
        &self.errors
    }

    /// Imputed (uncalibrated) series regardless of calibration.
    pub fn ar_corrected_data(&self) -> &[f64] {
        &self.corrected
    }

    /// Moments of the active error series; all-zero before the first step.
    pub(crate) fn error_moments(&self) -> RunningMoments {
        match &self.calibration {
            Some(c) => c.moments,
            None => self.moments,
        }
    }

    fn active_moments(&self) -> Result<RunningMoments, AssimilationError> {
        if self.is_empty() {
            return Err(AssimilationError::empty("errors"));
        }
        Ok(self.error_moments())
    }
}
