//! Accuracy and uncertainty metrics over finished runs.
//!
//! Pairs where either side is missing are skipped rather than zero-filled, so
//! gaps do not masquerade as large errors.

use serde::Serialize;

use crate::domain::is_missing;
use crate::pipeline::RunOutput;

/// Root mean squared difference over the steps where both series have a value.
///
/// Returns `None` when no such step exists.
pub fn rmse(a: &[f64], b: &[f64]) -> Option<f64> {
    let (sum, n) = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !is_missing(**x) && !is_missing(**y))
        .fold((0.0, 0usize), |(sum, n), (x, y)| (sum + (x - y).powi(2), n + 1));
    (n > 0).then(|| (sum / n as f64).sqrt())
}

/// Mean absolute uncertainty.
pub fn mean_absolute_uncertainty(errors: &[f64]) -> Option<f64> {
    UncertaintyStats::from_errors(errors).map(|s| s.mean_abs)
}

/// Summary of an uncertainty series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UncertaintyStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub mean_abs: f64,
}

impl UncertaintyStats {
    pub fn from_errors(errors: &[f64]) -> Option<Self> {
        let values: Vec<f64> = errors.iter().copied().filter(|x| !is_missing(*x)).collect();
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: var.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_abs: values.iter().map(|v| v.abs()).sum::<f64>() / n,
        })
    }
}

impl std::fmt::Display for UncertaintyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.2} ± {:.2} [{:.2}; {:.2}]",
            self.mean, self.std_dev, self.min, self.max
        )
    }
}

/// Scores for one two-source run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Raw source1 vs raw source2.
    pub rmse_sources: Option<f64>,
    pub rmse_source1_fused: Option<f64>,
    pub rmse_source2_fused: Option<f64>,
    /// Uncertainty of source1's AR(1) model.
    pub source1_uncertainty: Option<UncertaintyStats>,
    pub source2_uncertainty: Option<UncertaintyStats>,
    /// Uncertainty of source2 after calibration, when enabled.
    pub calibrated_uncertainty: Option<UncertaintyStats>,
    pub fused_uncertainty: Option<UncertaintyStats>,
}

pub fn compute_metrics(run: &RunOutput) -> RunMetrics {
    let fused_values: Vec<f64> = run.fused.iter().map(|e| e.value).collect();
    let fused_errors: Vec<f64> = run.fused.iter().map(|e| e.error).collect();

    RunMetrics {
        rmse_sources: rmse(&run.source1.raw, &run.source2.raw),
        rmse_source1_fused: rmse(&run.source1.raw, &fused_values),
        rmse_source2_fused: rmse(&run.source2.raw, &fused_values),
        source1_uncertainty: UncertaintyStats::from_errors(&run.source1.ar_errors),
        source2_uncertainty: UncertaintyStats::from_errors(&run.source2.ar_errors),
        calibrated_uncertainty: run
            .calibrated
            .then(|| UncertaintyStats::from_errors(&run.source2.errors))
            .flatten(),
        fused_uncertainty: UncertaintyStats::from_errors(&fused_errors),
    }
}
