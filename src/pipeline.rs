//! Drivers that push whole in-memory series through the online core.
//!
//! The core consumes one observation per call; callers holding complete
//! series (a loaded file, a generated sample, a set of stations) use these
//! helpers instead of writing the loop themselves. The outputs keep every
//! history aligned by step so they can be plotted or scored externally.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assim::{Assimilator, SequentialBlend, SequentialOneSource};
use crate::domain::{AssimilationConfig, Estimate};
use crate::error::AssimilationError;
use crate::report::{RunMetrics, compute_metrics};
use crate::source::DataSource;

/// Everything one source recorded during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceHistory {
    pub raw: Vec<f64>,
    /// Imputed series, or the calibrated series when calibration is on.
    pub corrected: Vec<f64>,
    /// Errors matching `corrected`.
    pub errors: Vec<f64>,
    /// AR(1) errors before calibration.
    pub ar_errors: Vec<f64>,
}

impl SourceHistory {
    fn from_source(source: &DataSource) -> Self {
        Self {
            raw: source.raw_data().to_vec(),
            corrected: source.corrected_data().to_vec(),
            errors: source.errors().to_vec(),
            ar_errors: source.ar_errors().to_vec(),
        }
    }
}

/// Outputs of a two-source run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub fused: Vec<Estimate>,
    /// Blend coefficient applied to source1 at each step (before smoothing).
    pub coefficients: Vec<f64>,
    pub source1: SourceHistory,
    pub source2: SourceHistory,
    pub calibrated: bool,
}

impl RunOutput {
    pub fn metrics(&self) -> RunMetrics {
        compute_metrics(self)
    }
}

/// Outputs of a single-source run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleRunOutput {
    pub estimates: Vec<Estimate>,
    pub source: SourceHistory,
}

/// A labelled pair of aligned series, e.g. a station and the model at its
/// location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPair {
    pub label: String,
    pub source1: Vec<f64>,
    pub source2: Vec<f64>,
}

#[derive(Debug)]
pub struct BatchRun {
    pub label: String,
    pub output: Result<RunOutput, AssimilationError>,
}

/// Assimilate two aligned series step by step.
pub fn run_pair(
    source1: &[f64],
    source2: &[f64],
    config: &AssimilationConfig,
) -> Result<RunOutput, AssimilationError> {
    if source1.len() != source2.len() {
        return Err(AssimilationError::LengthMismatch {
            left: source1.len(),
            right: source2.len(),
        });
    }

    let mut assimilator = Assimilator::from_config(config);
    let mut smoothing = config.sequential.then(SequentialBlend::new);
    let mut fused = Vec::with_capacity(source1.len());
    let mut coefficients = Vec::with_capacity(source1.len());

    for (&obs1, &obs2) in source1.iter().zip(source2) {
        let mut out = assimilator.assimilate(obs1, obs2);
        if let Some(blend) = smoothing.as_mut() {
            out = blend.blend(out);
        }
        fused.push(out);
        coefficients.push(assimilator.last_coefficient().unwrap_or(1.0));
    }
    debug!(
        steps = fused.len(),
        calibrated = config.calibrate_second_source,
        sequential = config.sequential,
        "pair run finished"
    );

    Ok(RunOutput {
        fused,
        coefficients,
        source1: SourceHistory::from_source(assimilator.source1()),
        source2: SourceHistory::from_source(assimilator.source2()),
        calibrated: config.calibrate_second_source,
    })
}

/// Filter one series, optionally with sequential smoothing.
pub fn run_single(observations: &[f64], sequential: bool) -> SingleRunOutput {
    if sequential {
        let mut seq = SequentialOneSource::single_source();
        let estimates = observations.iter().map(|&x| seq.assimilate(x)).collect();
        SingleRunOutput {
            estimates,
            source: SourceHistory::from_source(seq.stage()),
        }
    } else {
        let mut source = DataSource::new();
        let estimates = observations.iter().map(|&x| source.estimate(x)).collect();
        SingleRunOutput {
            estimates,
            source: SourceHistory::from_source(&source),
        }
    }
}

/// Run many independent pairs in parallel.
///
/// Each pair gets its own assimilator; parallelism is across pairs only, so
/// per-series ordering is untouched. Results keep the input order.
pub fn run_batch(pairs: &[SeriesPair], config: &AssimilationConfig) -> Vec<BatchRun> {
    pairs
        .par_iter()
        .map(|pair| BatchRun {
            label: pair.label.clone(),
            output: run_pair(&pair.source1, &pair.source2, config),
        })
        .collect()
}
