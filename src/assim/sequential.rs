//! Sequential (temporally smoothed) assimilation.
//!
//! The output of an upstream stage is blended once more against an AR(1)
//! prediction of the fused series itself:
//!
//! ```text
//! pred     = ar.predict(prev)
//! pred_err = prev_err·|ar.slope| + ar.error
//! k        = pred_err² / (pred_err² + err²)
//! fused    = k·new + (1-k)·pred
//! ```
//!
//! The upstream stage is either one `DataSource` or a full `Assimilator`; the
//! blend itself is the same state block in both cases.

use tracing::debug;

use crate::assim::Assimilator;
use crate::assim::uncertainty::sequential_coefficient;
use crate::domain::{AssimilationConfig, Estimate};
use crate::math::RecursiveLeastSquares;
use crate::source::DataSource;

#[derive(Debug, Clone, Default)]
enum BlendState {
    #[default]
    Empty,
    /// One fused value seen; no model yet.
    Primed { last: Estimate },
    Tracking {
        last: Estimate,
        model: RecursiveLeastSquares,
    },
}

/// AR(1) feedback over a fused series.
#[derive(Debug, Clone, Default)]
pub struct SequentialBlend {
    state: BlendState,
}

impl SequentialBlend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend the next upstream estimate with the prediction from the previous
    /// fused value.
    pub fn blend(&mut self, new: Estimate) -> Estimate {
        match std::mem::take(&mut self.state) {
            BlendState::Empty => {
                self.state = BlendState::Primed { last: new };
                new
            }
            BlendState::Primed { last } => {
                let mut model = RecursiveLeastSquares::new();
                model.update(last.value, new.value);
                debug!(prev = last.value, new = new.value, "sequential AR(1) model created");
                self.state = BlendState::Tracking { last: new, model };
                new
            }
            BlendState::Tracking { last, mut model } => {
                let pred = model.predict(last.value);
                let pred_err = last.error * model.slope().abs() + model.error();
                model.update(last.value, new.value);

                let k = sequential_coefficient(pred_err, new.error);
                let fused = Estimate::new(
                    k * new.value + (1.0 - k) * pred,
                    ((k * new.error).powi(2) + ((1.0 - k) * pred_err).powi(2)).sqrt(),
                );
                self.state = BlendState::Tracking { last: fused, model };
                fused
            }
        }
    }

    /// The previous fused estimate, if any.
    pub fn previous(&self) -> Option<Estimate> {
        match &self.state {
            BlendState::Empty => None,
            BlendState::Primed { last } | BlendState::Tracking { last, .. } => Some(*last),
        }
    }

    pub fn model(&self) -> Option<&RecursiveLeastSquares> {
        match &self.state {
            BlendState::Tracking { model, .. } => Some(model),
            _ => None,
        }
    }
}

/// A stage that turns one step of input into an estimate.
pub trait Stage {
    type Input;

    fn step(&mut self, input: Self::Input) -> Estimate;
}

impl Stage for DataSource {
    type Input = f64;

    fn step(&mut self, obs: f64) -> Estimate {
        self.estimate(obs)
    }
}

impl Stage for Assimilator {
    type Input = (f64, f64);

    fn step(&mut self, (obs1, obs2): (f64, f64)) -> Estimate {
        self.assimilate(obs1, obs2)
    }
}

/// An upstream stage followed by the sequential blend.
#[derive(Debug, Clone)]
pub struct SequentialAssimilator<S> {
    stage: S,
    blend: SequentialBlend,
}

pub type SequentialOneSource = SequentialAssimilator<DataSource>;
pub type SequentialTwoSources = SequentialAssimilator<Assimilator>;

impl<S: Stage> SequentialAssimilator<S> {
    pub fn new(stage: S) -> Self {
        Self {
            stage,
            blend: SequentialBlend::new(),
        }
    }

    pub fn assimilate(&mut self, input: S::Input) -> Estimate {
        let upstream = self.stage.step(input);
        self.blend.blend(upstream)
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn blend(&self) -> &SequentialBlend {
        &self.blend
    }
}

impl SequentialOneSource {
    /// Smooth a single AR(1) source.
    pub fn single_source() -> Self {
        Self::new(DataSource::new())
    }
}

impl SequentialTwoSources {
    pub fn two_sources(calibrate: bool) -> Self {
        Self::new(Assimilator::new(calibrate))
    }

    /// Calibration and uncertainty settings come from `config`; the blend is
    /// always applied, whatever `config.sequential` says.
    pub fn from_config(config: &AssimilationConfig) -> Self {
        Self::new(Assimilator::from_config(config))
    }

    pub fn assimilate_pair(&mut self, obs1: f64, obs2: f64) -> Estimate {
        self.assimilate((obs1, obs2))
    }
}
