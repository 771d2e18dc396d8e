//! Synthetic two-source streams.
//!
//! Mimics the usual setup: an accurate but gappy station (source1) and a
//! smooth model/forecast series on a different scale (source2), both observing
//! a periodic truth signal:
//!
//! ```text
//! truth_t   = level + amplitude · sin(2πt / period)
//! source1_t = truth_t + N(0, noise1)
//! source2_t = bias_scale · truth_t + bias_offset + N(0, noise2)
//! ```
//!
//! Each source drops values independently with its own probability.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::domain::MISSING;
use crate::error::AssimilationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub length: usize,
    pub seed: u64,
    pub level: f64,
    pub amplitude: f64,
    /// Period of the truth signal, in steps.
    pub period: f64,
    pub noise1: f64,
    pub noise2: f64,
    pub bias_scale: f64,
    pub bias_offset: f64,
    /// Probability that a source1 value is missing.
    pub missing1: f64,
    pub missing2: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        // Hourly series with a daily cycle.
        Self {
            length: 500,
            seed: 42,
            level: 40.0,
            amplitude: 15.0,
            period: 24.0,
            noise1: 2.0,
            noise2: 4.0,
            bias_scale: 1.0,
            bias_offset: 0.0,
            missing1: 0.1,
            missing2: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplePair {
    pub truth: Vec<f64>,
    pub source1: Vec<f64>,
    pub source2: Vec<f64>,
}

pub fn generate_pair(config: &SampleConfig) -> Result<SamplePair, AssimilationError> {
    if config.length == 0 {
        return Err(AssimilationError::InvalidSample("length must be > 0".into()));
    }
    if !(config.period.is_finite() && config.period > 0.0) {
        return Err(AssimilationError::InvalidSample(format!(
            "period must be finite and > 0, got {}",
            config.period
        )));
    }
    for (name, sd) in [("noise1", config.noise1), ("noise2", config.noise2)] {
        if !(sd.is_finite() && sd >= 0.0) {
            return Err(AssimilationError::InvalidSample(format!(
                "{name} must be finite and >= 0, got {sd}"
            )));
        }
    }
    for (name, p) in [("missing1", config.missing1), ("missing2", config.missing2)] {
        if !(0.0..1.0).contains(&p) {
            return Err(AssimilationError::InvalidSample(format!(
                "{name} must be in [0, 1), got {p}"
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise1 = Normal::new(0.0, config.noise1)
        .map_err(|e| AssimilationError::InvalidSample(format!("noise1: {e}")))?;
    let noise2 = Normal::new(0.0, config.noise2)
        .map_err(|e| AssimilationError::InvalidSample(format!("noise2: {e}")))?;

    let mut truth = Vec::with_capacity(config.length);
    let mut source1 = Vec::with_capacity(config.length);
    let mut source2 = Vec::with_capacity(config.length);

    for t in 0..config.length {
        let phase = 2.0 * std::f64::consts::PI * t as f64 / config.period;
        let x = config.level + config.amplitude * phase.sin();
        truth.push(x);

        let obs1 = x + noise1.sample(&mut rng);
        let obs2 = config.bias_scale * x + config.bias_offset + noise2.sample(&mut rng);

        let drop1: f64 = rng.r#gen();
        let drop2: f64 = rng.r#gen();
        source1.push(if drop1 < config.missing1 { MISSING } else { obs1 });
        source2.push(if drop2 < config.missing2 { MISSING } else { obs2 });
    }

    Ok(SamplePair {
        truth,
        source1,
        source2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let config = SampleConfig::default();
        let a = generate_pair(&config).unwrap();
        let b = generate_pair(&config).unwrap();
        // NaN != NaN, so compare bit patterns.
        fn bits(v: &[f64]) -> Vec<u64> {
            v.iter().map(|x| x.to_bits()).collect()
        }
        assert_eq!(bits(&a.source1), bits(&b.source1));
        assert_eq!(bits(&a.source2), bits(&b.source2));
        assert_eq!(a.truth.len(), config.length);
    }

    #[test]
    fn gaps_follow_probability() {
        let config = SampleConfig {
            length: 4000,
            missing1: 0.25,
            missing2: 0.0,
            ..SampleConfig::default()
        };
        let pair = generate_pair(&config).unwrap();
        let gaps = pair.source1.iter().filter(|x| x.is_nan()).count();
        let ratio = gaps as f64 / config.length as f64;
        assert!((0.2..0.3).contains(&ratio), "gap ratio {ratio}");
        assert!(pair.source2.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn noiseless_source2_is_exact_affine_map() {
        let config = SampleConfig {
            length: 50,
            noise1: 0.0,
            noise2: 0.0,
            bias_scale: 1.5,
            bias_offset: 20.0,
            missing1: 0.0,
            missing2: 0.0,
            ..SampleConfig::default()
        };
        let pair = generate_pair(&config).unwrap();
        for (x, y) in pair.truth.iter().zip(&pair.source2) {
            assert!((1.5 * x + 20.0 - y).abs() < 1e-9);
        }
        assert_eq!(pair.source1, pair.truth);
    }

    #[test]
    fn rejects_bad_settings() {
        let bad = [
            SampleConfig { length: 0, ..SampleConfig::default() },
            SampleConfig { period: 0.0, ..SampleConfig::default() },
            SampleConfig { missing1: 1.0, ..SampleConfig::default() },
            SampleConfig { noise2: -1.0, ..SampleConfig::default() },
            SampleConfig { noise1: -0.5, ..SampleConfig::default() },
            SampleConfig { noise1: f64::NAN, ..SampleConfig::default() },
        ];
        for config in bad {
            assert!(matches!(
                generate_pair(&config),
                Err(AssimilationError::InvalidSample(_))
            ));
        }
    }
}
