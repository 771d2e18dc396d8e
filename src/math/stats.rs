//! Running moments updated one value at a time.
//!
//! Both accumulators use the weighted incremental form
//!
//! ```text
//! mean_t = ((t-1)/t) * mean_{t-1} + (1/t) * x_t
//! var_t  = ((t-1)/t) * var_{t-1}  + (1/(t-1)) * (x_t - mean_t)^2     (t > 1)
//! ```
//!
//! which yields the population mean/variance of everything pushed so far.

/// Running mean and population variance of a scalar series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMoments {
    count: usize,
    mean: f64,
    variance: f64,
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let t = self.count as f64;
        self.mean = ((t - 1.0) / t) * self.mean + value / t;
        self.variance = if self.count > 1 {
            ((t - 1.0) / t) * self.variance + (value - self.mean).powi(2) / (t - 1.0)
        } else {
            0.0
        };
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }
}

/// Running population covariance of two series.
///
/// The caller supplies each value's deviation from its own (already updated)
/// running mean, which is how the paired sources track their errors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningCovariance {
    count: usize,
    covariance: f64,
}

impl RunningCovariance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dev1: f64, dev2: f64) {
        self.count += 1;
        let t = self.count as f64;
        self.covariance = if self.count > 1 {
            ((t - 1.0) / t) * self.covariance + dev1 * dev2 / (t - 1.0)
        } else {
            0.0
        };
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn covariance(&self) -> f64 {
        self.covariance
    }
}
