//! Recursive least squares for a univariate linear model.
//!
//! Every model in this crate has the same shape:
//!
//! ```text
//! y ≈ w0 + w1 * x
//! ```
//!
//! and is refit one `(x, y)` pair at a time:
//!
//! ```text
//! X     = [1, x]
//! alpha = y - X·w
//! g     = P·Xᵀ / (1 + X·P·Xᵀ)
//! w     = w + g·alpha
//! P     = P - g·(X·P)
//! ```
//!
//! Implementation choices:
//! - The forgetting factor is fixed at 1, so every observation counts equally.
//! - `P` starts at the identity and `w` at zero; there is no reset.
//! - `g·(X·P)` is the 2×2 outer product of the gain column and the `X·P`
//!   row, not an elementwise product. Scripts that write `P - g * X * P`
//!   with array broadcasting compute something else and converge more
//!   slowly; results from this type will not match theirs bit for bit.
//! - The state is tiny (2×2), so we use nalgebra's fixed-size types and avoid
//!   any heap allocation per update.

use nalgebra::{Matrix2, RowVector2, Vector2};

/// Online 2-parameter (intercept + slope) regressor.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursiveLeastSquares {
    p: Matrix2<f64>,
    w: Vector2<f64>,
    error: f64,
}

impl Default for RecursiveLeastSquares {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveLeastSquares {
    pub fn new() -> Self {
        Self {
            p: Matrix2::identity(),
            w: Vector2::zeros(),
            error: 0.0,
        }
    }

    /// Refit the model with one observed pair.
    ///
    /// Non-finite inputs are not rejected; they poison the state and every
    /// later prediction. Callers filter missing values upstream.
    pub fn update(&mut self, x: f64, y: f64) {
        let row = RowVector2::new(1.0, x);
        let alpha = y - (row * self.w)[(0, 0)];

        let p_xt = self.p * row.transpose();
        let denom = 1.0 + (row * p_xt)[(0, 0)];
        let gain = p_xt / denom;

        self.error = alpha.abs();
        self.w += gain * alpha;
        self.p -= gain * (row * self.p);
    }

    /// Predict `y` for the given `x`.
    ///
    /// Before the weights move away from zero the model has nothing to say, so
    /// it echoes `x` back instead of predicting 0.
    pub fn predict(&self, x: f64) -> f64 {
        if !self.is_fitted() {
            return x;
        }
        self.w[0] + self.w[1] * x
    }

    /// Whether the weights have left their all-zero initial state.
    pub fn is_fitted(&self) -> bool {
        self.w.iter().any(|&v| v != 0.0)
    }

    /// Absolute innovation of the most recent update (0 before any update).
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn intercept(&self) -> f64 {
        self.w[0]
    }

    pub fn slope(&self) -> f64 {
        self.w[1]
    }

    pub fn weights(&self) -> Vector2<f64> {
        self.w
    }

    pub fn covariance(&self) -> Matrix2<f64> {
        self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn fresh_model_echoes_input() {
        let model = RecursiveLeastSquares::new();
        for x in [-3.5, 0.0, 1.0, 42.0, 1e9] {
            assert_eq!(model.predict(x), x);
        }
        assert_eq!(model.error(), 0.0);
        assert!(!model.is_fitted());
    }

    #[test]
    fn first_update_matches_closed_form() {
        // w = 0, P = I, X = [1, 10]: gain = [1, 10] / 102, alpha = 10.
        let mut model = RecursiveLeastSquares::new();
        model.update(10.0, 10.0);

        assert!(approx_eq(model.error(), 10.0, 1e-12));
        assert!(approx_eq(model.intercept(), 10.0 / 102.0, 1e-12));
        assert!(approx_eq(model.slope(), 100.0 / 102.0, 1e-12));
        assert!(approx_eq(model.predict(10.0), 1010.0 / 102.0, 1e-9));
    }

    #[test]
    fn zero_pair_leaves_model_unfitted() {
        let mut model = RecursiveLeastSquares::new();
        model.update(0.0, 0.0);
        assert_eq!(model.error(), 0.0);
        assert!(!model.is_fitted());
        assert_eq!(model.predict(7.0), 7.0);
    }

    #[test]
    fn converges_on_exact_line() {
        // y = 2 + 3x over a repeating x pattern.
        let mut model = RecursiveLeastSquares::new();
        for i in 0..50 {
            let x = (i % 7) as f64;
            model.update(x, 2.0 + 3.0 * x);
        }
        assert!(approx_eq(model.intercept(), 2.0, 0.15));
        assert!(approx_eq(model.slope(), 3.0, 0.05));
        assert!(model.error() < 0.15);

        for i in 50..200 {
            let x = (i % 7) as f64;
            model.update(x, 2.0 + 3.0 * x);
        }
        assert!(approx_eq(model.intercept(), 2.0, 0.05));
        assert!(approx_eq(model.slope(), 3.0, 0.01));
        assert!(model.error() < 0.02);
    }

    #[test]
    fn covariance_update_is_outer_product() {
        let mut model = RecursiveLeastSquares::new();
        model.update(10.0, 100.0);
        // P = I - (P·Xᵀ)(X·P) / (1 + X·P·Xᵀ) with X = [1, 10].
        let p = model.covariance();
        assert!(approx_eq(p[(0, 0)], 101.0 / 102.0, 1e-12));
        assert!(approx_eq(p[(0, 1)], -10.0 / 102.0, 1e-12));
        assert!(approx_eq(p[(1, 0)], -10.0 / 102.0, 1e-12));
        assert!(approx_eq(p[(1, 1)], 2.0 / 102.0, 1e-12));
    }

    #[test]
    fn covariance_stays_symmetric() {
        let mut model = RecursiveLeastSquares::new();
        for i in 0..100 {
            let x = (i as f64 * 0.3).sin() * 5.0;
            model.update(x, 1.0 - 0.5 * x);
        }
        let p = model.covariance();
        assert!(approx_eq(p[(0, 1)], p[(1, 0)], 1e-9));
        assert!(p[(0, 0)] >= 0.0 && p[(1, 1)] >= 0.0);
    }
}
