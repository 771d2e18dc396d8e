//! Blending coefficients and the uncertainty of a blend.
//!
//! For two estimates `v1 ± e1`, `v2 ± e2` with error covariance `c`, the
//! minimum-variance unbiased combination is
//!
//! ```text
//! k     = (e2² - c) / (e1² + e2² - 2c)
//! fused = k·v1 + (1-k)·v2
//! σ²    = k²e1² + (1-k)²e2² + 2k(1-k)c
//! ```
//!
//! Two bounds bracket `σ` for `0 ≤ c ≤ e1·e2`:
//! - L1 = `k·e1 + (1-k)·e2` (fully correlated sources)
//! - L2 = `sqrt((k·e1)² + ((1-k)·e2)²)` (uncorrelated sources)

use tracing::debug;

use crate::domain::UncertaintyMethod;

/// Correlation-aware coefficient for source1, clamped to `[0, 1]`.
///
/// A zero denominator means both errors vanish (or cancel); source1 is then
/// trusted fully.
pub fn pair_coefficient(err1: f64, err2: f64, cov: f64) -> f64 {
    let denom = err1 * err1 + err2 * err2 - 2.0 * cov;
    if denom == 0.0 {
        debug!(err1, err2, cov, "degenerate blend denominator; k = 1");
        return 1.0;
    }
    ((err2 * err2 - cov) / denom).clamp(0.0, 1.0)
}

/// Inverse-variance coefficient for the newer of two uncorrelated estimates.
pub fn sequential_coefficient(pred_err: f64, new_err: f64) -> f64 {
    let pred_var = pred_err * pred_err;
    let denom = pred_var + new_err * new_err;
    if denom == 0.0 {
        debug!(pred_err, new_err, "degenerate sequential denominator; k = 1");
        return 1.0;
    }
    pred_var / denom
}

/// `sqrt(|k²e1² + (1-k)²e2² + 2k(1-k)c|)`.
///
/// The absolute value absorbs tiny negative results from cancellation when the
/// correlation is close to ±1.
pub fn direct_uncertainty(err1: f64, err2: f64, k: f64, cov: f64) -> f64 {
    ((k * err1).powi(2) + ((1.0 - k) * err2).powi(2) + 2.0 * k * (1.0 - k) * cov)
        .abs()
        .sqrt()
}

/// Upper bound: errors add linearly.
pub fn l1_uncertainty(err1: f64, err2: f64, k: f64) -> f64 {
    k * err1 + (1.0 - k) * err2
}

/// Lower bound: errors add in quadrature.
pub fn l2_uncertainty(err1: f64, err2: f64, k: f64) -> f64 {
    ((k * err1).powi(2) + ((1.0 - k) * err2).powi(2)).sqrt()
}

/// The direct uncertainty written as an interpolation between L1 and L2.
pub fn l1l2_uncertainty(err1: f64, err2: f64, k: f64, cov: f64) -> f64 {
    let l1 = l1_uncertainty(err1, err2, k);
    let l2 = l2_uncertainty(err1, err2, k);
    if l1 == l2 {
        return l2;
    }
    let target = (l2 * l2 + 2.0 * k * (1.0 - k) * cov).abs().sqrt();
    let alpha = (target - l1) / (l2 - l1);
    alpha * l2 + (1.0 - alpha) * l1
}

pub fn combined_uncertainty(
    method: UncertaintyMethod,
    err1: f64,
    err2: f64,
    k: f64,
    cov: f64,
) -> f64 {
    match method {
        UncertaintyMethod::Direct => direct_uncertainty(err1, err2, k, cov),
        UncertaintyMethod::L1L2 => l1l2_uncertainty(err1, err2, k, cov),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn exact_source_wins_outright() {
        let k = pair_coefficient(0.0, 2.0, 0.0);
        assert_eq!(k, 1.0);
        assert_eq!(direct_uncertainty(0.0, 2.0, k, 0.0), 0.0);
    }

    #[test]
    fn zero_errors_trust_first_source() {
        assert_eq!(pair_coefficient(0.0, 0.0, 0.0), 1.0);
        assert_eq!(sequential_coefficient(0.0, 0.0), 1.0);
    }

    #[test]
    fn uncorrelated_is_inverse_variance() {
        // e1 = 1, e2 = 2 -> k = 4 / 5.
        let k = pair_coefficient(1.0, 2.0, 0.0);
        assert!(approx_eq(k, 0.8, 1e-12));
        assert!(approx_eq(
            direct_uncertainty(1.0, 2.0, k, 0.0),
            (0.64f64 + 0.16).sqrt(),
            1e-12
        ));
    }

    #[rstest]
    #[case(1.0, 2.0, 0.0)]
    #[case(1.0, 2.0, 1.9)]
    #[case(3.0, 0.5, -1.4)]
    #[case(0.2, 0.2, 0.04)]
    #[case(5.0, 0.0, 0.0)]
    #[case(1.0, 1.0, 2.0)]
    fn coefficient_stays_in_unit_interval(#[case] e1: f64, #[case] e2: f64, #[case] cov: f64) {
        let k = pair_coefficient(e1, e2, cov);
        assert!((0.0..=1.0).contains(&k), "k = {k}");
    }

    #[rstest]
    #[case(1.0, 2.0, 0.0)]
    #[case(1.0, 2.0, 1.5)]
    #[case(2.5, 0.7, 0.9)]
    #[case(2.5, 0.7, -0.3)]
    fn recursive_form_matches_direct(#[case] e1: f64, #[case] e2: f64, #[case] cov: f64) {
        let k = pair_coefficient(e1, e2, cov);
        let direct = combined_uncertainty(UncertaintyMethod::Direct, e1, e2, k, cov);
        let l1l2 = combined_uncertainty(UncertaintyMethod::L1L2, e1, e2, k, cov);
        assert!(approx_eq(direct, l1l2, 1e-9), "{direct} vs {l1l2}");
    }

    #[test]
    fn direct_lies_between_bounds_for_positive_correlation() {
        let (e1, e2) = (1.5, 0.8);
        for corr in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let cov = corr * e1 * e2;
            for k in [0.1, 0.3, 0.5, 0.7, 0.95] {
                let d = direct_uncertainty(e1, e2, k, cov);
                assert!(d <= l1_uncertainty(e1, e2, k) + 1e-12);
                assert!(d + 1e-12 >= l2_uncertainty(e1, e2, k));
            }
        }
    }

    #[test]
    fn sequential_coefficient_favours_smaller_error() {
        assert!(approx_eq(sequential_coefficient(2.0, 1.0), 0.8, 1e-12));
        assert!(approx_eq(sequential_coefficient(1.0, 2.0), 0.2, 1e-12));
    }
}
