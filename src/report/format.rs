//! Plain-text rendering of run metrics.
//!
//! Returns strings; printing is up to the caller.

use crate::report::{RunMetrics, UncertaintyStats};

/// Names used for the two sources and the fused output in the summary.
#[derive(Debug, Clone)]
pub struct SummaryLabels<'a> {
    pub source1: &'a str,
    pub source2: &'a str,
    pub fused: &'a str,
}

impl Default for SummaryLabels<'_> {
    fn default() -> Self {
        Self {
            source1: "Station",
            source2: "Model",
            fused: "Assimilated",
        }
    }
}

pub fn format_metrics(metrics: &RunMetrics, labels: &SummaryLabels<'_>) -> String {
    let mut out = String::new();
    let SummaryLabels {
        source1,
        source2,
        fused,
    } = labels;

    out.push_str(&format!(
        "RMSE ({source1} and {source2}): {}\n",
        fmt_opt(metrics.rmse_sources)
    ));
    out.push_str(&format!(
        "RMSE ({source1} and {fused}): {}\n",
        fmt_opt(metrics.rmse_source1_fused)
    ));
    out.push_str(&format!(
        "RMSE ({source2} and {fused}): {}\n",
        fmt_opt(metrics.rmse_source2_fused)
    ));

    out.push_str(&format!(
        "Uncertainty ({source1}): {}\n",
        fmt_stats(metrics.source1_uncertainty)
    ));
    out.push_str(&format!(
        "Uncertainty ({source2}): {}\n",
        fmt_stats(metrics.source2_uncertainty)
    ));
    if let Some(stats) = metrics.calibrated_uncertainty {
        out.push_str(&format!("Uncertainty ({source2} calibrated): {stats}\n"));
    }
    out.push_str(&format!(
        "Uncertainty ({fused}): {}\n",
        fmt_stats(metrics.fused_uncertainty)
    ));

    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "-".to_string(),
    }
}

fn fmt_stats(stats: Option<UncertaintyStats>) -> String {
    stats.map_or_else(|| "-".to_string(), |s| s.to_string())
}
