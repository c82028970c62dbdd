//! Analysis engine for an interval count series.
//!
//! [`analyze`] is a pure function of the series and the parameters: it
//! reads no clock, holds no state and never fails. Degenerate inputs show up
//! as `None` fields or explicit sentinels in the snapshot.

pub mod interpret;
pub mod report;
pub mod stationarity;

pub use interpret::{interpret, Dependence, Flow, Interpretation};
pub use report::{render_markdown, render_report, render_summary};
pub use stationarity::{assess_stationarity, Stationarity, StationarityVerdict};

use serde::Serialize;
use tally_config::AnalysisSettings;
use tally_math::{
    dispersion_index, lag1_autocorrelation, mean, moving_average, prob_at_least_one,
    sample_variance,
};

/// Message carried by the snapshot of an empty series.
pub const NO_DATA_MESSAGE: &str = "No data yet.";

/// Tunable analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisParams {
    pub moving_average_window: usize,
    pub block_size: usize,
    pub stationarity_threshold: f64,
    pub max_acf_lags: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            moving_average_window: 5,
            block_size: 10,
            stationarity_threshold: 0.2,
            max_acf_lags: 10,
        }
    }
}

impl From<&AnalysisSettings> for AnalysisParams {
    fn from(settings: &AnalysisSettings) -> Self {
        AnalysisParams {
            moving_average_window: settings.moving_average_window,
            block_size: settings.block_size,
            stationarity_threshold: settings.stationarity_threshold,
            max_acf_lags: settings.max_acf_lags,
        }
    }
}

/// Variance-to-mean ratio, or the unbounded sentinel when the mean is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Dispersion {
    Index(f64),
    Unbounded,
}

impl Dispersion {
    pub fn from_moments(variance: f64, mean: f64) -> Self {
        match dispersion_index(variance, mean) {
            Some(index) => Dispersion::Index(index),
            None => Dispersion::Unbounded,
        }
    }

    /// Numeric value; infinity for the unbounded case.
    pub fn value(self) -> f64 {
        match self {
            Dispersion::Index(v) => v,
            Dispersion::Unbounded => f64::INFINITY,
        }
    }
}

impl std::fmt::Display for Dispersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispersion::Index(v) => write!(f, "{:.2}", v),
            Dispersion::Unbounded => write!(f, "∞"),
        }
    }
}

/// Next-interval forecast under a homogeneous Poisson model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Forecast {
    /// Expected count next interval (equals λ).
    pub expected_count: f64,
    pub prob_at_least_one: f64,
}

impl Forecast {
    pub fn poisson(lambda: f64) -> Self {
        Forecast {
            expected_count: lambda,
            prob_at_least_one: prob_at_least_one(lambda),
        }
    }
}

/// Full diagnostics for a non-empty series. Values keep full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub observations: usize,
    pub lambda: f64,
    pub variance: f64,
    pub dispersion: Dispersion,
    pub moving_average: Vec<f64>,
    pub moving_average_window: usize,
    pub stationarity: Stationarity,
    /// Lag-1 sample autocorrelation; `None` when it cannot be estimated.
    pub autocorrelation: Option<f64>,
    pub forecast: Forecast,
    pub interpretation: Interpretation,
}

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisSnapshot {
    NoData { message: String },
    Ready(Diagnostics),
}

impl AnalysisSnapshot {
    pub fn empty() -> Self {
        AnalysisSnapshot::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            AnalysisSnapshot::Ready(d) => Some(d),
            AnalysisSnapshot::NoData { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AnalysisSnapshot::Ready(_))
    }
}

impl Default for AnalysisSnapshot {
    fn default() -> Self {
        AnalysisSnapshot::empty()
    }
}

/// Analyze a count series.
pub fn analyze(series: &[u64], params: &AnalysisParams) -> AnalysisSnapshot {
    if series.is_empty() {
        return AnalysisSnapshot::empty();
    }

    let values: Vec<f64> = series.iter().map(|&v| v as f64).collect();
    let n = values.len();

    let lambda = mean(&values);
    let variance = sample_variance(&values);
    let dispersion = Dispersion::from_moments(variance, lambda);
    let smoothed = moving_average(&values, params.moving_average_window);
    let stationarity =
        assess_stationarity(&values, params.block_size, params.stationarity_threshold);
    // Too short, constant or non-finite series all read as "cannot be estimated"
    let autocorrelation = lag1_autocorrelation(&values, params.max_acf_lags).ok();
    let forecast = Forecast::poisson(lambda);
    let interpretation = interpret(
        n,
        stationarity.verdict,
        autocorrelation,
        forecast.expected_count,
    );

    AnalysisSnapshot::Ready(Diagnostics {
        observations: n,
        lambda,
        variance,
        dispersion,
        moving_average: smoothed,
        moving_average_window: params.moving_average_window,
        stationarity,
        autocorrelation,
        forecast,
        interpretation,
    })
}
