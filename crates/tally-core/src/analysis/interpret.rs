//! Plain-language reading of the diagnostics.
//!
//! Bucket thresholds are fixed; they are part of how reports read, not
//! tuning knobs.

use serde::Serialize;

use super::stationarity::StationarityVerdict;

/// Below this many observations the interpretation is flagged unreliable.
pub const MIN_INTERPRETABLE: usize = 5;
/// `|r1|` above this is strong dependence.
pub const STRONG_DEPENDENCE: f64 = 0.4;
/// `|r1|` above this (and not strong) is mild dependence.
pub const MILD_DEPENDENCE: f64 = 0.1;
/// Expected count above this is high flow.
pub const HIGH_FLOW: f64 = 1.5;
/// Expected count above this (and not high) is moderate flow.
pub const MODERATE_FLOW: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependence {
    Strong,
    Mild,
    Weak,
    Undetermined,
}

impl Dependence {
    pub fn from_autocorrelation(r1: Option<f64>) -> Self {
        match r1.map(f64::abs) {
            None => Dependence::Undetermined,
            Some(a) if a > STRONG_DEPENDENCE => Dependence::Strong,
            Some(a) if a > MILD_DEPENDENCE => Dependence::Mild,
            Some(_) => Dependence::Weak,
        }
    }

    fn sentence(self) -> &'static str {
        match self {
            Dependence::Strong => {
                "Strong dependence between consecutive intervals: events tend to come in episodes."
            }
            Dependence::Mild => "Mild dependence between consecutive intervals.",
            Dependence::Weak => "Weak dependence: consecutive intervals look roughly independent.",
            Dependence::Undetermined => "Autocorrelation cannot be estimated from this series.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    High,
    Moderate,
    Rare,
}

impl Flow {
    pub fn from_expected(expected: f64) -> Self {
        if expected > HIGH_FLOW {
            Flow::High
        } else if expected > MODERATE_FLOW {
            Flow::Moderate
        } else {
            Flow::Rare
        }
    }

    fn sentence(self) -> &'static str {
        match self {
            Flow::High => "Expect several events per interval (high flow).",
            Flow::Moderate => "Expect about one event per interval (moderate flow).",
            Flow::Rare => "Events are rare: most intervals should see 0 or 1 (low flow).",
        }
    }
}

fn stationarity_sentence(verdict: StationarityVerdict) -> &'static str {
    match verdict {
        StationarityVerdict::Stationary => {
            "The process looks stationary: the mean rate holds steady over time."
        }
        StationarityVerdict::NonStationary => {
            "The process looks non-stationary: the mean rate shifts between blocks of intervals."
        }
        StationarityVerdict::InsufficientData => {
            "Not enough complete blocks yet to judge stationarity."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    /// False when fewer than [`MIN_INTERPRETABLE`] observations exist.
    pub reliable: bool,
    pub dependence: Dependence,
    pub flow: Flow,
    pub sentences: Vec<String>,
}

/// Build the interpretation for a series of `n` observations.
///
/// Buckets are always filled in; the sentences collapse to a single warning
/// when the series is too short to read.
pub fn interpret(
    n: usize,
    verdict: StationarityVerdict,
    autocorrelation: Option<f64>,
    expected_count: f64,
) -> Interpretation {
    let dependence = Dependence::from_autocorrelation(autocorrelation);
    let flow = Flow::from_expected(expected_count);
    let reliable = n >= MIN_INTERPRETABLE;

    let sentences = if reliable {
        vec![
            stationarity_sentence(verdict).to_string(),
            dependence.sentence().to_string(),
            flow.sentence().to_string(),
        ]
    } else {
        vec![format!(
            "Too few intervals for a reliable interpretation (fewer than {}).",
            MIN_INTERPRETABLE
        )]
    };

    Interpretation {
        reliable,
        dependence,
        flow,
        sentences,
    }
}
