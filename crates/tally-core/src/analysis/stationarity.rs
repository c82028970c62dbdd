//! Block-mean stationarity check.
//!
//! The series is cut into disjoint blocks; a process whose block means
//! barely move relative to their average is called stationary.

use serde::Serialize;
use tally_history::StationarityFlag;
use tally_math::{block_means, mean, population_std_dev};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationarityVerdict {
    Stationary,
    NonStationary,
    InsufficientData,
}

impl StationarityVerdict {
    /// Short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            StationarityVerdict::Stationary => "stable",
            StationarityVerdict::NonStationary => "unstable",
            StationarityVerdict::InsufficientData => "insufficient data",
        }
    }

    /// Value written to the history file's stationarity column.
    pub fn history_flag(self) -> StationarityFlag {
        match self {
            StationarityVerdict::Stationary => StationarityFlag::Yes,
            StationarityVerdict::NonStationary => StationarityFlag::No,
            StationarityVerdict::InsufficientData => StationarityFlag::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stationarity {
    /// Coefficient of variation of the block means; `None` when undefined.
    pub score: Option<f64>,
    /// Number of complete blocks the score was computed from.
    pub blocks: usize,
    pub verdict: StationarityVerdict,
}

/// Score the series with blocks of `block_size` values.
///
/// Undefined (and `InsufficientData`) when fewer than two complete blocks
/// exist or when every block mean is zero.
pub fn assess_stationarity(values: &[f64], block_size: usize, threshold: f64) -> Stationarity {
    let means = block_means(values, block_size);
    let blocks = means.len();

    let score = if blocks < 2 {
        None
    } else {
        let centre = mean(&means);
        if centre == 0.0 {
            None
        } else {
            let cv = population_std_dev(&means) / centre;
            cv.is_finite().then_some(cv)
        }
    };

    let verdict = match score {
        None => StationarityVerdict::InsufficientData,
        Some(s) if s < threshold => StationarityVerdict::Stationary,
        Some(_) => StationarityVerdict::NonStationary,
    };

    Stationarity {
        score,
        blocks,
        verdict,
    }
}
