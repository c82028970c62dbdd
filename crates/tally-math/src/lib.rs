//! Tally math utilities.

pub mod math;

pub use math::autocorr::*;
pub use math::descriptive::*;
pub use math::poisson::*;
pub use math::smoothing::*;
pub use math::stable::*;
