//! Core math modules.

pub mod autocorr;
pub mod descriptive;
pub mod poisson;
pub mod smoothing;
pub mod stable;
