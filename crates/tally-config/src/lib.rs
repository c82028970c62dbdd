//! Tally configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{load_settings, resolve_settings_path, ConfigSource, ResolvedSettings};
pub use settings::{AnalysisSettings, HistorySettings, SessionSettings, Settings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
