//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::settings::Settings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    let session = &settings.session;
    require_positive("session.interval_secs", session.interval_secs)?;
    require_positive("session.tick_millis", session.tick_millis)?;

    let analysis = &settings.analysis;
    require_positive(
        "analysis.moving_average_window",
        analysis.moving_average_window as u64,
    )?;
    if analysis.block_size < 2 {
        return Err(ValidationError::InvalidValue {
            field: "analysis.block_size".to_string(),
            message: format!("Must be at least 2, got {}", analysis.block_size),
        });
    }
    if !analysis.stationarity_threshold.is_finite() || analysis.stationarity_threshold <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "analysis.stationarity_threshold".to_string(),
            message: format!(
                "Must be a positive finite number, got {}",
                analysis.stationarity_threshold
            ),
        });
    }
    require_positive("analysis.max_acf_lags", analysis.max_acf_lags as u64)?;

    let history = &settings.history;
    require_positive("history.save_every", u64::from(history.save_every))?;
    if history.enabled && history.path.as_os_str().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "history.path".to_string(),
            message: "Must not be empty when history is enabled".to_string(),
        });
    }

    Ok(())
}

fn require_positive(field: &str, value: u64) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "Must be positive, got 0".to_string(),
        });
    }
    Ok(())
}
