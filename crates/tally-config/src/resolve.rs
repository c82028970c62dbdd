//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths → defaults.

use std::path::{Path, PathBuf};

use crate::settings::Settings;
use crate::validate::{validate_settings, ValidationError, ValidationResult};

/// Where the settings file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "TALLY_CONFIG";
pub const ENV_CONFIG_DIR: &str = "TALLY_CONFIG_DIR";
pub const ENV_HISTORY_PATH: &str = "TALLY_HISTORY";

/// Standard settings file name.
const SETTINGS_FILENAME: &str = "settings.json";

/// Application name for XDG directories.
const APP_NAME: &str = "tally";

/// Settings together with their provenance.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    /// File the settings came from (None for built-in defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Find the settings file using the standard resolution order.
///
/// 1. Explicit CLI path (returned even if missing, so loading reports it)
/// 2. TALLY_CONFIG environment variable
/// 3. TALLY_CONFIG_DIR environment variable + settings.json
/// 4. XDG config directory (~/.config/tally/settings.json)
/// 5. Built-in defaults (None)
pub fn resolve_settings_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Resolve, load and validate settings.
///
/// `TALLY_HISTORY`, when set, overrides `history.path` after loading.
pub fn load_settings(cli_path: Option<&Path>) -> ValidationResult<ResolvedSettings> {
    let (path, source) = resolve_settings_path(cli_path);

    let mut settings = match &path {
        Some(p) => {
            if !p.exists() {
                return Err(ValidationError::IoError(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            Settings::from_file(p)?
        }
        None => Settings::default(),
    };

    if let Ok(history) = std::env::var(ENV_HISTORY_PATH) {
        if !history.is_empty() {
            settings.history.path = PathBuf::from(history);
        }
    }

    validate_settings(&settings)?;

    Ok(ResolvedSettings {
        settings,
        path,
        source,
    })
}

/// Get the XDG config directory for tally.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
