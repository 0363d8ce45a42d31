//! Configuration loading from files.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ConfigError, Result};

use super::AppConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_FILE_ENV: &str = "PITILT_CONFIG_FILE";

/// Environment variable overriding the state file location.
pub const STATE_FILE_ENV: &str = "PITILT_STATE_FILE";

/// Config file used when [`CONFIG_FILE_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/pitilt/config.toml";

/// State file used when [`STATE_FILE_ENV`] is unset.
pub const DEFAULT_STATE_FILE: &str = "/var/lib/pitilt/state.json";

/// Resolve the config file path from the environment.
pub fn config_file_path() -> PathBuf {
    let path = env::var_os(CONFIG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    info!(config_file = %path.display(), "using config file");
    path
}

/// Resolve the state file path from the environment.
pub fn state_file_path() -> PathBuf {
    let path = env::var_os(STATE_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));
    info!(state_file = %path.display(), "using state file");
    path
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file is missing, cannot be parsed, or fails
/// validation.
///
/// # Example
///
/// ```rust,ignore
/// use pitilt::config::{config_file_path, load_config};
///
/// let config = load_config(config_file_path())?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileMissing(path.display().to_string()).into());
    }

    let content = fs::read_to_string(path).map_err(ConfigError::from)?;
    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).map_err(ConfigError::from)?;

    super::validation::validate_config(&config)?;

    Ok(config)
}
