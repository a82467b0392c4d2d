//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and resolving where the persisted note lives.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use inspekt::{InspektError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for InspektError {
    fn from(err: ConfigError) -> Self {
        InspektError::Config(err.to_string())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "inspekt", "inspekt")
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (inspekt/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or fails validation
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, InspektError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("inspekt/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = project_dirs() {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, InspektError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;

    Ok(config)
}

/// Rejects values that would only fail later, deep inside a sketch or export.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .sketch()
        .background()
        .and_then(|_| config.sketch().stroke())
        .map_err(ConfigError::Validation)?;

    let quality = config.export().jpeg_quality();
    if !(1..=100).contains(&quality) {
        return Err(ConfigError::Validation(format!(
            "jpeg_quality must be between 1 and 100, got {quality}"
        )));
    }
    Ok(())
}

/// Location of the persisted note file.
///
/// Uses the configured path when set, otherwise `notes.json` in the
/// platform data directory.
pub fn notes_path(config: &AppConfig) -> Result<PathBuf, InspektError> {
    if let Some(path) = config.notes().path() {
        return Ok(path.clone());
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().join("notes.json"))
        .ok_or_else(|| {
            ConfigError::Validation(
                "no data directory available; set [notes] path in the configuration".to_string(),
            )
            .into()
        })
}
