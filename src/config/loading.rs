//! Configuration loading functionality.
//!
//! Handles locating the configuration file, applying defaults, and managing
//! geo.toml overrides.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::validate_config;
use super::{Config, GeoConfig};
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
/// Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
/// Returns None if using the default directory.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Get the base configuration directory.
/// This returns the directory containing solarwall.toml and geo.toml.
pub fn get_config_base_dir() -> Result<PathBuf> {
    let config_path = get_config_path()?;
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Load configuration using automatic path detection.
///
/// A missing configuration file is not an error: the result is the default
/// configuration, still subject to a geo.toml override.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        let mut config = Config::default();
        load_geo_override_from_path(&mut config, &config_path)?;
        validate_config(&config)?;
        apply_defaults(&mut config);
        return Ok(config);
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// Unlike [`load`], the file must exist.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    // geo.toml is merged before validation so its values are validated too
    load_geo_override_from_path(&mut config, path)?;

    validate_config(&config)?;

    apply_defaults(&mut config);

    Ok(config)
}

/// Get the configuration file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = CONFIG_DIR.get().and_then(|d| d.clone()) {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Apply default values to configuration fields.
pub(crate) fn apply_defaults(config: &mut Config) {
    if config.default_latitude.is_none() {
        config.default_latitude = Some(DEFAULT_LATITUDE);
    }
    if config.default_longitude.is_none() {
        config.default_longitude = Some(DEFAULT_LONGITUDE);
    }

    if config.cache_minutes.is_none() {
        config.cache_minutes = Some(DEFAULT_CACHE_MINUTES);
    }
    if config.destination.is_none() {
        config.destination = Some(DEFAULT_DESTINATION.to_string());
    }
    if config.location_timeout.is_none() {
        config.location_timeout = Some(DEFAULT_LOCATION_TIMEOUT);
    }

    if config.transition_step.is_none() {
        config.transition_step = Some(DEFAULT_TRANSITION_STEP);
    }
    if config.frame_template.is_none() {
        config.frame_template = Some(DEFAULT_FRAME_TEMPLATE.to_string());
    }
}

/// Load geo.toml from the directory of a config path
pub(crate) fn load_geo_override_from_path(config: &mut Config, config_path: &Path) -> Result<()> {
    let geo_path = if let Some(parent) = config_path.parent() {
        parent.join(GEO_FILE_NAME)
    } else {
        return Ok(());
    };

    if !geo_path.exists() {
        return Ok(());
    }

    match fs::read_to_string(&geo_path) {
        Ok(content) => match toml::from_str::<GeoConfig>(&content) {
            Ok(geo_config) => {
                if let Some(lat) = geo_config.latitude {
                    config.latitude = Some(lat);
                }
                if let Some(lon) = geo_config.longitude {
                    config.longitude = Some(lon);
                }
            }
            Err(e) => {
                log_warning!("Failed to parse geo.toml: {e}. Using coordinates from main config.");
            }
        },
        Err(e) => {
            log_warning!("Failed to read geo.toml: {e}. Using coordinates from main config.");
        }
    }

    Ok(())
}
