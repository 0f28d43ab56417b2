//! Configuration system for solarwall.
//!
//! Everything solarwall needs can be given on the command line, so the
//! configuration file is optional. When present it fixes the location, tunes
//! the location cache and lookup, and changes where and how frames are read
//! and written.
//!
//! ## Configuration Sources
//!
//! `solarwall.toml` is read from the directory passed with `--config`, or from
//! **XDG_CONFIG_HOME**/solarwall/ otherwise. A missing file means defaults for
//! everything; no file is created.
//!
//! ```toml
//! #[Location]
//! latitude = 37.7747                # Fixed latitude (skips location lookup)
//! longitude = -122.4182             # Fixed longitude
//! default_latitude = 37.7747        # Fallback when no location can be found
//! default_longitude = -122.4182
//! location_command = "CoreLocationCLI -format '%latitude %longitude'"
//! location_timeout = 5              # Seconds to wait for the command (1-60)
//! cache_minutes = 60                # -1 = always use cache, 0 = never, n = max age
//!
//! #[Output]
//! destination = "/tmp/img.jpg"      # Where the selected frame is written
//! frame_template = "{index}.jpg"    # Frame file name beside the metadata
//! transition_step = 60              # Transition search step in seconds (1-3600)
//! ```
//!
//! ## Geo Override
//!
//! An optional `geo.toml` next to `solarwall.toml` can hold `latitude` and
//! `longitude` on their own. It overrides the main file, so the main
//! settings can be shared or version controlled while the location stays
//! private.

pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::common::constants::*;
use crate::common::utils::private_path;
use crate::geo::GeoCoordinate;
use crate::location::{CachePolicy, CommandProvider};

// Re-export public API
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Geographic configuration structure for storing coordinates separately.
///
/// This structure represents the optional geo.toml file that can store
/// latitude and longitude separately from the main configuration file.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GeoConfig {
    /// Geographic latitude in degrees (-90 to +90)
    pub(crate) latitude: Option<f64>,
    /// Geographic longitude in degrees (-180 to +180)
    pub(crate) longitude: Option<f64>,
}

/// Configuration structure for solarwall settings.
///
/// All fields are optional in the file. After loading, every field that has
/// a default is filled in; `latitude`, `longitude` and `location_command`
/// stay `None` unless configured.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Fixed observer latitude. Set together with `longitude`.
    pub latitude: Option<f64>,
    /// Fixed observer longitude. Set together with `latitude`.
    pub longitude: Option<f64>,

    pub default_latitude: Option<f64>,
    pub default_longitude: Option<f64>,

    /// Cache policy: -1 always, 0 never, n > 0 maximum age in minutes
    pub cache_minutes: Option<i64>,

    /// Path the selected frame is copied to
    pub destination: Option<String>,

    /// Shell command printing `latitude longitude`
    pub location_command: Option<String>,
    pub location_timeout: Option<u64>, // seconds

    pub transition_step: Option<u64>, // seconds
    /// Frame file name relative to the metadata, with `{index}` substituted
    pub frame_template: Option<String>,
}

impl Config {
    /// Get the path to the geo.toml file next to the active configuration.
    pub fn get_geo_path() -> Result<PathBuf> {
        Ok(loading::get_config_base_dir()?.join(GEO_FILE_NAME))
    }

    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// The configured fixed location, if both coordinates are set.
    pub fn fixed_location(&self) -> Option<GeoCoordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoCoordinate::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// Coordinate used when neither cache nor lookup can answer.
    pub fn fallback_location(&self) -> GeoCoordinate {
        let lat = self.default_latitude.unwrap_or(DEFAULT_LATITUDE);
        let lon = self.default_longitude.unwrap_or(DEFAULT_LONGITUDE);
        GeoCoordinate::new(lat, lon).unwrap_or(GeoCoordinate {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        })
    }

    pub fn cache_policy(&self) -> Result<CachePolicy> {
        CachePolicy::from_minutes(self.cache_minutes.unwrap_or(DEFAULT_CACHE_MINUTES))
    }

    pub fn destination_path(&self) -> PathBuf {
        PathBuf::from(
            self.destination
                .as_deref()
                .unwrap_or(DEFAULT_DESTINATION),
        )
    }

    /// The location lookup, if a command is configured.
    pub fn location_provider(&self) -> Option<CommandProvider> {
        let command = self.location_command.as_deref()?.trim();
        if command.is_empty() {
            return None;
        }
        Some(CommandProvider::new(
            command,
            Duration::from_secs(self.location_timeout.unwrap_or(DEFAULT_LOCATION_TIMEOUT)),
        ))
    }

    pub fn transition_step(&self) -> Duration {
        Duration::from_secs(self.transition_step.unwrap_or(DEFAULT_TRANSITION_STEP))
    }

    pub fn frame_template(&self) -> &str {
        self.frame_template
            .as_deref()
            .unwrap_or(DEFAULT_FRAME_TEMPLATE)
    }

    /// Print the effective settings.
    pub fn log_config(&self) {
        let config_path = get_config_path().ok();
        match config_path {
            Some(ref path) if path.exists() => {
                log_block_start!("Loaded configuration {}", private_path(path))
            }
            _ => log_block_start!("Using default configuration"),
        }

        if let Ok(geo_path) = Self::get_geo_path()
            && geo_path.exists()
        {
            log_indented!("Loaded coordinates from geo.toml");
        }

        match self.fixed_location() {
            Some(coordinate) => log_indented!("Location: {} (fixed)", coordinate),
            None => {
                match self.location_command.as_deref() {
                    Some(command) => log_indented!(
                        "Location command: {} ({}s timeout)",
                        command,
                        self.location_timeout.unwrap_or(DEFAULT_LOCATION_TIMEOUT)
                    ),
                    None => log_indented!("Location command: none"),
                }
                log_indented!("Fallback location: {}", self.fallback_location());
                match self.cache_policy() {
                    Ok(policy) => log_indented!("Location cache: {}", policy),
                    Err(e) => log_indented!("Location cache: invalid ({})", e),
                }
            }
        }

        log_indented!(
            "Destination: {}",
            private_path(&self.destination_path())
        );
        log_indented!("Frame template: {}", self.frame_template());
        log_indented!(
            "Transition step: {} seconds",
            self.transition_step().as_secs()
        );
    }
}

#[cfg(test)]
mod tests;
