//! Application-wide constants and defaults.

use std::time::Duration;

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

// # File names

pub const CONFIG_FILE_NAME: &str = "solarwall.toml";
pub const GEO_FILE_NAME: &str = "geo.toml";
pub const METADATA_FILE_NAME: &str = "solar.json";
pub const LOCATION_CACHE_FILE_NAME: &str = "location.toml";
pub const LOCATION_LOCK_FILE_NAME: &str = "location.lock";
pub const APP_DIR_NAME: &str = "solarwall";

// # Defaults

/// San Francisco, used when no location can be resolved at all.
pub const DEFAULT_LATITUDE: f64 = 37.774_722_222_222_22;
pub const DEFAULT_LONGITUDE: f64 = -122.418_222_222_222_22;

pub const DEFAULT_DESTINATION: &str = "/tmp/img.jpg";
pub const DEFAULT_CACHE_MINUTES: i64 = 60;
pub const DEFAULT_LOCATION_TIMEOUT: u64 = 5; // seconds
pub const DEFAULT_TRANSITION_STEP: u64 = 60; // seconds
pub const DEFAULT_FRAME_TEMPLATE: &str = "{index}.jpg";

// # Validation ranges

pub const MINIMUM_CACHE_MINUTES: i64 = -1;
pub const MINIMUM_LOCATION_TIMEOUT: u64 = 1;
pub const MAXIMUM_LOCATION_TIMEOUT: u64 = 60;
pub const MINIMUM_TRANSITION_STEP: u64 = 1;
pub const MAXIMUM_TRANSITION_STEP: u64 = 3600;

// # Solar calculation

/// Refraction correction is skipped at or above this elevation.
pub const REFRACTION_CUTOFF_ELEVATION: f64 = 85.0;

/// Refraction correction is skipped at or below this elevation.
///
/// The formula's tangent argument reaches 90° here, so the correction has
/// already fallen to zero; just below it the argument runs into the pole
/// at -5°.
pub const REFRACTION_LOWER_ELEVATION: f64 = -4.89;

// # Transition search

pub const TRANSITION_SEARCH_HORIZON: Duration = Duration::from_secs(24 * 60 * 60);

/// Emitted as "next transition" when no frame could be selected.
pub const NO_SELECTION_RETRY: Duration = Duration::from_secs(60 * 60);

// # Location lookup

pub const LOCATION_POLL_INTERVAL: Duration = Duration::from_millis(100);
