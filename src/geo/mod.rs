//! Geographic coordinates and solar geometry.
//!
//! ## Module Structure
//!
//! - [`solar`]: Low-precision solar ephemeris producing sun elevation and azimuth
//! - [`timezone`]: Coordinate to IANA timezone lookup, used for display
//!
//! Everything in here is pure: the same coordinate and instant always produce
//! bit-identical results, which the transition search relies on.

pub mod solar;
pub mod timezone;

pub use solar::{SolarPosition, compute_position};
pub use timezone::determine_timezone_from_coordinates;


/// An observer location in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Geographic latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Geographic longitude in degrees (-180 to +180)
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> anyhow::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!(
                "latitude must be between -90 and 90 degrees (got {})",
                latitude
            );
        }
        if !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!(
                "longitude must be between -180 and 180 degrees (got {})",
                longitude
            );
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Whether the observer is on or north of the equator.
    ///
    /// Decides which azimuth half counts as the rising phase.
    pub fn is_northern_hemisphere(&self) -> bool {
        self.latitude >= 0.0
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::common::utils::format_coordinates(
            self.latitude,
            self.longitude,
        ))
    }
}
