//! Coordinate to timezone lookup.
//!
//! Used only for display: transition instants are logged in the timezone of
//! the coordinates as well as the local one, which matters when the location
//! comes from a configured place far from the machine's own zone.

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

// Building the finder decodes the embedded polygon data, so do it once
static FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Determine the IANA timezone for a coordinate.
///
/// Falls back to UTC for open ocean or names chrono-tz does not know.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    let name = FINDER.get_tz_name(longitude, latitude);
    name.parse::<Tz>().unwrap_or(Tz::UTC)
}
