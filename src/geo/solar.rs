//! Solar position calculation.
//!
//! Low-precision solar ephemeris: mean longitude and anomaly with a three-term
//! equation of centre, nutation-corrected apparent longitude and obliquity,
//! sidereal time for the hour angle, and an empirical refraction correction.
//! Accuracy is well under half a degree in elevation for current dates, which
//! is far finer than the spacing of wallpaper frames.

#![allow(clippy::many_single_char_names)]

use chrono::{DateTime, Utc};

use super::GeoCoordinate;
use crate::common::constants::{REFRACTION_CUTOFF_ELEVATION, REFRACTION_LOWER_ELEVATION};

/// Julian Day of the Unix epoch, 1970-01-01T00:00:00 UTC.
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian Day of J2000.0, 2000-01-01T12:00:00.
const JD_J2000: f64 = 2_451_545.0;

const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Apparent position of the sun for an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Degrees above the horizon, refraction included (-90 to +90)
    pub elevation: f64,
    /// Degrees clockwise from north (0 to 360, exclusive)
    pub azimuth: f64,
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Convert an instant to a fractional Julian Day.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let seconds =
        instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1_000_000_000.0;
    seconds / SECONDS_PER_DAY + JD_UNIX_EPOCH
}

/// Atmospheric refraction correction in degrees for a geometric elevation.
///
/// Zero at or above the cutoff near the zenith, and zero for a sun deep
/// enough below the horizon that the formula has tapered off. In between
/// the formula is used as is.
pub fn refraction_correction(elevation: f64) -> f64 {
    if elevation >= REFRACTION_CUTOFF_ELEVATION || elevation <= REFRACTION_LOWER_ELEVATION {
        return 0.0;
    }
    1.02 / (elevation + 10.3 / (elevation + 5.0)).to_radians().tan() / 60.0
}

/// Compute the sun's elevation and azimuth at `instant` as seen from `location`.
///
/// Pure and deterministic. `asin` arguments are clamped so rounding near the
/// horizon or the zenith never produces NaN.
pub fn compute_position(location: GeoCoordinate, instant: DateTime<Utc>) -> SolarPosition {
    let jd = julian_day(instant);
    let d = jd - JD_J2000;
    let t = d / DAYS_PER_JULIAN_CENTURY;

    // Geometric mean longitude and mean anomaly
    let l0 = (280.46646 + t * (36000.76983 + t * 0.0003032)).rem_euclid(360.0);
    let m = (357.52911 + t * (35999.05029 - 0.0001537 * t)).to_radians();

    // Equation of centre
    let c = m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * m).sin() * 0.000289;
    let true_longitude = l0 + c;

    // Apparent longitude, corrected for nutation and aberration
    let omega = (125.04 - 1934.136 * t).to_radians();
    let lambda = (true_longitude - 0.00569 - 0.00478 * omega.sin()).to_radians();

    // Obliquity of the ecliptic
    let mean_obliquity = 23.0 + 26.0 / 60.0 + 21.448 / 3600.0
        - t * (46.8150 + t * (0.00059 - t * 0.001813)) / 3600.0;
    let epsilon = (mean_obliquity + 0.00256 * omega.cos()).to_radians();

    // Equatorial coordinates
    let right_ascension = normalize_degrees(
        (epsilon.cos() * lambda.sin())
            .atan2(lambda.cos())
            .to_degrees(),
    );
    let declination = (epsilon.sin() * lambda.sin()).clamp(-1.0, 1.0).asin();

    // Sidereal time and hour angle
    let gmst = (280.46061837 + 360.98564736629 * d + 0.000387933 * t * t
        - t * t * t / 38_710_000.0)
        .rem_euclid(360.0);
    let local_sidereal = gmst + location.longitude;
    let hour_angle = normalize_degrees(local_sidereal - right_ascension).to_radians();

    // Horizontal coordinates
    let latitude = location.latitude.to_radians();
    let sin_elevation = latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.cos();
    let elevation = sin_elevation.clamp(-1.0, 1.0).asin().to_degrees();

    let azimuth = normalize_degrees(
        (hour_angle.sin() * declination.cos())
            .atan2(
                hour_angle.cos() * latitude.sin() * declination.cos()
                    - declination.sin() * latitude.cos(),
            )
            .to_degrees()
            + 180.0,
    );

    let corrected = (elevation + refraction_correction(elevation)).clamp(-90.0, 90.0);

    SolarPosition {
        elevation: corrected,
        azimuth,
    }
}
