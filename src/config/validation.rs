//! Configuration validation functionality.
//!
//! Rejects values that would make a run meaningless: coordinates off the
//! globe, a half-specified fixed location, and steps or timeouts outside
//! their supported ranges.

use anyhow::Result;

use super::Config;
use crate::common::constants::*;

/// Validate every configured field. Unset fields are always valid.
pub fn validate_config(config: &Config) -> Result<()> {
    match (config.latitude, config.longitude) {
        (Some(_), None) => anyhow::bail!("latitude is set but longitude is missing"),
        (None, Some(_)) => anyhow::bail!("longitude is set but latitude is missing"),
        _ => {}
    }

    if let Some(lat) = config.latitude {
        validate_latitude(lat, "latitude")?;
    }
    if let Some(lon) = config.longitude {
        validate_longitude(lon, "longitude")?;
    }
    if let Some(lat) = config.default_latitude {
        validate_latitude(lat, "default_latitude")?;
    }
    if let Some(lon) = config.default_longitude {
        validate_longitude(lon, "default_longitude")?;
    }

    if let Some(minutes) = config.cache_minutes
        && minutes < MINIMUM_CACHE_MINUTES
    {
        anyhow::bail!(
            "cache_minutes must be -1 (always), 0 (never) or a positive number of minutes (got {})",
            minutes
        );
    }

    if let Some(timeout) = config.location_timeout
        && !(MINIMUM_LOCATION_TIMEOUT..=MAXIMUM_LOCATION_TIMEOUT).contains(&timeout)
    {
        anyhow::bail!(
            "location_timeout ({} s) must be between {} and {} seconds",
            timeout,
            MINIMUM_LOCATION_TIMEOUT,
            MAXIMUM_LOCATION_TIMEOUT
        );
    }

    if let Some(step) = config.transition_step
        && !(MINIMUM_TRANSITION_STEP..=MAXIMUM_TRANSITION_STEP).contains(&step)
    {
        anyhow::bail!(
            "transition_step ({} s) must be between {} and {} seconds",
            step,
            MINIMUM_TRANSITION_STEP,
            MAXIMUM_TRANSITION_STEP
        );
    }

    if let Some(ref template) = config.frame_template {
        validate_frame_template(template)?;
    }

    if let Some(ref destination) = config.destination
        && destination.trim().is_empty()
    {
        anyhow::bail!("destination must not be empty");
    }

    Ok(())
}

fn validate_latitude(value: f64, field: &str) -> Result<()> {
    if !(-90.0..=90.0).contains(&value) {
        anyhow::bail!("{field} must be between -90 and 90 degrees (got {value})");
    }
    Ok(())
}

fn validate_longitude(value: f64, field: &str) -> Result<()> {
    if !(-180.0..=180.0).contains(&value) {
        anyhow::bail!("{field} must be between -180 and 180 degrees (got {value})");
    }
    Ok(())
}

/// A template must name a relative file and contain `{index}`.
pub(crate) fn validate_frame_template(template: &str) -> Result<()> {
    if !template.contains("{index}") {
        anyhow::bail!("frame_template must contain {{index}} (got '{}')", template);
    }
    if template.starts_with('/') {
        anyhow::bail!(
            "frame_template must be relative to the metadata directory (got '{}')",
            template
        );
    }
    Ok(())
}
