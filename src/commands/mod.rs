//! Command-line command handlers for solarwall.
//!
//! Each command is implemented in its own submodule. The location resolution
//! shared by `run` and `position` lives here.

pub mod frames;
pub mod position;
pub mod run;

use anyhow::Result;
use chrono::{DateTime, Local, Offset, Utc};

use crate::config::Config;
use crate::geo::{GeoCoordinate, determine_timezone_from_coordinates};
use crate::location::cache::CacheLock;
use crate::location::{LocationSource, Resolution, resolve_location};

/// Resolve the observer location for this run.
///
/// Configured coordinates win outright. Otherwise the cache is consulted
/// under an exclusive lock, the location command is run if needed, and a
/// successful lookup is written back before the lock is released. Cache
/// and lookup problems are logged and never fail the run.
pub(crate) fn resolve_observer(
    config: &Config,
    now: DateTime<Utc>,
    debug_enabled: bool,
) -> Result<Resolution> {
    if let Some(coordinate) = config.fixed_location() {
        return Ok(Resolution {
            coordinate,
            source: LocationSource::Configured,
            updated_cache: None,
        });
    }

    let policy = config.cache_policy()?;
    if debug_enabled {
        log_debug!("Location cache policy: {}", policy);
    }

    let lock = match crate::state::current_state_dir().and_then(|dir| CacheLock::acquire(&dir)) {
        Ok(lock) => Some(lock),
        Err(e) => {
            log_pipe!();
            log_warning!("Location cache unavailable: {e:#}");
            None
        }
    };

    let cached = lock.as_ref().and_then(|lock| match lock.load() {
        Ok(cached) => cached,
        Err(e) => {
            log_pipe!();
            log_warning!("Ignoring unreadable location cache: {e:#}");
            None
        }
    });

    let provider = config.location_provider();
    let resolution = resolve_location(policy, cached, now, config.fallback_location(), || {
        let provider = provider.as_ref()?;
        if debug_enabled {
            log_debug!("Running location command");
        }
        match provider.lookup() {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                log_pipe!();
                log_warning!("Location lookup failed: {e:#}");
                None
            }
        }
    });

    if let (Some(lock), Some(update)) = (lock.as_ref(), resolution.updated_cache.as_ref())
        && let Err(e) = lock.store(update)
    {
        log_pipe!();
        log_warning!("Failed to update location cache: {e:#}");
    }

    Ok(resolution)
}

/// Format an instant in local time and in the timezone of `location`.
pub(crate) fn describe_instant(instant: DateTime<Utc>, location: GeoCoordinate) -> String {
    let local = instant.with_timezone(&Local);
    let tz = determine_timezone_from_coordinates(location.latitude, location.longitude);
    let remote = instant.with_timezone(&tz);

    let local_text = local.format("%Y-%m-%d %H:%M:%S %Z").to_string();
    let remote_text = remote.format("%Y-%m-%d %H:%M:%S %Z").to_string();
    if local.offset().fix() == remote.offset().fix() {
        local_text
    } else {
        format!("{local_text} ({remote_text} at location)")
    }
}
