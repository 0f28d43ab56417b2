//! Observer location resolution.
//!
//! A run needs one coordinate. It comes, in order of preference, from:
//!
//! 1. Coordinates fixed in the configuration (or `geo.toml`)
//! 2. The cached last-known location, when the cache policy accepts its age
//! 3. A fresh lookup through the configured location command
//! 4. The cached location regardless of age
//! 5. The configured default coordinate
//!
//! Steps 2-5 are decided by [`resolve_location`], a pure function: the cache
//! is an explicit value passed in and handed back, and the lookup is a
//! closure, so the whole policy is testable without touching the disk or
//! spawning anything.
//!
//! ## Module Structure
//!
//! - [`cache`]: The persisted last-known location and its file storage
//! - [`provider`]: Location lookup through an external command with a bounded wait

pub mod cache;
pub mod provider;

pub use cache::{LocationCache, load_cache, store_cache};
pub use provider::CommandProvider;

use chrono::{DateTime, Utc};

use crate::geo::GeoCoordinate;

/// How old a cached location may be before a fresh lookup is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Use any cached location, however old (`-1`)
    Always,
    /// Never use the cache for a fresh answer (`0`)
    Never,
    /// Use the cache while it is younger than this many minutes
    MaxAge(u32),
}

impl CachePolicy {
    /// Interpret a "minutes old" setting: `-1` always, `0` never, `n` minutes.
    pub fn from_minutes(minutes: i64) -> anyhow::Result<Self> {
        match minutes {
            -1 => Ok(CachePolicy::Always),
            0 => Ok(CachePolicy::Never),
            m if m > 0 => Ok(CachePolicy::MaxAge(u32::try_from(m).unwrap_or(u32::MAX))),
            m => anyhow::bail!(
                "cache minutes must be -1 (always), 0 (never) or a positive number (got {})",
                m
            ),
        }
    }

    /// Whether a cache entry written at `cached_at` may be used at `now`.
    pub fn accepts(&self, cached_at: i64, now: DateTime<Utc>) -> bool {
        match self {
            CachePolicy::Always => true,
            CachePolicy::Never => false,
            CachePolicy::MaxAge(minutes) => {
                now.timestamp() - cached_at < i64::from(*minutes) * 60
            }
        }
    }
}

impl std::fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CachePolicy::Always => write!(f, "always use cache"),
            CachePolicy::Never => write!(f, "never use cache"),
            CachePolicy::MaxAge(1) => write!(f, "cache up to 1 minute"),
            CachePolicy::MaxAge(minutes) => write!(f, "cache up to {minutes} minutes"),
        }
    }
}

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Configured,
    Cache,
    Lookup,
    StaleCache,
    Default,
}

impl LocationSource {
    pub fn describe(&self) -> &'static str {
        match self {
            LocationSource::Configured => "configuration",
            LocationSource::Cache => "cache",
            LocationSource::Lookup => "location lookup",
            LocationSource::StaleCache => "stale cache (lookup unavailable)",
            LocationSource::Default => "default coordinates (lookup unavailable)",
        }
    }
}

/// Outcome of location resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub coordinate: GeoCoordinate,
    pub source: LocationSource,
    /// A new cache value to persist, present only after a successful lookup
    pub updated_cache: Option<LocationCache>,
}

/// Resolve the observer location from the cache, a lookup, or the fallback.
///
/// `lookup` is only called when the cache cannot answer. A successful lookup
/// is returned as a fresh cache entry stamped `now`; fallbacks never are, so
/// the default coordinate cannot masquerade as a real fix later.
pub fn resolve_location<F>(
    policy: CachePolicy,
    cached: Option<LocationCache>,
    now: DateTime<Utc>,
    fallback: GeoCoordinate,
    lookup: F,
) -> Resolution
where
    F: FnOnce() -> Option<GeoCoordinate>,
{
    if let Some(cache) = cached
        && policy.accepts(cache.timestamp, now)
        && let Some(coordinate) = cache.coordinate()
    {
        return Resolution {
            coordinate,
            source: LocationSource::Cache,
            updated_cache: None,
        };
    }

    if let Some(coordinate) = lookup() {
        return Resolution {
            coordinate,
            source: LocationSource::Lookup,
            updated_cache: Some(LocationCache::new(coordinate, now)),
        };
    }

    if let Some(coordinate) = cached.and_then(|cache| cache.coordinate()) {
        return Resolution {
            coordinate,
            source: LocationSource::StaleCache,
            updated_cache: None,
        };
    }

    Resolution {
        coordinate: fallback,
        source: LocationSource::Default,
        updated_cache: None,
    }
}
