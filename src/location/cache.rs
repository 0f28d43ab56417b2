//! Persisted last-known location.
//!
//! The cache is a tiny TOML file in the state directory:
//!
//! ```toml
//! latitude = 37.7747
//! longitude = -122.4182
//! timestamp = 1740160800
//! ```
//!
//! Scheduled runs can overlap, so readers and writers hold an exclusive lock
//! on a sidecar `location.lock` for the whole read-resolve-write sequence, and
//! the file itself is replaced atomically.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::common::constants::{LOCATION_CACHE_FILE_NAME, LOCATION_LOCK_FILE_NAME};
use crate::common::utils::private_path;
use crate::geo::GeoCoordinate;

/// The last location obtained from a real lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationCache {
    pub latitude: f64,
    pub longitude: f64,
    /// Unix seconds at which the lookup succeeded
    pub timestamp: i64,
}

impl LocationCache {
    pub fn new(coordinate: GeoCoordinate, at: DateTime<Utc>) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            timestamp: at.timestamp(),
        }
    }

    /// The cached coordinate, or `None` if the stored values are out of range.
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        GeoCoordinate::new(self.latitude, self.longitude).ok()
    }
}

/// Exclusive lock over the cache, released on drop.
pub struct CacheLock {
    file: File,
    state_dir: PathBuf,
}

impl CacheLock {
    /// Block until the cache in `state_dir` is ours.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        fs::create_dir_all(state_dir).with_context(|| {
            format!(
                "Failed to create state directory {}",
                private_path(state_dir)
            )
        })?;

        let lock_path = state_dir.join(LOCATION_LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open {}", private_path(&lock_path)))?;

        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {}", private_path(&lock_path)))?;

        Ok(Self {
            file,
            state_dir: state_dir.to_path_buf(),
        })
    }

    /// Read the cache. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<LocationCache>> {
        load_cache(&self.state_dir)
    }

    /// Replace the cache.
    pub fn store(&self, cache: &LocationCache) -> Result<()> {
        store_cache(&self.state_dir, cache)
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Read the cache file from `state_dir` without locking.
pub fn load_cache(state_dir: &Path) -> Result<Option<LocationCache>> {
    let path = state_dir.join(LOCATION_CACHE_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read location cache {}", private_path(&path)))?;
    let cache = toml::from_str(&content)
        .with_context(|| format!("Failed to parse location cache {}", private_path(&path)))?;

    Ok(Some(cache))
}

/// Atomically write the cache file into `state_dir` without locking.
pub fn store_cache(state_dir: &Path, cache: &LocationCache) -> Result<()> {
    fs::create_dir_all(state_dir)?;
    let path = state_dir.join(LOCATION_CACHE_FILE_NAME);

    let content = toml::to_string(cache).context("Failed to serialize location cache")?;

    let mut staged = NamedTempFile::new_in(state_dir)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    staged
        .persist(&path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write location cache {}", private_path(&path)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn sample() -> LocationCache {
        LocationCache {
            latitude: 37.7747,
            longitude: -122.4182,
            timestamp: 1_740_160_800,
        }
    }

    #[test]
    fn test_missing_cache_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(load_cache(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempdir().unwrap();
        store_cache(dir.path(), &sample()).unwrap();
        assert_eq!(load_cache(dir.path()).unwrap(), Some(sample()));
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LOCATION_CACHE_FILE_NAME), "latitude = \"north\"").unwrap();
        assert!(load_cache(dir.path()).is_err());
    }

    #[test]
    fn test_lock_creates_state_dir_and_round_trips() {
        let dir = tempdir().unwrap();
        let state_dir = dir.path().join("solarwall").join("default");

        let lock = CacheLock::acquire(&state_dir).unwrap();
        assert_eq!(lock.load().unwrap(), None);
        lock.store(&sample()).unwrap();
        assert_eq!(lock.load().unwrap(), Some(sample()));
        drop(lock);

        // Released on drop, so a second acquisition does not block
        let again = CacheLock::acquire(&state_dir).unwrap();
        assert_eq!(again.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_new_stamps_lookup_time() {
        let at = Utc.with_ymd_and_hms(2025, 2, 21, 18, 0, 0).unwrap();
        let coordinate = GeoCoordinate::new(-33.8688, 151.2093).unwrap();
        let cache = LocationCache::new(coordinate, at);
        assert_eq!(cache.timestamp, at.timestamp());
        assert_eq!(cache.coordinate(), Some(coordinate));
    }
}
