//! Time source abstraction for real and pinned time.
//!
//! Every "now" read in the commands goes through this module. Normally that
//! is the system clock; with `--at "YYYY-MM-DD HH:MM:SS"` the whole run is
//! evaluated at a fixed instant instead, which makes it possible to preview
//! which frame a wallpaper shows at a given moment and when it changes next.

use chrono::{DateTime, Local, TimeZone, Utc};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Check if this source is pinned to a fixed instant
    fn is_fixed(&self) -> bool;
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn is_fixed(&self) -> bool {
        false
    }
}

/// A clock that always reports the same instant.
pub struct FixedTimeSource {
    instant: DateTime<Local>,
}

impl FixedTimeSource {
    pub fn new(instant: DateTime<Local>) -> Self {
        Self { instant }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.instant
    }

    fn is_fixed(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Get the current time from the global time source as UTC
pub fn now_utc() -> DateTime<Utc> {
    now().with_timezone(&Utc)
}

/// Check if the run is pinned to a fixed instant
pub fn is_fixed() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_fixed()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as local time
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    use chrono::NaiveDateTime;

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| {
            Local
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| "Ambiguous or invalid local time".to_string())
        })
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
        .and_then(|r| r)
}
