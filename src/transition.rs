//! Next frame transition search.
//!
//! The selected frame only changes when the sun crosses the midpoint between
//! two frame altitudes or swaps phase at solar noon and midnight. Wallpapers
//! carry a few dozen frames at most, so changes are minutes to hours apart and
//! a fixed-step forward scan finds them with all the precision a scheduler
//! needs. The scan samples `start + step`, `start + 2·step`, ... and reports
//! the first sample whose selection differs from the current frame.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

use crate::common::constants::{DEFAULT_TRANSITION_STEP, TRANSITION_SEARCH_HORIZON};
use crate::geo::{GeoCoordinate, compute_position};
use crate::wallpaper::{WallpaperFrame, select_frame};

/// Find the next instant at which the selected frame differs from `current_index`.
///
/// Samples every minute for up to 24 hours. See [`next_transition_with_step`].
pub fn next_transition(
    frames: &[WallpaperFrame],
    location: GeoCoordinate,
    is_northern_hemisphere: bool,
    current_index: usize,
    start: DateTime<Utc>,
) -> DateTime<Utc> {
    next_transition_with_step(
        frames,
        location,
        is_northern_hemisphere,
        current_index,
        start,
        Duration::from_secs(DEFAULT_TRANSITION_STEP),
    )
}

/// Find the next instant at which the selected frame differs from `current_index`,
/// sampling every `step`.
///
/// Returns the first sample after `start` (within 24 hours) whose selection
/// is a different frame. A sample that selects nothing never counts as a
/// change. When no change is found the result is `start + 24h`.
pub fn next_transition_with_step(
    frames: &[WallpaperFrame],
    location: GeoCoordinate,
    is_northern_hemisphere: bool,
    current_index: usize,
    start: DateTime<Utc>,
    step: Duration,
) -> DateTime<Utc> {
    let horizon = start + TimeDelta::seconds(TRANSITION_SEARCH_HORIZON.as_secs() as i64);
    let step = TimeDelta::seconds(step.as_secs().max(1) as i64);

    let mut sample = start + step;
    while sample <= horizon {
        let position = compute_position(location, sample);
        if let Some(index) = select_frame(frames, &position, is_northern_hemisphere)
            && index != current_index
        {
            return sample;
        }
        sample += step;
    }

    horizon
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn frame(altitude: f64, index: usize) -> WallpaperFrame {
        WallpaperFrame {
            altitude,
            azimuth: 0.0,
            index,
        }
    }

    fn san_francisco() -> GeoCoordinate {
        GeoCoordinate::new(37.7749, -122.4194).unwrap()
    }

    #[test]
    fn test_single_frame_never_changes() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();
        let next = next_transition(&[frame(20.0, 0)], san_francisco(), true, 0, start);
        assert_eq!(next, start + TimeDelta::hours(24));
    }

    #[test]
    fn test_empty_frames_fall_back_to_horizon() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();
        let next = next_transition(&[], san_francisco(), true, 0, start);
        assert_eq!(next, start + TimeDelta::hours(24));
    }

    #[test]
    fn test_transition_lands_on_step_grid() {
        let start = Utc.with_ymd_and_hms(2025, 6, 21, 10, 0, 30).unwrap();
        let frames = [frame(-10.0, 0), frame(10.0, 1), frame(40.0, 2), frame(70.0, 3)];
        let location = san_francisco();

        let current = select_frame(&frames, &compute_position(location, start), true).unwrap();
        let next = next_transition(&frames, location, true, current, start);

        assert!(next > start);
        assert!(next <= start + TimeDelta::hours(24));
        assert_eq!((next - start).num_seconds() % 60, 0);
    }

    #[test]
    fn test_transition_is_first_differing_sample() {
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        let frames = [frame(-20.0, 0), frame(0.0, 1), frame(25.0, 2), frame(50.0, 3)];
        let location = san_francisco();

        let current = select_frame(&frames, &compute_position(location, start), true).unwrap();
        let next = next_transition(&frames, location, true, current, start);

        // Selection at the reported instant differs from the current frame
        let at_next = select_frame(&frames, &compute_position(location, next), true);
        assert_ne!(at_next, Some(current));

        // One step earlier (if after start) still shows the current frame
        let before = next - TimeDelta::minutes(1);
        if before > start {
            let at_before = select_frame(&frames, &compute_position(location, before), true);
            assert_eq!(at_before, Some(current));
        }
    }

    #[test]
    fn test_coarser_step_never_reports_earlier_change() {
        let start = Utc.with_ymd_and_hms(2025, 12, 5, 16, 0, 0).unwrap();
        let frames = [frame(-6.0, 0), frame(5.0, 1), frame(15.0, 2), frame(30.0, 3)];
        let location = san_francisco();
        let current = select_frame(&frames, &compute_position(location, start), true).unwrap();

        let fine = next_transition(&frames, location, true, current, start);
        let coarse = next_transition_with_step(
            &frames,
            location,
            true,
            current,
            start,
            Duration::from_secs(600),
        );
        assert!(coarse >= fine);
    }
}
