//! Dynamic wallpaper frames and frame selection.
//!
//! A solar wallpaper is an ordered set of still frames, each tagged with the
//! sun altitude it depicts. Every altitude is passed twice a day, once while
//! the sun rises and once while it sets, so the selector walks the frames in
//! the order matching the current phase. That keeps animated gradients
//! playing forward through the day.
//!
//! ## Module Structure
//!
//! - [`metadata`]: Decoding the solar metadata document and locating frame files
//! - [`output`]: Atomic installation of the chosen frame at the destination

pub mod metadata;
pub mod output;

pub use metadata::{MetadataError, Wallpaper, load_wallpaper};
pub use output::install_frame;

use crate::geo::SolarPosition;

/// One still image in a dynamic wallpaper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallpaperFrame {
    /// Sun altitude the frame depicts, in degrees (negative below the horizon)
    pub altitude: f64,
    /// Sun azimuth the frame depicts, in degrees (informational)
    pub azimuth: f64,
    /// Position of the frame within the wallpaper container
    pub index: usize,
}

/// Light and dark appearance frames declared by the wallpaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub light: usize,
    pub dark: usize,
}

/// Whether the sun is on its way up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Rising,
    Falling,
}

impl Phase {
    /// Determine the phase from the solar azimuth.
    ///
    /// In the northern hemisphere the morning sun sits in the eastern half
    /// (azimuth up to 180°); south of the equator the halves swap.
    pub fn from_azimuth(azimuth: f64, is_northern_hemisphere: bool) -> Self {
        let rising = if is_northern_hemisphere {
            azimuth <= 180.0
        } else {
            azimuth > 180.0
        };
        if rising { Phase::Rising } else { Phase::Falling }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Rising => "rising",
            Phase::Falling => "falling",
        }
    }
}

/// Pick the frame whose altitude is closest to the sun's elevation.
///
/// Frames are sorted by altitude and walked ascending while rising and
/// descending while falling; among equally close frames the first one in
/// that order wins. Returns `None` for an empty frame set.
pub fn select_frame(
    frames: &[WallpaperFrame],
    position: &SolarPosition,
    is_northern_hemisphere: bool,
) -> Option<usize> {
    let mut sorted = frames.to_vec();
    sorted.sort_by(|a, b| a.altitude.total_cmp(&b.altitude));

    let distance = |frame: &WallpaperFrame| (frame.altitude - position.elevation).abs();

    // Strict comparison keeps the first of several equal candidates
    let nearest = |best: Option<WallpaperFrame>, frame: &WallpaperFrame| match best {
        Some(current) if distance(&current) <= distance(frame) => Some(current),
        _ => Some(*frame),
    };

    let best = match Phase::from_azimuth(position.azimuth, is_northern_hemisphere) {
        Phase::Rising => sorted.iter().fold(None, nearest),
        Phase::Falling => sorted.iter().rev().fold(None, nearest),
    };

    best.map(|frame| frame.index)
}
