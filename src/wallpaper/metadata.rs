//! Solar wallpaper metadata decoding.
//!
//! Dynamic wallpapers carry their frame table as a property list embedded in
//! the image container. solarwall reads that table in its JSON form, either
//! as a standalone file or as `solar.json` inside a wallpaper directory whose
//! frames have already been extracted next to it:
//!
//! ```json
//! {
//!   "ap": { "d": 5, "l": 2 },
//!   "si": [ { "a": -30.5, "i": 0, "z": 101.2 }, { "a": 12.0, "i": 1, "z": 120.8 } ]
//! }
//! ```
//!
//! `si` lists the frames (`a` altitude, `i` index, `z` azimuth) and the
//! optional `ap` block names the light and dark appearance frames.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Appearance, Phase, WallpaperFrame, select_frame};
use crate::common::constants::METADATA_FILE_NAME;
use crate::common::utils::private_path;
use crate::geo::SolarPosition;

#[derive(Debug, Deserialize)]
struct SolarMetadata {
    #[serde(rename = "ap")]
    appearance: Option<RawAppearance>,
    #[serde(rename = "si")]
    images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawAppearance {
    #[serde(rename = "d")]
    dark: usize,
    #[serde(rename = "l")]
    light: usize,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(rename = "a")]
    altitude: f64,
    #[serde(rename = "i")]
    index: usize,
    #[serde(rename = "z", default)]
    azimuth: f64,
}

/// Failures while loading wallpaper metadata.
///
/// All of these are fatal for a run: without a frame table there is nothing
/// meaningful to select.
#[derive(Debug)]
pub enum MetadataError {
    /// No metadata at the expected location
    NotFound(PathBuf),
    /// The file exists but could not be read
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The document is not valid solar metadata
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The frame table is empty
    NoFrames(PathBuf),
    /// Two frames claim the same container index
    DuplicateIndex { path: PathBuf, index: usize },
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataError::NotFound(path) => {
                write!(f, "No solar metadata found at {}", private_path(path))
            }
            MetadataError::Read { path, .. } => {
                write!(f, "Failed to read solar metadata from {}", private_path(path))
            }
            MetadataError::Malformed { path, .. } => {
                write!(f, "Malformed solar metadata in {}", private_path(path))
            }
            MetadataError::NoFrames(path) => {
                write!(f, "Solar metadata in {} lists no frames", private_path(path))
            }
            MetadataError::DuplicateIndex { path, index } => write!(
                f,
                "Solar metadata in {} lists frame index {} more than once",
                private_path(path),
                index
            ),
        }
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetadataError::Read { source, .. } => Some(source),
            MetadataError::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A decoded solar wallpaper.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallpaper {
    /// Where the metadata was read from; frame files live beside it
    pub metadata_path: PathBuf,
    /// Frames in the order the metadata lists them
    pub frames: Vec<WallpaperFrame>,
    pub appearance: Option<Appearance>,
}

impl Wallpaper {
    /// Decode metadata from a JSON document.
    ///
    /// `path` is only used for error messages and frame file resolution.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, MetadataError> {
        let metadata: SolarMetadata =
            serde_json::from_str(content).map_err(|source| MetadataError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        if metadata.images.is_empty() {
            return Err(MetadataError::NoFrames(path.to_path_buf()));
        }

        let mut seen = HashSet::with_capacity(metadata.images.len());
        for image in &metadata.images {
            if !seen.insert(image.index) {
                return Err(MetadataError::DuplicateIndex {
                    path: path.to_path_buf(),
                    index: image.index,
                });
            }
        }

        let frames = metadata
            .images
            .into_iter()
            .map(|image| WallpaperFrame {
                altitude: image.altitude,
                azimuth: image.azimuth,
                index: image.index,
            })
            .collect();

        Ok(Self {
            metadata_path: path.to_path_buf(),
            frames,
            appearance: metadata.appearance.map(|ap| Appearance {
                light: ap.light,
                dark: ap.dark,
            }),
        })
    }

    /// Select the frame for a solar position. See [`select_frame`].
    pub fn select(&self, position: &SolarPosition, is_northern_hemisphere: bool) -> Option<usize> {
        select_frame(&self.frames, position, is_northern_hemisphere)
    }

    /// Frames sorted by altitude, walked in the order the selector uses for `phase`.
    pub fn frames_in_phase_order(&self, phase: Phase) -> Vec<WallpaperFrame> {
        let mut sorted = self.frames.clone();
        sorted.sort_by(|a, b| a.altitude.total_cmp(&b.altitude));
        if phase == Phase::Falling {
            sorted.reverse();
        }
        sorted
    }

    /// Path of the extracted frame file for `index`.
    ///
    /// `template` must contain `{index}`; it is resolved relative to the
    /// directory holding the metadata.
    pub fn frame_path(&self, index: usize, template: &str) -> PathBuf {
        let file_name = template.replace("{index}", &index.to_string());
        self.metadata_path
            .parent()
            .map(|dir| dir.join(&file_name))
            .unwrap_or_else(|| PathBuf::from(file_name))
    }
}

/// Resolve the metadata file for a wallpaper source.
///
/// A directory source uses its `solar.json`; anything else is taken as the
/// metadata file itself.
pub fn metadata_path_for(source: &Path) -> PathBuf {
    if source.is_dir() {
        source.join(METADATA_FILE_NAME)
    } else {
        source.to_path_buf()
    }
}

/// Load a wallpaper from a metadata file or wallpaper directory.
pub fn load_wallpaper(source: &Path) -> Result<Wallpaper, MetadataError> {
    let path = metadata_path_for(source);

    if !path.exists() {
        return Err(MetadataError::NotFound(path));
    }

    let content = fs::read_to_string(&path).map_err(|source| MetadataError::Read {
        path: path.clone(),
        source,
    })?;

    Wallpaper::from_json(&content, &path)
}
