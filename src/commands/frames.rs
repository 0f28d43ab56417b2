//! Handle the frames command.
//!
//! Lists a wallpaper's frame table in the order the selector walks it right
//! now and marks the frame that a run would install. Useful for checking a
//! freshly extracted wallpaper before pointing a scheduler at it.

use anyhow::{Context, Result};
use std::path::Path;

use crate::common::utils::private_path;
use crate::config::Config;
use crate::geo::compute_position;
use crate::wallpaper::{Phase, load_wallpaper};

/// Handle the frames command from the CLI.
pub fn handle_frames_command(source: &str, debug_enabled: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    if debug_enabled {
        config.log_config();
    }

    let wallpaper = load_wallpaper(Path::new(source))
        .with_context(|| format!("Failed to load wallpaper from {source}"))?;

    let now = crate::time_source::now_utc();
    let resolution = super::resolve_observer(&config, now, debug_enabled)?;
    let location = resolution.coordinate;
    let position = compute_position(location, now);
    let is_northern = location.is_northern_hemisphere();
    let phase = Phase::from_azimuth(position.azimuth, is_northern);
    let selected = wallpaper.select(&position, is_northern);

    log_block_start!(
        "Wallpaper: {} ({} frames)",
        private_path(&wallpaper.metadata_path),
        wallpaper.frames.len()
    );
    if let Some(appearance) = wallpaper.appearance {
        log_indented!(
            "Appearance: light {}, dark {}",
            appearance.light,
            appearance.dark
        );
    }

    log_block_start!(
        "Sun at {}: {:.2}° ({})",
        location,
        position.elevation,
        phase.as_str()
    );

    log_block_start!("Frames in {} order:", phase.as_str());
    let template = config.frame_template();
    let mut missing_count = 0;
    for frame in wallpaper.frames_in_phase_order(phase) {
        let marker = if Some(frame.index) == selected { "▶" } else { " " };
        let frame_path = wallpaper.frame_path(frame.index, template);
        let missing = if frame_path.exists() {
            ""
        } else {
            missing_count += 1;
            " (file missing)"
        };
        log_indented!(
            "{} {:>3}  {:>7.2}° altitude  {:>7.2}° azimuth{}",
            marker,
            frame.index,
            frame.altitude,
            frame.azimuth,
            missing
        );
    }

    if missing_count > 0 {
        log_pipe!();
        log_info!(
            "{} frame files are missing; frames are expected beside the metadata as '{}'",
            missing_count,
            template
        );
    }
    log_end!();

    Ok(())
}
