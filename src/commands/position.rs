//! Handle the position command.
//!
//! Resolves the location the same way a normal run does (including cache
//! updates) and reports where the sun is. Nothing is written to stdout.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::geo::compute_position;
use crate::wallpaper::Phase;

/// Handle the position command from the CLI.
pub fn handle_position_command(debug_enabled: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    if debug_enabled {
        config.log_config();
    }

    let now = crate::time_source::now_utc();
    let resolution = super::resolve_observer(&config, now, debug_enabled)?;
    let location = resolution.coordinate;

    let position = compute_position(location, now);
    let phase = Phase::from_azimuth(position.azimuth, location.is_northern_hemisphere());

    log_block_start!("Location: {}", location);
    log_indented!("From {}", resolution.source.describe());
    log_indented!(
        "Hemisphere: {}",
        if location.is_northern_hemisphere() {
            "northern"
        } else {
            "southern"
        }
    );

    log_block_start!("Time: {}", super::describe_instant(now, location));
    if crate::time_source::is_fixed() {
        log_indented!("(fixed with --at)");
    }

    log_block_start!("Sun:");
    log_indented!("Elevation: {:.2}°", position.elevation);
    log_indented!("Azimuth: {:.2}°", position.azimuth);
    log_indented!("Phase: {}", phase.as_str());
    log_end!();

    Ok(())
}
