//! The default command: install the frame for now and report the next change.
//!
//! The only thing this command ever writes to stdout is the Unix timestamp of
//! the next frame change, so a scheduler can run
//! `next=$(solarwall ~/Pictures/Mojave)` and sleep until then. When anything
//! fatal happens nothing is printed there and the exit code is non-zero.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::constants::NO_SELECTION_RETRY;
use crate::common::utils::private_path;
use crate::config::Config;
use crate::geo::{GeoCoordinate, SolarPosition, compute_position};
use crate::transition::next_transition_with_step;
use crate::wallpaper::{Phase, Wallpaper, install_frame, load_wallpaper};

/// Output settings for one run, taken from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub destination: PathBuf,
    pub frame_template: String,
    pub transition_step: Duration,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            destination: config.destination_path(),
            frame_template: config.frame_template().to_string(),
            transition_step: config.transition_step(),
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub position: SolarPosition,
    /// Index of the installed frame, `None` when nothing could be selected
    pub selected: Option<usize>,
    pub next_transition: DateTime<Utc>,
}

/// Handle the default command from the CLI.
pub fn handle_run_command(
    source: &str,
    destination: Option<String>,
    cache_minutes: Option<i64>,
    debug_enabled: bool,
) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    if let Some(destination) = destination {
        config.destination = Some(destination);
    }
    if let Some(minutes) = cache_minutes {
        config.cache_minutes = Some(minutes);
    }

    if debug_enabled {
        config.log_config();
    }

    let now = crate::time_source::now_utc();
    if crate::time_source::is_fixed() {
        log_block_start!("Evaluating at {}", now.with_timezone(&chrono::Local));
    }

    let resolution = super::resolve_observer(&config, now, debug_enabled)?;
    log_block_start!("Location: {}", resolution.coordinate);
    log_indented!("From {}", resolution.source.describe());

    let wallpaper = load_wallpaper(Path::new(source))
        .with_context(|| format!("Failed to load wallpaper from {source}"))?;
    if debug_enabled {
        log_debug!(
            "Loaded {} frames from {}",
            wallpaper.frames.len(),
            private_path(&wallpaper.metadata_path)
        );
    }

    let settings = RunSettings::from_config(&config);
    let outcome = apply_wallpaper(&wallpaper, resolution.coordinate, now, &settings)?;

    log_block_start!(
        "Next change: {}",
        super::describe_instant(outcome.next_transition, resolution.coordinate)
    );
    log_end!();

    println!("{}", outcome.next_transition.timestamp());
    Ok(())
}

/// Select the frame for `now`, install it, and find the next change.
///
/// When no frame can be selected the destination is left untouched and the
/// next check is scheduled an hour out.
pub fn apply_wallpaper(
    wallpaper: &Wallpaper,
    location: GeoCoordinate,
    now: DateTime<Utc>,
    settings: &RunSettings,
) -> Result<RunOutcome> {
    let position = compute_position(location, now);
    let is_northern = location.is_northern_hemisphere();
    let phase = Phase::from_azimuth(position.azimuth, is_northern);

    log_block_start!(
        "Sun: {:.2}° elevation, {:.2}° azimuth ({})",
        position.elevation,
        position.azimuth,
        phase.as_str()
    );

    let Some(index) = wallpaper.select(&position, is_northern) else {
        log_pipe!();
        log_warning!("No frame could be selected; leaving the wallpaper unchanged");
        let retry = TimeDelta::seconds(NO_SELECTION_RETRY.as_secs() as i64);
        return Ok(RunOutcome {
            position,
            selected: None,
            next_transition: now + retry,
        });
    };

    let frame_path = wallpaper.frame_path(index, &settings.frame_template);
    install_frame(&frame_path, &settings.destination).with_context(|| {
        format!(
            "Failed to install frame {} to {}",
            index,
            private_path(&settings.destination)
        )
    })?;
    log_decorated!(
        "Installed frame {} at {}",
        index,
        private_path(&settings.destination)
    );

    let next_transition = next_transition_with_step(
        &wallpaper.frames,
        location,
        is_northern,
        index,
        now,
        settings.transition_step,
    );

    Ok(RunOutcome {
        position,
        selected: Some(index),
        next_transition,
    })
}
