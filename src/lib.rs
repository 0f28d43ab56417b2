//! # Solarwall Library
//!
//! Internal library for the solarwall binary application.
//!
//! This library exists to enable testing of the internals and to keep a clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Solar geometry**: `geo` computes the sun's elevation and azimuth for a
//!   coordinate and instant, and maps coordinates to time zones for display
//! - **Wallpapers**: `wallpaper` decodes frame metadata, selects the frame for
//!   a sun position, and installs it at the destination
//! - **Transitions**: `transition` finds the next instant the selection changes
//! - **Location**: `location` resolves the observer from configuration, cache,
//!   an external command or the fallback coordinate
//! - **Configuration**: `config` for TOML settings, `state` for the XDG state
//!   directory, `time_source` for real or pinned "now"
//! - **CLI**: `args` parses the command line, `commands` implements each command
//! - **Infrastructure**: `logger` for stderr-only structured output, `common`
//!   for constants and formatting helpers

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod geo;
pub mod location;
pub mod state;
pub mod time_source;
pub mod transition;
pub mod wallpaper;
