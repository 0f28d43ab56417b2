//! Main application entry point and command dispatch.
//!
//! Parses the command line, sets up process-wide state (logging, the config
//! directory and the time source), then hands off to the command. The exit
//! code is 0 on success and 1 on any failure or argument error. Errors are
//! reported on stderr; stdout belongs to the `run` command's timestamp.

use anyhow::Result;
use std::sync::Arc;

use solarwall::args::{self, CliAction, GlobalOptions, ParsedArgs};
use solarwall::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use solarwall::logger::Log;
use solarwall::time_source::{self, FixedTimeSource};
use solarwall::{commands, config};
use solarwall::{log_debug, log_end, log_error, log_error_exit, log_indented, log_pipe, log_version};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let exit_code = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            EXIT_SUCCESS
        }
        CliAction::ShowHelp => {
            args::display_help();
            EXIT_SUCCESS
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            EXIT_FAILURE
        }
        CliAction::Run {
            options,
            source,
            destination,
            cache_minutes,
        } => execute(&options, || {
            commands::run::handle_run_command(
                &source,
                destination,
                cache_minutes,
                options.debug_enabled,
            )
        }),
        CliAction::Position { options } => execute(&options, || {
            commands::position::handle_position_command(options.debug_enabled)
        }),
        CliAction::Frames { options, source } => execute(&options, || {
            commands::frames::handle_frames_command(&source, options.debug_enabled)
        }),
    };

    std::process::exit(exit_code);
}

/// Prepare process state for a command, run it, and map the result to an exit code.
fn execute<F>(options: &GlobalOptions, command: F) -> i32
where
    F: FnOnce() -> Result<()>,
{
    if let Err(e) = prepare(options) {
        Log::set_enabled(true);
        log_error_exit!("{e:#}");
        return EXIT_FAILURE;
    }

    match command() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            // Fatal errors are shown even with --quiet
            Log::set_enabled(true);
            log_pipe!();
            log_error!("{e}");
            for cause in e.chain().skip(1) {
                log_indented!("{cause}");
            }
            log_end!();
            EXIT_FAILURE
        }
    }
}

fn prepare(options: &GlobalOptions) -> Result<()> {
    Log::set_enabled(!options.quiet);

    log_version!();
    if options.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled");
    }

    config::set_config_dir(options.config_dir.clone())?;

    if let Some(ref at) = options.at {
        let instant = time_source::parse_datetime(at).map_err(|e| anyhow::anyhow!(e))?;
        time_source::init_time_source(Arc::new(FixedTimeSource::new(instant)));
    }

    Ok(())
}
