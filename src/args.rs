//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. The default form selects and
//! installs a frame:
//!
//! ```text
//! solarwall [OPTIONS] <source> [destination] [cache_minutes]
//! ```
//!
//! Two inspection commands share the same options: `position` and
//! `frames <source>`. Help and version flags take precedence over
//! everything else, and unknown options fall back to the help screen.

/// Options accepted by every command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalOptions {
    pub debug_enabled: bool,
    pub quiet: bool,
    pub config_dir: Option<String>,
    /// Evaluate at this local time ("YYYY-MM-DD HH:MM:SS") instead of now
    pub at: Option<String>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Select the frame for now, install it and print the next transition
    Run {
        options: GlobalOptions,
        source: String,
        destination: Option<String>,
        cache_minutes: Option<i64>,
    },
    /// Show the resolved location and current sun position
    Position { options: GlobalOptions },
    /// Show the frames of a wallpaper and the one that applies now
    Frames {
        options: GlobalOptions,
        source: String,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or missing arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first element is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = GlobalOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut positionals: Vec<String> = Vec::new();

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--quiet" | "-q" => options.quiet = true,
                "--config" | "-c" => {
                    // Parse: --config <directory>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        options.config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--at" => {
                    // Parse: --at "YYYY-MM-DD HH:MM:SS"
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        options.at = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing time for --at. Usage: --at \"YYYY-MM-DD HH:MM:SS\"");
                        unknown_arg_found = true;
                    }
                }
                "--" => {
                    positionals.extend(args_vec[i + 1..].iter().cloned());
                    break;
                }
                _ => {
                    if arg_str.starts_with('-') && arg_str.len() > 1 && !is_number(arg_str) {
                        log_warning!("Unknown option: {arg_str}");
                        unknown_arg_found = true;
                    } else {
                        positionals.push(arg_str.clone());
                    }
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else {
            action_from_positionals(options, positionals)
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

fn is_number(arg: &str) -> bool {
    arg.parse::<f64>().is_ok()
}

fn action_from_positionals(options: GlobalOptions, positionals: Vec<String>) -> CliAction {
    let mut positionals = positionals.into_iter();

    match positionals.next().as_deref() {
        None => {
            log_warning!("Missing wallpaper source");
            CliAction::ShowHelpDueToError
        }
        Some("position") => {
            if let Some(extra) = positionals.next() {
                log_warning!("Unexpected argument for position: {extra}");
                return CliAction::ShowHelpDueToError;
            }
            CliAction::Position { options }
        }
        Some("frames") => match (positionals.next(), positionals.next()) {
            (Some(source), None) => CliAction::Frames { options, source },
            (None, _) => {
                log_warning!("Missing wallpaper source. Usage: frames <source>");
                CliAction::ShowHelpDueToError
            }
            (Some(_), Some(extra)) => {
                log_warning!("Unexpected argument for frames: {extra}");
                CliAction::ShowHelpDueToError
            }
        },
        Some(source) => {
            let source = source.to_string();
            let destination = positionals.next();
            let cache_minutes = positionals.next().and_then(|value| {
                match value.trim().parse::<i64>() {
                    Ok(minutes) => Some(minutes),
                    Err(_) => {
                        log_warning!(
                            "Invalid cache minutes '{}', using the configured value",
                            value
                        );
                        None
                    }
                }
            });
            if let Some(extra) = positionals.next() {
                log_warning!("Unexpected argument: {extra}");
                return CliAction::ShowHelpDueToError;
            }
            CliAction::Run {
                options,
                source,
                destination,
                cache_minutes,
            }
        }
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("solarwall [OPTIONS] <source> [destination] [cache_minutes]");
    log_indented!("solarwall [OPTIONS] position");
    log_indented!("solarwall [OPTIONS] frames <source>");
    log_block_start!("Arguments:");
    log_indented!("<source>               Wallpaper directory or solar.json metadata file");
    log_indented!("                       A directory named position or frames needs a ./ prefix");
    log_indented!("[destination]          Where to write the selected frame (default /tmp/img.jpg)");
    log_indented!("[cache_minutes]        Location cache age: -1 always, 0 never, n minutes");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-q, --quiet            Suppress all log output");
    log_indented!("    --at <time>        Evaluate at \"YYYY-MM-DD HH:MM:SS\" local time");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Output:");
    log_indented!("On success the Unix time of the next frame change is printed to stdout.");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["solarwall"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_source_only() {
        assert_eq!(
            parse(&["~/Pictures/Mojave"]),
            CliAction::Run {
                options: GlobalOptions::default(),
                source: "~/Pictures/Mojave".to_string(),
                destination: None,
                cache_minutes: None,
            }
        );
    }

    #[test]
    fn test_parse_all_positionals() {
        assert_eq!(
            parse(&["/walls/desert", "/tmp/out.jpg", "-1"]),
            CliAction::Run {
                options: GlobalOptions::default(),
                source: "/walls/desert".to_string(),
                destination: Some("/tmp/out.jpg".to_string()),
                cache_minutes: Some(-1),
            }
        );
    }

    #[test]
    fn test_parse_invalid_cache_minutes_falls_back() {
        match parse(&["/walls/desert", "/tmp/out.jpg", "soon"]) {
            CliAction::Run { cache_minutes, .. } => assert_eq!(cache_minutes, None),
            other => panic!("Expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_too_many_positionals() {
        assert_eq!(
            parse(&["/walls/desert", "/tmp/out.jpg", "5", "extra"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_debug_flag() {
        match parse(&["--debug", "/walls/desert"]) {
            CliAction::Run { options, .. } => {
                assert!(options.debug_enabled);
                assert!(!options.quiet);
            }
            other => panic!("Expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_short_flags_after_source() {
        match parse(&["/walls/desert", "-d", "-q"]) {
            CliAction::Run { options, .. } => {
                assert!(options.debug_enabled);
                assert!(options.quiet);
            }
            other => panic!("Expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_and_at() {
        match parse(&[
            "-c",
            "/etc/solarwall",
            "--at",
            "2025-06-21 12:00:00",
            "position",
        ]) {
            CliAction::Position { options } => {
                assert_eq!(options.config_dir.as_deref(), Some("/etc/solarwall"));
                assert_eq!(options.at.as_deref(), Some("2025-06-21 12:00:00"));
            }
            other => panic!("Expected Position, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_option_values() {
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["/walls", "--at"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--at", "-d", "/walls"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_frames_command() {
        assert_eq!(
            parse(&["frames", "/walls/desert"]),
            CliAction::Frames {
                options: GlobalOptions::default(),
                source: "/walls/desert".to_string(),
            }
        );
        assert_eq!(parse(&["frames"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["frames", "a", "b"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_position_rejects_extra() {
        assert_eq!(parse(&["position", "now"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_help_flags() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h", "/walls"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_flags() {
        for flag in ["--version", "-V", "-v"] {
            assert_eq!(parse(&[flag]), CliAction::ShowVersion);
        }
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(parse(&["--help", "--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["--bogus", "-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(parse(&["--bogus", "/walls"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_double_dash_ends_options() {
        match parse(&["--", "-weird-dir"]) {
            CliAction::Run { source, .. } => assert_eq!(source, "-weird-dir"),
            other => panic!("Expected Run, got {other:?}"),
        }
    }
}
