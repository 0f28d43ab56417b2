//! Location lookup through an external command.
//!
//! solarwall does not talk to OS location services itself. Instead the user
//! can configure a command that prints the current coordinates, for example
//! `CoreLocationCLI -format '%latitude %longitude'` on macOS or a script that
//! queries a GPS daemon. The command gets a bounded amount of time; when it
//! is too slow it is killed and the caller falls back to cached or default
//! coordinates.

use anyhow::{Context, Result};
use regex::Regex;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::common::constants::LOCATION_POLL_INTERVAL;
use crate::geo::GeoCoordinate;

/// Runs a shell command and parses `latitude longitude` from its output.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandProvider {
    command: String,
    timeout: Duration,
}

impl CommandProvider {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    /// Run the command and return the coordinate it reports.
    ///
    /// Fails if the command cannot be started, exits unsuccessfully, runs
    /// past the timeout, or prints no valid coordinate pair.
    pub fn lookup(&self) -> Result<GeoCoordinate> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start location command '{}'", self.command))?;

        // Drain stdout while the command runs so a chatty command never
        // blocks on a full pipe
        let mut stdout = child
            .stdout
            .take()
            .context("Location command has no stdout")?;
        let (output_tx, output_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut output = String::new();
            let result = stdout.read_to_string(&mut output).map(|_| output);
            let _ = output_tx.send(result);
        });

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                if !status.success() {
                    anyhow::bail!("Location command exited with {}", status);
                }
                break;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                anyhow::bail!(
                    "Location command timed out after {} seconds",
                    self.timeout.as_secs()
                );
            }
            thread::sleep(LOCATION_POLL_INTERVAL);
        }

        // Anything the command left running in the background may still hold
        // stdout open; the output only counts if it is complete in time.
        let remaining = deadline
            .saturating_duration_since(Instant::now())
            .max(LOCATION_POLL_INTERVAL);
        let output = match output_rx.recv_timeout(remaining) {
            Ok(result) => result.context("Failed to read location command output")?,
            Err(RecvTimeoutError::Timeout) => anyhow::bail!(
                "Location command timed out after {} seconds waiting for its output to close",
                self.timeout.as_secs()
            ),
            Err(RecvTimeoutError::Disconnected) => {
                anyhow::bail!("Location command output reader stopped unexpectedly")
            }
        };

        parse_coordinates(&output)
    }
}

/// Extract the first two numbers of `output` as latitude and longitude.
pub fn parse_coordinates(output: &str) -> Result<GeoCoordinate> {
    let number = Regex::new(r"[-+]?\d+(?:\.\d+)?")?;

    let mut values = number
        .find_iter(output)
        .filter_map(|m| m.as_str().parse::<f64>().ok());

    match (values.next(), values.next()) {
        (Some(latitude), Some(longitude)) => GeoCoordinate::new(latitude, longitude)
            .context("Location command reported coordinates out of range"),
        _ => anyhow::bail!(
            "Location command output contains no coordinates: '{}'",
            output.trim()
        ),
    }
}
