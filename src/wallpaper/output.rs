//! Frame installation.
//!
//! The chosen frame is copied byte-for-byte to the destination. The copy is
//! staged in a temporary file in the destination directory and renamed over
//! the target, so a wallpaper setter polling the destination never reads a
//! half-written image.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::common::utils::private_path;

/// Copy `frame_path` to `destination`, replacing it atomically.
///
/// Missing parent directories of the destination are created.
pub fn install_frame(frame_path: &Path, destination: &Path) -> Result<()> {
    let mut source = File::open(frame_path)
        .with_context(|| format!("Failed to open frame {}", private_path(frame_path)))?;

    let parent = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| {
        format!(
            "Failed to create destination directory {}",
            private_path(parent)
        )
    })?;

    let mut staged = NamedTempFile::new_in(parent).with_context(|| {
        format!(
            "Failed to create temporary file in {}",
            private_path(parent)
        )
    })?;

    io::copy(&mut source, &mut staged)
        .with_context(|| format!("Failed to copy frame {}", private_path(frame_path)))?;
    staged.flush()?;

    staged
        .persist(destination)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", private_path(destination)))?;

    Ok(())
}
