//! State directory layout, following XDG Base Directory standards.
//!
//! Persistent runtime state (the location cache and its lock) lives in
//! XDG_STATE_HOME, keeping configuration and state properly separated.
//! Each configuration directory gets its own namespace so that a run with
//! `--config` never reuses the location cached for another setup.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::common::constants::APP_DIR_NAME;
use crate::config::get_custom_config_dir;

/// Get the state directory for a given configuration directory.
///
/// State is stored in XDG_STATE_HOME/solarwall/{namespace} where namespace is:
/// - "default" for the default config directory
/// - "custom_<hash>" for custom config directories (via --config)
pub fn get_state_dir(config_dir: Option<&Path>) -> Result<PathBuf> {
    let state_home = std::env::var("XDG_STATE_HOME")
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local/state")
        });

    let state_base = state_home.join(APP_DIR_NAME);

    let namespace = match config_dir {
        None => "default".to_string(),
        Some(path) => {
            let default_config = dirs::config_dir()
                .context("Could not determine config directory")?
                .join(APP_DIR_NAME);
            if path == default_config {
                "default".to_string()
            } else {
                get_state_namespace(path)
            }
        }
    };

    Ok(state_base.join(namespace))
}

/// State directory for the configuration directory chosen at startup.
pub fn current_state_dir() -> Result<PathBuf> {
    let config_dir = get_custom_config_dir();
    get_state_dir(config_dir.as_deref())
}

/// Generate a stable namespace for a custom config directory.
fn get_state_namespace(config_path: &Path) -> String {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());

    // SHA256 truncated to 16 hex chars
    let hash = sha256::digest(canonical.to_string_lossy().as_bytes());
    format!("custom_{}", &hash[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    struct StateHomeGuard(Option<String>);

    impl StateHomeGuard {
        fn set(path: &Path) -> Self {
            let original = std::env::var("XDG_STATE_HOME").ok();
            unsafe {
                std::env::set_var("XDG_STATE_HOME", path);
            }
            Self(original)
        }
    }

    impl Drop for StateHomeGuard {
        fn drop(&mut self) {
            unsafe {
                match &self.0 {
                    Some(value) => std::env::set_var("XDG_STATE_HOME", value),
                    None => std::env::remove_var("XDG_STATE_HOME"),
                }
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_namespace() {
        let temp_dir = tempdir().unwrap();
        let _guard = StateHomeGuard::set(temp_dir.path());

        let state_dir = get_state_dir(None).unwrap();
        assert_eq!(state_dir, temp_dir.path().join("solarwall").join("default"));
    }

    #[test]
    #[serial]
    fn test_custom_config_dir_gets_hashed_namespace() {
        let temp_dir = tempdir().unwrap();
        let _guard = StateHomeGuard::set(temp_dir.path());

        let config_a = temp_dir.path().join("config-a");
        let config_b = temp_dir.path().join("config-b");
        std::fs::create_dir_all(&config_a).unwrap();
        std::fs::create_dir_all(&config_b).unwrap();

        let state_a = get_state_dir(Some(&config_a)).unwrap();
        let state_b = get_state_dir(Some(&config_b)).unwrap();

        let namespace = state_a.file_name().unwrap().to_string_lossy().to_string();
        assert!(namespace.starts_with("custom_"));
        assert_eq!(namespace.len(), "custom_".len() + 16);
        assert_ne!(state_a, state_b);

        // Stable across calls
        assert_eq!(state_a, get_state_dir(Some(&config_a)).unwrap());
    }
}
