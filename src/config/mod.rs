//! Configuration module for WebSynth-RS
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locate and load settings, then apply environment overrides.
///
/// An explicit path wins, then `WEBSYNTH_SETTINGS_PATH`, then the usual
/// locations; defaults are used when nothing is found.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match find_settings_file(explicit)? {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

fn find_settings_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Settings file not found: {}",
                path.display()
            ));
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(path) = std::env::var("WEBSYNTH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/websynth/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("websynth-rs/settings.yml"));
    }

    Ok(paths.into_iter().find(|p| p.exists()))
}
