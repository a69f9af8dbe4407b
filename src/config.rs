use crate::errors::{TerrainError, TerrainResult};
use crate::pathfinding::PathfindingConfig;
use crate::terrain_generation::NoiseConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use validator::Validate;

/// Persistent user settings, stored as TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub terrain: NoiseConfig,
    pub pathfinding: PathfindingConfig,
}

pub fn get_config_path() -> TerrainResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(TerrainError::ConfigDirNotFound)?;
    path.push("slopepath");
    path.push("config.toml");
    Ok(path)
}

/// Load settings from the user config directory, falling back to defaults
pub fn load_config() -> Settings {
    let Ok(config_path) = get_config_path() else {
        return Settings::default();
    };
    if !config_path.exists() {
        return Settings::default();
    }

    match load_config_from(&config_path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(
                "Ignoring unreadable config at {}: {}",
                config_path.display(),
                e
            );
            Settings::default()
        }
    }
}

pub fn load_config_from<P: AsRef<Path>>(path: P) -> TerrainResult<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TerrainError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&contents)?;

    settings
        .terrain
        .validate()
        .map_err(|e| TerrainError::InvalidConfig {
            reason: format!("Terrain settings in {}: {e}", path.display()),
        })?;

    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

pub fn save_config(settings: &Settings) -> TerrainResult<()> {
    save_config_to(settings, get_config_path()?)
}

pub fn save_config_to<P: AsRef<Path>>(settings: &Settings, path: P) -> TerrainResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    Ok(())
}
