//! Sandbox settings with persistence
//!
//! Settings are read from the path given on the command line, or from
//! `~/.config/steel-lotus/settings.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lotus_core::TimeConfig;
use lotus_game::{CameraConfig, LockOnConfig, MovementConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All sandbox settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxSettings {
    pub lock_on: LockOnConfig,
    pub camera: CameraConfig,
    pub movement: MovementConfig,
    pub time: TimeConfig,
    pub scenario: ScenarioSettings,
}

impl SandboxSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("steel-lotus"))
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// Missing or unreadable files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse settings from TOML text; absent fields take their defaults
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Layout and script of the sandbox session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// Seed for scattering targets
    pub seed: u64,
    /// Dummies spread in front of the player
    pub dummy_count: u32,
    /// Practice targets spread in front of the player
    pub practice_target_count: u32,
    /// Closest a target may spawn to the player
    pub min_spawn_distance: f32,
    /// Farthest a target may spawn from the player
    pub max_spawn_distance: f32,
    /// Half-angle of the spawn arc in degrees, centred on the player's view
    pub spawn_arc_degrees: f32,
    /// Simulated session length in seconds
    pub duration: f32,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            seed: 7,
            dummy_count: 4,
            practice_target_count: 2,
            min_spawn_distance: 300.0,
            max_spawn_distance: 1800.0,
            spawn_arc_degrees: 50.0,
            duration: 6.0,
        }
    }
}
