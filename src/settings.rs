//! Game settings
//!
//! Persisted as JSON next to the best-time record. Missing fields take the
//! reference game's values.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Tuning;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Playable canvas width
    pub world_width: f32,
    /// Playable canvas height (the floor line is its bottom edge)
    pub world_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,

    // === Physics ===
    pub tuning: Tuning,

    // === Storage ===
    /// Where the best time is kept; `None` keeps it in memory only
    pub best_time_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,

            tuning: Tuning::default(),

            best_time_file: None,
        }
    }
}

impl Settings {
    pub fn world(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    pub fn spawn(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("tuning.move_speed", self.tuning.move_speed),
            ("tuning.attack_duration_ms", self.tuning.attack_duration_ms),
            ("tuning.attack_range", self.tuning.attack_range),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        if self.player_width > self.world_width || self.player_height > self.world_height {
            return Err(SettingsError::Invalid {
                field: "player_width",
                reason: "player does not fit in the world".to_string(),
            });
        }

        if !self.tuning.gravity.is_finite() || !self.tuning.jump_force.is_finite() {
            return Err(SettingsError::Invalid {
                field: "tuning.gravity",
                reason: "gravity and jump force must be finite".to_string(),
            });
        }

        Ok(())
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, using defaults when the file is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
