//! Game settings and preferences
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TPS;
use crate::error::SettingsError;
use crate::sim::PhysicsConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name shown with the score
    pub player_name: String,
    /// Simulation rate; physics constants are rescaled to match
    pub tick_rate: f32,
    /// Seed for the run's RNG
    pub seed: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            tick_rate: TPS,
            seed: 0x5EED,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Physics constants for the configured tick rate
    pub fn physics(&self) -> PhysicsConfig {
        if self.tick_rate > 0.0 {
            PhysicsConfig::for_tick_rate(self.tick_rate)
        } else {
            log::warn!("Ignoring invalid tick rate {}, using {}", self.tick_rate, TPS);
            PhysicsConfig::default()
        }
    }
}
