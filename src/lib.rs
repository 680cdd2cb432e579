//! Metal Shot - A side-scrolling 2D shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, weapons, game state)
//! - `game`: Top-level controller driving the simulation and its collaborators
//! - `audio`: Sound cue identifiers and the audio collaborator interface
//! - `settings`: User preferences loaded from JSON
//! - `score`: Per-run user data

pub mod audio;
pub mod error;
pub mod game;
pub mod score;
pub mod settings;
pub mod sim;

pub use error::{LevelError, SettingsError};
pub use game::{Controller, Key, View};
pub use score::UserData;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Ticks per second of the fixed simulation step
    pub const TPS: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TPS;
    /// Maximum ticks to run per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Move `value` toward `target` by at most `step`, never overshooting
#[inline]
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}
