//! Simulation tuning
//!
//! Kinematics constants are expressed per tick, so they are derived from the
//! tick rate: speeds are divided by TPS and accelerations by TPS², keeping
//! real-world motion the same at any rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TPS;

/// Immutable per-run simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Ticks per second these values were derived for
    pub tps: f32,

    // === Kinematics (tiles per tick / tiles per tick²) ===
    pub max_horizontal_speed: f32,
    pub max_vertical_speed: f32,
    /// Vertical speed set on jump (negative is upward)
    pub jump: f32,
    pub deceleration: f32,
    pub acceleration: f32,
    pub gravity: f32,

    // === Characters ===
    pub player_hitbox: Vec2,
    pub enemy_hitbox: Vec2,
    pub player_health: u32,
    pub enemy_health: u32,

    // === Encounters ===
    /// Gap kept between the player and the segment's right edge while enemies remain
    pub segment_exit_margin: f32,
    /// Visible width in tiles; the camera's left edge bounds every character
    pub view_width: f32,
    /// Horizontal distance at which enemies start shooting
    pub enemy_sight_range: f32,
    /// Extra ticks added to an enemy's reload on top of its weapon's interval
    pub enemy_reload_ticks: u32,
}

impl PhysicsConfig {
    /// Derive every rate-dependent constant for `tps` ticks per second
    pub fn for_tick_rate(tps: f32) -> Self {
        Self {
            tps,
            max_horizontal_speed: 5.0 / tps,
            max_vertical_speed: 8.0 / tps,
            jump: -13.0 / tps,
            deceleration: 1.0 / tps,
            acceleration: 0.5 / tps,
            gravity: 9.81 / (tps * tps),
            player_hitbox: Vec2::new(0.75, 1.5),
            enemy_hitbox: Vec2::new(0.75, 1.5),
            player_health: 100,
            enemy_health: 30,
            segment_exit_margin: 0.26,
            view_width: 20.0,
            enemy_sight_range: 10.0,
            enemy_reload_ticks: (tps * 0.5) as u32,
        }
    }

    /// Scale a tick count authored for the default rate to this rate
    pub fn ticks(&self, ticks_at_default_rate: u32) -> u32 {
        ((ticks_at_default_rate as f32 * self.tps / TPS).round() as u32).max(1)
    }

    /// Scale a per-tick speed authored for the default rate to this rate
    pub fn speed(&self, per_tick_at_default_rate: f32) -> f32 {
        per_tick_at_default_rate * TPS / self.tps
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::for_tick_rate(TPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_sixty_hz() {
        let cfg = PhysicsConfig::default();
        assert!((cfg.max_horizontal_speed - 5.0 / 60.0).abs() < 1e-7);
        assert!((cfg.gravity - 9.81 / 3600.0).abs() < 1e-7);
        assert!(cfg.jump < 0.0);
        assert_eq!(cfg.ticks(6), 6);
    }

    #[test]
    fn test_rescaling_keeps_real_motion() {
        let slow = PhysicsConfig::for_tick_rate(30.0);
        let fast = PhysicsConfig::for_tick_rate(120.0);
        // Distance covered in one second at top speed is rate independent
        let d_slow = slow.max_horizontal_speed * 30.0;
        let d_fast = fast.max_horizontal_speed * 120.0;
        assert!((d_slow - d_fast).abs() < 1e-5);
        assert_eq!(fast.ticks(6), 12);
        assert!((fast.speed(0.3) - 0.15).abs() < 1e-6);
    }
}
