//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod config;
pub mod enemy;
pub mod geometry;
pub mod kinematics;
pub mod level;
pub mod state;
pub mod tick;
pub mod weapons;

pub use config::PhysicsConfig;
pub use geometry::{Entity, EntityId, Rect};
pub use kinematics::{Bounds, StepOutcome};
pub use level::{EnemySpawn, Level, LevelMap, Segment, Tile};
pub use state::{
    Aim, BULLET_HITBOX, Bullet, Character, DirectionHorizontal, DirectionVertical, GameEvent,
    GamePhase, GameState, Role, Stage, Weapon, WeaponStats,
};
pub use tick::tick;
pub use weapons::{WeaponController, request_fire};
