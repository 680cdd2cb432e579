//! Per-tick character kinematics and tile collision
//!
//! One call advances one character by one tick: intent flags become
//! velocity, velocity becomes a tentative position, and the result is pushed
//! out of solid tiles one axis at a time (X first, then Y). Role-specific
//! rules sit on top of the shared step: enemies only move while active and the
//! player cannot leave a segment that still holds live enemies.

use super::config::PhysicsConfig;
use super::geometry::Rect;
use super::level::Level;
use super::state::{Character, Role};
use crate::approach;

/// Tile queries ignore overlaps thinner than this, absorbing float noise
const TILE_EPSILON: f32 = 1e-4;

/// Constraints coming from outside the character
#[derive(Debug, Clone, Copy, Default)]
pub struct Bounds {
    /// Camera left edge
    pub left: f32,
    /// Whether a live enemy shares the player's segment
    pub enemies_nearby: bool,
}

/// What happened to a character this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Ran this tick (enemies skip while inactive)
    pub moved: bool,
    pub jumped: bool,
    pub landed: bool,
    /// Dropped below the level and was killed
    pub fell_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Advance one character by one tick
pub fn step(
    character: &mut Character,
    level: &Level,
    config: &PhysicsConfig,
    bounds: Bounds,
) -> StepOutcome {
    if character.role == Role::Enemy && !character.active {
        return StepOutcome::default();
    }

    let mut outcome = step_base(character, level, config, bounds.left);

    if character.role == Role::Player && bounds.enemies_nearby {
        clamp_to_segment_exit(character, level, config);
    }

    if character.pos.y >= level.bounds().max().y && !character.is_dead() {
        log::info!("Character {} fell out of the level", character.id);
        character.health = 0;
        outcome.fell_out = true;
    }

    outcome
}

/// Shared kinematics for every role
fn step_base(
    character: &mut Character,
    level: &Level,
    config: &PhysicsConfig,
    left_bound: f32,
) -> StepOutcome {
    let mut outcome = StepOutcome {
        moved: true,
        ..Default::default()
    };

    // Horizontal intent
    let max_h = config.max_horizontal_speed;
    character.speed.x = match (character.left, character.right) {
        (true, false) => approach(character.speed.x, -max_h, config.acceleration),
        (false, true) => approach(character.speed.x, max_h, config.acceleration),
        _ => approach(character.speed.x, 0.0, config.deceleration),
    };
    character.speed.x = character.speed.x.clamp(-max_h, max_h);

    // Vertical intent
    if character.jump && !character.jumping && !character.falling {
        character.speed.y = config.jump;
        character.jumping = true;
        outcome.jumped = true;
    } else {
        character.speed.y += config.gravity;
    }
    let max_v = config.max_vertical_speed;
    character.speed.y = character.speed.y.clamp(-max_v, max_v);

    // Tentative move, resolved per axis
    character.pos.x += character.speed.x;
    resolve_axis(character, level, Axis::X);

    character.pos.y += character.speed.y;
    outcome.landed = resolve_axis(character, level, Axis::Y);
    if !outcome.landed && character.speed.y > 0.0 {
        character.falling = true;
    }

    if character.pos.x < left_bound {
        character.pos.x = left_bound;
        character.speed.x = 0.0;
    }

    character.crouching = character.crouch_key;
    character.shooting = character.fire;

    outcome
}

/// Push the character out of any solid tile along one axis.
///
/// The push direction follows the velocity on that axis; a character with no
/// velocity on the axis is moved to whichever side is closer. Returns true
/// when the character ends up standing on a tile.
fn resolve_axis(character: &mut Character, level: &Level, axis: Axis) -> bool {
    let rect = Rect::new(character.pos, character.hitbox).inset(TILE_EPSILON);
    let tiles = level.solid_tiles_in(&rect);
    if tiles.is_empty() {
        return false;
    }

    let pick = |(col, row): (i32, i32)| if axis == Axis::X { col } else { row };
    let lo = tiles.iter().copied().map(pick).min().unwrap_or_default() as f32;
    let hi = tiles.iter().copied().map(pick).max().unwrap_or_default() as f32 + 1.0;

    let (pos, size, vel) = match axis {
        Axis::X => (character.pos.x, character.hitbox.x, character.speed.x),
        Axis::Y => (character.pos.y, character.hitbox.y, character.speed.y),
    };
    let before = lo - size;
    let after = hi;
    let moving_forward = if vel > 0.0 {
        true
    } else if vel < 0.0 {
        false
    } else {
        (pos - before).abs() <= (after - pos).abs()
    };
    let resolved = if moving_forward { before } else { after };

    match axis {
        Axis::X => {
            character.pos.x = resolved;
            character.speed.x = 0.0;
            false
        }
        Axis::Y => {
            character.pos.y = resolved;
            character.speed.y = 0.0;
            if moving_forward {
                character.jumping = false;
                character.falling = false;
            }
            moving_forward
        }
    }
}

/// Keep the player inside the current segment while enemies remain in it
fn clamp_to_segment_exit(character: &mut Character, level: &Level, config: &PhysicsConfig) {
    let segment = level.segment(level.segment_index_at(character.pos));
    let limit = segment.right_edge() - config.segment_exit_margin;
    if character.pos.x + character.hitbox.x > limit {
        character.pos.x = limit - character.hitbox.x;
        character.speed.x = character.speed.x.min(0.0);
    }
}
