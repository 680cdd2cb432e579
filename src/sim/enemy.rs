//! Enemy intent
//!
//! Enemies hold their ground: an active enemy turns to face the player and
//! pulls the trigger while the player is in range and level with its muzzle.

use super::config::PhysicsConfig;
use super::state::{Aim, Character, DirectionHorizontal};

/// Set an enemy's aim and fire flag for this tick
pub fn update_intent(enemy: &mut Character, player: &Character, config: &PhysicsConfig) {
    if !enemy.active || enemy.is_dead() || player.is_dead() {
        enemy.fire = false;
        return;
    }

    let dx = player.center().x - enemy.center().x;
    enemy.aim = Aim::facing(if dx < 0.0 {
        DirectionHorizontal::Left
    } else {
        DirectionHorizontal::Right
    });

    let muzzle_y = enemy.center().y;
    let level_with_player = muzzle_y >= player.pos.y && muzzle_y < player.pos.y + player.hitbox.y;
    enemy.fire = dx.abs() <= config.enemy_sight_range && level_with_player;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Weapon;
    use glam::Vec2;

    fn pair(player_x: f32, player_row: f32) -> (Character, Character, PhysicsConfig) {
        let config = PhysicsConfig::default();
        let player = Character::player(1, Vec2::new(player_x, player_row), &config);
        let mut enemy = Character::enemy(2, Vec2::new(10.0, 5.0), Weapon::R99, &config);
        enemy.active = true;
        (player, enemy, config)
    }

    #[test]
    fn test_faces_and_fires_at_player_in_range() {
        let (player, mut enemy, config) = pair(4.0, 5.0);
        update_intent(&mut enemy, &player, &config);
        assert_eq!(enemy.aim.horizontal, DirectionHorizontal::Left);
        assert!(enemy.fire);

        let (player, mut enemy, config) = pair(14.0, 5.0);
        update_intent(&mut enemy, &player, &config);
        assert_eq!(enemy.aim.horizontal, DirectionHorizontal::Right);
        assert!(enemy.fire);
    }

    #[test]
    fn test_holds_fire_out_of_range_or_off_level() {
        let (player, mut enemy, config) = pair(-5.0, 5.0);
        update_intent(&mut enemy, &player, &config);
        assert!(!enemy.fire);

        let (player, mut enemy, config) = pair(6.0, 1.0);
        update_intent(&mut enemy, &player, &config);
        assert!(!enemy.fire);
    }

    #[test]
    fn test_inactive_enemy_never_fires() {
        let (player, mut enemy, config) = pair(8.0, 5.0);
        enemy.active = false;
        enemy.fire = true;
        update_intent(&mut enemy, &player, &config);
        assert!(!enemy.fire);
    }
}
