//! Weapon firing and bullet lifecycle
//!
//! Fire requests are rate limited when they are made and queued; the queue
//! turns into bullets on the next weapons pass. Each pass then moves every
//! bullet along the velocity it was given at spawn, resolves hits against
//! tiles and characters, and purges spent bullets before the tick ends.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::PhysicsConfig;
use super::geometry::{Entity, EntityId};
use super::state::{BULLET_HITBOX, Bullet, Character, GameEvent, GameState, Role};

/// Pending shots for the next weapons pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponController {
    queue: Vec<EntityId>,
}

impl WeaponController {
    /// Queue a shot from `shooter` if its reload has elapsed.
    ///
    /// Requests during reload are dropped without error. Returns whether the
    /// request was accepted.
    pub fn request_fire(&mut self, shooter: &mut Character, config: &PhysicsConfig) -> bool {
        if shooter.is_dead() || shooter.fire_cooldown > 0 || self.queue.contains(&shooter.id) {
            return false;
        }
        let mut interval = config.ticks(shooter.weapon.stats().fire_interval_ticks);
        if shooter.role == Role::Enemy {
            interval += config.enemy_reload_ticks;
        }
        shooter.fire_cooldown = interval;
        self.queue.push(shooter.id);
        true
    }

    pub fn pending(&self) -> &[EntityId] {
        &self.queue
    }

    fn take_queue(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.queue)
    }
}

/// Ask for a shot from the character with `id`
pub fn request_fire(state: &mut GameState, id: EntityId) -> bool {
    let config = &state.config;
    let Some(shooter) = state.stage.character_mut(id) else {
        return false;
    };
    state.weapons.request_fire(shooter, config)
}

/// One weapons pass: reload, spawn queued shots, advance and resolve bullets
pub fn advance(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.stage.player.fire_cooldown = state.stage.player.fire_cooldown.saturating_sub(1);
    for enemy in &mut state.stage.enemies {
        enemy.fire_cooldown = enemy.fire_cooldown.saturating_sub(1);
    }

    spawn_queued(state, events);
    move_and_resolve(state, events);
}

fn spawn_queued(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for owner_id in state.weapons.take_queue() {
        let Some(owner) = state.stage.character(owner_id) else {
            continue;
        };
        if owner.is_dead() {
            continue;
        }

        let weapon = owner.weapon;
        let stats = weapon.stats();
        let direction = owner.aim;
        let mut muzzle = owner.center() - BULLET_HITBOX * 0.5;
        if owner.crouching {
            muzzle.y += owner.hitbox.y * 0.25;
        }

        let dir = direction.unit();
        let velocity = muzzle_velocity(dir, stats.bullet_speed) * state.config.speed(1.0);
        let sideways = dir.perp();
        let spread = state.config.speed(stats.spread);

        let pellets = stats.pellets.max(1);
        let middle = (pellets - 1) as f32 / 2.0;
        for i in 0..pellets {
            let mut offset = (i as f32 - middle) * spread;
            if spread > 0.0 {
                offset += state.rng.random_range(-spread * 0.25..=spread * 0.25);
            }
            let bullet = Bullet {
                id: state.next_entity_id(),
                owner: owner_id,
                pos: muzzle,
                hitbox: BULLET_HITBOX,
                direction,
                speed: velocity + sideways * offset,
                damage: stats.damage_per_bullet,
                hit: false,
            };
            state.stage.bullets.push(bullet);
        }

        log::debug!("Character {} fired {} ({} bullets)", owner_id, weapon.name(), pellets);
        events.push(GameEvent::Shot {
            owner: owner_id,
            weapon,
            bullets: pellets,
        });
    }
}

fn move_and_resolve(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let stage = &mut state.stage;
    let level_bounds = stage.level.bounds();
    let mut bullets = std::mem::take(&mut stage.bullets);

    for bullet in &mut bullets {
        if bullet.hit {
            continue;
        }
        bullet.pos += bullet.speed;

        if !stage.level.solid_tiles_in(&bullet.rect()).is_empty() {
            bullet.hit = true;
            continue;
        }

        let target = stage
            .characters_mut()
            .find(|c| !c.is_dead() && bullet.is_colliding(&**c));
        if let Some(target) = target {
            bullet.hit = true;
            target.apply_damage(bullet.damage);
            events.push(GameEvent::Hit {
                bullet: bullet.id,
                target: target.id,
                damage: bullet.damage,
            });
            if target.is_dead() {
                log::info!("{:?} {} killed by character {}", target.role, target.id, bullet.owner);
                events.push(GameEvent::Killed {
                    id: target.id,
                    role: target.role,
                });
            }
        }
    }

    bullets.retain(|b| !b.hit && b.rect().overlaps(&level_bounds));
    stage.bullets = bullets;
}

/// Muzzle velocity for a weapon fired along `aim`, ignoring spread
pub fn muzzle_velocity(aim_unit: Vec2, bullet_speed: Vec2) -> Vec2 {
    aim_unit * bullet_speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DirectionHorizontal, DirectionVertical, Weapon};
    use proptest::prelude::*;

    // Player at x=1, rifle enemy at x=8, both standing on row 2
    const RANGE: &str = "\
..........
.P......E.
##########";

    fn state() -> GameState {
        GameState::from_text_maps(&[RANGE], PhysicsConfig::default(), 42).unwrap()
    }

    fn player_id(state: &GameState) -> EntityId {
        state.stage.player.id
    }

    #[test]
    fn test_cooldown_drops_second_request() {
        let mut s = state();
        let id = player_id(&s);
        assert!(request_fire(&mut s, id));
        assert!(!request_fire(&mut s, id));

        let mut events = Vec::new();
        advance(&mut s, &mut events);
        assert_eq!(s.stage.bullets.len(), 1);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Shot { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_rifle_fire_interval() {
        let mut s = state();
        let id = player_id(&s);
        let interval = Weapon::R99.stats().fire_interval_ticks;
        let mut accepted = 0;
        for _ in 0..interval * 3 {
            if request_fire(&mut s, id) {
                accepted += 1;
            }
            advance(&mut s, &mut Vec::new());
        }
        assert_eq!(accepted, 3);
    }

    #[test]
    fn test_shotgun_spawns_spread() {
        let mut s = state();
        s.stage.player.set_weapon(Weapon::PeaceKeeper);
        let id = player_id(&s);
        request_fire(&mut s, id);
        advance(&mut s, &mut Vec::new());

        let bullets = &s.stage.bullets;
        assert_eq!(bullets.len(), 5);
        assert!(bullets.iter().all(|b| b.speed.x > 0.0));
        let min_y = bullets.iter().map(|b| b.speed.y).fold(f32::MAX, f32::min);
        let max_y = bullets.iter().map(|b| b.speed.y).fold(f32::MIN, f32::max);
        assert!(max_y - min_y > 0.05);
    }

    #[test]
    fn test_direction_locked_at_spawn() {
        let mut s = state();
        let id = player_id(&s);
        request_fire(&mut s, id);
        advance(&mut s, &mut Vec::new());
        let before = s.stage.bullets[0].speed;

        s.stage.player.aim.horizontal = DirectionHorizontal::Left;
        advance(&mut s, &mut Vec::new());
        assert_eq!(s.stage.bullets[0].speed, before);
        assert_eq!(s.stage.bullets[0].direction.horizontal, DirectionHorizontal::Right);
    }

    #[test]
    fn test_bullet_hits_enemy_once() {
        let mut s = state();
        let id = player_id(&s);
        let enemy_health = s.stage.enemies[0].health;
        request_fire(&mut s, id);

        let mut events = Vec::new();
        for _ in 0..60 {
            advance(&mut s, &mut events);
        }

        let damage = Weapon::R99.stats().damage_per_bullet;
        assert_eq!(s.stage.enemies[0].health, enemy_health - damage);
        assert!(s.stage.bullets.is_empty());
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Hit { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_bullet_stops_at_wall() {
        let map = "......\n.P.#E.\n######";
        let mut s = GameState::from_text_maps(&[map], PhysicsConfig::default(), 1).unwrap();
        let id = player_id(&s);
        let enemy_health = s.stage.enemies[0].health;
        request_fire(&mut s, id);
        for _ in 0..30 {
            advance(&mut s, &mut Vec::new());
        }
        assert!(s.stage.bullets.is_empty());
        assert_eq!(s.stage.enemies[0].health, enemy_health);
    }

    #[test]
    fn test_bullet_leaving_level_is_purged() {
        let mut s = state();
        s.stage.player.aim.vertical = DirectionVertical::Up;
        let id = player_id(&s);
        request_fire(&mut s, id);
        advance(&mut s, &mut Vec::new());
        assert_eq!(s.stage.bullets.len(), 1);
        for _ in 0..10 {
            advance(&mut s, &mut Vec::new());
        }
        assert!(s.stage.bullets.is_empty());
    }

    #[test]
    fn test_kill_emits_event_once() {
        let mut s = state();
        s.stage.enemies[0].health = 1;
        let id = player_id(&s);
        let enemy_id = s.stage.enemies[0].id;
        request_fire(&mut s, id);
        let mut events = Vec::new();
        for _ in 0..60 {
            advance(&mut s, &mut events);
        }
        let kills: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Killed { .. }))
            .collect();
        assert_eq!(kills, vec![&GameEvent::Killed { id: enemy_id, role: Role::Enemy }]);
    }

    #[test]
    fn test_enemy_reload_is_longer() {
        let mut s = state();
        let enemy_id = s.stage.enemies[0].id;
        assert!(request_fire(&mut s, enemy_id));
        let expected = Weapon::R99.stats().fire_interval_ticks + s.config.enemy_reload_ticks;
        assert_eq!(s.stage.enemies[0].fire_cooldown, expected);
        assert_eq!(s.weapons.pending(), &[enemy_id]);
    }

    #[test]
    fn test_muzzle_velocity() {
        assert_eq!(muzzle_velocity(Vec2::NEG_X, Vec2::splat(0.3)), Vec2::new(-0.3, 0.0));
    }

    proptest! {
        #[test]
        fn prop_damage_applied_at_most_once_per_bullet(shots in 1u32..6, health in 1u32..200) {
            let mut s = state();
            s.stage.enemies[0].health = health;
            let id = player_id(&s);
            let mut fired = 0;
            let mut events = Vec::new();
            for _ in 0..400 {
                if fired < shots && request_fire(&mut s, id) {
                    fired += 1;
                }
                advance(&mut s, &mut events);
            }
            let mut hit_bullets: Vec<EntityId> = events
                .iter()
                .filter_map(|e| match e {
                    GameEvent::Hit { bullet, .. } => Some(*bullet),
                    _ => None,
                })
                .collect();
            let total = hit_bullets.len();
            hit_bullets.sort_unstable();
            hit_bullets.dedup();
            prop_assert_eq!(total, hit_bullets.len());
            let dealt = health - s.stage.enemies[0].health;
            prop_assert!(dealt <= fired * Weapon::R99.stats().damage_per_bullet);
        }
    }
}
