//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Every entity is
//! updated synchronously, in a fixed order, before the tick returns.

use super::enemy;
use super::geometry::EntityId;
use super::kinematics::{self, Bounds};
use super::state::{GameEvent, GamePhase, GameState, Role};
use super::weapons;

/// Advance the game state by one fixed timestep.
///
/// Does nothing unless the run is in [`GamePhase::Running`]. Returns the
/// events produced during the tick.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.time_ticks += 1;

    // 1. Enemy activation follows the player's segment
    state.refresh_enemy_activation();

    // 2. Active enemies think, move and shoot
    update_enemies(state, &mut events);

    // 3. Clear out the dead
    remove_dead_enemies(state, &mut events);

    // 4. Weapons: spawn queued shots, move bullets, resolve hits
    weapons::advance(state, &mut events);

    // 5. Player kinematics
    let bounds = Bounds {
        left: state.camera_left,
        enemies_nearby: state.stage.enemies_nearby(),
    };
    let outcome = kinematics::step(
        &mut state.stage.player,
        &state.stage.level,
        &state.config,
        bounds,
    );
    if outcome.jumped {
        events.push(GameEvent::Jumped {
            id: state.stage.player.id,
        });
    }
    if outcome.fell_out {
        events.push(GameEvent::Killed {
            id: state.stage.player.id,
            role: Role::Player,
        });
    }
    update_camera(state);

    // 6. Player fire request
    if state.stage.player.shooting {
        state.weapons.request_fire(&mut state.stage.player, &state.config);
    }

    // 7. Death
    if state.stage.player.is_dead() {
        state.phase = GamePhase::GameOver;
        log::info!("Game over at tick {} with score {}", state.time_ticks, state.score);
        events.push(GameEvent::GameOver);
        return events;
    }

    // 8. Reaching the last segment wins
    if state.stage.player_segment() == state.stage.level.last_segment_index() {
        state.phase = GamePhase::Won;
        log::info!("Level complete at tick {} with score {}", state.time_ticks, state.score);
        events.push(GameEvent::Won);
    }

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

fn update_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let bounds = Bounds {
        left: state.camera_left,
        enemies_nearby: false,
    };
    let player = &state.stage.player;
    let level = &state.stage.level;
    let config = &state.config;

    for e in &mut state.stage.enemies {
        enemy::update_intent(e, player, config);
        let outcome = kinematics::step(e, level, config, bounds);
        if !outcome.moved {
            continue;
        }
        if outcome.jumped {
            events.push(GameEvent::Jumped { id: e.id });
        }
        if outcome.fell_out {
            events.push(GameEvent::Killed {
                id: e.id,
                role: Role::Enemy,
            });
        }
        if e.shooting {
            state.weapons.request_fire(e, config);
        }
    }
}

fn remove_dead_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let dead: Vec<EntityId> = state
        .stage
        .enemies
        .iter()
        .filter(|e| e.is_dead())
        .map(|e| e.id)
        .collect();
    if dead.is_empty() {
        return;
    }

    state.stage.enemies.retain(|e| !e.is_dead());
    for id in dead {
        state.score += 1;
        log::info!("Enemy {} removed, score {}", id, state.score);
        events.push(GameEvent::EnemyRemoved { id });
    }
}

/// Scroll the camera forward to keep the player centred; it never scrolls back
fn update_camera(state: &mut GameState) {
    let bounds = state.stage.level.bounds();
    let half_view = state.config.view_width / 2.0;
    let desired = state.stage.player.center().x - half_view;
    let max_left = (bounds.max().x - state.config.view_width).max(bounds.min.x);
    state.camera_left = state.camera_left.max(desired).clamp(bounds.min.x, max_left);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::PhysicsConfig;
    use crate::sim::state::Weapon;
    use glam::Vec2;

    const ARENA: &str = "\
............
............
.P.......E..
############";
    const GOAL: &str = "\
......
......
......
######";

    fn state() -> GameState {
        GameState::from_text_maps(&[ARENA, GOAL], PhysicsConfig::default(), 2024).unwrap()
    }

    fn player_bullets(state: &GameState) -> usize {
        let id = state.stage.player.id;
        state.stage.bullets.iter().filter(|b| b.owner == id).count()
    }

    #[test]
    fn test_idle_player_settles_on_ground() {
        let mut s = state();
        let start = s.stage.player.pos;
        tick(&mut s);
        let player = &s.stage.player;
        assert_eq!(player.pos, start);
        assert_eq!(player.speed.y, 0.0);
        assert!(!player.jumping);
        assert_eq!(s.time_ticks, 1);
    }

    #[test]
    fn test_double_fire_request_spawns_one_bullet() {
        let mut s = state();
        s.stage.player.set_weapon(Weapon::R99);
        s.stage.player.fire = true;

        // Tick 1 queues the shot, a manual second request inside the same window is dropped
        tick(&mut s);
        let id = s.stage.player.id;
        assert!(!weapons::request_fire(&mut s, id));

        // Tick 2 spawns it; the cooldown still blocks the held trigger
        tick(&mut s);
        assert_eq!(player_bullets(&s), 1);
    }

    #[test]
    fn test_inactive_enemy_does_not_fire() {
        let mut s = state();
        s.stage.player.pos.x = 13.0;
        s.stage.enemies[0].shooting = true;
        tick(&mut s);
        let enemy = &s.stage.enemies[0];
        assert!(!enemy.active);
        assert!(!enemy.fire);
        assert_eq!(enemy.fire_cooldown, 0);
        assert!(s.weapons.pending().is_empty());
        assert!(s.stage.bullets.is_empty());
    }

    #[test]
    fn test_activation_tracks_player_segment() {
        let mut s = state();
        // Remove the encounter lock so the player can cross
        s.stage.enemies[0].health = 0;
        tick(&mut s);
        assert!(s.stage.enemies.is_empty());

        let mut s = state();
        let enemy_segment = s.stage.segment_of(&s.stage.enemies[0]);
        for x in [1.0, 11.0, 13.0, 2.0] {
            s.stage.player.pos.x = x;
            s.phase = GamePhase::Running;
            tick(&mut s);
            let expected = s.stage.player_segment() == enemy_segment;
            assert_eq!(s.stage.enemies[0].active, expected, "player at x={x}");
        }
    }

    #[test]
    fn test_reaching_last_segment_wins_and_freezes() {
        let mut s = state();
        s.stage.enemies.clear();
        s.stage.player.pos = Vec2::new(12.5, 1.5);

        let events = tick(&mut s);
        assert_eq!(s.phase, GamePhase::Won);
        assert!(events.contains(&GameEvent::Won));

        let frozen = s.stage.player.clone();
        let ticks = s.time_ticks;
        s.stage.player.right = true;
        assert!(tick(&mut s).is_empty());
        assert_eq!(s.stage.player.pos, frozen.pos);
        assert_eq!(s.time_ticks, ticks);
    }

    #[test]
    fn test_enemy_removed_and_scored_on_following_tick() {
        let mut s = state();
        s.stage.enemies[0].health = 1;
        s.stage.player.fire = true;
        let enemy_id = s.stage.enemies[0].id;

        let mut killed_at = None;
        for t in 0..120 {
            let events = tick(&mut s);
            if events.contains(&GameEvent::Killed { id: enemy_id, role: Role::Enemy }) {
                killed_at = Some(t);
                break;
            }
        }
        assert!(killed_at.is_some());
        // Still present, but dead, at the end of tick T
        assert_eq!(s.stage.enemies.len(), 1);
        assert_eq!(s.score, 0);

        let events = tick(&mut s);
        assert!(s.stage.enemies.is_empty());
        assert_eq!(s.score, 1);
        assert!(events.contains(&GameEvent::EnemyRemoved { id: enemy_id }));
    }

    #[test]
    fn test_player_held_until_encounter_cleared() {
        let mut s = state();
        s.stage.player.right = true;
        s.stage.player.health = 10_000;
        for _ in 0..240 {
            tick(&mut s);
        }
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.stage.player_segment(), 0);
    }

    #[test]
    fn test_enemy_fire_can_end_the_run() {
        let mut s = state();
        s.stage.player.health = 1;
        let mut events = Vec::new();
        for _ in 0..120 {
            events.extend(tick(&mut s));
            if s.phase != GamePhase::Running {
                break;
            }
        }
        assert_eq!(s.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::GameOver));
        assert!(tick(&mut s).is_empty());
    }

    #[test]
    fn test_paused_does_not_advance() {
        let mut s = state();
        s.stage.player.right = true;
        s.pause();
        let before = s.stage.player.pos;
        for _ in 0..10 {
            tick(&mut s);
        }
        assert_eq!(s.stage.player.pos, before);
        assert_eq!(s.time_ticks, 0);
    }

    #[test]
    fn test_camera_never_scrolls_back() {
        let width = 60;
        let corridor = format!(
            "{}\nP{}\n{}",
            ".".repeat(width),
            ".".repeat(width - 1),
            "#".repeat(width)
        );
        let mut s =
            GameState::from_text_maps(&[corridor.as_str(), GOAL], PhysicsConfig::default(), 3)
                .unwrap();
        s.stage.player.right = true;
        for _ in 0..300 {
            tick(&mut s);
        }
        let scrolled = s.camera_left;
        assert!(scrolled > 0.0);

        s.stage.player.right = false;
        s.stage.player.left = true;
        for _ in 0..120 {
            tick(&mut s);
        }
        assert_eq!(s.camera_left, scrolled);
        assert!(s.stage.player.pos.x >= scrolled);
    }

    #[test]
    fn test_determinism() {
        let mut a = state();
        let mut b = state();
        for s in [&mut a, &mut b] {
            s.stage.player.set_weapon(Weapon::PeaceKeeper);
            s.stage.player.fire = true;
            s.stage.player.jump = true;
        }
        for _ in 0..90 {
            assert_eq!(tick(&mut a), tick(&mut b));
        }
        assert_eq!(a.stage.bullets, b.stage.bullets);
        assert_eq!(a.stage.player, b.stage.player);
    }
}
