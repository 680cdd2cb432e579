//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here. The top-level controller
//! owns the [`GameState`]; nothing else keeps a mutable handle into it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::PhysicsConfig;
use super::geometry::{Entity, EntityId};
use super::level::{Level, LevelMap};
use super::weapons::WeaponController;
use crate::error::LevelError;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Paused,
    /// Player died; terminal for this run
    GameOver,
    /// Player reached the last segment; terminal for this run
    Won,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionHorizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionVertical {
    Up,
    /// Level with the horizon
    Level,
    Down,
}

/// Facing, split into independent horizontal and vertical parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aim {
    pub horizontal: DirectionHorizontal,
    pub vertical: DirectionVertical,
}

impl Default for Aim {
    fn default() -> Self {
        Self {
            horizontal: DirectionHorizontal::Right,
            vertical: DirectionVertical::Level,
        }
    }
}

impl Aim {
    pub fn facing(horizontal: DirectionHorizontal) -> Self {
        Self {
            horizontal,
            vertical: DirectionVertical::Level,
        }
    }

    pub fn return_to_horizontal(&mut self) {
        self.vertical = DirectionVertical::Level;
    }

    /// Unit travel direction; a vertical aim wins over the horizontal one
    pub fn unit(&self) -> Vec2 {
        match (self.vertical, self.horizontal) {
            (DirectionVertical::Up, _) => Vec2::NEG_Y,
            (DirectionVertical::Down, _) => Vec2::Y,
            (DirectionVertical::Level, DirectionHorizontal::Left) => Vec2::NEG_X,
            (DirectionVertical::Level, DirectionHorizontal::Right) => Vec2::X,
        }
    }
}

/// Weapon models. A character's weapon is replaced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    /// Rifle
    #[default]
    R99,
    /// Shotgun, fires a spread
    PeaceKeeper,
    /// Sniper
    Kraber,
}

/// Firing characteristics of a weapon, authored for 60 Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage_per_bullet: u32,
    pub fire_interval_ticks: u32,
    /// Per-axis bullet speed in tiles per tick
    pub bullet_speed: Vec2,
    pub pellets: u32,
    /// Sideways speed between neighbouring pellets
    pub spread: f32,
}

impl Weapon {
    pub fn stats(self) -> WeaponStats {
        match self {
            Weapon::R99 => WeaponStats {
                damage_per_bullet: 5,
                fire_interval_ticks: 6,
                bullet_speed: Vec2::splat(0.3),
                pellets: 1,
                spread: 0.0,
            },
            Weapon::PeaceKeeper => WeaponStats {
                damage_per_bullet: 6,
                fire_interval_ticks: 45,
                bullet_speed: Vec2::splat(0.25),
                pellets: 5,
                spread: 0.025,
            },
            Weapon::Kraber => WeaponStats {
                damage_per_bullet: 40,
                fire_interval_ticks: 90,
                bullet_speed: Vec2::splat(0.5),
                pellets: 1,
                spread: 0.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weapon::R99 => "R99",
            Weapon::PeaceKeeper => "PeaceKeeper",
            Weapon::Kraber => "Kraber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy,
}

/// A player or enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub role: Role,
    /// Top-left of the hitbox
    pub pos: Vec2,
    pub hitbox: Vec2,
    /// Velocity in tiles per tick
    pub speed: Vec2,
    pub aim: Aim,

    // Intent flags, set by input or enemy logic
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch_key: bool,
    pub fire: bool,

    // State flags, set by kinematics
    pub crouching: bool,
    pub jumping: bool,
    pub falling: bool,
    pub shooting: bool,

    pub health: u32,
    pub weapon: Weapon,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Only active characters run kinematics and fire
    pub active: bool,
}

impl Character {
    fn new(id: EntityId, role: Role, pos: Vec2, hitbox: Vec2, health: u32, weapon: Weapon) -> Self {
        Self {
            id,
            role,
            pos,
            hitbox,
            speed: Vec2::ZERO,
            aim: Aim::default(),
            left: false,
            right: false,
            jump: false,
            crouch_key: false,
            fire: false,
            crouching: false,
            jumping: false,
            falling: false,
            shooting: false,
            health,
            weapon,
            fire_cooldown: 0,
            active: true,
        }
    }

    /// Place a character with its feet on the bottom edge of a marker tile
    fn standing_on_tile(tile: Vec2, hitbox: Vec2) -> Vec2 {
        Vec2::new(tile.x, tile.y + 1.0 - hitbox.y)
    }

    pub fn player(id: EntityId, spawn_tile: Vec2, config: &PhysicsConfig) -> Self {
        let pos = Self::standing_on_tile(spawn_tile, config.player_hitbox);
        Self::new(
            id,
            Role::Player,
            pos,
            config.player_hitbox,
            config.player_health,
            Weapon::R99,
        )
    }

    pub fn enemy(id: EntityId, spawn_tile: Vec2, weapon: Weapon, config: &PhysicsConfig) -> Self {
        let pos = Self::standing_on_tile(spawn_tile, config.enemy_hitbox);
        let mut enemy = Self::new(
            id,
            Role::Enemy,
            pos,
            config.enemy_hitbox,
            config.enemy_health,
            weapon,
        );
        enemy.aim = Aim::facing(DirectionHorizontal::Left);
        enemy.active = false;
        enemy
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.hitbox * 0.5
    }

    /// Subtract damage, flooring at zero
    pub fn apply_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }

    /// Swap in a new weapon
    pub fn set_weapon(&mut self, weapon: Weapon) {
        if self.weapon != weapon {
            log::debug!("Character {} equips {}", self.id, weapon.name());
        }
        self.weapon = weapon;
    }
}

impl Entity for Character {
    fn id(&self) -> EntityId {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn hitbox(&self) -> Vec2 {
        self.hitbox
    }
}

/// Bullet hitbox size in tiles
pub const BULLET_HITBOX: Vec2 = Vec2::splat(0.1);

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    /// Character that fired it; used for self-collision and attribution only
    pub owner: EntityId,
    pub pos: Vec2,
    pub hitbox: Vec2,
    /// Aim captured at spawn
    pub direction: Aim,
    /// Velocity in tiles per tick
    pub speed: Vec2,
    pub damage: u32,
    pub hit: bool,
}

impl Entity for Bullet {
    fn id(&self) -> EntityId {
        self.id
    }
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn hitbox(&self) -> Vec2 {
        self.hitbox
    }

    fn is_colliding(&self, other: &dyn Entity) -> bool {
        other.id() != self.owner && self.rect().overlaps(&other.rect())
    }
}

/// Aggregate root for one run's world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub level: Level,
    pub player: Character,
    /// Live enemies, ordered by id
    pub enemies: Vec<Character>,
    /// Live bullets, ordered by id
    pub bullets: Vec<Bullet>,
}

impl Stage {
    /// Resolve a character handle
    pub fn character(&self, id: EntityId) -> Option<&Character> {
        if self.player.id == id {
            Some(&self.player)
        } else {
            self.enemies.iter().find(|e| e.id == id)
        }
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        if self.player.id == id {
            Some(&mut self.player)
        } else {
            self.enemies.iter_mut().find(|e| e.id == id)
        }
    }

    /// Player first, then enemies in id order
    pub fn characters_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        std::iter::once(&mut self.player).chain(self.enemies.iter_mut())
    }

    pub fn player_segment(&self) -> usize {
        self.level.segment_index_at(self.player.pos)
    }

    pub fn segment_of(&self, character: &Character) -> usize {
        self.level.segment_index_at(character.pos)
    }

    /// Whether any live enemy shares the player's segment
    pub fn enemies_nearby(&self) -> bool {
        let segment = self.player_segment();
        self.enemies
            .iter()
            .any(|e| !e.is_dead() && self.segment_of(e) == segment)
    }
}

/// Something that happened during a tick, for collaborators to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { id: EntityId },
    Shot { owner: EntityId, weapon: Weapon, bullets: u32 },
    Hit { bullet: EntityId, target: EntityId, damage: u32 },
    Killed { id: EntityId, role: Role },
    EnemyRemoved { id: EntityId },
    GameOver,
    Won,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: PhysicsConfig,
    pub phase: GamePhase,
    /// Enemies killed this run
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Left edge of the camera; no character may move left of it
    pub camera_left: f32,
    pub stage: Stage,
    pub weapons: WeaponController,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    pub fn new(map: LevelMap, config: PhysicsConfig, seed: u64) -> Self {
        let LevelMap {
            level,
            player_spawn,
            enemy_spawns,
        } = map;

        let mut next_id = 1;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let player = Character::player(alloc(), player_spawn, &config);
        let enemies = enemy_spawns
            .iter()
            .map(|s| Character::enemy(alloc(), s.tile, s.weapon, &config))
            .collect();
        let camera_left = level.bounds().min.x;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            camera_left,
            stage: Stage {
                level,
                player,
                enemies,
                bullets: Vec::new(),
            },
            weapons: WeaponController::default(),
            next_id,
        };
        state.refresh_enemy_activation();
        state
    }

    /// Parse text maps and build a fresh run
    pub fn from_text_maps<S: AsRef<str>>(
        maps: &[S],
        config: PhysicsConfig,
        seed: u64,
    ) -> Result<Self, LevelError> {
        Ok(Self::new(Level::from_text_maps(maps)?, config, seed))
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// An enemy is active iff it shares the player's segment
    pub fn refresh_enemy_activation(&mut self) {
        let player_segment = self.stage.player_segment();
        let level = &self.stage.level;
        for enemy in &mut self.stage.enemies {
            enemy.active = level.segment_index_at(enemy.pos) == player_segment;
        }
    }

    /// Ensure live sets are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.stage.enemies.sort_by_key(|e| e.id);
        self.stage.bullets.sort_by_key(|b| b.id);
    }

    /// Running → Paused. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::info!("Paused at tick {}", self.time_ticks);
            true
        } else {
            false
        }
    }

    /// Paused → Running. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            log::info!("Resumed at tick {}", self.time_ticks);
            true
        } else {
            false
        }
    }
}
