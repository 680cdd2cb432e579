//! Top-level game controller
//!
//! Owns the simulation state for one run together with the collaborators that
//! present it. Key input only flips intent flags on the player; everything
//! physical happens inside the next tick.

use std::path::Path;

use crate::audio::{AudioBackend, AudioManager, SoundEffect};
use crate::consts::MAX_SUBSTEPS;
use crate::error::LevelError;
use crate::score::UserData;
use crate::settings::Settings;
use crate::sim::{
    self, DirectionHorizontal, DirectionVertical, GameEvent, GamePhase, GameState, Level, LevelMap,
    Weapon,
};

/// Presentation collaborator
pub trait View {
    /// Called once per completed tick with the full state
    fn render(&mut self, state: &GameState);
    fn display_pause_menu(&mut self);
    fn display_game_over_menu(&mut self);
    fn display_win_menu(&mut self);
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move left
    A,
    /// Move right
    D,
    /// Aim up
    W,
    /// Crouch, aim down
    S,
    Space,
    /// Fire
    J,
    Escape,
    Digit1,
    Digit2,
    Digit3,
}

/// Drives one run: ticks the simulation and reports to view and audio
pub struct Controller<V: View, B: AudioBackend> {
    state: GameState,
    view: V,
    audio: AudioManager<B>,
    user: UserData,
    /// Unsimulated time carried between frames (seconds)
    accumulator: f32,
}

impl<V: View, B: AudioBackend> Controller<V, B> {
    pub fn new(map: LevelMap, settings: &Settings, view: V, backend: B) -> Self {
        let state = GameState::new(map, settings.physics(), settings.seed);
        let mut controller = Self {
            state,
            view,
            audio: AudioManager::with_settings(backend, settings),
            user: UserData::new(settings.player_name.clone()),
            accumulator: 0.0,
        };
        controller.audio.force_play(SoundEffect::MainTheme);
        controller
    }

    /// Build a run from a directory of segment maps
    pub fn from_level_dir(
        dir: &Path,
        settings: &Settings,
        view: V,
        backend: B,
    ) -> Result<Self, LevelError> {
        Ok(Self::new(Level::load_dir(dir)?, settings, view, backend))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn user(&self) -> &UserData {
        &self.user
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Stop the loop and show the pause menu
    pub fn pause(&mut self) {
        if self.state.pause() {
            self.audio.stop(SoundEffect::MainTheme);
            self.view.display_pause_menu();
        }
    }

    pub fn resume(&mut self) {
        if self.state.resume() {
            self.audio.force_play(SoundEffect::MainTheme);
        }
    }

    pub fn key_pressed(&mut self, key: Key) {
        let player = &mut self.state.stage.player;
        match key {
            Key::A => {
                player.left = true;
                player.aim.horizontal = DirectionHorizontal::Left;
            }
            Key::D => {
                player.right = true;
                player.aim.horizontal = DirectionHorizontal::Right;
            }
            Key::W => player.aim.vertical = DirectionVertical::Up,
            Key::S => {
                player.crouch_key = true;
                player.aim.vertical = DirectionVertical::Down;
            }
            Key::Space => player.jump = true,
            Key::J => player.fire = true,
            Key::Escape => match self.state.phase {
                GamePhase::Paused => self.resume(),
                _ => self.pause(),
            },
            Key::Digit1 => player.set_weapon(Weapon::R99),
            Key::Digit2 => player.set_weapon(Weapon::PeaceKeeper),
            Key::Digit3 => player.set_weapon(Weapon::Kraber),
        }
    }

    pub fn key_released(&mut self, key: Key) {
        let player = &mut self.state.stage.player;
        match key {
            Key::A => player.left = false,
            Key::D => player.right = false,
            Key::W => player.aim.return_to_horizontal(),
            Key::S => {
                player.crouch_key = false;
                player.aim.return_to_horizontal();
            }
            Key::Space => player.jump = false,
            Key::J => player.fire = false,
            _ => {}
        }
    }

    /// Run one simulation tick and notify collaborators
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Running {
            return Vec::new();
        }

        let events = sim::tick(&mut self.state);
        for event in &events {
            self.audio.handle_event(event);
            match event {
                GameEvent::EnemyRemoved { .. } => self.user.increase_points(),
                GameEvent::GameOver => self.view.display_game_over_menu(),
                GameEvent::Won => self.view.display_win_menu(),
                _ => {}
            }
        }

        self.view.render(&self.state);
        events
    }

    /// Run as many fixed ticks as `dt` seconds of wall time cover
    pub fn update(&mut self, dt: f32) -> u32 {
        let step = 1.0 / self.state.config.tps;
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= step;
            substeps += 1;
        }
        substeps
    }
}
