//! Audio cues
//!
//! The simulation never plays sound itself. The controller turns tick events
//! into cues and hands them to an [`AudioManager`], which applies volume
//! settings and forwards them to whatever [`AudioBackend`] the platform
//! provides. Playback failures are logged and otherwise ignored.

use crate::settings::Settings;
use crate::sim::{GameEvent, Role};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// A weapon fired
    Shoot,
    /// A character left the ground
    Jump,
    /// A character died
    Death,
    /// Looping background music
    MainTheme,
}

impl SoundEffect {
    pub fn is_music(self) -> bool {
        self == SoundEffect::MainTheme
    }
}

pub type AudioResult = Result<(), Box<dyn std::error::Error>>;

/// Platform playback
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> AudioResult;
    fn stop(&mut self, effect: SoundEffect) -> AudioResult;
}

/// Backend that discards everything (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> AudioResult {
        Ok(())
    }
    fn stop(&mut self, _effect: SoundEffect) -> AudioResult {
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_playing: false,
        }
    }

    pub fn with_settings(backend: B, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get effective volume
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else if effect.is_music() {
            self.master_volume * self.music_volume
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if effect.is_music() && self.music_playing {
            return;
        }
        self.force_play(effect);
    }

    /// Play even if the cue is already running (restarts music)
    pub fn force_play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.backend.play(effect, vol) {
            log::warn!("Failed to play {:?}: {}", effect, err);
            return;
        }
        if effect.is_music() {
            self.music_playing = true;
        }
    }

    pub fn stop(&mut self, effect: SoundEffect) {
        if effect.is_music() {
            self.music_playing = false;
        }
        if let Err(err) = self.backend.stop(effect) {
            log::warn!("Failed to stop {:?}: {}", effect, err);
        }
    }

    /// Cue for a simulation event, if it has one
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Shot { .. } => self.play(SoundEffect::Shoot),
            GameEvent::Jumped { .. } => self.play(SoundEffect::Jump),
            GameEvent::Killed { role, .. } => {
                self.play(SoundEffect::Death);
                if *role == Role::Player {
                    self.stop(SoundEffect::MainTheme);
                }
            }
            GameEvent::Won => self.stop(SoundEffect::MainTheme),
            _ => {}
        }
    }
}
