//! Sound cues
//!
//! Playback is best-effort: the game never waits on or fails because of audio.
//! A missing backend or a backend error silently drops the cue.

use std::fmt;
use std::io::{self, Write};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball destroys a brick
    BrickHit,
    /// Ball hits a wall
    WallHit,
    /// Ball fell past the paddle
    BallLost,
    /// Out of lives
    GameOver,
    /// All bricks cleared
    LevelComplete,
    /// Final level cleared
    Victory,
    /// Ball launched from the paddle
    BallLaunch,
    /// Level begins
    LevelStart,
}

impl SoundEffect {
    /// Canonical cue name
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::PaddleHit => "paddle_hit",
            SoundEffect::BrickHit => "brick_hit",
            SoundEffect::WallHit => "wall_hit",
            SoundEffect::BallLost => "ball_lost",
            SoundEffect::GameOver => "game_over",
            SoundEffect::LevelComplete => "level_complete",
            SoundEffect::Victory => "victory",
            SoundEffect::BallLaunch => "ball_launch",
            SoundEffect::LevelStart => "level_start",
        }
    }

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LevelStarted { .. } => Some(SoundEffect::LevelStart),
            GameEvent::BallLaunched => Some(SoundEffect::BallLaunch),
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::BrickHit { .. } => Some(SoundEffect::BrickHit),
            GameEvent::BallLost { .. } => Some(SoundEffect::BallLost),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::Victory => Some(SoundEffect::Victory),
            GameEvent::SessionFinished(_) => None,
        }
    }
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Playback failure reported by a backend
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Output device could not be used
    Device(String),
    /// Backend has no sound for this cue
    Unsupported(SoundEffect),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Device(msg) => write!(f, "Audio device error: {}", msg),
            AudioError::Unsupported(effect) => write!(f, "No sound for cue {}", effect),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can actually make noise
pub trait AudioBackend {
    /// Play `effect` at `volume` (0.0 - 1.0, already mixed)
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Rings the terminal bell for the cues worth interrupting the player for
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn rings_for(effect: SoundEffect) -> bool {
        matches!(
            effect,
            SoundEffect::BallLost
                | SoundEffect::GameOver
                | SoundEffect::LevelComplete
                | SoundEffect::Victory
        )
    }
}

impl AudioBackend for TerminalBell {
    fn play(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        if !Self::rings_for(effect) {
            return Err(AudioError::Unsupported(effect));
        }
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| AudioError::Device(e.to_string()))
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioManager")
            .field("backend", &self.backend.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    /// Manager with no output; every cue is dropped
    pub fn new() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 0.7,
            muted: false,
        }
    }

    pub fn with_backend(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::new()
        }
    }

    /// Apply the volume and mute preferences from settings
    pub fn from_settings(settings: &Settings, backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        let mut audio = Self {
            backend,
            ..Self::new()
        };
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.muted = settings.muted;
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

    pub fn mute_all(&mut self) {
        self.muted = true;
    }

    pub fn unmute_all(&mut self) {
        self.muted = false;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        if let Err(e) = backend.play(effect, vol) {
            log::debug!("Dropped cue {}: {}", effect, e);
        }
    }

    /// Play whatever cue an event calls for
    pub fn react(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
