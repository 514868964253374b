//! Brickfall - a paddle-and-bricks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, game state machine)
//! - `settings`: Configuration constants, difficulty tiers, validation
//! - `stats`: Append-only JSON statistics log
//! - `audio`: Fire-and-forget sound cues
//! - `game`: Wires the simulation to audio and statistics
//! - `renderer`: Terminal rendering
//! - `cli`: Command-line surface

pub mod audio;
pub mod cli;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use game::Game;
pub use settings::{ConfigError, Difficulty, Settings};
pub use stats::{GameRecord, StatsStore, StatsSummary};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the paddle's top edge to the bottom of the field
    pub const PADDLE_BOTTOM_MARGIN: f32 = 30.0;

    /// Ball defaults (speeds are per tick)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_MAX_SPEED: f32 = 10.0;
    /// Resting ball center sits this far above the paddle top
    pub const BALL_REST_OFFSET: f32 = 10.0;
    /// Launch direction, degrees from straight up (positive = to the right)
    pub const LAUNCH_ANGLE_DEG: f32 = 45.0;
    /// Paddle edge hits deflect this far from straight up
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    /// Speed multiplier applied per destroyed brick
    pub const BRICK_SPEEDUP: f32 = 1.01;

    /// Brick grid defaults
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 15.0;
    pub const BRICK_SPACING: f32 = 5.0;
    pub const BRICK_TOP_OFFSET: f32 = 30.0;
    pub const BRICK_ROWS: u32 = 6;
    pub const BRICK_COLS: u32 = 10;
    pub const BRICK_MAX_ROWS: u32 = 8;
    pub const BRICK_MAX_COLS: u32 = 12;

    /// Per-level speed growth (compounding)
    pub const LEVEL_SPEED_INCREMENT: f32 = 1.2;
    pub const BASE_LIVES: u32 = 3;
    pub const MAX_LEVEL: u32 = 5;

    /// Points per destroyed brick (before the level multiplier)
    pub const BRICK_POINTS: u64 = 10;
}

/// Round to two decimal places (durations, rates and averages in the stats log)
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
