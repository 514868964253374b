//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, velocities in pixels per tick
//! - Stable iteration order (bricks in row-major order)
//! - No rendering, audio or file I/O; outcomes are reported as `GameEvent`s

pub mod ball;
pub mod brick;
pub mod geometry;
pub mod level;
pub mod paddle;
pub mod state;
pub mod tick;

pub use ball::{Ball, BrickSide};
pub use brick::{Brick, BrickColor, BrickGroup, BrickLayout};
pub use geometry::{Field, Rect};
pub use level::Level;
pub use paddle::Paddle;
pub use state::{GameEvent, GamePhase, GameState, SessionResult};
pub use tick::{TickInput, tick};
