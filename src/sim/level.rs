//! Level progression: score, lives, speed scaling and brick layout

use serde::{Deserialize, Serialize};

use super::brick::{BrickGroup, BrickLayout};
use crate::consts::BRICK_POINTS;
use crate::settings::{Difficulty, Settings};

/// One level of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub number: u32,
    pub difficulty: Difficulty,
    /// Session score (carried into the next level)
    pub score: u64,
    pub lives: u32,
    /// Ball/paddle speed scale for this level and difficulty
    pub speed_multiplier: f32,
    pub rows: u32,
    pub cols: u32,
    pub bricks: BrickGroup,
}

impl Level {
    /// Create a level with an empty brick group; call [`Level::generate`] to lay out bricks.
    /// Level numbers start at 1.
    pub fn new(number: u32, difficulty: Difficulty, settings: &Settings) -> Self {
        debug_assert!(number >= 1, "level numbers start at 1");
        Self {
            number,
            difficulty,
            score: 0,
            lives: settings.starting_lives(difficulty),
            speed_multiplier: settings.speed_multiplier(number, difficulty),
            rows: settings.rows_for_level(number),
            cols: settings.columns_for_level(number),
            bricks: BrickGroup::new(BrickLayout::from_settings(settings)),
        }
    }

    /// Lay out this level's brick grid
    pub fn generate(&mut self) {
        self.bricks.generate_level(self.rows, self.cols);
        log::info!(
            "Level {} ({}): {}x{} bricks, speed x{:.2}",
            self.number,
            self.difficulty,
            self.rows,
            self.cols,
            self.speed_multiplier
        );
    }

    /// Higher levels pay proportionally more per point
    pub fn add_score(&mut self, points: u64) {
        self.score += points * self.number as u64;
    }

    pub fn on_brick_destroyed(&mut self) {
        self.add_score(BRICK_POINTS);
    }

    /// Lose a life; returns true while lives remain
    pub fn on_ball_lost(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives > 0
    }

    pub fn is_complete(&self) -> bool {
        self.bricks.is_level_complete()
    }

    /// The following level: same difficulty, fresh lives and bricks, score carried over
    pub fn next_level(&self, settings: &Settings) -> Level {
        let mut next = Level::new(self.number + 1, self.difficulty, settings);
        next.score = self.score;
        next
    }
}
