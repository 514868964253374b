//! Rendering module
//!
//! Renderers only read the game state; they never change it.

pub mod terminal;

pub use terminal::TerminalRenderer;

use std::io;

use crate::sim::{GamePhase, GameState};

/// Something that can present a frame
pub trait Renderer {
    fn draw(&mut self, state: &GameState) -> io::Result<()>;
}

/// Centered message lines shown over the field for the current phase
pub fn overlay_lines(state: &GameState) -> Vec<String> {
    let score = state.level.score;
    match state.phase {
        GamePhase::Menu => vec![
            "BRICKFALL".to_string(),
            format!("Player: {}  Difficulty: {}", state.player_name, state.difficulty),
            "Press SPACE to start".to_string(),
            "Q to quit".to_string(),
        ],
        GamePhase::Playing if !state.ball.active => {
            vec!["Press SPACE to launch".to_string()]
        }
        GamePhase::Playing => Vec::new(),
        GamePhase::Paused => vec!["PAUSED".to_string(), "Press P to resume".to_string()],
        GamePhase::LevelComplete => vec![
            format!("LEVEL {} COMPLETE", state.level.number),
            format!("Score: {}", score),
            "Press SPACE to continue".to_string(),
        ],
        GamePhase::GameOver => vec![
            "GAME OVER".to_string(),
            format!("Final score: {}", score),
            "Press SPACE to return to the menu".to_string(),
        ],
        GamePhase::Win => vec![
            "YOU WIN!".to_string(),
            format!("Final score: {}", score),
            "Press SPACE to return to the menu".to_string(),
        ],
    }
}

/// Status line: level, score and lives
pub fn hud_line(state: &GameState) -> String {
    format!(
        "Level {}/{}   Score {}   Lives {}   {} ({})",
        state.level.number,
        state.max_level,
        state.level.score,
        state.level.lives,
        state.player_name,
        state.difficulty
    )
}
