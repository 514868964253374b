//! Game session state
//!
//! One `GameState` exists per running game. It exclusively owns the paddle,
//! ball and current level; level transitions replace them wholesale.

use serde::{Deserialize, Serialize};

use super::ball::{Ball, BrickSide};
use super::level::Level;
use super::paddle::Paddle;
use crate::settings::{ConfigError, Difficulty, Settings};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start input
    Menu,
    /// Active gameplay (ball may still be resting on the paddle)
    Playing,
    /// Game is paused
    Paused,
    /// All bricks cleared, waiting for continue input
    LevelComplete,
    /// Out of lives
    GameOver,
    /// Final level cleared
    Win,
}

/// Outcome of a finished session, handed to the statistics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub player_name: String,
    pub score: u64,
    pub level_reached: u32,
    pub difficulty: Difficulty,
    pub duration_secs: f64,
    pub won: bool,
}

/// Things that happened during a tick, for audio/stats/UI reactions
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    BallLaunched,
    PaddleHit,
    WallHit,
    BrickHit { side: BrickSide },
    BallLost { lives_left: u32 },
    GameOver,
    LevelComplete { level: u32 },
    Victory,
    /// Player confirmed the end screen; the session has been reset
    SessionFinished(SessionResult),
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub player_name: String,
    pub difficulty: Difficulty,
    /// Clearing this level wins the game
    pub max_level: u32,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub ball: Ball,
    pub level: Level,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    /// Tick at which the current session left the menu
    pub session_start_tick: Option<u64>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a session sitting in the menu with level 1 laid out
    pub fn new(
        settings: Settings,
        player_name: impl Into<String>,
        difficulty: Difficulty,
        max_level: u32,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        if max_level == 0 {
            return Err(ConfigError::NotPositive {
                name: "max_level",
                value: 0.0,
            });
        }

        let level = Level::new(1, difficulty, &settings);
        let paddle = Paddle::new(&settings, level.speed_multiplier);
        let ball = Ball::new(&settings, level.speed_multiplier);

        let mut state = Self {
            settings,
            player_name: player_name.into(),
            difficulty,
            max_level,
            phase: GamePhase::Menu,
            paddle,
            ball,
            level,
            time_ticks: 0,
            session_start_tick: None,
            events: Vec::new(),
        };
        state.init_level();
        Ok(state)
    }

    /// Fresh level 1, paddle and ball; back to the menu. Emits nothing.
    pub fn reset_session(&mut self) {
        self.level = Level::new(1, self.difficulty, &self.settings);
        self.paddle = Paddle::new(&self.settings, self.level.speed_multiplier);
        self.ball = Ball::new(&self.settings, self.level.speed_multiplier);
        self.init_level();
        self.phase = GamePhase::Menu;
        self.session_start_tick = None;
        log::debug!("Session reset for {}", self.player_name);
    }

    /// Replace level, paddle and ball with the next level's
    pub fn advance_level(&mut self) {
        self.level = self.level.next_level(&self.settings);
        self.paddle = Paddle::new(&self.settings, self.level.speed_multiplier);
        self.ball = Ball::new(&self.settings, self.level.speed_multiplier);
        self.init_level();
    }

    fn init_level(&mut self) {
        self.level.generate();
        self.paddle.reset();
        self.ball.reset(self.paddle.x, self.paddle.width);
    }

    /// Start the session clock
    pub fn start_session(&mut self) {
        self.session_start_tick = Some(self.time_ticks);
        log::info!(
            "Session started: {} on {}",
            self.player_name,
            self.difficulty
        );
    }

    /// Seconds since the session left the menu (0 if it has not)
    pub fn session_duration_secs(&self) -> f64 {
        match self.session_start_tick {
            Some(start) => {
                self.time_ticks.saturating_sub(start) as f64
                    / self.settings.ticks_per_second as f64
            }
            None => 0.0,
        }
    }

    /// True once the player has left the menu
    pub fn in_session(&self) -> bool {
        self.phase != GamePhase::Menu
    }

    pub fn session_result(&self) -> SessionResult {
        SessionResult {
            player_name: self.player_name.clone(),
            score: self.level.score,
            level_reached: self.level.number,
            difficulty: self.difficulty,
            duration_secs: self.session_duration_secs(),
            won: self.phase == GamePhase::Win,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Settings::default(), "Tester", Difficulty::Medium, 5).unwrap()
    }

    #[test]
    fn test_new_state_in_menu() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level.number, 1);
        assert_eq!(state.level.bricks.bricks.len(), 60);
        assert!(!state.ball.active);
        assert_eq!(state.ball.pos.x, state.paddle.center_x());
        assert!(state.events.is_empty());
        assert!(!state.in_session());
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = Settings {
            ball_radius: 0.0,
            ..Settings::default()
        };
        assert!(GameState::new(settings, "Tester", Difficulty::Easy, 5).is_err());
        assert!(GameState::new(Settings::default(), "Tester", Difficulty::Easy, 0).is_err());
    }

    #[test]
    fn test_advance_level_rebuilds_entities() {
        let mut state = state();
        state.level.add_score(10);
        state.paddle.move_left();
        state.ball.launch();

        state.advance_level();
        assert_eq!(state.level.number, 2);
        assert_eq!(state.level.score, 10);
        assert_eq!(state.level.bricks.bricks.len(), 66);
        assert_eq!(state.paddle.x, 350.0);
        assert!(!state.ball.active);
        assert!((state.ball.speed - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_reset_session() {
        let mut state = state();
        state.start_session();
        state.advance_level();
        state.level.add_score(100);
        state.phase = GamePhase::GameOver;

        state.reset_session();
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level.number, 1);
        assert_eq!(state.level.score, 0);
        assert_eq!(state.session_start_tick, None);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_session_duration_from_ticks() {
        let mut state = state();
        assert_eq!(state.session_duration_secs(), 0.0);
        state.time_ticks = 30;
        state.start_session();
        state.time_ticks = 30 + 150;
        assert!((state.session_duration_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_session_result() {
        let mut state = state();
        state.level.add_score(50);
        state.phase = GamePhase::Win;
        let result = state.session_result();
        assert_eq!(result.player_name, "Tester");
        assert_eq!(result.score, 50);
        assert_eq!(result.level_reached, 1);
        assert_eq!(result.difficulty, Difficulty::Medium);
        assert!(result.won);
    }

    #[test]
    fn test_drain_events() {
        let mut state = state();
        state.emit(GameEvent::WallHit);
        state.emit(GameEvent::PaddleHit);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::WallHit, GameEvent::PaddleHit]
        );
        assert!(state.drain_events().is_empty());
    }
}
