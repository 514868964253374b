//! Game session driver
//!
//! Wraps the pure simulation with its side effects: each step runs one tick,
//! plays the cues for the resulting events and records finished sessions.

use std::time::Instant;

use crate::audio::AudioManager;
use crate::settings::{ConfigError, Difficulty, Settings};
use crate::sim::{GameEvent, GameState, SessionResult, TickInput, tick};
use crate::stats::StatsStore;

/// A running game with its audio and statistics collaborators
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    pub audio: AudioManager,
    pub stats: StatsStore,
    /// Wall-clock start of the session in progress
    session_clock: Option<Instant>,
}

impl Game {
    pub fn new(
        settings: Settings,
        player_name: impl Into<String>,
        difficulty: Difficulty,
        max_level: u32,
        audio: AudioManager,
        stats: StatsStore,
    ) -> Result<Self, ConfigError> {
        let state = GameState::new(settings, player_name, difficulty, max_level)?;
        Ok(Self {
            state,
            audio,
            stats,
            session_clock: None,
        })
    }

    /// Advance one tick and react to what happened. Returns the tick's events.
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input);
        let mut events = self.state.drain_events();

        for event in &mut events {
            self.audio.react(event);
            if let GameEvent::SessionFinished(result) = event {
                self.stamp_duration(result);
                self.record(result);
            }
        }

        if self.state.in_session() {
            self.session_clock.get_or_insert_with(Instant::now);
        } else {
            self.session_clock = None;
        }

        events
    }

    /// Stop playing. A session in progress is recorded as it stands.
    ///
    /// Returns the recorded result, if any.
    pub fn quit(&mut self) -> Option<SessionResult> {
        if !self.state.in_session() {
            return None;
        }
        let mut result = self.state.session_result();
        self.stamp_duration(&mut result);
        self.record(&result);
        self.state.reset_session();
        self.session_clock = None;
        Some(result)
    }

    /// Duration is the longer of simulated and wall-clock time
    fn stamp_duration(&self, result: &mut SessionResult) {
        if let Some(start) = self.session_clock {
            result.duration_secs = result.duration_secs.max(start.elapsed().as_secs_f64());
        }
    }

    fn record(&self, result: &SessionResult) {
        if let Err(e) = self.stats.save_result(result) {
            log::error!("Failed to save statistics: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use std::time::Duration;

    fn game(name: &str) -> Game {
        let path = std::env::temp_dir()
            .join(format!("brickfall_game_{}_{}", name, std::process::id()))
            .join("game_stats.json");
        let stats = StatsStore::new(path);
        stats.clear().unwrap();
        Game::new(
            Settings::default(),
            "Tester",
            Difficulty::Hard,
            2,
            AudioManager::new(),
            stats,
        )
        .unwrap()
    }

    fn press_action() -> TickInput {
        TickInput {
            action: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_returns_events() {
        let mut game = game("events");
        let events = game.step(&press_action());
        assert_eq!(events, vec![GameEvent::LevelStarted { level: 1 }]);
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert!(game.state.events.is_empty());
    }

    #[test]
    fn test_quit_in_menu_records_nothing() {
        let mut game = game("quit_menu");
        assert_eq!(game.quit(), None);
        assert!(game.stats.load_all().is_empty());
    }

    #[test]
    fn test_quit_mid_session_records_result() {
        let mut game = game("quit_mid");
        game.step(&press_action());
        game.state.level.add_score(30);

        let result = game.quit().unwrap();
        assert_eq!(result.score, 30);
        assert!(!result.won);
        assert_eq!(game.state.phase, GamePhase::Menu);

        let records = game.stats.load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].player_name, "Tester");
        assert_eq!(records[0].score, 30);
        game.stats.clear().unwrap();
    }

    #[test]
    fn test_confirming_game_over_records_once() {
        let mut game = game("game_over");
        game.step(&press_action());
        game.step(&press_action());

        // Hard difficulty has a single life
        game.state.ball.pos.y = game.state.settings.field_height + 50.0;
        let events = game.step(&TickInput::default());
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(game.state.phase, GamePhase::GameOver);

        let events = game.step(&press_action());
        assert!(matches!(
            events.as_slice(),
            [GameEvent::SessionFinished(result)] if !result.won
        ));
        assert_eq!(game.state.phase, GamePhase::Menu);
        assert_eq!(game.stats.load_all().len(), 1);

        // Back in the menu, quitting does not record again
        assert_eq!(game.quit(), None);
        assert_eq!(game.stats.load_all().len(), 1);
        game.stats.clear().unwrap();
    }

    #[test]
    fn test_slow_loop_reports_wall_clock_duration() {
        let mut game = game("wall_clock");
        game.step(&press_action());
        assert!(game.session_clock.is_some());

        // One simulated tick, but the player has been at it for ten seconds
        game.session_clock = Instant::now().checked_sub(Duration::from_secs(10));
        let result = game.quit().unwrap();
        assert!(result.duration_secs >= 10.0);
        assert!(game.session_clock.is_none());

        let records = game.stats.load_all();
        assert!(records[0].game_duration >= 10.0);
        game.stats.clear().unwrap();
    }

    #[test]
    fn test_fast_loop_keeps_simulated_duration() {
        let mut game = game("sim_clock");
        game.step(&press_action());
        for _ in 0..120 {
            game.step(&TickInput::default());
        }
        let result = game.quit().unwrap();
        assert!(result.duration_secs >= 2.0);
        game.stats.clear().unwrap();
    }
}
