//! Fixed-step simulation tick
//!
//! One call per rendered frame. Input is applied first, then (while playing)
//! the ball advances and collisions resolve in a fixed order: walls, paddle,
//! bricks in collection order, then ball loss and level completion.

use super::state::{GameEvent, GamePhase, GameState};

/// Input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held)
    pub right: bool,
    /// Primary button: start, launch, continue or confirm depending on phase
    pub action: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Menu => {
            if input.action {
                state.start_session();
                state.phase = GamePhase::Playing;
                let level = state.level.number;
                state.emit(GameEvent::LevelStarted { level });
            }
        }

        GamePhase::Playing => step_playing(state, input),

        GamePhase::Paused => {}

        GamePhase::LevelComplete => {
            if input.action {
                state.advance_level();
                state.phase = GamePhase::Playing;
                let level = state.level.number;
                state.emit(GameEvent::LevelStarted { level });
            }
        }

        GamePhase::GameOver | GamePhase::Win => {
            if input.action {
                let result = state.session_result();
                log::info!(
                    "Session finished: {} scored {} (level {}, {})",
                    result.player_name,
                    result.score,
                    result.level_reached,
                    if result.won { "won" } else { "lost" }
                );
                state.reset_session();
                state.emit(GameEvent::SessionFinished(result));
            }
        }
    }
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    if input.left {
        state.paddle.move_left();
    }
    if input.right {
        state.paddle.move_right();
    }

    if input.action && state.ball.launch() {
        state.emit(GameEvent::BallLaunched);
    }

    // Resting ball rides along with the paddle
    if !state.ball.active {
        state.ball.follow(state.paddle.center_x());
        return;
    }

    if state.ball.advance() {
        state.emit(GameEvent::WallHit);
    }

    let paddle_rect = state.paddle.rect();
    if state.ball.check_paddle_collision(&paddle_rect) {
        state.emit(GameEvent::PaddleHit);
    }

    // Split borrows: bricks, ball and event queue are disjoint fields
    let GameState {
        ball,
        level,
        events,
        settings,
        ..
    } = state;
    let mut destroyed = 0u32;
    for brick in level.bricks.bricks.iter_mut().filter(|b| !b.destroyed) {
        if let Some(side) = ball.check_brick_collision(&brick.rect) {
            brick.destroy();
            destroyed += 1;
            ball.increase_speed(settings.brick_speedup);
            events.push(GameEvent::BrickHit { side });
        }
    }
    for _ in 0..destroyed {
        level.on_brick_destroyed();
    }
    level.bricks.remove_destroyed();

    if state.ball.is_out_of_bounds() {
        if state.level.on_ball_lost() {
            state.ball.reset(state.paddle.x, state.paddle.width);
            let lives_left = state.level.lives;
            log::debug!("Ball lost, {} lives left", lives_left);
            state.emit(GameEvent::BallLost { lives_left });
        } else {
            state.phase = GamePhase::GameOver;
            log::info!("Game over at level {}", state.level.number);
            state.emit(GameEvent::GameOver);
            return;
        }
    }

    if state.level.is_complete() {
        let level = state.level.number;
        if level >= state.max_level {
            state.phase = GamePhase::Win;
            log::info!("Final level {} cleared", level);
            state.emit(GameEvent::Victory);
        } else {
            state.phase = GamePhase::LevelComplete;
            log::info!("Level {} complete", level);
            state.emit(GameEvent::LevelComplete { level });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, Settings};
    use crate::sim::brick::{Brick, BrickColor};
    use crate::sim::geometry::Rect;
    use glam::Vec2;

    fn new_state(difficulty: Difficulty, max_level: u32) -> GameState {
        GameState::new(Settings::default(), "Tester", difficulty, max_level).unwrap()
    }

    fn action() -> TickInput {
        TickInput {
            action: true,
            ..Default::default()
        }
    }

    fn pause() -> TickInput {
        TickInput {
            pause: true,
            ..Default::default()
        }
    }

    /// Playing state with a single brick far from the ball's path
    fn playing_with_one_brick(difficulty: Difficulty, max_level: u32) -> GameState {
        let mut state = new_state(difficulty, max_level);
        tick(&mut state, &action());
        state.level.bricks.bricks = vec![Brick::new(
            Rect::new(10.0, 30.0, 70.0, 15.0),
            BrickColor::Red,
        )];
        state.drain_events();
        state
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = new_state(Difficulty::Medium, 5);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &action());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session_start_tick, Some(2));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelStarted { level: 1 }]
        );
        // Starting does not launch
        assert!(!state.ball.active);
    }

    #[test]
    fn test_launch() {
        let mut state = new_state(Difficulty::Medium, 5);
        tick(&mut state, &action());
        state.drain_events();

        tick(&mut state, &action());
        assert!(state.ball.active);
        assert_eq!(state.drain_events(), vec![GameEvent::BallLaunched]);

        // Further action presses do nothing while the ball is in play
        tick(&mut state, &action());
        assert!(!state.drain_events().contains(&GameEvent::BallLaunched));
    }

    #[test]
    fn test_resting_ball_follows_paddle() {
        let mut state = new_state(Difficulty::Medium, 5);
        tick(&mut state, &action());
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.paddle.x, 342.0);
        assert_eq!(state.ball.pos.x, state.paddle.center_x());
    }

    #[test]
    fn test_paddle_frozen_outside_playing() {
        let mut state = new_state(Difficulty::Medium, 5);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.paddle.x, 350.0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = new_state(Difficulty::Medium, 5);
        tick(&mut state, &action());
        tick(&mut state, &action());
        let pos = state.ball.pos;

        tick(&mut state, &pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.ball.pos, pos);

        // Nothing moves while paused
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.pos, pos);

        tick(&mut state, &pause());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_ne!(state.ball.pos, pos);
    }

    #[test]
    fn test_pause_ignored_in_menu() {
        let mut state = new_state(Difficulty::Medium, 5);
        tick(&mut state, &pause());
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_ball_lost_with_lives_left() {
        let mut state = playing_with_one_brick(Difficulty::Medium, 5);
        state.ball.launch();
        state.ball.pos = Vec2::new(100.0, 599.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
        state.ball.increase_speed(1.5);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.lives, 2);
        assert!(!state.ball.active);
        assert_eq!(state.ball.speed, state.ball.base_speed);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::BallLost { lives_left: 2 }]
        );
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = playing_with_one_brick(Difficulty::Hard, 5);
        state.ball.launch();
        state.ball.pos = Vec2::new(100.0, 599.0);
        state.ball.vel = Vec2::new(0.0, 5.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.level.lives, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_brick_hit_scores_and_speeds_up() {
        let mut state = playing_with_one_brick(Difficulty::Medium, 5);
        state.level.bricks.bricks.push(Brick::new(
            Rect::new(400.0, 200.0, 70.0, 15.0),
            BrickColor::Blue,
        ));
        state.ball.launch();
        state.ball.pos = Vec2::new(435.0, 225.0);
        state.ball.vel = Vec2::new(0.0, -5.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.level.score, 10);
        assert_eq!(state.level.bricks.bricks.len(), 1);
        assert!((state.ball.speed - 5.05).abs() < 1e-5);
        assert!(state.ball.vel.y > 0.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::BrickHit {
                side: crate::sim::BrickSide::Bottom
            }]
        );
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_level_complete_then_continue() {
        let mut state = playing_with_one_brick(Difficulty::Medium, 5);
        state.ball.launch();
        state.ball.pos = Vec2::new(45.0, 55.0);
        state.ball.vel = Vec2::new(0.0, -5.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::LevelComplete);
        let events = state.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::LevelComplete { level: 1 })
        );

        tick(&mut state, &action());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.number, 2);
        assert_eq!(state.level.score, 10);
        assert_eq!(state.level.cols, 11);
        assert!(!state.ball.active);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelStarted { level: 2 }]
        );
    }

    #[test]
    fn test_final_level_wins() {
        let mut state = playing_with_one_brick(Difficulty::Medium, 1);
        state.ball.launch();
        state.ball.pos = Vec2::new(45.0, 55.0);
        state.ball.vel = Vec2::new(0.0, -5.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Win);
        assert_eq!(state.drain_events().last(), Some(&GameEvent::Victory));
    }

    #[test]
    fn test_confirm_finishes_session() {
        let mut state = playing_with_one_brick(Difficulty::Medium, 1);
        state.ball.launch();
        state.ball.pos = Vec2::new(45.0, 55.0);
        state.ball.vel = Vec2::new(0.0, -5.0);
        tick(&mut state, &TickInput::default());
        state.drain_events();

        tick(&mut state, &action());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level.score, 0);
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            GameEvent::SessionFinished(result) => {
                assert!(result.won);
                assert_eq!(result.score, 10);
                assert_eq!(result.level_reached, 1);
                assert_eq!(result.player_name, "Tester");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_paddle_hit_event() {
        let mut state = playing_with_one_brick(Difficulty::Medium, 5);
        state.ball.launch();
        state.ball.pos = Vec2::new(400.0, 560.0);
        state.ball.vel = Vec2::new(0.0, 5.0);

        tick(&mut state, &TickInput::default());
        assert!(state.ball.vel.y < 0.0);
        assert_eq!(state.drain_events(), vec![GameEvent::PaddleHit]);
    }
}
