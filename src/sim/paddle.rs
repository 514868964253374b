//! The player's paddle

use serde::{Deserialize, Serialize};

use super::geometry::{Field, Rect};
use crate::settings::Settings;

/// Horizontal paddle near the bottom of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal distance per move
    pub speed: f32,
    field: Field,
}

impl Paddle {
    /// Create a centered paddle; speed is scaled by `speed_multiplier` when
    /// `scale_paddle_speed` is set
    pub fn new(settings: &Settings, speed_multiplier: f32) -> Self {
        let speed = if settings.scale_paddle_speed {
            settings.paddle_speed * speed_multiplier
        } else {
            settings.paddle_speed
        };
        let field = Field::new(settings.field_width, settings.field_height);
        let mut paddle = Self {
            x: 0.0,
            y: settings.field_height - settings.paddle_bottom_margin,
            width: settings.paddle_width,
            height: settings.paddle_height,
            speed,
            field,
        };
        paddle.reset();
        paddle
    }

    pub fn move_left(&mut self) {
        self.x = (self.x - self.speed).max(0.0);
    }

    pub fn move_right(&mut self) {
        self.x = (self.x + self.speed).min(self.max_x());
    }

    /// Recenter horizontally
    pub fn reset(&mut self) {
        self.x = self.max_x() / 2.0;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    fn max_x(&self) -> f32 {
        (self.field.width - self.width).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_centered() {
        let paddle = Paddle::new(&Settings::default(), 1.0);
        assert_eq!(paddle.x, 350.0);
        assert_eq!(paddle.y, 570.0);
        assert_eq!(paddle.center_x(), 400.0);
    }

    #[test]
    fn test_moves_by_speed() {
        let mut paddle = Paddle::new(&Settings::default(), 1.0);
        paddle.move_left();
        assert_eq!(paddle.x, 342.0);
        paddle.move_right();
        paddle.move_right();
        assert_eq!(paddle.x, 358.0);
    }

    #[test]
    fn test_stops_at_walls() {
        let mut paddle = Paddle::new(&Settings::default(), 1.0);
        for _ in 0..200 {
            paddle.move_left();
        }
        assert_eq!(paddle.x, 0.0);
        for _ in 0..200 {
            paddle.move_right();
        }
        assert_eq!(paddle.x, 700.0);
    }

    #[test]
    fn test_reset_recenters() {
        let mut paddle = Paddle::new(&Settings::default(), 1.0);
        paddle.move_right();
        paddle.reset();
        assert_eq!(paddle.x, 350.0);
    }

    #[test]
    fn test_speed_scaling() {
        let settings = Settings::default();
        assert_eq!(Paddle::new(&settings, 1.5).speed, 12.0);

        let fixed = Settings {
            scale_paddle_speed: false,
            ..Settings::default()
        };
        assert_eq!(Paddle::new(&fixed, 1.5).speed, 8.0);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_field(moves in proptest::collection::vec(any::<bool>(), 0..400)) {
            let settings = Settings::default();
            let mut paddle = Paddle::new(&settings, 1.3);
            for left in moves {
                if left {
                    paddle.move_left();
                } else {
                    paddle.move_right();
                }
                prop_assert!(paddle.x >= 0.0);
                prop_assert!(paddle.x <= settings.field_width - paddle.width);
            }
        }
    }
}
