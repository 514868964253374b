//! Ball physics and collision response
//!
//! Velocities are in pixels per tick. While active the velocity magnitude
//! always equals `speed`, and `speed` never exceeds `max_speed`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Field, Rect};
use crate::settings::Settings;

/// Which face of a brick the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Current speed magnitude
    pub speed: f32,
    /// Speed restored on reset (undoes per-brick ramp-up)
    pub base_speed: f32,
    pub max_speed: f32,
    /// False while resting on the paddle
    pub active: bool,
    field: Field,
    /// Resting center height above the paddle
    rest_y: f32,
    /// Radians from straight up
    launch_angle: f32,
    /// Radians from straight up at the paddle edges
    max_bounce_angle: f32,
}

impl Ball {
    /// Create an inactive ball at the field's horizontal center, resting height
    pub fn new(settings: &Settings, speed_multiplier: f32) -> Self {
        let speed = settings.ball_speed * speed_multiplier;
        let paddle_top = settings.field_height - settings.paddle_bottom_margin;
        let rest_y = paddle_top - settings.ball_rest_offset;
        Self {
            pos: Vec2::new(settings.field_width / 2.0, rest_y),
            vel: Vec2::ZERO,
            radius: settings.ball_radius,
            speed,
            base_speed: speed,
            max_speed: settings.ball_max_speed * speed_multiplier,
            active: false,
            field: Field::new(settings.field_width, settings.field_height),
            rest_y,
            launch_angle: settings.launch_angle_deg.to_radians(),
            max_bounce_angle: settings.max_bounce_angle_deg.to_radians(),
        }
    }

    /// Bounding box used for all collision tests
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Integrate one tick and bounce off the left, right and top walls.
    /// Returns true if a wall was hit.
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.pos += self.vel;

        let r = self.radius;
        let mut bounced = false;

        if self.pos.x - r < 0.0 || self.pos.x + r > self.field.width {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.min(self.field.width - r).max(r);
            bounced = true;
        }

        // No top loss: only the bottom edge ends a life
        if self.pos.y - r < 0.0 {
            self.vel.y = -self.vel.y;
            self.pos.y = r;
            bounced = true;
        }

        bounced
    }

    /// Bounce off the paddle. The contact offset across the paddle width maps
    /// linearly onto `±max_bounce_angle` from straight up.
    pub fn check_paddle_collision(&mut self, paddle: &Rect) -> bool {
        if !self.active || !self.bounds().intersects(paddle) {
            return false;
        }

        // Rest the ball on the paddle so the next tick cannot re-trigger
        self.pos.y = paddle.top() - self.radius;

        let half_width = paddle.width / 2.0;
        let offset = ((self.pos.x - paddle.center_x()) / half_width).clamp(-1.0, 1.0);
        let angle = offset * self.max_bounce_angle;
        self.vel = Vec2::new(self.speed * angle.sin(), -self.speed * angle.cos());

        true
    }

    /// Bounce off a brick. The impact side is the brick edge nearest to the
    /// ball center; corner hits can be misclassified.
    pub fn check_brick_collision(&mut self, brick: &Rect) -> Option<BrickSide> {
        if !self.active || !self.bounds().intersects(brick) {
            return None;
        }

        let candidates = [
            (BrickSide::Top, (self.pos.y - brick.top()).abs()),
            (BrickSide::Bottom, (self.pos.y - brick.bottom()).abs()),
            (BrickSide::Left, (self.pos.x - brick.left()).abs()),
            (BrickSide::Right, (self.pos.x - brick.right()).abs()),
        ];
        let mut side = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.1 < side.1 {
                side = *candidate;
            }
        }
        let side = side.0;

        let r = self.radius;
        match side {
            BrickSide::Top => {
                self.vel.y = -self.vel.y;
                self.pos.y = brick.top() - r;
            }
            BrickSide::Bottom => {
                self.vel.y = -self.vel.y;
                self.pos.y = brick.bottom() + r;
            }
            BrickSide::Left => {
                self.vel.x = -self.vel.x;
                self.pos.x = brick.left() - r;
            }
            BrickSide::Right => {
                self.vel.x = -self.vel.x;
                self.pos.x = brick.right() + r;
            }
        }

        Some(side)
    }

    /// The ball fell past the bottom edge
    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.y > self.field.height
    }

    /// Multiply speed by `factor` (capped at `max_speed`), keeping direction
    pub fn increase_speed(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("Ignoring invalid speed factor {}", factor);
            return;
        }

        self.speed = (self.speed * factor).min(self.max_speed);

        // Resting ball has no direction to rescale
        if self.vel.length_squared() > f32::EPSILON {
            self.vel = self.vel.normalize() * self.speed;
        }
    }

    /// Leave the paddle at the fixed launch angle. Returns false if the ball
    /// was already in play.
    pub fn launch(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.vel = Vec2::new(
            self.speed * self.launch_angle.sin(),
            -self.speed * self.launch_angle.cos(),
        );
        self.active = true;
        true
    }

    /// Park on the paddle, stop, and restore the base speed
    pub fn reset(&mut self, paddle_x: f32, paddle_width: f32) {
        self.active = false;
        self.pos = Vec2::new(paddle_x + paddle_width / 2.0, self.rest_y);
        self.vel = Vec2::ZERO;
        self.speed = self.base_speed;
    }

    /// Carry a resting ball with the paddle
    pub fn follow(&mut self, paddle_center_x: f32) {
        if !self.active {
            self.pos.x = paddle_center_x;
        }
    }
}
