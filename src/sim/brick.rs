//! Bricks and the brick grid

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::settings::Settings;

/// Row colors, assigned cyclically from the top row down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Red,
    Blue,
    Green,
    Yellow,
    Cyan,
    Magenta,
}

impl BrickColor {
    pub const PALETTE: [BrickColor; 6] = [
        BrickColor::Red,
        BrickColor::Blue,
        BrickColor::Green,
        BrickColor::Yellow,
        BrickColor::Cyan,
        BrickColor::Magenta,
    ];

    pub fn for_row(row: u32) -> Self {
        Self::PALETTE[row as usize % Self::PALETTE.len()]
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            BrickColor::Red => (255, 0, 0),
            BrickColor::Blue => (0, 100, 255),
            BrickColor::Green => (0, 255, 0),
            BrickColor::Yellow => (255, 255, 0),
            BrickColor::Cyan => (0, 255, 255),
            BrickColor::Magenta => (255, 0, 255),
        }
    }
}

/// A single destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: BrickColor,
    pub destroyed: bool,
}

impl Brick {
    pub fn new(rect: Rect, color: BrickColor) -> Self {
        Self {
            rect,
            color,
            destroyed: false,
        }
    }

    /// Mark destroyed; returns true only the first time
    pub fn destroy(&mut self) -> bool {
        let was_alive = !self.destroyed;
        self.destroyed = true;
        was_alive
    }
}

/// Grid geometry taken from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickLayout {
    pub field_width: f32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub spacing: f32,
    pub top_offset: f32,
}

impl BrickLayout {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            field_width: settings.field_width,
            brick_width: settings.brick_width,
            brick_height: settings.brick_height,
            spacing: settings.brick_spacing,
            top_offset: settings.brick_top_offset,
        }
    }
}

/// The bricks of one level, in row-major order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGroup {
    pub layout: BrickLayout,
    pub bricks: Vec<Brick>,
}

impl BrickGroup {
    pub fn new(layout: BrickLayout) -> Self {
        Self {
            layout,
            bricks: Vec::new(),
        }
    }

    /// Replace the current bricks with a `rows x cols` grid centered
    /// horizontally in the field
    pub fn generate_level(&mut self, rows: u32, cols: u32) {
        let l = self.layout;
        let total_width = cols as f32 * l.brick_width + cols.saturating_sub(1) as f32 * l.spacing;
        let start_x = (l.field_width - total_width) / 2.0;

        self.bricks = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            let color = BrickColor::for_row(row);
            let y = l.top_offset + row as f32 * (l.brick_height + l.spacing);
            for col in 0..cols {
                let x = start_x + col as f32 * (l.brick_width + l.spacing);
                let rect = Rect::new(x, y, l.brick_width, l.brick_height);
                self.bricks.push(Brick::new(rect, color));
            }
        }
    }

    /// Destroy the brick at `index`; returns true if it was alive
    pub fn destroy(&mut self, index: usize) -> bool {
        self.bricks
            .get_mut(index)
            .map(Brick::destroy)
            .unwrap_or(false)
    }

    /// Drop destroyed bricks from the collection
    pub fn remove_destroyed(&mut self) {
        self.bricks.retain(|b| !b.destroyed);
    }

    pub fn active_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| !b.destroyed)
    }

    pub fn active_count(&self) -> usize {
        self.active_bricks().count()
    }

    pub fn is_level_complete(&self) -> bool {
        self.active_bricks().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> BrickGroup {
        BrickGroup::new(BrickLayout::from_settings(&Settings::default()))
    }

    #[test]
    fn test_generate_level_counts() {
        let mut bricks = group();
        bricks.generate_level(6, 10);
        assert_eq!(bricks.bricks.len(), 60);
        assert!(bricks.bricks.iter().all(|b| !b.destroyed));
        assert!(!bricks.is_level_complete());
    }

    #[test]
    fn test_grid_is_centered() {
        let mut bricks = group();
        bricks.generate_level(2, 10);
        // 10 * 70 + 9 * 5 = 745 wide in an 800 field
        let first = bricks.bricks[0].rect;
        let last = bricks.bricks[9].rect;
        assert_eq!(first.left(), 27.5);
        assert_eq!(first.top(), 30.0);
        assert!((first.left() - (800.0 - last.right())).abs() < 1e-4);

        let second_row = bricks.bricks[10].rect;
        assert_eq!(second_row.top(), 50.0);
    }

    #[test]
    fn test_row_colors_cycle() {
        let mut bricks = group();
        bricks.generate_level(7, 3);
        assert_eq!(bricks.bricks[0].color, BrickColor::Red);
        assert_eq!(bricks.bricks[3].color, BrickColor::Blue);
        assert_eq!(bricks.bricks[15].color, BrickColor::Magenta);
        assert_eq!(bricks.bricks[18].color, BrickColor::Red);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut bricks = group();
        bricks.generate_level(1, 3);
        assert!(bricks.destroy(1));
        assert!(!bricks.destroy(1));
        assert!(!bricks.destroy(99));
        assert_eq!(bricks.active_count(), 2);
    }

    #[test]
    fn test_level_complete_only_when_all_destroyed() {
        let mut bricks = group();
        bricks.generate_level(2, 2);
        bricks.destroy(0);
        bricks.destroy(1);
        bricks.destroy(2);
        assert!(!bricks.is_level_complete());
        bricks.destroy(3);
        assert!(bricks.is_level_complete());
    }

    #[test]
    fn test_remove_destroyed_keeps_semantics() {
        let mut bricks = group();
        bricks.generate_level(2, 3);
        bricks.destroy(0);
        bricks.destroy(4);
        let active_before: Vec<Rect> = bricks.active_bricks().map(|b| b.rect).collect();
        bricks.remove_destroyed();
        let active_after: Vec<Rect> = bricks.active_bricks().map(|b| b.rect).collect();
        assert_eq!(bricks.bricks.len(), 4);
        assert_eq!(active_before, active_after);
        assert!(!bricks.is_level_complete());
    }
}
