//! Game settings and difficulty tiers
//!
//! Every tunable the simulation consumes lives here. Settings are validated
//! before a session is built from them; invalid values are rejected, never
//! clamped.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speed multiplier and starting lives for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub speed_multiplier: f32,
    pub lives: u32,
}

/// Per-difficulty table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultyTier,
    pub medium: DifficultyTier,
    pub hard: DifficultyTier,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyTier {
                speed_multiplier: 0.8,
                lives: 5,
            },
            medium: DifficultyTier {
                speed_multiplier: 1.0,
                lives: BASE_LIVES,
            },
            hard: DifficultyTier {
                speed_multiplier: 1.3,
                lives: 1,
            },
        }
    }
}

impl DifficultyTable {
    pub fn tier(&self, difficulty: Difficulty) -> DifficultyTier {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Errors raised while loading or validating settings
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A dimension, speed or multiplier that must be strictly positive
    NotPositive { name: &'static str, value: f64 },
    /// A value outside its allowed range
    OutOfRange { name: &'static str, value: f64 },
    /// Settings file could not be read or written
    Io(String),
    /// Settings file is not valid JSON for [`Settings`]
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive { name, value } => {
                write!(f, "{} must be positive (got {})", name, value)
            }
            ConfigError::OutOfRange { name, value } => {
                write!(f, "{} is out of range (got {})", name, value)
            }
            ConfigError::Io(msg) => write!(f, "Settings I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Settings parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Simulation ticks per second, used for session durations
    pub ticks_per_second: u32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_bottom_margin: f32,
    /// Scale paddle speed with the level/difficulty speed multiplier
    pub scale_paddle_speed: bool,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub ball_max_speed: f32,
    pub ball_rest_offset: f32,
    /// Degrees from straight up
    pub launch_angle_deg: f32,
    /// Degrees from straight up at the paddle edges
    pub max_bounce_angle_deg: f32,
    pub brick_speedup: f32,

    // === Bricks ===
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_spacing: f32,
    pub brick_top_offset: f32,
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_max_rows: u32,
    pub brick_max_cols: u32,

    // === Progression ===
    pub level_speed_increment: f32,
    pub max_level: u32,
    pub difficulty: DifficultyTable,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ticks_per_second: TICKS_PER_SECOND,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            scale_paddle_speed: true,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            ball_max_speed: BALL_MAX_SPEED,
            ball_rest_offset: BALL_REST_OFFSET,
            launch_angle_deg: LAUNCH_ANGLE_DEG,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
            brick_speedup: BRICK_SPEEDUP,

            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_spacing: BRICK_SPACING,
            brick_top_offset: BRICK_TOP_OFFSET,
            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_max_rows: BRICK_MAX_ROWS,
            brick_max_cols: BRICK_MAX_COLS,

            level_speed_increment: LEVEL_SPEED_INCREMENT,
            max_level: MAX_LEVEL,
            difficulty: DifficultyTable::default(),

            master_volume: 0.8,
            sfx_volume: 0.7,
            muted: false,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            name,
            value: value as f64,
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value: value as f64,
        })
    }
}

fn positive_count(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            name,
            value: value as f64,
        })
    }
}

fn in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value: value as f64,
        })
    }
}

impl Settings {
    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive_count("ticks_per_second", self.ticks_per_second)?;

        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("paddle_speed", self.paddle_speed)?;
        non_negative("paddle_bottom_margin", self.paddle_bottom_margin)?;
        if self.paddle_width > self.field_width {
            return Err(ConfigError::OutOfRange {
                name: "paddle_width",
                value: self.paddle_width as f64,
            });
        }
        if self.paddle_bottom_margin + self.paddle_height > self.field_height {
            return Err(ConfigError::OutOfRange {
                name: "paddle_bottom_margin",
                value: self.paddle_bottom_margin as f64,
            });
        }

        positive("ball_radius", self.ball_radius)?;
        positive("ball_speed", self.ball_speed)?;
        positive("ball_max_speed", self.ball_max_speed)?;
        if self.ball_max_speed < self.ball_speed {
            return Err(ConfigError::OutOfRange {
                name: "ball_max_speed",
                value: self.ball_max_speed as f64,
            });
        }
        non_negative("ball_rest_offset", self.ball_rest_offset)?;
        in_range("launch_angle_deg", self.launch_angle_deg, -89.0, 89.0)?;
        in_range("max_bounce_angle_deg", self.max_bounce_angle_deg, 0.0, 89.0)?;
        positive("brick_speedup", self.brick_speedup)?;

        positive("brick_width", self.brick_width)?;
        positive("brick_height", self.brick_height)?;
        non_negative("brick_spacing", self.brick_spacing)?;
        non_negative("brick_top_offset", self.brick_top_offset)?;
        positive_count("brick_rows", self.brick_rows)?;
        positive_count("brick_cols", self.brick_cols)?;
        positive_count("brick_max_rows", self.brick_max_rows)?;
        positive_count("brick_max_cols", self.brick_max_cols)?;

        positive("level_speed_increment", self.level_speed_increment)?;
        positive_count("max_level", self.max_level)?;
        for difficulty in Difficulty::ALL {
            let tier = self.difficulty.tier(difficulty);
            positive("difficulty.speed_multiplier", tier.speed_multiplier)?;
            positive_count("difficulty.lives", tier.lives)?;
        }

        in_range("master_volume", self.master_volume, 0.0, 1.0)?;
        in_range("sfx_volume", self.sfx_volume, 0.0, 1.0)?;
        Ok(())
    }

    /// `level_speed_increment ^ (level - 1) * difficulty multiplier`
    pub fn speed_multiplier(&self, level: u32, difficulty: Difficulty) -> f32 {
        let growth = self
            .level_speed_increment
            .powi(level.saturating_sub(1) as i32);
        growth * self.difficulty.tier(difficulty).speed_multiplier
    }

    pub fn starting_lives(&self, difficulty: Difficulty) -> u32 {
        self.difficulty.tier(difficulty).lives
    }

    /// One extra column per level above the first, capped
    pub fn columns_for_level(&self, level: u32) -> u32 {
        (self.brick_cols + level.saturating_sub(1)).min(self.brick_max_cols.max(self.brick_cols))
    }

    /// One extra row every second level, capped
    pub fn rows_for_level(&self, level: u32) -> u32 {
        (self.brick_rows + level.saturating_sub(1) / 2).min(self.brick_max_rows.max(self.brick_rows))
    }

    /// Load settings from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = match fs::read_to_string(path) {
            Ok(json) => {
                let settings: Settings =
                    serde_json::from_str(&json).map_err(|e| ConfigError::Parse(e.to_string()))?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(ConfigError::Io(e.to_string())),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
