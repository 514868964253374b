//! Game statistics log
//!
//! Every finished session is appended to a JSON array on disk. Reads never
//! fail: an unreadable or malformed file is treated as an empty history.
//! Writes report failure to the caller and never clobber a malformed file.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::round2;
use crate::settings::Difficulty;
use crate::sim::SessionResult;

/// Default location of the statistics log
pub const DEFAULT_STATS_PATH: &str = "stats/game_stats.json";

/// A single finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unix timestamp (ms) when saved
    pub timestamp: f64,
    pub player_name: String,
    pub score: u64,
    pub level_reached: u32,
    pub difficulty: Difficulty,
    /// Seconds, rounded to two decimals
    pub game_duration: f64,
    pub won: bool,
}

impl GameRecord {
    pub fn from_result(result: &SessionResult, timestamp: f64) -> Self {
        Self {
            timestamp,
            player_name: result.player_name.clone(),
            score: result.score,
            level_reached: result.level_reached,
            difficulty: result.difficulty,
            game_duration: round2(result.duration_secs),
            won: result.won,
        }
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:<16} score {:>7}  level {:>2}  {:<6} {:>8.2}s  {}",
            format_age(self.timestamp, now_ms()),
            self.player_name,
            self.score,
            self.level_reached,
            self.difficulty,
            self.game_duration,
            if self.won { "Win" } else { "Loss" }
        )
    }
}

/// Aggregate view over all records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percent, two decimals
    pub win_rate: f64,
    pub average_score: f64,
    pub max_score: u64,
    pub min_score: u64,
    /// Seconds, two decimals
    pub average_duration: f64,
    pub unique_players: usize,
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total games:      {}", self.total_games)?;
        writeln!(f, "Wins:             {}", self.wins)?;
        writeln!(f, "Losses:           {}", self.losses)?;
        writeln!(f, "Win rate:         {:.2}%", self.win_rate)?;
        writeln!(f, "Average score:    {:.2}", self.average_score)?;
        writeln!(f, "Max score:        {}", self.max_score)?;
        writeln!(f, "Min score:        {}", self.min_score)?;
        writeln!(f, "Average duration: {:.2}s", self.average_duration)?;
        write!(f, "Unique players:   {}", self.unique_players)
    }
}

/// Summarize records; `None` when there are none
pub fn summarize(records: &[GameRecord]) -> Option<StatsSummary> {
    if records.is_empty() {
        return None;
    }

    let total_games = records.len();
    let wins = records.iter().filter(|r| r.won).count();
    let total_score: u64 = records.iter().map(|r| r.score).sum();
    let total_duration: f64 = records.iter().map(|r| r.game_duration).sum();
    let players: HashSet<&str> = records.iter().map(|r| r.player_name.as_str()).collect();
    let n = total_games as f64;

    Some(StatsSummary {
        total_games,
        wins,
        losses: total_games - wins,
        win_rate: round2(wins as f64 / n * 100.0),
        average_score: round2(total_score as f64 / n),
        max_score: records.iter().map(|r| r.score).max().unwrap_or(0),
        min_score: records.iter().map(|r| r.score).min().unwrap_or(0),
        average_duration: round2(total_duration / n),
        unique_players: players.len(),
    })
}

/// Errors from the statistics file
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    Io(String),
    /// Existing file is not a JSON array of records
    Parse(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Io(msg) => write!(f, "Statistics I/O error: {}", msg),
            StatsError::Parse(msg) => write!(f, "Statistics file is malformed: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {}

impl From<io::Error> for StatsError {
    fn from(e: io::Error) -> Self {
        StatsError::Io(e.to_string())
    }
}

/// Append-only statistics log backed by a JSON file
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_PATH)
    }
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<GameRecord>, StatsError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json).map_err(|e| StatsError::Parse(e.to_string()))
    }

    fn write_records(&self, records: &[GameRecord]) -> Result<(), StatsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json =
            serde_json::to_string_pretty(records).map_err(|e| StatsError::Parse(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Append one record
    pub fn append(&self, record: GameRecord) -> Result<(), StatsError> {
        let mut records = self.read_records()?;
        records.push(record);
        self.write_records(&records)?;
        log::info!(
            "Statistics saved ({} records) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Record a finished session, stamped with the current time
    pub fn save_result(&self, result: &SessionResult) -> Result<(), StatsError> {
        self.append(GameRecord::from_result(result, now_ms()))
    }

    /// All records in save order; empty if the file is missing or unreadable
    pub fn load_all(&self) -> Vec<GameRecord> {
        match self.read_records() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Ignoring statistics at {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    pub fn player_records(&self, player_name: &str) -> Vec<GameRecord> {
        self.load_all()
            .into_iter()
            .filter(|r| r.player_name == player_name)
            .collect()
    }

    /// Top `limit` records by score, highest first (ties keep save order)
    pub fn high_scores(&self, limit: usize) -> Vec<GameRecord> {
        let mut records = self.load_all();
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(limit);
        records
    }

    pub fn summary(&self) -> Option<StatsSummary> {
        summarize(&self.load_all())
    }

    /// Delete the log; succeeds if it does not exist
    pub fn clear(&self) -> Result<(), StatsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Statistics cleared at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Current Unix time in milliseconds
pub fn now_ms() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            DateTime::<Utc>::from_timestamp_millis(timestamp as i64)
                .map(|d| d.format("%-m/%-d/%y").to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
