//! Command-line arguments

use std::fmt;
use std::path::PathBuf;

use crate::settings::Difficulty;

pub const USAGE: &str = "\
Usage: brickfall [OPTIONS]

Options:
  -n, --name NAME              Player name (default: Player)
  -d, --difficulty LEVEL       easy, medium or hard (default: medium)
  -l, --levels N               Number of levels to clear to win
      --config PATH            Settings file (JSON)
      --stats-file PATH        Statistics file (default: stats/game_stats.json)

Statistics (exclusive, no game is started):
      --show-stats             Print overall statistics
      --show-player-stats NAME Print the game history of one player
      --show-top N             Print the N best scores
      --clear-stats            Delete all statistics

  -h, --help                   Print this help

Controls: Left/Right or A/D move, Space starts and launches, P or Esc pauses, Q quits";

/// Options for an interactive game
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    pub player_name: String,
    pub difficulty: Difficulty,
    /// Overrides `Settings::max_level`
    pub levels: Option<u32>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            difficulty: Difficulty::default(),
            levels: None,
        }
    }
}

/// What the binary should do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(PlayOptions),
    ShowStats,
    ShowPlayerStats(String),
    ShowTop(usize),
    ClearStats,
    Help,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub stats_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    UnknownFlag(String),
    MissingValue(String),
    InvalidNumber { flag: String, value: String },
    InvalidDifficulty(String),
    /// More than one statistics mode given
    ConflictingModes,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::UnknownFlag(flag) => write!(f, "Unknown option: {}", flag),
            CliError::MissingValue(flag) => write!(f, "Option {} needs a value", flag),
            CliError::InvalidNumber { flag, value } => {
                write!(f, "Option {} needs a positive number, got '{}'", flag, value)
            }
            CliError::InvalidDifficulty(value) => write!(
                f,
                "Unknown difficulty '{}' (expected easy, medium or hard)",
                value
            ),
            CliError::ConflictingModes => {
                write!(f, "Only one statistics option may be given at a time")
            }
        }
    }
}

impl std::error::Error for CliError {}

fn parse_positive(flag: &str, value: &str) -> Result<u64, CliError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidNumber {
            flag: flag.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parse arguments (without the program name)
pub fn parse_args<I, S>(args: I) -> Result<Cli, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut play = PlayOptions::default();
    let mut config = None;
    let mut stats_file = None;
    let mut mode: Option<Command> = None;
    let mut help = false;

    while let Some(arg) = args.next() {
        // Accept both `--flag value` and `--flag=value`
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| CliError::MissingValue(flag.clone()))
        };

        let next_mode = match flag.as_str() {
            "-h" | "--help" => {
                help = true;
                None
            }
            "-n" | "--name" => {
                play.player_name = value()?;
                None
            }
            "-d" | "--difficulty" => {
                let v = value()?;
                play.difficulty =
                    Difficulty::from_str(&v).ok_or(CliError::InvalidDifficulty(v))?;
                None
            }
            "-l" | "--levels" => {
                let v = value()?;
                let n = parse_positive(&flag, &v)?;
                play.levels = Some(u32::try_from(n).map_err(|_| CliError::InvalidNumber {
                    flag: flag.clone(),
                    value: v,
                })?);
                None
            }
            "--config" => {
                config = Some(PathBuf::from(value()?));
                None
            }
            "--stats-file" => {
                stats_file = Some(PathBuf::from(value()?));
                None
            }
            "--show-stats" => Some(Command::ShowStats),
            "--show-player-stats" => Some(Command::ShowPlayerStats(value()?)),
            "--show-top" => {
                let v = value()?;
                Some(Command::ShowTop(parse_positive(&flag, &v)? as usize))
            }
            "--clear-stats" => Some(Command::ClearStats),
            _ => return Err(CliError::UnknownFlag(flag.clone())),
        };

        if let Some(next_mode) = next_mode {
            if mode.is_some() {
                return Err(CliError::ConflictingModes);
            }
            mode = Some(next_mode);
        }
    }

    let command = if help {
        Command::Help
    } else {
        mode.unwrap_or(Command::Play(play))
    };

    Ok(Cli {
        command,
        config,
        stats_file,
    })
}
