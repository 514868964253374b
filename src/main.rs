//! Brickfall entry point
//!
//! Parses the command line, then either prints statistics or runs the game
//! in the terminal.

use std::io::{self, Stdout, stdout};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags, poll, read,
    },
    execute,
    terminal::{
        self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};

use brickfall::audio::{AudioManager, TerminalBell};
use brickfall::cli::{self, Command, PlayOptions, USAGE};
use brickfall::renderer::{Renderer, TerminalRenderer};
use brickfall::sim::{SessionResult, TickInput};
use brickfall::{Game, Settings, StatsStore};

/// Ticks a tapped movement key keeps the paddle moving when the terminal
/// does not report key releases
const HOLD_TICKS: u8 = 8;

/// Keyboard state between ticks
#[derive(Default)]
struct KeyState {
    /// Terminal reports key releases
    enhanced: bool,
    left: u8,
    right: u8,
    action: bool,
    pause: bool,
    quit: bool,
}

impl KeyState {
    fn new(enhanced: bool) -> Self {
        Self {
            enhanced,
            ..Default::default()
        }
    }

    fn hold(&self) -> u8 {
        if self.enhanced { u8::MAX } else { HOLD_TICKS }
    }

    fn handle_key_event(&mut self, event: KeyEvent) {
        let pressed = event.kind != KeyEventKind::Release;
        let first_press = event.kind == KeyEventKind::Press;

        match event.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.left = if pressed { self.hold() } else { 0 };
                if pressed {
                    self.right = 0;
                }
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.right = if pressed { self.hold() } else { 0 };
                if pressed {
                    self.left = 0;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter if first_press => self.action = true,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc if first_press => {
                self.pause = true
            }
            KeyCode::Char('q') | KeyCode::Char('Q') if first_press => self.quit = true,
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            _ => {}
        }
    }

    /// Input for the next tick; one-shot buttons are consumed
    fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left > 0,
            right: self.right > 0,
            action: std::mem::take(&mut self.action),
            pause: std::mem::take(&mut self.pause),
        };
        if !self.enhanced {
            self.left = self.left.saturating_sub(1);
            self.right = self.right.saturating_sub(1);
        }
        input
    }
}

/// Raw mode and alternate screen, restored on drop
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        enable_raw_mode()?;
        let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self { enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.enhanced {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(out, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

fn run_game(game: &mut Game) -> io::Result<Option<SessionResult>> {
    let mut out = stdout();
    let guard = TerminalGuard::enter(&mut out)?;
    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(out, cols, rows);
    let mut keys = KeyState::new(guard.enhanced);

    let frame_time = Duration::from_secs_f64(1.0 / game.state.settings.ticks_per_second as f64);

    loop {
        let frame_start = Instant::now();

        while poll(Duration::ZERO)? {
            match read()? {
                Event::Key(event) => keys.handle_key_event(event),
                Event::Resize(cols, rows) => renderer.resize(cols, rows),
                _ => {}
            }
        }

        if keys.quit {
            return Ok(game.quit());
        }

        let input = keys.take_input();
        game.step(&input);
        renderer.draw(&game.state)?;

        std::thread::sleep(frame_time.saturating_sub(frame_start.elapsed()));
    }
}

fn play(options: PlayOptions, settings: Settings, stats: StatsStore) -> ExitCode {
    let levels = options.levels.unwrap_or(settings.max_level);
    let audio = AudioManager::from_settings(&settings, Some(Box::new(TerminalBell)));
    let mut game = match Game::new(
        settings,
        options.player_name,
        options.difficulty,
        levels,
        audio,
        stats,
    ) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_game(&mut game) {
        Ok(Some(result)) => {
            println!(
                "{} quit at level {} with {} points",
                result.player_name, result.level_reached, result.score
            );
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Terminal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match cli::parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let stats = cli.stats_file.map(StatsStore::new).unwrap_or_default();

    match cli.command {
        Command::Help => {
            println!("{}", USAGE);
        }
        Command::ShowStats => match stats.summary() {
            Some(summary) => println!("=== Game Statistics ===\n{}", summary),
            None => println!("No games recorded yet."),
        },
        Command::ShowPlayerStats(name) => {
            let records = stats.player_records(&name);
            if records.is_empty() {
                println!("No games found for {}.", name);
            } else {
                println!("=== Games for {} ===", name);
                for (i, record) in records.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, record);
                }
            }
        }
        Command::ShowTop(limit) => {
            let records = stats.high_scores(limit);
            if records.is_empty() {
                println!("No games recorded yet.");
            } else {
                println!("=== Top {} Scores ===", limit);
                for (i, record) in records.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, record);
                }
            }
        }
        Command::ClearStats => {
            if let Err(e) = stats.clear() {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
            println!("Statistics cleared.");
        }
        Command::Play(options) => {
            let settings = match cli.config {
                Some(path) => match Settings::load(&path) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Could not load {}: {}", path.display(), e);
                        return ExitCode::FAILURE;
                    }
                },
                None => Settings::default(),
            };
            log::info!(
                "Brickfall starting: {} on {}",
                options.player_name,
                options.difficulty
            );
            return play(options, settings, stats);
        }
    }

    ExitCode::SUCCESS
}
