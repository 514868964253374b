//! Terminal renderer using crossterm
//!
//! The playfield is scaled onto a character grid. One frame is composed in
//! memory, then written row by row in color runs.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use super::{Renderer, hud_line, overlay_lines};
use crate::sim::{GameState, Rect};

/// Rows used outside the field: HUD plus top and bottom border
const CHROME_ROWS: u16 = 3;
const MIN_FIELD_COLS: usize = 20;
const MIN_FIELD_ROWS: usize = 8;

const BRICK_CHAR: char = '█';
const PADDLE_CHAR: char = '▀';
const BALL_CHAR: char = '●';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// In-memory character grid for one frame of the field
#[derive(Debug, Clone)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Frame {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    fn set(&mut self, x: i64, y: i64, ch: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = Cell { ch, color };
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.cell(x, y).map(|c| c.ch)
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.cell(x, y).map(|c| c.color)
    }

    fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Row contents as plain text
    pub fn row_text(&self, y: usize) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }

    fn text_centered(&mut self, y: i64, text: &str, color: Color) {
        let len = text.chars().count() as i64;
        let x0 = (self.width as i64 - len) / 2;
        for (i, ch) in text.chars().enumerate() {
            self.set(x0 + i as i64, y, ch, color);
        }
    }
}

/// Lay the game state out on a `width` x `height` grid
pub fn compose(state: &GameState, width: usize, height: usize) -> Frame {
    let mut frame = Frame::new(width, height);
    let sx = width as f32 / state.settings.field_width;
    let sy = height as f32 / state.settings.field_height;

    // Cell span covered by a rect (at least one cell)
    let span = |rect: &Rect| {
        let x0 = (rect.left() * sx).floor() as i64;
        let x1 = ((rect.right() * sx).ceil() as i64 - 1).max(x0);
        let y0 = (rect.top() * sy).floor() as i64;
        let y1 = ((rect.bottom() * sy).ceil() as i64 - 1).max(y0);
        (x0, x1, y0, y1)
    };

    for brick in state.level.bricks.active_bricks() {
        let (r, g, b) = brick.color.rgb();
        let (x0, x1, y0, y1) = span(&brick.rect);
        for y in y0..=y1 {
            for x in x0..=x1 {
                frame.set(x, y, BRICK_CHAR, Color::Rgb { r, g, b });
            }
        }
    }

    let (x0, x1, y0, _) = span(&state.paddle.rect());
    for x in x0..=x1 {
        frame.set(x, y0, PADDLE_CHAR, Color::White);
    }

    let ball_x = (state.ball.pos.x * sx).floor() as i64;
    let ball_y = (state.ball.pos.y * sy).floor() as i64;
    frame.set(ball_x, ball_y, BALL_CHAR, Color::Yellow);

    let lines = overlay_lines(state);
    let top = (height as i64 - lines.len() as i64) / 2;
    for (i, line) in lines.iter().enumerate() {
        let color = if i == 0 { Color::Cyan } else { Color::White };
        frame.text_centered(top + i as i64, line, color);
    }

    frame
}

/// Draws the game onto a terminal (or any writer)
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    needs_clear: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            needs_clear: true,
        }
    }

    /// Terminal size changed
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.needs_clear = true;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn field_size(&self) -> (usize, usize) {
        (
            self.cols.saturating_sub(2) as usize,
            self.rows.saturating_sub(CHROME_ROWS) as usize,
        )
    }

    fn border(&mut self, row: u16, left: char, right: char, width: usize) -> io::Result<()> {
        let line: String = std::iter::once(left)
            .chain(std::iter::repeat_n('─', width))
            .chain(std::iter::once(right))
            .collect();
        queue!(self.out, MoveTo(0, row), Print(line))
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, state: &GameState) -> io::Result<()> {
        if self.needs_clear {
            queue!(self.out, Clear(ClearType::All))?;
            self.needs_clear = false;
        }

        let (width, height) = self.field_size();
        if width < MIN_FIELD_COLS || height < MIN_FIELD_ROWS {
            queue!(
                self.out,
                MoveTo(0, 0),
                Print("Terminal too small, please enlarge it")
            )?;
            return self.out.flush();
        }

        let hud = hud_line(state);
        queue!(
            self.out,
            MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("{:<width$}", hud, width = self.cols as usize)),
            ResetColor
        )?;

        self.border(1, '┌', '┐', width)?;

        let frame = compose(state, width, height);
        for y in 0..height {
            queue!(self.out, MoveTo(0, y as u16 + 2), Print('│'))?;

            let mut run = String::new();
            let mut run_color = Color::Reset;
            for cell in frame.row(y) {
                if cell.color != run_color && !run.is_empty() {
                    queue!(self.out, SetForegroundColor(run_color), Print(&run))?;
                    run.clear();
                }
                run_color = cell.color;
                run.push(cell.ch);
            }
            if !run.is_empty() {
                queue!(self.out, SetForegroundColor(run_color), Print(&run))?;
            }

            queue!(self.out, ResetColor, Print('│'))?;
        }

        self.border(height as u16 + 2, '└', '┘', width)?;
        self.out.flush()
    }
}
