use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;
use rand::Rng;
use thiserror::Error;

use crate::board::{Board, Point};
use crate::session::Session;
use crate::state::Phase;

const FIELD_TOP: u16 = 2;
const FIELD_LEFT: u16 = 2;

const HEAD: &str = "()";
const BODY: &str = "{}";
const FOOD: &str = "[]";
const BLOCK: &str = "  ";

const BACKGROUND: Color = Color::Black;
const TEXT: Color = Color::White;

#[derive(Debug, Error)]
pub enum TermError {
    #[error("terminal too small {cols}x{rows}, need at least {need_cols}x{need_rows}")]
    TooSmall { cols: u16, rows: u16, need_cols: u16, need_rows: u16 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TermError>;

/// Owns the terminal while a game is on screen.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout(), active: false })
    }

    /// Fails if the board and its border do not fit on screen.
    pub fn check_size(&self, board: &Board) -> Result<()> {
        let (need_cols, need_rows) = required_size(board);
        if self.width < need_cols || self.height < need_rows {
            return Err(TermError::TooSmall {
                cols: self.width,
                rows: self.height,
                need_cols,
                need_rows,
            });
        }

        Ok(())
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.active = true;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }

    /// Returns the next key press if one is waiting, without blocking.
    pub fn poll_key(&self) -> Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(Some(ev));
                }
            }
        }

        Ok(None)
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Draws the whole frame: scores, border, field, snake and food.
    pub fn draw<R: Rng>(&mut self, session: &Session<R>) -> Result<()> {
        let board = *session.board();
        let state = session.state();

        self.draw_text(0, 4, &format!("Score: {}", state.score()))?;
        self.draw_text(0, 30, &format!("Highscore: {}", state.highscore()))?;
        self.draw_border(&board, state.wrap())?;

        queue!(self.stdout, style::SetBackgroundColor(BACKGROUND))?;
        for y in 0..board.height() {
            queue!(
                self.stdout,
                cursor::MoveTo(FIELD_LEFT, FIELD_TOP + y as u16),
                style::Print(BLOCK.repeat(board.width() as usize))
            )?;
        }

        let mut body = session.snake().positions();
        if let Some(head) = body.next() {
            for p in body {
                self.draw_cell(p, BODY, Color::Yellow, Color::Green)?;
            }
            self.draw_cell(head, HEAD, Color::Yellow, Color::Yellow)?;
        }
        self.draw_cell(session.food(), FOOD, Color::Red, Color::Red)?;

        self.flush()
    }

    /// Puts the pause or end-of-round box over the field.
    pub fn draw_overlay<R: Rng>(&mut self, session: &Session<R>) -> Result<()> {
        let state = session.state();
        let (title, choices) = match state.phase() {
            Phase::Paused => ("Paused", "Quit      Resume"),
            Phase::Ended(_) if state.has_new_highscore() => ("HIGH SCORE", "Quit      Replay"),
            Phase::Ended(_) if state.won() => ("YOU WON!", "Quit      Replay"),
            Phase::Ended(_) => ("GAME OVER", "Quit      Replay"),
            Phase::Running => return Ok(()),
        };

        self.show_message(session.board(), &["", title, "", choices, "  Q          R  "])
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_message(&mut self, board: &Board, lines: &[&str]) -> Result<()> {
        let msg_width = lines.iter().map(|x| x.len()).max().unwrap_or(0) as u16 + 14;
        let msg_height = lines.len() as u16 + 2;
        let center = (FIELD_LEFT + board.width() as u16, FIELD_TOP + board.height() as u16 / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        queue!(self.stdout, style::SetBackgroundColor(Color::Grey))?;
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            queue!(
                self.stdout,
                cursor::MoveTo(top_left.0, *y),
                style::Print(BLOCK.repeat(msg_width as usize / 2))
            )?;
        }

        queue!(self.stdout, style::SetForegroundColor(TEXT), style::SetBackgroundColor(BACKGROUND))?;
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            queue!(
                self.stdout,
                cursor::MoveTo(top_left.0, top_left.1 + i as u16 + 1),
                style::Print(padded_line)
            )?;
        }

        self.flush()
    }

    fn draw_border(&mut self, board: &Board, wrap: bool) -> Result<()> {
        let color = if wrap { Color::DarkGrey } else { Color::Grey };
        let right = FIELD_LEFT + 2 * board.width() as u16;
        let bottom = FIELD_TOP + board.height() as u16;
        let line = BLOCK.repeat(board.width() as usize + 2);

        queue!(self.stdout, style::SetBackgroundColor(color))?;
        queue!(self.stdout, cursor::MoveTo(0, FIELD_TOP - 1), style::Print(&line))?;
        for y in FIELD_TOP..bottom {
            queue!(
                self.stdout,
                cursor::MoveTo(0, y),
                style::Print(BLOCK),
                cursor::MoveTo(right, y),
                style::Print(BLOCK)
            )?;
        }
        queue!(self.stdout, cursor::MoveTo(0, bottom), style::Print(&line))?;
        Ok(())
    }

    fn draw_cell(&mut self, p: Point, s: &str, fg: Color, bg: Color) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(FIELD_LEFT + 2 * p.x as u16, FIELD_TOP + p.y as u16),
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(bg),
            style::Print(s)
        )?;
        Ok(())
    }

    fn draw_text(&mut self, row: u16, col: u16, s: &str) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(col, row),
            style::SetForegroundColor(TEXT),
            style::SetBackgroundColor(BACKGROUND),
            terminal::Clear(ClearType::UntilNewLine),
            style::Print(s)
        )?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("could not restore terminal: {}", e);
        }
    }
}

/// Columns and rows needed to show `board` with its border and score line.
pub fn required_size(board: &Board) -> (u16, u16) {
    let cols = 2 * board.width() + 2 * FIELD_LEFT as i32;
    let rows = board.height() + FIELD_TOP as i32 + 1;
    (cols.clamp(0, u16::MAX as i32) as u16, rows.clamp(0, u16::MAX as i32) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_fits_border() {
        assert_eq!(required_size(&Board::default()), (64, 21));
        assert_eq!(required_size(&Board::new(2, 2).unwrap()), (8, 5));
    }
}
