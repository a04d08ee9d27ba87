#![forbid(unsafe_code)]

//! Win dialog.
//!
//! Draws a centered box titled "SUCCEED!!" reading "YOU WIN!" and blocks
//! until any key press or mouse click.

use std::io::{self, Stdout, Write};

use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use limbo_backend::Notifier;

use crate::error::TtyError;

pub const WIN_TITLE: &str = "SUCCEED!!";
pub const WIN_MESSAGE: &str = "YOU WIN!";
const BUTTON: &str = "[ OK ]";

/// Text rows of a dialog box, all the same width.
#[must_use]
pub fn dialog_lines(title: &str, message: &str) -> Vec<String> {
    let inner = title.len().max(message.len()).max(BUTTON.len()) + 4;
    let center = |s: &str| {
        let pad = inner - s.len();
        format!("|{}{}{}|", " ".repeat(pad / 2), s, " ".repeat(pad - pad / 2))
    };
    let rule = format!("+{}+", "-".repeat(inner));
    vec![
        rule.clone(),
        center(title),
        rule.clone(),
        center(""),
        center(message),
        center(""),
        center(BUTTON),
        rule,
    ]
}

/// Top-left cell that centers a `width` x `height` box on the terminal.
#[must_use]
pub fn centered(cols: u16, rows: u16, width: u16, height: u16) -> (u16, u16) {
    (cols.saturating_sub(width) / 2, rows.saturating_sub(height) / 2)
}

/// Modal win dialog drawn over the keys.
#[derive(Debug)]
pub struct TtyNotifier<W: Write = Stdout> {
    out: W,
}

impl TtyNotifier<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TtyNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Draw the dialog on a `cols` x `rows` terminal without waiting.
    pub fn draw(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        let lines = dialog_lines(WIN_TITLE, WIN_MESSAGE);
        let width = lines.first().map_or(0, |l| l.len()) as u16;
        let (left, top) = centered(cols, rows, width, lines.len() as u16);
        queue!(
            self.out,
            SetBackgroundColor(Color::Grey),
            SetForegroundColor(Color::Black)
        )?;
        for (i, line) in lines.iter().enumerate() {
            queue!(self.out, cursor::MoveTo(left, top + i as u16), Print(line))?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for TtyNotifier<W> {
    type Error = TtyError;

    fn show_win(&mut self) -> Result<(), TtyError> {
        let (cols, rows) = terminal::size()?;
        self.draw(cols, rows)?;
        tracing::debug!(target: "limbo.tty", "win dialog shown");
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => break,
                Event::Mouse(m) if matches!(m.kind, MouseEventKind::Down(_)) => break,
                _ => {}
            }
        }
        tracing::debug!(target: "limbo.tty", "win dialog dismissed");
        Ok(())
    }
}
