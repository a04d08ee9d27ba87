#![forbid(unsafe_code)]
#![doc = "Crossterm terminal host for LIMBO."]
#![doc = ""]
#![doc = "Implements the `limbo-backend` traits on a terminal: each key is a"]
#![doc = "colored block of cells, left clicks are hit-tested against the blocks,"]
#![doc = "and the win dialog is a centered box. Positions arrive in logical pixels"]
#![doc = "and are scaled to cells by [`scale`]."]

use core::time::Duration;
use std::io::{self, Stdout, Write};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::terminal;
use limbo_backend::{Backend, BackendClock, Input, SurfaceHost};
use limbo_core::color::Rgb;
use limbo_core::geometry::{Position, Size};
use limbo_core::surface::SurfaceId;

pub mod canvas;
pub mod error;
pub mod notifier;
pub mod scale;
pub mod session;

pub use canvas::{Block, Canvas};
pub use error::TtyError;
pub use notifier::TtyNotifier;
pub use session::{SessionOptions, TerminalSession};

// ── Clock ────────────────────────────────────────────────────────────────

/// Monotonic clock backed by `std::time::Instant`.
pub struct TtyClock {
    epoch: std::time::Instant,
}

impl TtyClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

impl Default for TtyClock {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendClock for TtyClock {
    fn now_mono(&self) -> Duration {
        self.epoch.elapsed()
    }
}

// ── Input ────────────────────────────────────────────────────────────────

/// Translate a terminal event into game input.
///
/// Left-button presses become clicks on whatever `hit` reports under the
/// pointer. `Esc` and `Ctrl+C` interrupt. Everything else is dropped.
pub fn map_event(event: &Event, hit: impl Fn(u16, u16) -> Option<SurfaceId>) -> Option<Input> {
    match event {
        Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
            hit(m.column, m.row).map(Input::Click)
        }
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Esc => Some(Input::Interrupt),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Input::Interrupt)
            }
            _ => None,
        },
        _ => None,
    }
}

// ── Surfaces ─────────────────────────────────────────────────────────────

/// Key surfaces drawn into a terminal.
#[derive(Debug)]
pub struct TtySurfaces<W: Write = Stdout> {
    out: W,
    canvas: Canvas,
    cols: u16,
    rows: u16,
}

impl TtySurfaces<Stdout> {
    /// Surfaces on the real terminal, sized from it.
    pub fn stdout() -> Result<Self, TtyError> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::new(io::stdout(), cols, rows))
    }
}

impl<W: Write> TtySurfaces<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            canvas: Canvas::new(),
            cols,
            rows,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn cell_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Adopt a new terminal size and redraw.
    ///
    /// Keys keep their logical positions. The grid was laid out for the
    /// startup size, so a smaller terminal clips keys instead of moving them.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), TtyError> {
        tracing::debug!(target: "limbo.tty", cols, rows, "resize");
        self.cols = cols;
        self.rows = rows;
        self.redraw()
    }

    fn redraw(&mut self) -> Result<(), TtyError> {
        self.canvas.draw(&mut self.out, self.cols, self.rows)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SurfaceHost for TtySurfaces<W> {
    type Error = TtyError;

    fn screen_size(&self) -> Result<Size, TtyError> {
        Ok(scale::screen_px(self.cols, self.rows))
    }

    fn create_surface(
        &mut self,
        id: SurfaceId,
        size: u32,
        position: Position,
        color: Rgb,
    ) -> Result<(), TtyError> {
        self.canvas.insert(Block {
            id,
            size,
            position,
            color,
        })?;
        tracing::trace!(target: "limbo.tty", %id, ?position, "surface created");
        self.redraw()
    }

    fn set_color(&mut self, id: SurfaceId, color: Rgb) -> Result<(), TtyError> {
        self.canvas.set_color(id, color)?;
        self.redraw()
    }

    fn set_position(&mut self, id: SurfaceId, position: Position) -> Result<(), TtyError> {
        self.canvas.set_position(id, position)?;
        self.redraw()
    }

    fn destroy(&mut self, id: SurfaceId) -> Result<(), TtyError> {
        self.canvas.remove(id)?;
        self.redraw()
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Input>, TtyError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let ev = event::read()?;
        if let Event::Resize(cols, rows) = ev {
            self.resize(cols, rows)?;
            return Ok(None);
        }
        let input = map_event(&ev, |col, row| self.canvas.hit_test(col, row));
        if input.is_some() {
            tracing::trace!(target: "limbo.tty", ?input, "input");
        }
        Ok(input)
    }
}

// ── Backend ──────────────────────────────────────────────────────────────

/// Terminal backend. Holds the session so the terminal is restored when the
/// backend is dropped.
pub struct TtyBackend {
    clock: TtyClock,
    surfaces: TtySurfaces<Stdout>,
    notifier: TtyNotifier<Stdout>,
    // Dropped last: restores the terminal after everything else is gone.
    _session: TerminalSession,
}

impl TtyBackend {
    /// Take over the terminal.
    pub fn open() -> Result<Self, TtyError> {
        let session = TerminalSession::new(SessionOptions::default())?;
        let surfaces = TtySurfaces::stdout()?;
        let (cols, rows) = surfaces.cell_size();
        tracing::info!(target: "limbo.tty", cols, rows, "terminal opened");
        Ok(Self {
            clock: TtyClock::new(),
            surfaces,
            notifier: TtyNotifier::stdout(),
            _session: session,
        })
    }
}

impl Backend for TtyBackend {
    type Error = TtyError;
    type Clock = TtyClock;
    type Surfaces = TtySurfaces<Stdout>;
    type Notifier = TtyNotifier<Stdout>;

    fn clock(&self) -> &TtyClock {
        &self.clock
    }

    fn surfaces(&mut self) -> &mut TtySurfaces<Stdout> {
        &mut self.surfaces
    }

    fn notifier(&mut self) -> &mut TtyNotifier<Stdout> {
        &mut self.notifier
    }
}
