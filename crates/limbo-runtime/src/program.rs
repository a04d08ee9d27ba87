#![forbid(unsafe_code)]

//! Event loop for the shuffle game.
//!
//! [`Program`] owns the [`Game`], a [`TimerQueue`] of pending messages, the
//! host [`Backend`], and the [`PunitiveAction`]. It executes the commands the
//! game returns and feeds timer expiries and clicks back in.
//!
//! Delays are measured from the deadline of the timer whose handler produced
//! them, not from the wall clock at dispatch. A slow host therefore makes the
//! loop catch up instead of drifting, and a manual clock replays a run
//! exactly.

use std::time::Duration;

use limbo_backend::{Backend, BackendClock, Input, Notifier, PunitiveAction, SurfaceHost};
use limbo_core::color::Rgb;
use limbo_core::config::GameConfig;
use limbo_core::geometry::Position;
use limbo_core::surface::SurfaceId;
use rand::rngs::StdRng;

use crate::error::{Error, Result};
use crate::game::{Game, Msg, Outcome};
use crate::timer::TimerQueue;

/// Poll timeout when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Side effects requested by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// No operation.
    None,
    /// Execute commands in order. Stops early after [`Cmd::Quit`].
    Batch(Vec<Cmd>),
    /// Deliver a message after a delay.
    After(Duration, Msg),
    /// Create a key surface.
    Create {
        surface: SurfaceId,
        size: u32,
        position: Position,
        color: Rgb,
    },
    /// Repaint a key.
    Paint { surface: SurfaceId, color: Rgb },
    /// Move a key.
    Place {
        surface: SurfaceId,
        position: Position,
    },
    /// Remove a key.
    Destroy(SurfaceId),
    /// Show the win dialog.
    NotifyWin,
    /// Fire the punitive action after the given delay.
    Punish(Duration),
    /// Stop the loop.
    Quit,
}

impl Cmd {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds = cmds;
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Deliver `msg` after `delay`.
    #[inline]
    pub fn after(delay: Duration, msg: Msg) -> Self {
        Self::After(delay, msg)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Batch(_) => "batch",
            Self::After(..) => "after",
            Self::Create { .. } => "create",
            Self::Paint { .. } => "paint",
            Self::Place { .. } => "place",
            Self::Destroy(_) => "destroy",
            Self::NotifyWin => "notify_win",
            Self::Punish(_) => "punish",
            Self::Quit => "quit",
        }
    }
}

impl Default for Cmd {
    fn default() -> Self {
        Self::None
    }
}

/// The game loop bound to a host.
pub struct Program<B: Backend, P: PunitiveAction> {
    game: Game,
    backend: B,
    punisher: P,
    timers: TimerQueue<Msg>,
    started: bool,
    running: bool,
}

impl<B: Backend, P: PunitiveAction> std::fmt::Debug for Program<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("phase", &self.game.phase())
            .field("timers", &self.timers)
            .field("started", &self.started)
            .field("running", &self.running)
            .finish()
    }
}

impl<B: Backend, P: PunitiveAction> Program<B, P> {
    /// Build a game sized to the host's screen.
    pub fn new(config: GameConfig, mut backend: B, punisher: P, rng: StdRng) -> Result<Self> {
        let screen = backend.surfaces().screen_size().map_err(Error::init)?;
        tracing::debug!(
            target: "limbo.program",
            width = screen.width,
            height = screen.height,
            "screen size"
        );
        let game = Game::new(config, screen, rng);
        Ok(Self::with_game(game, backend, punisher))
    }

    /// Wrap an already constructed game.
    pub fn with_game(game: Game, backend: B, punisher: P) -> Self {
        Self {
            game,
            backend,
            punisher,
            timers: TimerQueue::new(),
            started: false,
            running: true,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn punisher(&self) -> &P {
        &self.punisher
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of messages waiting on a timer.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    // ── Loop ───────────────────────────────────────────────────────────

    /// Run the game's init commands. Idempotent.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        let base = self.backend.clock().now_mono();
        let cmd = self.game.init();
        self.execute(cmd, base)
    }

    /// Deliver every timer due at the current clock reading.
    ///
    /// Timers scheduled by a handler that are already due fire in the same
    /// call. Returns how many messages were delivered.
    pub fn fire_due(&mut self) -> Result<usize> {
        let now = self.backend.clock().now_mono();
        let mut fired = 0;
        while self.running {
            let Some((deadline, msg)) = self.timers.pop_due(now) else {
                break;
            };
            let cmd = self.game.update(msg);
            self.execute(cmd, deadline)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Route one host input into the game.
    pub fn handle_input(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Click(surface) => {
                tracing::debug!(target: "limbo.program", %surface, "click");
                let base = self.backend.clock().now_mono();
                let cmd = self.game.update(Msg::Click(surface));
                self.execute(cmd, base)
            }
            Input::Interrupt => {
                tracing::info!(target: "limbo.program", phase = ?self.game.phase(), "interrupted");
                self.running = false;
                Ok(())
            }
        }
    }

    /// Run until the game ends or the host interrupts.
    ///
    /// Returns the outcome, or `None` when interrupted first.
    pub fn run(&mut self) -> Result<Option<Outcome>> {
        self.start()?;
        while self.running {
            self.fire_due()?;
            if !self.running {
                break;
            }
            let timeout = match self.timers.next_deadline() {
                Some(deadline) => deadline.saturating_sub(self.backend.clock().now_mono()),
                None => IDLE_POLL,
            };
            let input = self
                .backend
                .surfaces()
                .poll_input(timeout)
                .map_err(Error::host)?;
            if let Some(input) = input {
                self.handle_input(input)?;
            }
        }
        let outcome = self.game.outcome();
        tracing::info!(target: "limbo.program", ?outcome, "loop finished");
        Ok(outcome)
    }

    fn execute(&mut self, cmd: Cmd, base: Duration) -> Result<()> {
        if let Cmd::Batch(cmds) = cmd {
            for cmd in cmds {
                if !self.running {
                    break;
                }
                self.execute(cmd, base)?;
            }
            return Ok(());
        }

        let _span =
            tracing::debug_span!(target: "limbo.program", "cmd", kind = cmd.name()).entered();
        match cmd {
            Cmd::None | Cmd::Batch(_) => {}
            Cmd::After(delay, msg) => self.timers.schedule(base + delay, msg),
            Cmd::Create {
                surface,
                size,
                position,
                color,
            } => self
                .backend
                .surfaces()
                .create_surface(surface, size, position, color)
                .map_err(Error::init)?,
            Cmd::Paint { surface, color } => self
                .backend
                .surfaces()
                .set_color(surface, color)
                .map_err(Error::host)?,
            Cmd::Place { surface, position } => self
                .backend
                .surfaces()
                .set_position(surface, position)
                .map_err(Error::host)?,
            Cmd::Destroy(surface) => self
                .backend
                .surfaces()
                .destroy(surface)
                .map_err(Error::host)?,
            Cmd::NotifyWin => self.backend.notifier().show_win().map_err(Error::notify)?,
            Cmd::Punish(delay) => {
                tracing::warn!(
                    target: "limbo.program",
                    delay_ms = delay.as_millis() as u64,
                    "invoking punitive action"
                );
                self.punisher.invoke(delay).map_err(Error::punish)?;
            }
            Cmd::Quit => self.running = false,
        }
        Ok(())
    }
}
