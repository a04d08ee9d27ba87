#![forbid(unsafe_code)]

//! Deterministic driver for a headless [`Program`].
//!
//! [`Simulator`] jumps the virtual clock from one timer deadline to the next,
//! so a full 32-shuffle game runs in microseconds and replays identically for
//! a given seed.

use std::time::Duration;

use limbo_backend::{BackendClock, Input};
use limbo_core::config::GameConfig;
use limbo_core::geometry::Position;
use limbo_core::surface::SurfaceId;
use limbo_runtime::{Game, Outcome, Phase, Program, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::headless::{HeadlessBackend, HostOp, ManualClock, RecordingPunisher, DEFAULT_SCREEN};

/// A headless game with a hand-cranked clock.
#[derive(Debug)]
pub struct Simulator {
    program: Program<HeadlessBackend, RecordingPunisher>,
    clock: ManualClock,
}

impl Simulator {
    /// Game with a target drawn from `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let backend = HeadlessBackend::default();
        let clock = backend.clock_handle();
        let program = Program::new(
            config,
            backend,
            RecordingPunisher::new(),
            StdRng::seed_from_u64(seed),
        )?;
        Ok(Self { program, clock })
    }

    /// Game with a fixed target.
    pub fn with_highlight(config: GameConfig, seed: u64, highlight: SurfaceId) -> Self {
        Self::with_parts(
            config,
            seed,
            highlight,
            HeadlessBackend::default(),
            RecordingPunisher::new(),
        )
    }

    /// Game with a fixed target and caller-supplied collaborators.
    pub fn with_parts(
        config: GameConfig,
        seed: u64,
        highlight: SurfaceId,
        backend: HeadlessBackend,
        punisher: RecordingPunisher,
    ) -> Self {
        let clock = backend.clock_handle();
        let rng = StdRng::seed_from_u64(seed);
        let game = Game::with_highlight(config, DEFAULT_SCREEN, rng, highlight);
        Self {
            program: Program::with_game(game, backend, punisher),
            clock,
        }
    }

    // ── Driving ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<()> {
        self.program.start()
    }

    /// Advance virtual time by `by`, firing every timer on the way in
    /// deadline order.
    pub fn advance(&mut self, by: Duration) -> Result<()> {
        let target = self.now() + by;
        self.advance_to(target)
    }

    /// Advance virtual time to the absolute instant `target`.
    pub fn advance_to(&mut self, target: Duration) -> Result<()> {
        self.program.start()?;
        while self.program.is_running() {
            match self.program.next_deadline() {
                Some(deadline) if deadline <= target => {
                    self.clock.set(deadline.max(self.now()));
                    self.program.fire_due()?;
                }
                _ => break,
            }
        }
        if target > self.now() {
            self.clock.set(target);
        }
        Ok(())
    }

    /// Fire timers until none remain. Returns the virtual time reached.
    pub fn run_until_idle(&mut self) -> Result<Duration> {
        self.program.start()?;
        while self.program.is_running() {
            let Some(deadline) = self.program.next_deadline() else {
                break;
            };
            self.clock.set(deadline.max(self.now()));
            self.program.fire_due()?;
        }
        Ok(self.now())
    }

    /// Fire timers until the game enters `phase`. Returns `false` if the
    /// timers ran out first.
    pub fn run_until_phase(&mut self, phase: Phase) -> Result<bool> {
        self.program.start()?;
        while self.phase() != phase {
            let Some(deadline) = self.program.next_deadline() else {
                return Ok(false);
            };
            self.clock.set(deadline.max(self.now()));
            self.program.fire_due()?;
        }
        Ok(true)
    }

    pub fn click(&mut self, surface: SurfaceId) -> Result<()> {
        self.program.handle_input(Input::Click(surface))
    }

    pub fn interrupt(&mut self) -> Result<()> {
        self.program.handle_input(Input::Interrupt)
    }

    // ── Observation ────────────────────────────────────────────────────

    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    pub fn game(&self) -> &Game {
        self.program.game()
    }

    pub fn phase(&self) -> Phase {
        self.program.game().phase()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.program.game().outcome()
    }

    pub fn is_running(&self) -> bool {
        self.program.is_running()
    }

    pub fn backend(&self) -> &HeadlessBackend {
        self.program.backend()
    }

    pub fn punisher(&self) -> &RecordingPunisher {
        self.program.punisher()
    }

    /// Host operations so far.
    pub fn ops(&self) -> Vec<(Duration, HostOp)> {
        self.program.backend().ops()
    }

    /// Where the host currently shows `surface`, if it is live.
    pub fn displayed(&self, surface: SurfaceId) -> Option<Position> {
        self.program
            .backend()
            .surfaces_ref()
            .get(surface)
            .map(|s| s.position)
    }
}
