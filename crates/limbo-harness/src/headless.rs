#![forbid(unsafe_code)]

//! Headless host: a virtual clock plus a surface table that records every
//! operation the runtime performs.
//!
//! Input is scripted as `(at, Input)` pairs. Polling advances the virtual
//! clock instead of sleeping, so [`limbo_runtime::Program::run`] completes
//! instantly and deterministically. Once the script is exhausted and the
//! clock passes the horizon, the host reports [`Input::Interrupt`] so an
//! unattended run always terminates.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use limbo_backend::{Backend, BackendClock, Input, Notifier, PunitiveAction, SurfaceHost};
use limbo_core::color::Rgb;
use limbo_core::geometry::{Position, Size};
use limbo_core::surface::SurfaceId;

/// Default screen for headless runs.
pub const DEFAULT_SCREEN: Size = Size::new(1920, 1080);

/// Virtual time after which an idle, unscripted host hangs up.
pub const DEFAULT_HORIZON: Duration = Duration::from_secs(120);

/// Failure injected into or detected by the headless host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeadlessError {
    #[error("unknown surface {0}")]
    UnknownSurface(SurfaceId),
    #[error("surface {0} already exists")]
    Duplicate(SurfaceId),
    #[error("injected fault: {0}")]
    Injected(&'static str),
}

/// Manually advanced monotonic clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        debug_assert!(now >= self.now.get(), "clock must not run backwards");
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl BackendClock for ManualClock {
    fn now_mono(&self) -> Duration {
        self.now.get()
    }
}

/// One recorded host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOp {
    Create {
        id: SurfaceId,
        size: u32,
        position: Position,
        color: Rgb,
    },
    Paint {
        id: SurfaceId,
        color: Rgb,
    },
    Place {
        id: SurfaceId,
        position: Position,
    },
    Destroy(SurfaceId),
    ShowWin,
}

/// Shared, append-only operation log.
pub type OpLog = Rc<RefCell<Vec<(Duration, HostOp)>>>;

/// Current state of one live surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceState {
    pub size: u32,
    pub position: Position,
    pub color: Rgb,
}

/// Recording surface table.
#[derive(Debug)]
pub struct HeadlessSurfaces {
    clock: ManualClock,
    screen: Size,
    live: BTreeMap<SurfaceId, SurfaceState>,
    log: OpLog,
    script: VecDeque<(Duration, Input)>,
    horizon: Duration,
    fail_creates: bool,
    fail_screen: bool,
}

impl HeadlessSurfaces {
    fn record(&self, op: HostOp) {
        self.log.borrow_mut().push((self.clock.now_mono(), op));
    }

    fn live_mut(&mut self, id: SurfaceId) -> Result<&mut SurfaceState, HeadlessError> {
        self.live
            .get_mut(&id)
            .ok_or(HeadlessError::UnknownSurface(id))
    }

    /// Surfaces that have been created and not destroyed.
    pub fn live(&self) -> &BTreeMap<SurfaceId, SurfaceState> {
        &self.live
    }

    pub fn get(&self, id: SurfaceId) -> Option<&SurfaceState> {
        self.live.get(&id)
    }

    /// Queue an input to be delivered once the clock reaches `at`.
    pub fn script(&mut self, at: Duration, input: Input) {
        let idx = self.script.partition_point(|(t, _)| *t <= at);
        self.script.insert(idx, (at, input));
    }

    pub fn set_horizon(&mut self, horizon: Duration) {
        self.horizon = horizon;
    }

    /// Make every subsequent `create_surface` fail.
    pub fn refuse_creation(&mut self) {
        self.fail_creates = true;
    }

    /// Make `screen_size` fail.
    pub fn refuse_screen(&mut self) {
        self.fail_screen = true;
    }
}

impl SurfaceHost for HeadlessSurfaces {
    type Error = HeadlessError;

    fn screen_size(&self) -> Result<Size, HeadlessError> {
        if self.fail_screen {
            return Err(HeadlessError::Injected("screen unavailable"));
        }
        Ok(self.screen)
    }

    fn create_surface(
        &mut self,
        id: SurfaceId,
        size: u32,
        position: Position,
        color: Rgb,
    ) -> Result<(), HeadlessError> {
        if self.fail_creates {
            return Err(HeadlessError::Injected("surface creation refused"));
        }
        if self.live.contains_key(&id) {
            return Err(HeadlessError::Duplicate(id));
        }
        self.live.insert(
            id,
            SurfaceState {
                size,
                position,
                color,
            },
        );
        self.record(HostOp::Create {
            id,
            size,
            position,
            color,
        });
        Ok(())
    }

    fn set_color(&mut self, id: SurfaceId, color: Rgb) -> Result<(), HeadlessError> {
        self.live_mut(id)?.color = color;
        self.record(HostOp::Paint { id, color });
        Ok(())
    }

    fn set_position(&mut self, id: SurfaceId, position: Position) -> Result<(), HeadlessError> {
        self.live_mut(id)?.position = position;
        self.record(HostOp::Place { id, position });
        Ok(())
    }

    fn destroy(&mut self, id: SurfaceId) -> Result<(), HeadlessError> {
        self.live
            .remove(&id)
            .ok_or(HeadlessError::UnknownSurface(id))?;
        self.record(HostOp::Destroy(id));
        Ok(())
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Input>, HeadlessError> {
        let now = self.clock.now_mono();
        let wake = now + timeout;
        match self.script.front() {
            Some(&(at, input)) if at <= wake => {
                self.script.pop_front();
                self.clock.set(at.max(now));
                // Clicks on destroyed surfaces are never reported.
                match input {
                    Input::Click(id) if !self.live.contains_key(&id) => Ok(None),
                    _ => Ok(Some(input)),
                }
            }
            Some(_) => {
                self.clock.set(wake);
                Ok(None)
            }
            None if now >= self.horizon => Ok(Some(Input::Interrupt)),
            None => {
                self.clock.set(wake.min(self.horizon.max(now)));
                Ok(None)
            }
        }
    }
}

/// Counts win dialogs and logs them alongside host operations.
#[derive(Debug)]
pub struct RecordingNotifier {
    clock: ManualClock,
    log: OpLog,
    shown: usize,
}

impl RecordingNotifier {
    /// How many times the win dialog was shown.
    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl Notifier for RecordingNotifier {
    type Error = HeadlessError;

    fn show_win(&mut self) -> Result<(), HeadlessError> {
        self.shown += 1;
        self.log
            .borrow_mut()
            .push((self.clock.now_mono(), HostOp::ShowWin));
        Ok(())
    }
}

/// Punitive action that only records its invocations.
#[derive(Debug, Default)]
pub struct RecordingPunisher {
    invocations: Vec<Duration>,
    refuse: bool,
}

impl RecordingPunisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A punisher whose every invocation fails.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            invocations: Vec::new(),
            refuse: true,
        }
    }

    /// Delays passed to each successful invocation.
    pub fn invocations(&self) -> &[Duration] {
        &self.invocations
    }
}

impl PunitiveAction for RecordingPunisher {
    type Error = HeadlessError;

    fn invoke(&mut self, delay: Duration) -> Result<(), HeadlessError> {
        if self.refuse {
            return Err(HeadlessError::Injected("shutdown refused"));
        }
        self.invocations.push(delay);
        Ok(())
    }
}

/// Headless [`Backend`] over a [`ManualClock`].
#[derive(Debug)]
pub struct HeadlessBackend {
    clock: ManualClock,
    surfaces: HeadlessSurfaces,
    notifier: RecordingNotifier,
    log: OpLog,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN)
    }
}

impl HeadlessBackend {
    #[must_use]
    pub fn new(screen: Size) -> Self {
        let clock = ManualClock::new();
        let log = OpLog::default();
        Self {
            surfaces: HeadlessSurfaces {
                clock: clock.clone(),
                screen,
                live: BTreeMap::new(),
                log: Rc::clone(&log),
                script: VecDeque::new(),
                horizon: DEFAULT_HORIZON,
                fail_creates: false,
                fail_screen: false,
            },
            notifier: RecordingNotifier {
                clock: clock.clone(),
                log: Rc::clone(&log),
                shown: 0,
            },
            clock,
            log,
        }
    }

    /// A handle sharing this backend's clock.
    pub fn clock_handle(&self) -> ManualClock {
        self.clock.clone()
    }

    /// Every host operation so far, with its virtual timestamp.
    pub fn ops(&self) -> Vec<(Duration, HostOp)> {
        self.log.borrow().clone()
    }

    pub fn surfaces_ref(&self) -> &HeadlessSurfaces {
        &self.surfaces
    }

    pub fn notifier_ref(&self) -> &RecordingNotifier {
        &self.notifier
    }
}

impl Backend for HeadlessBackend {
    type Error = HeadlessError;
    type Clock = ManualClock;
    type Surfaces = HeadlessSurfaces;
    type Notifier = RecordingNotifier;

    fn clock(&self) -> &ManualClock {
        &self.clock
    }

    fn surfaces(&mut self) -> &mut HeadlessSurfaces {
        &mut self.surfaces
    }

    fn notifier(&mut self) -> &mut RecordingNotifier {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limbo_core::{HIGHLIGHT, NEUTRAL};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn clock_handles_share_time() {
        let backend = HeadlessBackend::default();
        let handle = backend.clock_handle();
        handle.advance(ms(250));
        assert_eq!(backend.clock().now_mono(), ms(250));
    }

    #[test]
    fn operations_are_logged_with_time() {
        let mut backend = HeadlessBackend::default();
        let clock = backend.clock_handle();
        backend
            .surfaces()
            .create_surface(SurfaceId(0), 100, Position::new(1, 1), NEUTRAL)
            .unwrap();
        clock.set(ms(40));
        backend.surfaces().set_color(SurfaceId(0), HIGHLIGHT).unwrap();
        backend.notifier().show_win().unwrap();

        let ops = backend.ops();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[1], (ms(40), HostOp::Paint { id: SurfaceId(0), color: HIGHLIGHT }));
        assert_eq!(ops[2], (ms(40), HostOp::ShowWin));
        assert_eq!(backend.notifier_ref().shown(), 1);
    }

    #[test]
    fn unknown_and_duplicate_surfaces_error() {
        let mut backend = HeadlessBackend::default();
        let host = backend.surfaces();
        assert_eq!(
            host.set_position(SurfaceId(4), Position::default()),
            Err(HeadlessError::UnknownSurface(SurfaceId(4)))
        );
        host.create_surface(SurfaceId(4), 100, Position::default(), NEUTRAL)
            .unwrap();
        assert_eq!(
            host.create_surface(SurfaceId(4), 100, Position::default(), NEUTRAL),
            Err(HeadlessError::Duplicate(SurfaceId(4)))
        );
        host.destroy(SurfaceId(4)).unwrap();
        assert!(host.destroy(SurfaceId(4)).is_err());
    }

    #[test]
    fn poll_advances_clock_to_scripted_input() {
        let mut backend = HeadlessBackend::default();
        let clock = backend.clock_handle();
        let host = backend.surfaces();
        host.create_surface(SurfaceId(2), 100, Position::default(), NEUTRAL)
            .unwrap();
        host.script(ms(300), Input::Click(SurfaceId(2)));

        assert_eq!(host.poll_input(ms(100)).unwrap(), None);
        assert_eq!(clock.now_mono(), ms(100));
        assert_eq!(
            host.poll_input(ms(500)).unwrap(),
            Some(Input::Click(SurfaceId(2)))
        );
        assert_eq!(clock.now_mono(), ms(300));
    }

    #[test]
    fn script_keeps_time_order() {
        let mut backend = HeadlessBackend::default();
        let host = backend.surfaces();
        host.script(ms(20), Input::Interrupt);
        host.script(ms(10), Input::Click(SurfaceId(0)));
        host.create_surface(SurfaceId(0), 100, Position::default(), NEUTRAL)
            .unwrap();
        assert_eq!(
            host.poll_input(ms(50)).unwrap(),
            Some(Input::Click(SurfaceId(0)))
        );
        assert_eq!(host.poll_input(ms(50)).unwrap(), Some(Input::Interrupt));
    }

    #[test]
    fn clicks_on_missing_surfaces_are_dropped() {
        let mut backend = HeadlessBackend::default();
        let host = backend.surfaces();
        host.script(ms(0), Input::Click(SurfaceId(1)));
        assert_eq!(host.poll_input(ms(10)).unwrap(), None);
    }

    #[test]
    fn idle_host_hangs_up_at_horizon() {
        let mut backend = HeadlessBackend::default();
        let clock = backend.clock_handle();
        let host = backend.surfaces();
        host.set_horizon(ms(150));
        assert_eq!(host.poll_input(ms(100)).unwrap(), None);
        assert_eq!(host.poll_input(ms(100)).unwrap(), None);
        assert_eq!(clock.now_mono(), ms(150));
        assert_eq!(host.poll_input(ms(100)).unwrap(), Some(Input::Interrupt));
    }

    #[test]
    fn refusing_punisher_records_nothing() {
        let mut p = RecordingPunisher::refusing();
        assert!(p.invoke(ms(3000)).is_err());
        assert!(p.invocations().is_empty());

        let mut p = RecordingPunisher::new();
        p.invoke(ms(3000)).unwrap();
        assert_eq!(p.invocations(), &[ms(3000)]);
    }
}
