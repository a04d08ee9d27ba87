#![forbid(unsafe_code)]
#![doc = "Host traits for LIMBO: platform abstraction for surfaces, input, outcomes, and time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the shuffle runtime and whatever"]
#![doc = "actually draws the keys (the crossterm host in `limbo-tty`, the headless"]
#![doc = "recorder in `limbo-harness`)."]

use core::time::Duration;

use limbo_core::color::Rgb;
use limbo_core::geometry::{Position, Size};
use limbo_core::surface::SurfaceId;

/// Input the runtime cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Primary-button press on a surface.
    Click(SurfaceId),
    /// The user asked to abandon the session (terminal hosts map Ctrl+C here).
    Interrupt,
}

/// Monotonic clock abstraction.
///
/// The runtime never calls `Instant::now()` directly; all time flows through
/// this trait so tests can drive a virtual clock.
pub trait BackendClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Movable, colorable rectangles plus their click events.
pub trait SurfaceHost {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Screen dimensions in logical pixels.
    fn screen_size(&self) -> Result<Size, Self::Error>;

    /// Create a square surface of side `size` at `position`, filled with `color`.
    fn create_surface(
        &mut self,
        id: SurfaceId,
        size: u32,
        position: Position,
        color: Rgb,
    ) -> Result<(), Self::Error>;

    /// Fill a surface with a color.
    fn set_color(&mut self, id: SurfaceId, color: Rgb) -> Result<(), Self::Error>;

    /// Move a surface's top-left corner.
    fn set_position(&mut self, id: SurfaceId, position: Position) -> Result<(), Self::Error>;

    /// Remove a surface. The host must not report input for it afterwards.
    fn destroy(&mut self, id: SurfaceId) -> Result<(), Self::Error>;

    /// Wait up to `timeout` for input. Returns `Ok(None)` on timeout.
    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Input>, Self::Error>;
}

/// Shows the win dialog.
pub trait Notifier {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Tell the player they picked the right key. May block until dismissed.
    fn show_win(&mut self) -> Result<(), Self::Error>;
}

/// The consequence of a wrong click.
///
/// Kept apart from [`Backend`] so tests can substitute a recorder without
/// touching the UI host.
pub trait PunitiveAction {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Fire the action after `delay`. Must not be retried by callers.
    fn invoke(&mut self, delay: Duration) -> Result<(), Self::Error>;
}

/// Unified backend combining clock, surfaces, and notifier.
///
/// The runtime's `Program` is generic over this trait. Concrete
/// implementations:
/// - `limbo-tty`: crossterm terminal host.
/// - `limbo-harness`: headless recorder with a manual clock.
pub trait Backend {
    /// Platform-specific error type shared across sub-traits.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Clock implementation.
    type Clock: BackendClock;

    /// Surface host implementation.
    type Surfaces: SurfaceHost<Error = Self::Error>;

    /// Notifier implementation.
    type Notifier: Notifier<Error = Self::Error>;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Access the surface host (mutable for drawing and polling).
    fn surfaces(&mut self) -> &mut Self::Surfaces;

    /// Access the notifier.
    fn notifier(&mut self) -> &mut Self::Notifier;
}
