#![forbid(unsafe_code)]

//! LIMBO test harness.
//!
//! - [`headless`]: a recording [`limbo_backend::Backend`] over a manual clock
//! - [`simulator`]: steps a real [`limbo_runtime::Program`] deadline by deadline
//! - [`determinism`]: environment seed overrides for replaying a run

pub mod determinism;
pub mod headless;
pub mod simulator;

pub use determinism::fixture_seed;
pub use headless::{
    HeadlessBackend, HeadlessError, HostOp, ManualClock, RecordingNotifier, RecordingPunisher,
    SurfaceState,
};
pub use simulator::Simulator;
