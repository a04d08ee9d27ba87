#![forbid(unsafe_code)]

//! LIMBO Runtime
//!
//! The shuffle engine: an explicit state machine ([`Game`]) that flashes the
//! target key, animates a budget of random permutation patterns, reveals the
//! palette, and resolves the first click. A small event loop ([`Program`])
//! owns the timer queue and executes the game's commands against a
//! `limbo-backend` host.
//!
//! # Key Components
//!
//! - [`PositionTable`] - index to position mapping, always a permutation of the grid
//! - [`Pattern`] - the three swap patterns and their weighted draw
//! - [`mover`] - linear interpolation of a key between two positions
//! - [`Game`] - the state machine (`Idle` through `Ready`)
//! - [`Program`] - timer queue + host execution loop
//!
//! # Scheduling model
//! Everything is single threaded. "Waiting" means returning a
//! [`Cmd::After`] and letting the program call back into [`Game::update`]
//! when the deadline passes. Timers sharing a deadline fire in the order they
//! were scheduled.

pub mod error;
pub mod game;
pub mod mover;
pub mod pattern;
pub mod program;
pub mod table;
pub mod timer;

pub use error::{Error, Result};
pub use game::{Game, Msg, Outcome, Phase, Surface};
pub use pattern::{Move, Pattern, PatternKind};
pub use program::{Cmd, Program};
pub use table::PositionTable;
pub use timer::TimerQueue;
