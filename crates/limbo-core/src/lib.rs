#![forbid(unsafe_code)]

//! Core: geometry, palette, and build-time constants.
//!
//! # Role in LIMBO
//! `limbo-core` holds the value types every other crate speaks in: screen
//! [`Position`]s, the fixed grid layout, surface identities, and colors.
//! Nothing here has state or side effects.
//!
//! # How it fits in the system
//! The runtime (`limbo-runtime`) drives the shuffle state machine over these
//! types, and backends (`limbo-tty`, the headless harness) translate them into
//! whatever their host understands.

pub mod color;
pub mod config;
pub mod geometry;
pub mod surface;

pub use color::{HIGHLIGHT, NEUTRAL, PALETTE, Rgb};
pub use config::GameConfig;
pub use geometry::{Position, Size, compute_grid};
pub use surface::SurfaceId;
