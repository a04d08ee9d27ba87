#![forbid(unsafe_code)]

//! Terminal host errors.

use std::io;

use limbo_core::surface::SurfaceId;

/// Failure of the terminal host.
#[derive(Debug, thiserror::Error)]
pub enum TtyError {
    /// Writing to or reading from the terminal failed.
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),
    /// The runtime addressed a surface that does not exist.
    #[error("unknown surface {0}")]
    UnknownSurface(SurfaceId),
    /// The runtime created the same surface twice.
    #[error("surface {0} already exists")]
    Duplicate(SurfaceId),
}
