#![forbid(unsafe_code)]

//! Interpolated mover.
//!
//! Moving a key is never a teleport: [`animate`] breaks the trip into
//! `steps + 1` reposition frames spaced `duration / steps` apart and returns
//! them as delayed [`Msg::Frame`] commands. Nothing blocks; the program
//! delivers each frame back to the game when its deadline passes.
//!
//! Frames are not cancellable. If a second animation is started on a key
//! before the first finishes, both frame trains fire and the later write wins
//! at any instant. The shuffle interval is longer than every pattern, so the
//! game itself never overlaps two trains on one key.

use std::time::Duration;

use limbo_core::geometry::Position;
use limbo_core::surface::SurfaceId;

use crate::game::Msg;
use crate::program::Cmd;

/// One reposition event, relative to the start of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub offset: Duration,
    pub position: Position,
}

/// The frames of a linear move from `start` to `end`.
///
/// Frame `i` (for `i` in `0..=steps`) is at `i * duration / steps` and
/// `start + (end - start) * i / steps`, rounded. The last frame is exactly
/// `end`. A zero `steps` degenerates to a single frame at `end`.
#[must_use]
pub fn frames(start: Position, end: Position, duration: Duration, steps: u32) -> Vec<Frame> {
    let Some(interval) = duration.checked_div(steps) else {
        return vec![Frame {
            offset: Duration::ZERO,
            position: end,
        }];
    };
    (0..=steps)
        .map(|i| Frame {
            offset: interval * i,
            position: start.lerp(end, i, steps),
        })
        .collect()
}

/// Schedule the frames that glide `surface` from `start` to `end`.
pub fn animate(
    surface: SurfaceId,
    start: Position,
    end: Position,
    duration: Duration,
    steps: u32,
) -> Cmd {
    tracing::trace!(
        target: "limbo.mover",
        %surface,
        from = ?start,
        to = ?end,
        duration_ms = duration.as_millis() as u64,
        steps,
        "animate"
    );
    Cmd::batch(
        frames(start, end, duration, steps)
            .into_iter()
            .map(|f| {
                Cmd::after(
                    f.offset,
                    Msg::Frame {
                        surface,
                        position: f.position,
                    },
                )
            })
            .collect(),
    )
}
