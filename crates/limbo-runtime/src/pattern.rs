#![forbid(unsafe_code)]

//! Permutation patterns.
//!
//! Each shuffle step applies one of three patterns to the position table:
//!
//! | Pattern       | Weight | Duration | Effect                                  |
//! |---------------|--------|----------|-----------------------------------------|
//! | `CrossColumn` | 0.6    | 130 ms   | one left-column key swaps with one right-column key |
//! | `HalfSwap`    | 0.2    | 190 ms   | key `i` swaps with key `i + 4` for `i < 4` |
//! | `Reversal`    | 0.2    | 210 ms   | key `i` takes the slot of key `N - 1 - i` |
//!
//! [`Pattern::apply`] is pure: it returns the new table and the list of
//! [`Move`]s that animate the change. The game feeds every move through the
//! mover, so keys always glide.
//!
//! # Invariants
//!
//! 1. The returned table is a permutation of the input table.
//! 2. Every key whose position changes has exactly one matching `Move`.
//! 3. `Reversal` is an involution.

use std::fmt;
use std::time::Duration;

use limbo_core::config::{
    CROSS_COLUMN_DURATION, GRID_COLS, HALF_SWAP_DURATION, KEY_COUNT, REVERSAL_DURATION,
};
use limbo_core::geometry::Position;
use limbo_core::surface::SurfaceId;
use rand::Rng;

use crate::table::PositionTable;

/// Draws below this pick [`PatternKind::CrossColumn`].
const CROSS_COLUMN_CUTOFF: f64 = 0.6;
/// Draws below this (and above the previous cutoff) pick [`PatternKind::HalfSwap`].
const HALF_SWAP_CUTOFF: f64 = 0.8;

/// Which pattern, without its random parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    CrossColumn,
    HalfSwap,
    Reversal,
}

impl PatternKind {
    /// Map a uniform draw in `[0, 1)` onto the weighted patterns.
    #[must_use]
    pub fn from_draw(r: f64) -> Self {
        if r < CROSS_COLUMN_CUTOFF {
            Self::CrossColumn
        } else if r < HALF_SWAP_CUTOFF {
            Self::HalfSwap
        } else {
            Self::Reversal
        }
    }

    /// Animation length for this pattern.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::CrossColumn => CROSS_COLUMN_DURATION,
            Self::HalfSwap => HALF_SWAP_DURATION,
            Self::Reversal => REVERSAL_DURATION,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CrossColumn => "cross-column",
            Self::HalfSwap => "half-swap",
            Self::Reversal => "reversal",
        }
    }
}

/// A fully parameterized pattern, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Swap one even-indexed key with one odd-indexed key.
    CrossColumn { even: SurfaceId, odd: SurfaceId },
    /// Swap the first half of the indices with the second half, pairwise.
    HalfSwap,
    /// Reverse the whole table.
    Reversal,
}

/// One key's trip during a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub surface: SurfaceId,
    pub from: Position,
    pub to: Position,
}

impl Pattern {
    /// Draw a pattern with the 0.6 / 0.2 / 0.2 weighting.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match PatternKind::from_draw(rng.random::<f64>()) {
            PatternKind::CrossColumn => {
                let per_column = KEY_COUNT / GRID_COLS;
                let even = rng.random_range(0..per_column) * GRID_COLS;
                let odd = rng.random_range(0..per_column) * GRID_COLS + 1;
                Self::CrossColumn {
                    even: SurfaceId(even),
                    odd: SurfaceId(odd),
                }
            }
            PatternKind::HalfSwap => Self::HalfSwap,
            PatternKind::Reversal => Self::Reversal,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PatternKind {
        match self {
            Self::CrossColumn { .. } => PatternKind::CrossColumn,
            Self::HalfSwap => PatternKind::HalfSwap,
            Self::Reversal => PatternKind::Reversal,
        }
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.kind().duration()
    }

    /// Apply the pattern, returning the new table and the moves to animate.
    #[must_use]
    pub fn apply(&self, table: &PositionTable) -> (PositionTable, Vec<Move>) {
        let mut next = *table;
        let mut moves = Vec::with_capacity(KEY_COUNT);
        match *self {
            Self::CrossColumn { even, odd } => swap_pair(table, &mut next, &mut moves, even, odd),
            Self::HalfSwap => {
                let half = KEY_COUNT / 2;
                for top in 0..half {
                    swap_pair(
                        table,
                        &mut next,
                        &mut moves,
                        SurfaceId(top),
                        SurfaceId(top + half),
                    );
                }
            }
            Self::Reversal => {
                moves.extend(table.iter().map(|(id, from)| Move {
                    surface: id,
                    from,
                    to: table.get(SurfaceId(KEY_COUNT - 1 - id.index())),
                }));
                next.reverse();
            }
        }
        (next, moves)
    }
}

/// Swap `a` and `b` in `next`, animating both toward each other's slot.
fn swap_pair(
    table: &PositionTable,
    next: &mut PositionTable,
    moves: &mut Vec<Move>,
    a: SurfaceId,
    b: SurfaceId,
) {
    let (pa, pb) = (table.get(a), table.get(b));
    moves.push(Move {
        surface: a,
        from: pa,
        to: pb,
    });
    moves.push(Move {
        surface: b,
        from: pb,
        to: pa,
    });
    next.swap(a, b);
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrossColumn { even, odd } => write!(f, "cross-column({even} <-> {odd})"),
            other => f.write_str(other.kind().name()),
        }
    }
}
