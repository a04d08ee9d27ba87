#![forbid(unsafe_code)]

//! The position table.
//!
//! `table[i]` is where key `i` currently sits (or is heading, while an
//! animation is in flight). Patterns only ever swap or reverse entries, so the
//! table stays a permutation of the grid slots it was built from.

use std::collections::HashSet;

use limbo_core::config::KEY_COUNT;
use limbo_core::geometry::Position;
use limbo_core::surface::SurfaceId;

/// Surface index to position mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionTable {
    positions: [Position; KEY_COUNT],
}

impl PositionTable {
    /// Table with key `i` at grid slot `i`.
    #[must_use]
    pub const fn canonical(grid: [Position; KEY_COUNT]) -> Self {
        Self { positions: grid }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: SurfaceId) -> Position {
        self.positions[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    /// Exchange the positions of two keys.
    pub fn swap(&mut self, a: SurfaceId, b: SurfaceId) {
        self.positions.swap(a.index(), b.index());
    }

    /// Key `i` takes the position previously held by key `N-1-i`.
    pub fn reverse(&mut self) {
        self.positions.reverse();
    }

    /// Put every key back on its own grid slot.
    pub fn reset(&mut self, grid: [Position; KEY_COUNT]) {
        self.positions = grid;
    }

    /// True when the table holds each of `slots` exactly once.
    #[must_use]
    pub fn is_permutation_of(&self, slots: &[Position]) -> bool {
        if slots.len() != KEY_COUNT {
            return false;
        }
        let expected: HashSet<_> = slots.iter().collect();
        let actual: HashSet<_> = self.positions.iter().collect();
        expected.len() == KEY_COUNT && actual == expected
    }

    /// Iterate `(id, position)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, Position)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (SurfaceId(i), *p))
    }
}
