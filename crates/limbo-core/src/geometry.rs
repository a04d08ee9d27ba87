#![forbid(unsafe_code)]

//! Geometric primitives and the fixed key grid.

use crate::config::{GRID_COLS, GRID_ROWS, KEY_COUNT};

/// A point in screen coordinates (origin at top-left, may be negative when
/// the grid does not fit the screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `self` toward `end` at `step / steps`.
    ///
    /// Coordinates are rounded to the nearest integer. `step >= steps` (and a
    /// zero `steps`) yields `end` exactly.
    #[must_use]
    pub fn lerp(self, end: Position, step: u32, steps: u32) -> Position {
        if steps == 0 || step >= steps {
            return end;
        }
        let t = f64::from(step) / f64::from(steps);
        let axis = |from: i32, to: i32| -> i32 {
            let delta = f64::from(to) - f64::from(from);
            from + (delta * t).round() as i32
        };
        Position::new(axis(self.x, end.x), axis(self.y, end.y))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height of a screen, in the host's logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Compute the canonical 4-row by 2-column key grid, centered on screen.
///
/// Slot `row * 2 + col` is at
/// `left + col * (window + margin_x / 2)`, `top + row * (window + margin_y / 3)`,
/// where the block `(2 * window + margin_x) x (4 * window + margin_y)` is
/// centered with floor division. Even slots form the left column, odd slots
/// the right column.
#[must_use]
pub fn compute_grid(
    screen_w: u32,
    screen_h: u32,
    window_size: u32,
    margin_x: u32,
    margin_y: u32,
) -> [Position; KEY_COUNT] {
    let window = window_size as i32;
    let rect_width = GRID_COLS as i32 * window + margin_x as i32;
    let rect_height = GRID_ROWS as i32 * window + margin_y as i32;

    let (cx, cy) = ((screen_w / 2) as i32, (screen_h / 2) as i32);
    let left = cx - rect_width.div_euclid(2);
    let top = cy - rect_height.div_euclid(2);

    let col_step = window + margin_x as i32 / 2;
    let row_step = window + margin_y as i32 / 3;

    let mut slots = [Position::default(); KEY_COUNT];
    for (idx, slot) in slots.iter_mut().enumerate() {
        let row = (idx / GRID_COLS) as i32;
        let col = column_of(idx) as i32;
        *slot = Position::new(left + col * col_step, top + row * row_step);
    }
    slots
}

/// Column (0 or 1) a grid slot index belongs to.
#[inline]
#[must_use]
pub const fn column_of(index: usize) -> usize {
    index % GRID_COLS
}
