#![forbid(unsafe_code)]

//! Logical pixels to terminal cells.
//!
//! The game lays keys out in pixels. A terminal cell is roughly twice as tall
//! as it is wide, so one column covers 10 px and one row 20 px. A 100 px key
//! becomes a 10x5 cell block.

use limbo_core::geometry::{Position, Size};

/// Pixels per terminal column.
pub const PX_PER_COL: u32 = 10;

/// Pixels per terminal row.
pub const PX_PER_ROW: u32 = 20;

/// Offset of the colored face inside a key, in pixels.
pub const FACE_INSET: u32 = 20;

/// A rectangle of cells. Coordinates may be negative or past the terminal
/// edge; [`CellRect::clip`] trims it to what can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub col: i32,
    pub row: i32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    #[must_use]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.col
            && row >= self.row
            && i64::from(col) < i64::from(self.col) + i64::from(self.width)
            && i64::from(row) < i64::from(self.row) + i64::from(self.height)
    }

    /// Intersection with a `cols` x `rows` terminal, or `None` if nothing is
    /// visible.
    #[must_use]
    pub fn clip(&self, cols: u16, rows: u16) -> Option<CellRect> {
        let left = self.col.max(0);
        let top = self.row.max(0);
        let right = (i64::from(self.col) + i64::from(self.width)).min(i64::from(cols));
        let bottom = (i64::from(self.row) + i64::from(self.height)).min(i64::from(rows));
        if right <= i64::from(left) || bottom <= i64::from(top) {
            return None;
        }
        Some(CellRect {
            col: left,
            row: top,
            width: (right - i64::from(left)) as u32,
            height: (bottom - i64::from(top)) as u32,
        })
    }
}

/// Cell containing the pixel `position`.
#[must_use]
pub fn to_cell(position: Position) -> (i32, i32) {
    (
        position.x.div_euclid(PX_PER_COL as i32),
        position.y.div_euclid(PX_PER_ROW as i32),
    )
}

/// Screen size in pixels for a `cols` x `rows` terminal.
#[must_use]
pub fn screen_px(cols: u16, rows: u16) -> Size {
    Size::new(u32::from(cols) * PX_PER_COL, u32::from(rows) * PX_PER_ROW)
}

/// Cells covered by a square key of side `size` px at `position`.
#[must_use]
pub fn key_rect(position: Position, size: u32) -> CellRect {
    let (col, row) = to_cell(position);
    CellRect {
        col,
        row,
        width: (size / PX_PER_COL).max(1),
        height: (size / PX_PER_ROW).max(1),
    }
}

/// Cells covered by the colored face of a key, inset [`FACE_INSET`] px on
/// every side. Falls back to the whole key when it is too small to inset.
#[must_use]
pub fn face_rect(position: Position, size: u32) -> CellRect {
    let outer = key_rect(position, size);
    let dx = FACE_INSET / PX_PER_COL;
    let dy = FACE_INSET / PX_PER_ROW;
    if outer.width <= 2 * dx || outer.height <= 2 * dy {
        return outer;
    }
    CellRect {
        col: outer.col + dx as i32,
        row: outer.row + dy as i32,
        width: outer.width - 2 * dx,
        height: outer.height - 2 * dy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_ten_by_five_cells() {
        let r = key_rect(Position::new(760, 240), 100);
        assert_eq!(
            r,
            CellRect {
                col: 76,
                row: 12,
                width: 10,
                height: 5
            }
        );
    }

    #[test]
    fn face_is_inset() {
        let r = face_rect(Position::new(760, 240), 100);
        assert_eq!(
            r,
            CellRect {
                col: 78,
                row: 13,
                width: 6,
                height: 3
            }
        );
    }

    #[test]
    fn tiny_key_has_no_inset() {
        let p = Position::new(0, 0);
        assert_eq!(face_rect(p, 30), key_rect(p, 30));
    }

    #[test]
    fn negative_positions_floor() {
        assert_eq!(to_cell(Position::new(-1, -1)), (-1, -1));
        assert_eq!(to_cell(Position::new(-10, -20)), (-1, -1));
        assert_eq!(to_cell(Position::new(9, 19)), (0, 0));
    }

    #[test]
    fn screen_px_scales_cells() {
        assert_eq!(screen_px(192, 54), Size::new(1920, 1080));
    }

    #[test]
    fn clip_trims_to_terminal() {
        let r = CellRect {
            col: -3,
            row: 2,
            width: 10,
            height: 5,
        };
        assert_eq!(
            r.clip(80, 4),
            Some(CellRect {
                col: 0,
                row: 2,
                width: 7,
                height: 2
            })
        );
        let off = CellRect {
            col: 90,
            row: 0,
            width: 10,
            height: 5,
        };
        assert_eq!(off.clip(80, 24), None);
    }

    #[test]
    fn contains_is_half_open() {
        let r = key_rect(Position::new(0, 0), 100);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 4));
        assert!(!r.contains(10, 4));
        assert!(!r.contains(9, 5));
        assert!(!r.contains(-1, 0));
    }
}
