#![forbid(unsafe_code)]

//! Key surfaces as cell blocks.
//!
//! [`Canvas`] keeps the live keys in stacking order (later created is on
//! top), answers hit tests topmost-first, and redraws the whole screen on
//! every change. Eight small blocks make a full redraw cheap.

use std::io::{self, Write};

use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};
use crossterm::{cursor, queue, terminal};
use limbo_core::color::Rgb;
use limbo_core::geometry::Position;
use limbo_core::surface::SurfaceId;

use crate::error::TtyError;
use crate::scale::{CellRect, face_rect, key_rect};

/// Frame color around each key's face.
pub const CHROME: Rgb = Rgb::new(0xd9, 0xd9, 0xd9);

/// One live key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub id: SurfaceId,
    pub size: u32,
    pub position: Position,
    pub color: Rgb,
}

impl Block {
    #[must_use]
    pub fn outer(&self) -> CellRect {
        key_rect(self.position, self.size)
    }

    #[must_use]
    pub fn face(&self) -> CellRect {
        face_rect(self.position, self.size)
    }
}

/// Live keys in stacking order.
#[derive(Debug, Default)]
pub struct Canvas {
    blocks: Vec<Block>,
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    fn get_mut(&mut self, id: SurfaceId) -> Result<&mut Block, TtyError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(TtyError::UnknownSurface(id))
    }

    pub fn insert(&mut self, block: Block) -> Result<(), TtyError> {
        if self.get(block.id).is_some() {
            return Err(TtyError::Duplicate(block.id));
        }
        self.blocks.push(block);
        Ok(())
    }

    pub fn set_color(&mut self, id: SurfaceId, color: Rgb) -> Result<(), TtyError> {
        self.get_mut(id)?.color = color;
        Ok(())
    }

    pub fn set_position(&mut self, id: SurfaceId, position: Position) -> Result<(), TtyError> {
        self.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn remove(&mut self, id: SurfaceId) -> Result<(), TtyError> {
        let idx = self
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or(TtyError::UnknownSurface(id))?;
        self.blocks.remove(idx);
        Ok(())
    }

    /// Topmost key covering the cell, if any.
    #[must_use]
    pub fn hit_test(&self, col: u16, row: u16) -> Option<SurfaceId> {
        let (col, row) = (i32::from(col), i32::from(row));
        self.blocks
            .iter()
            .rev()
            .find(|b| b.outer().contains(col, row))
            .map(|b| b.id)
    }

    /// Clear the screen and draw every key, bottom to top.
    pub fn draw<W: Write>(&self, out: &mut W, cols: u16, rows: u16) -> io::Result<()> {
        queue!(out, ResetColor, terminal::Clear(terminal::ClearType::All))?;
        for block in &self.blocks {
            fill(out, block.outer(), CHROME, cols, rows)?;
            fill(out, block.face(), block.color, cols, rows)?;
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

fn fill<W: Write>(out: &mut W, rect: CellRect, color: Rgb, cols: u16, rows: u16) -> io::Result<()> {
    let Some(rect) = rect.clip(cols, rows) else {
        return Ok(());
    };
    let blank = " ".repeat(rect.width as usize);
    queue!(out, SetBackgroundColor(to_color(color)))?;
    for dy in 0..rect.height {
        queue!(
            out,
            cursor::MoveTo(rect.col as u16, (rect.row as u32 + dy) as u16),
            Print(&blank)
        )?;
    }
    Ok(())
}

pub(crate) fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}
