#![forbid(unsafe_code)]

//! Key colors.
//!
//! Keys start [`NEUTRAL`], the target flashes [`HIGHLIGHT`], and once the
//! shuffle ends every key is repainted with a distinct [`PALETTE`] entry.

use std::fmt;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Human name for palette and chrome colors, `None` for anything else.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        NAMED.iter().find(|(c, _)| *c == self).map(|(_, n)| *n)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }
}

pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
pub const ORANGE: Rgb = Rgb::new(0xff, 0xa5, 0x00);
pub const YELLOW: Rgb = Rgb::new(0xff, 0xff, 0x00);
pub const GREEN: Rgb = Rgb::new(0x00, 0x80, 0x00);
pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
pub const INDIGO: Rgb = Rgb::new(0x4b, 0x00, 0x82);
pub const VIOLET: Rgb = Rgb::new(0xee, 0x82, 0xee);
pub const PINK: Rgb = Rgb::new(0xff, 0xc0, 0xcb);
pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

/// Color of every key before the reveal.
pub const NEUTRAL: Rgb = WHITE;

/// Color of the target key during the opening flash.
pub const HIGHLIGHT: Rgb = GREEN;

/// Reveal palette; one entry per key, no repeats.
pub const PALETTE: [Rgb; 8] = [RED, ORANGE, YELLOW, GREEN, BLUE, INDIGO, VIOLET, PINK];

const NAMED: [(Rgb, &str); 9] = [
    (RED, "red"),
    (ORANGE, "orange"),
    (YELLOW, "yellow"),
    (GREEN, "green"),
    (BLUE, "blue"),
    (INDIGO, "indigo"),
    (VIOLET, "violet"),
    (PINK, "pink"),
    (WHITE, "white"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_has_no_duplicates() {
        let unique: HashSet<_> = PALETTE.iter().collect();
        assert_eq!(unique.len(), PALETTE.len());
    }

    #[test]
    fn neutral_is_not_in_palette() {
        assert!(!PALETTE.contains(&NEUTRAL));
    }

    #[test]
    fn display_uses_names() {
        assert_eq!(RED.to_string(), "red");
        assert_eq!(NEUTRAL.to_string(), "white");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }
}
