#![forbid(unsafe_code)]

//! Surface identities.

use std::fmt;

use crate::config::KEY_COUNT;

/// Stable identity of one key, `0..KEY_COUNT`.
///
/// The id is also the key's slot in the canonical grid and its index in the
/// position table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

impl SurfaceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// All ids in ascending order.
    pub fn all() -> impl Iterator<Item = SurfaceId> {
        (0..KEY_COUNT).map(SurfaceId)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}

impl From<usize> for SurfaceId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_key() {
        let ids: Vec<_> = SurfaceId::all().map(SurfaceId::index).collect();
        assert_eq!(ids, (0..KEY_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn display() {
        assert_eq!(SurfaceId(5).to_string(), "key#5");
    }
}
