#![forbid(unsafe_code)]

//! RNG seeding.
//!
//! `LIMBO_SEED` (or `E2E_SEED`) pins the seed so a session can be replayed;
//! otherwise the RNG is seeded from the OS. Unparseable values are ignored.

use rand::SeedableRng;
use rand::rngs::StdRng;

pub const SEED_ENV: &str = "LIMBO_SEED";
pub const E2E_SEED_ENV: &str = "E2E_SEED";

/// Decimal or `0x`-prefixed hex.
pub fn parse_seed(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Seed pinned by the environment, if any.
pub fn from_env() -> Option<u64> {
    [SEED_ENV, E2E_SEED_ENV]
        .into_iter()
        .find_map(|key| std::env::var(key).ok().as_deref().and_then(parse_seed))
}

/// The session RNG and the pinned seed it was built from.
pub fn rng() -> (StdRng, Option<u64>) {
    match from_env() {
        Some(seed) => (StdRng::seed_from_u64(seed), Some(seed)),
        None => (StdRng::from_os_rng(), None),
    }
}
