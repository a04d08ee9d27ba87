#![forbid(unsafe_code)]

//! Seed selection for reproducible test runs.
//!
//! Tests pass a default seed; `LIMBO_TEST_SEED`, `LIMBO_SEED`, or `E2E_SEED`
//! override it so a failing run can be replayed exactly.

/// Choose a seed from environment or use the provided default.
pub fn fixture_seed(default_seed: u64) -> u64 {
    env_u64("LIMBO_TEST_SEED")
        .or_else(|| env_u64("LIMBO_SEED"))
        .or_else(|| env_u64("E2E_SEED"))
        .unwrap_or(default_seed)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_keys_parse_to_none() {
        assert_eq!(env_u64("__LIMBO_NEVER_SET__"), None);
    }
}
