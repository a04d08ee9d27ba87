//! Property-based invariant tests for grid layout and interpolation.
//!
//! ## Invariants
//!
//! 1. Every slot is distinct for any positive window size
//! 2. Even slots share one x, odd slots share another
//! 3. Rows are evenly spaced by `window + margin_y / 3`
//! 4. Interpolation hits both endpoints exactly
//! 5. Interpolated points stay inside the bounding box of the endpoints

use limbo_core::geometry::{Position, compute_grid};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_screen() -> impl Strategy<Value = (u32, u32)> {
    (200u32..=7680, 200u32..=4320)
}

fn arb_layout() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..=400, 0u32..=600, 0u32..=600)
}

fn arb_position() -> impl Strategy<Value = Position> {
    (-5000i32..5000, -5000i32..5000).prop_map(|(x, y)| Position::new(x, y))
}

// ── 1-3. Grid shape ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn slots_are_distinct((w, h) in arb_screen(), (win, mx, my) in arb_layout()) {
        let grid = compute_grid(w, h, win, mx, my);
        for i in 0..grid.len() {
            for j in (i + 1)..grid.len() {
                prop_assert_ne!(grid[i], grid[j], "slots {} and {}", i, j);
            }
        }
    }

    #[test]
    fn columns_follow_parity((w, h) in arb_screen(), (win, mx, my) in arb_layout()) {
        let grid = compute_grid(w, h, win, mx, my);
        for (idx, slot) in grid.iter().enumerate() {
            let anchor = grid[idx % 2];
            prop_assert_eq!(slot.x, anchor.x);
        }
        prop_assert_eq!(grid[1].x - grid[0].x, (win + mx / 2) as i32);
    }

    #[test]
    fn rows_are_evenly_spaced((w, h) in arb_screen(), (win, mx, my) in arb_layout()) {
        let grid = compute_grid(w, h, win, mx, my);
        let step = (win + my / 3) as i32;
        for row in 1..4 {
            prop_assert_eq!(grid[row * 2].y - grid[(row - 1) * 2].y, step);
        }
    }
}

// ── 4-5. Interpolation ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn lerp_hits_endpoints(a in arb_position(), b in arb_position(), steps in 1u32..64) {
        prop_assert_eq!(a.lerp(b, 0, steps), a);
        prop_assert_eq!(a.lerp(b, steps, steps), b);
    }

    #[test]
    fn lerp_stays_in_bounds(
        a in arb_position(),
        b in arb_position(),
        steps in 1u32..64,
        step in 0u32..64,
    ) {
        let p = a.lerp(b, step.min(steps), steps);
        prop_assert!(p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x));
        prop_assert!(p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y));
    }
}
