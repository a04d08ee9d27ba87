#![forbid(unsafe_code)]

//! Build-time constants.
//!
//! Nothing here is read from the environment or the command line. The
//! binary always plays with [`GameConfig::default`]; tests build variants
//! (a zero shuffle budget, a shorter flash) through struct update syntax.

use std::time::Duration;

/// Number of keys on screen.
pub const KEY_COUNT: usize = GRID_ROWS * GRID_COLS;
pub const GRID_ROWS: usize = 4;
pub const GRID_COLS: usize = 2;

/// Side of each square key, in logical pixels.
pub const WINDOW_SIZE: u32 = 100;
pub const MARGIN_X: u32 = 200;
pub const MARGIN_Y: u32 = 200;

/// Pattern durations.
pub const CROSS_COLUMN_DURATION: Duration = Duration::from_millis(130);
pub const HALF_SWAP_DURATION: Duration = Duration::from_millis(190);
pub const REVERSAL_DURATION: Duration = Duration::from_millis(210);

/// Pause after the longest pattern before the next one starts.
pub const PATTERN_WAIT: Duration = Duration::from_millis(150);

/// Number of pattern applications per game.
pub const SHUFFLE_BUDGET: u32 = 32;

/// Reposition events per animated move (plus the starting frame).
pub const ANIMATION_STEPS: u32 = 20;

/// Delay between startup and the target flash.
pub const HIGHLIGHT_DELAY: Duration = Duration::from_millis(500);
/// How long the target stays highlighted.
pub const HIGHLIGHT_HOLD: Duration = Duration::from_millis(500);
/// Delay between the flash clearing and the first shuffle.
pub const SHUFFLE_LEAD_IN: Duration = Duration::ZERO;

/// Grace period handed to the punitive action.
pub const SHUTDOWN_DELAY: Duration = Duration::from_secs(3);

/// Tunables for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub window_size: u32,
    pub margin_x: u32,
    pub margin_y: u32,
    pub shuffle_budget: u32,
    pub animation_steps: u32,
    pub pattern_wait: Duration,
    pub highlight_delay: Duration,
    pub highlight_hold: Duration,
    pub shuffle_lead_in: Duration,
    pub shutdown_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            margin_x: MARGIN_X,
            margin_y: MARGIN_Y,
            shuffle_budget: SHUFFLE_BUDGET,
            animation_steps: ANIMATION_STEPS,
            pattern_wait: PATTERN_WAIT,
            highlight_delay: HIGHLIGHT_DELAY,
            highlight_hold: HIGHLIGHT_HOLD,
            shuffle_lead_in: SHUFFLE_LEAD_IN,
            shutdown_delay: SHUTDOWN_DELAY,
        }
    }
}

impl GameConfig {
    /// Longest animation any single pattern runs.
    #[must_use]
    pub fn longest_pattern(&self) -> Duration {
        CROSS_COLUMN_DURATION
            .max(HALF_SWAP_DURATION)
            .max(REVERSAL_DURATION)
    }

    /// Spacing between successive shuffles.
    ///
    /// Always at least [`Self::longest_pattern`], so a pattern never starts
    /// while the previous one is still moving keys.
    #[must_use]
    pub fn shuffle_interval(&self) -> Duration {
        self.pattern_wait + self.longest_pattern()
    }

    /// Time from startup until the first shuffle.
    #[must_use]
    pub fn shuffle_start(&self) -> Duration {
        self.highlight_delay + self.highlight_hold + self.shuffle_lead_in
    }
}
