#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_COLS: usize = 14;
pub const BOARD_ROWS: usize = 24;

// Lookahead depth of the next-piece queue
pub const QUEUE_LOOKAHEAD: usize = 1;

// Line clear scoring, indexed by cleared-row count (multiplied by level + 1)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

// Spin bonuses, indexed by cleared-row count. The table has no entry for a
// four-row spin clear; score lookups fall back to LINE_SCORES there.
pub const SPIN_SCORES: [u32; 4] = [0, 800, 1200, 1600];

// Spin that clears no lines still pays out
pub const SPIN_NO_LINES_SCORE: u32 = 400;

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;

// Gravity timing
pub const INITIAL_DROP_INTERVAL_MS: f32 = 1000.0;

/// Automatic drop interval for a given level. Applied whenever the level
/// increases; the session starts at `INITIAL_DROP_INTERVAL_MS`.
#[must_use]
pub fn drop_interval_ms(level: u32) -> f32 {
    1000.0 / (level + 1) as f32 + 200.0
}
