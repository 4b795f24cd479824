//! The spaced-repetition ladder.
//!
//! Each position holds the number of days until the next review. Position 0
//! is the first re-exposure after initial study; the last position is the
//! steady-state interval and repeats once reached.

/// Days until the next review at each ladder position.
pub const INTERVAL_TABLE: [u32; 5] = [4, 7, 14, 28, 40];

/// Index of the terminal rung.
pub const TERMINAL_POSITION: usize = INTERVAL_TABLE.len() - 1;

/// Days scheduled at `position`. Positions past the end read the terminal rung.
pub fn interval_days(position: usize) -> u32 {
    INTERVAL_TABLE[position.min(TERMINAL_POSITION)]
}

/// Position reached after one more completion; never past the last rung.
pub fn next_position(position: usize) -> usize {
    (position + 1).min(TERMINAL_POSITION)
}

pub fn is_terminal(position: usize) -> bool {
    position >= TERMINAL_POSITION
}
