//! System-wide constants for the VCU workspace.
//!
//! Single source of truth for tick periods, counter ceilings, and default
//! timing constants. Imported by all crates — no duplication permitted.

use static_assertions::const_assert_eq;

/// Fast sampling tick period in microseconds (edge-triggered logic).
pub const FAST_TICK_US: u64 = 500;

/// Slow tick period in milliseconds (fault counters, timer countdowns).
pub const SLOW_TICK_MS: u64 = 500;

/// Number of fast ticks per slow tick.
pub const FAST_TICKS_PER_SLOW: u32 = 1000;

// The slow tick must be an exact multiple of the fast tick.
const_assert_eq!(FAST_TICK_US * FAST_TICKS_PER_SLOW as u64, SLOW_TICK_MS * 1000);

/// Saturation ceiling for the speed fault counters.
pub const FAULT_COUNTER_CEILING: u32 = 40;

/// Comparator disagreement streak that triggers channel masking.
pub const DISAGREE_STREAK_LIMIT: u32 = 10;

/// Number of task-linked-activity input classes.
pub const TLA_CLASS_COUNT: usize = 8;

/// Primary thermometer-coded speed bus lines.
pub const SPEED_BUS_LINES: usize = 8;

/// Number of in-range speed bands (between under- and over-range).
pub const IN_RANGE_BANDS: usize = 7;

/// Number of independent speed fault classes.
pub const SPEED_FAULT_CLASSES: usize = 4;

/// Default 1st-stage warning duration T2 [s].
pub const T2_S: f64 = 5.0;

/// Default 2nd-stage warning duration T3 [s].
pub const T3_S: f64 = 5.0;

/// Default train-stopped dwell duration T4 [s].
pub const T4_S: f64 = 3.0;

/// Vigilance-push hold duration for the NoWarning fast-path [s].
pub const VPB_HELD_S: f64 = 1.5;

/// Cab-active hold duration for the penalty-state release [s].
pub const CAB_HELD_S: f64 = 2.0;

/// Sustained speed-failure window for the braking bypass [s].
pub const SPD_FAILURE_BYPASS_S: f64 = 45.0;

/// Convert a duration in seconds into a count of slow ticks (rounded).
#[inline]
pub const fn slow_ticks(seconds: f64) -> u32 {
    (seconds * 1000.0 / SLOW_TICK_MS as f64 + 0.5) as u32
}

/// Convert a duration in seconds into a count of fast ticks (rounded).
#[inline]
pub const fn fast_ticks(seconds: f64) -> u32 {
    (seconds * 1_000_000.0 / FAST_TICK_US as f64 + 0.5) as u32
}
