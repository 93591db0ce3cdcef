//! # VCU Timing Core Library
//!
//! Deterministic vigilance control core for rail vehicles. Provides the
//! three safety subsystems behind the driver vigilance function:
//!
//! 1. **Comparators** — dual-channel qualification of every redundant
//!    digital input pair, with self-test-gated channel masking.
//! 2. **Speed monitor** — thermometer-coded speed bus decoding with four
//!    saturating fault-persistence counters and fail-safe band forcing.
//! 3. **Vigilance FSM** — the central 9-state escalation machine driving
//!    warning light, buzzer and penalty brake, with task-linked-activity
//!    event management.
//!
//! ## Tick Model
//!
//! Everything advances on a logical fast tick (500 µs); slow-tick work
//! (fault counters, timer countdowns) runs every 1000th fast tick. The
//! core performs no I/O and no heap allocation after construction: one
//! input snapshot in, one output snapshot out, per tick.

pub mod comparator;
pub mod config;
pub mod cycle;
pub mod speed;
pub mod timing;
