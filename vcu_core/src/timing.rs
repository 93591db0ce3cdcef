//! Timing subsystem root.
//!
//! The central vigilance FSM, task-linked-activity event management, and
//! the state-derived output signals.

pub mod fsm;
pub mod outputs;
pub mod tla;
