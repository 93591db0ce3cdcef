//! VCU Common Library
//!
//! Shared types for the Vigilance Control Unit workspace: state enums,
//! system-wide constants, fault report bits, configuration structs, and the
//! per-tick signal contract between the timing core and its collaborators.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide numeric constants (tick periods, ceilings)
//! - [`state`] - State machine enums (vigilance FSM, comparator, speed bands)
//! - [`fault`] - Minor-fault report bitflags and fault class indexing
//! - [`config`] - Serde configuration structs with validation
//! - [`io`] - Per-tick input/output signal contract

pub mod config;
pub mod consts;
pub mod fault;
pub mod io;
pub mod state;
