//! Speed subsystem root.
//!
//! Thermometer-bus decoding and saturating fault persistence filtering.

pub mod decode;
pub mod filter;
