//! Minor-fault report bits and speed fault class indexing.
//!
//! Faults are pure state, never panics: each bit is raised by the owning
//! subsystem and consumed by the external diagnostic aggregator.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Aggregated minor-fault report published every tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct MinorFault: u16 {
        /// Cab-active pair has a masked channel.
        const CH_CAB_MASKED        = 1 << 0;
        /// Vigilance-push pair has a masked channel.
        const CH_VIGILANCE_MASKED  = 1 << 1;
        /// Zero-speed pair has a masked channel.
        const CH_ZERO_SPEED_MASKED = 1 << 2;
        /// Any TLA line pair has a masked channel.
        const CH_TLA_MASKED        = 1 << 3;
        /// Under-range speed fault latched.
        const SPD_UNDER_RANGE      = 1 << 4;
        /// Over-range speed fault latched.
        const SPD_OVER_RANGE       = 1 << 5;
        /// Invalid-code speed fault latched.
        const SPD_INVALID_CODE     = 1 << 6;
        /// 25-km-band speed fault latched.
        const SPD_25KM_BAND        = 1 << 7;
    }
}

/// The four independently filtered speed fault classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaultClass {
    /// Decode == UnderRange.
    UnderRange = 0,
    /// Decode == OverRange.
    OverRange = 1,
    /// Decode == Invalid.
    InvalidCode = 2,
    /// Auxiliary 25-km-band check failed.
    Band25Km = 3,
}

impl FaultClass {
    /// All classes in counter-slot order.
    pub const ALL: [FaultClass; 4] = [
        Self::UnderRange,
        Self::OverRange,
        Self::InvalidCode,
        Self::Band25Km,
    ];

    /// The minor-fault bit raised when this class latches.
    #[inline]
    pub const fn minor_fault_bit(&self) -> MinorFault {
        match self {
            Self::UnderRange => MinorFault::SPD_UNDER_RANGE,
            Self::OverRange => MinorFault::SPD_OVER_RANGE,
            Self::InvalidCode => MinorFault::SPD_INVALID_CODE,
            Self::Band25Km => MinorFault::SPD_25KM_BAND,
        }
    }
}
