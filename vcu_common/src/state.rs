//! State machine enums for the vigilance timing core.
//!
//! All enums use `#[repr(u8)]` for compact memory layout and diagnostic
//! reporting. Includes the central vigilance FSM state, the external
//! operating mode, decoded speed bands, comparator phases, and the TLA
//! input classes.

use serde::{Deserialize, Serialize};

// ─── Vigilance FSM State ────────────────────────────────────────────

/// Central vigilance timing state.
///
/// `Idle` is the reset state and exits unconditionally on the first fast
/// tick. The Normal-mode escalation path runs `NoWarning` →
/// `FirstStageWarning` → `SecondStageWarning` → `BrakeApplicationNoReset`
/// → `TrainStoppedNoReset` → `PenaltyNormal`. `Depressed` and `Suppressed`
/// are the terminal/parked states of the respective operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VigilanceState {
    /// Reset state, left on the first fast tick.
    Idle = 0,
    /// Vigilance timer running, no warning active.
    NoWarning = 1,
    /// 1st-stage warning (light solid), T2 running.
    FirstStageWarning = 2,
    /// 2nd-stage warning (light flashing, buzzer), T3 running.
    SecondStageWarning = 3,
    /// Penalty brake applied, acknowledge locked out.
    BrakeApplicationNoReset = 4,
    /// Standstill confirmed, T4 dwell before release.
    TrainStoppedNoReset = 5,
    /// Fully escalated penalty state awaiting power-off release.
    PenaltyNormal = 6,
    /// Depressed-mode terminal state (light permanent, reset allowed).
    Depressed = 7,
    /// Parked while operating mode is Suppressed.
    Suppressed = 8,
}

impl VigilanceState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::NoWarning),
            2 => Some(Self::FirstStageWarning),
            3 => Some(Self::SecondStageWarning),
            4 => Some(Self::BrakeApplicationNoReset),
            5 => Some(Self::TrainStoppedNoReset),
            6 => Some(Self::PenaltyNormal),
            7 => Some(Self::Depressed),
            8 => Some(Self::Suppressed),
            _ => None,
        }
    }

    /// Warning-phase states: the active timer may be reset by TLA events
    /// and a vigilance push acknowledges back to `NoWarning`.
    #[inline]
    pub const fn is_warning_phase(&self) -> bool {
        matches!(
            self,
            Self::NoWarning | Self::FirstStageWarning | Self::SecondStageWarning
        )
    }

    /// Penalty-phase states: brake applied, acknowledge locked out.
    #[inline]
    pub const fn is_penalty_phase(&self) -> bool {
        matches!(
            self,
            Self::BrakeApplicationNoReset | Self::TrainStoppedNoReset | Self::PenaltyNormal
        )
    }
}

impl Default for VigilanceState {
    fn default() -> Self {
        Self::Idle
    }
}

// ─── Operating Mode (external) ──────────────────────────────────────

/// Top-level operating mode, produced by the external mode-selector FSM.
///
/// Consumed, never produced, by the timing core. Selects the active
/// timing sub-machine and gates the TLA counter restore policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperatingMode {
    /// Full escalation path active.
    Normal = 0,
    /// Vigilance suppressed, timers parked.
    Suppressed = 1,
    /// Reduced two-stage path, no penalty brake.
    Depressed = 2,
    /// Commissioning/test — timing core behaves as in Normal.
    Test = 3,
}

impl OperatingMode {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Suppressed),
            2 => Some(Self::Depressed),
            3 => Some(Self::Test),
            _ => None,
        }
    }
}

impl Default for OperatingMode {
    fn default() -> Self {
        Self::Normal
    }
}

// ─── Speed Band ─────────────────────────────────────────────────────

/// Decoded speed band from the thermometer-coded bus.
///
/// The 8 primary lines carry a contiguous run of 1s from bit 0; the run
/// length selects `UnderRange` (0 ones) through `OverRange` (8 ones).
/// A hole in the run decodes as `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpeedBand {
    /// No lines asserted — sensor under range.
    UnderRange = 0,
    /// 0–3 km/h.
    B0To3 = 1,
    /// 3–23 km/h.
    B3To23 = 2,
    /// 23–25 km/h.
    B23To25 = 3,
    /// 25–75 km/h.
    B25To75 = 4,
    /// 75–90 km/h.
    B75To90 = 5,
    /// 90–110 km/h.
    B90To110 = 6,
    /// Above 110 km/h — the forced safe-default band.
    Above110 = 7,
    /// All lines asserted — sensor over range.
    OverRange = 8,
    /// Non-contiguous code.
    Invalid = 9,
}

impl SpeedBand {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::UnderRange),
            1 => Some(Self::B0To3),
            2 => Some(Self::B3To23),
            3 => Some(Self::B23To25),
            4 => Some(Self::B25To75),
            5 => Some(Self::B75To90),
            6 => Some(Self::B90To110),
            7 => Some(Self::Above110),
            8 => Some(Self::OverRange),
            9 => Some(Self::Invalid),
            _ => None,
        }
    }

    /// True for the 7 in-range bands (valid code, sensor in range).
    #[inline]
    pub const fn is_in_range(&self) -> bool {
        let v = *self as u8;
        v >= 1 && v <= 7
    }

    /// True for any primary decode fault (under/over/invalid).
    #[inline]
    pub const fn is_fault_code(&self) -> bool {
        matches!(self, Self::UnderRange | Self::OverRange | Self::Invalid)
    }

    /// True when the band lies entirely below 25 km/h.
    ///
    /// `UnderRange` counts as below: the auxiliary 25-km lines must still
    /// report "below" for a train that is not moving.
    #[inline]
    pub const fn below_25(&self) -> bool {
        matches!(
            self,
            Self::UnderRange | Self::B0To3 | Self::B3To23 | Self::B23To25
        )
    }

    /// Index into the T1 schedule for in-range bands (0..=6).
    #[inline]
    pub const fn schedule_index(&self) -> Option<usize> {
        if self.is_in_range() {
            Some(*self as usize - 1)
        } else {
            None
        }
    }
}

impl Default for SpeedBand {
    fn default() -> Self {
        Self::UnderRange
    }
}

// ─── Comparator Phase ───────────────────────────────────────────────

/// Phase of the dual-channel comparator state machine (one per input pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ComparatorPhase {
    /// Channels agree, qualified output follows them.
    Comparing = 0,
    /// Disagreement seen, holding the last latched value.
    DelayCheck = 1,
    /// Disagreement confirmed, waiting for the next self-test boundary.
    AwaitSelfTest = 2,
    /// One or both channels isolated — sticky until system reset.
    Masked = 3,
}

impl ComparatorPhase {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Comparing),
            1 => Some(Self::DelayCheck),
            2 => Some(Self::AwaitSelfTest),
            3 => Some(Self::Masked),
            _ => None,
        }
    }
}

impl Default for ComparatorPhase {
    fn default() -> Self {
        Self::Comparing
    }
}

// ─── TLA Input Class ────────────────────────────────────────────────

/// Task-linked-activity input classes (8 slots).
///
/// Power-demand and brake-demand movements of the motor controller are
/// deliberately one class — they share a consecutive-event slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TlaClass {
    /// Motor controller power/brake demand movement (±12.5%).
    McDemand = 0,
    /// Horn, low tone.
    HornLow = 1,
    /// Horn, high tone.
    HornHigh = 2,
    /// Headlight switch.
    Headlight = 3,
    /// Wiper/washer control.
    WiperWasher = 4,
    /// Bypass acknowledge button (unlimited consecutive events).
    BypassAck = 5,
    /// Spare input.
    Spare1 = 6,
    /// Spare input.
    Spare2 = 7,
}

impl TlaClass {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::McDemand),
            1 => Some(Self::HornLow),
            2 => Some(Self::HornHigh),
            3 => Some(Self::Headlight),
            4 => Some(Self::WiperWasher),
            5 => Some(Self::BypassAck),
            6 => Some(Self::Spare1),
            7 => Some(Self::Spare2),
            _ => None,
        }
    }

    /// All classes in slot order.
    pub const ALL: [TlaClass; 8] = [
        Self::McDemand,
        Self::HornLow,
        Self::HornHigh,
        Self::Headlight,
        Self::WiperWasher,
        Self::BypassAck,
        Self::Spare1,
        Self::Spare2,
    ];
}

// ─── Warning Light ──────────────────────────────────────────────────

/// Derived warning light command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WarningLight {
    /// Light off.
    Off = 0,
    /// Solid — 1st-stage warning or depressed terminal state.
    Solid = 1,
    /// Flashing — 2nd-stage warning.
    Flashing = 2,
}

impl Default for WarningLight {
    fn default() -> Self {
        Self::Off
    }
}
