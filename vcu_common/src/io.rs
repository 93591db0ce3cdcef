//! Per-tick signal contract at the timing-core boundary.
//!
//! The core is not a network or file protocol system: its external
//! interface is one input snapshot and one output snapshot per fast tick.
//! Every qualified/latched signal is queryable at any tick boundary.

use serde::{Deserialize, Serialize};

use crate::consts::TLA_CLASS_COUNT;
use crate::fault::MinorFault;
use crate::state::{OperatingMode, SpeedBand, VigilanceState, WarningLight};

/// One redundant input pair, channel 1 and channel 2 raw levels
/// (post external debounce/self-test-pulse filtering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelSample {
    pub ch1: bool,
    pub ch2: bool,
}

impl ChannelSample {
    /// Both channels at the same level.
    #[inline]
    pub const fn both(level: bool) -> Self {
        Self { ch1: level, ch2: level }
    }

    #[inline]
    pub const fn agrees(&self) -> bool {
        self.ch1 == self.ch2
    }
}

/// Input snapshot sampled once per fast tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInputs {
    /// Cab-active redundant pair.
    pub cab_active: ChannelSample,
    /// Vigilance push button redundant pair.
    pub vigilance_push: ChannelSample,
    /// Zero-speed (standstill) redundant pair.
    pub zero_speed: ChannelSample,
    /// Raw TLA lines, one redundant pair per class in slot order.
    pub tla_lines: [ChannelSample; TLA_CLASS_COUNT],
    /// Speed bus: bits 0..=7 thermometer code, bits 8..=9 auxiliary
    /// 25-km lines (8 = below-25 indicator, 9 = above-25 indicator).
    pub speed_bus: u16,
    /// Qualified-sample pulse — comparators evaluate only when set.
    pub input_valid: bool,
    /// Self-test cycle completion pulse.
    pub self_test_done: bool,
    /// Channel-1 bank flagged faulty by the self-test circuitry.
    pub self_test_fault_ch1: bool,
    /// Channel-2 bank flagged faulty by the self-test circuitry.
    pub self_test_fault_ch2: bool,
    /// Current operating mode from the external selector FSM.
    pub operating_mode: OperatingMode,
    /// Motor controller reports no power demanded.
    pub mc_no_power: bool,
}

impl TickInputs {
    /// A quiescent snapshot: cab active, channels agreeing, a valid
    /// mid-range speed code, no pulses. Useful as a test/sim baseline.
    pub fn quiescent() -> Self {
        Self {
            cab_active: ChannelSample::both(true),
            // 4 contiguous ones = 25-75 km/h band, aux lines report above-25.
            speed_bus: 0b10_0000_1111,
            input_valid: true,
            ..Default::default()
        }
    }
}

/// Output snapshot produced once per fast tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutputs {
    /// Qualified cab-active.
    pub cab_active: bool,
    /// Qualified vigilance push.
    pub vigilance_push: bool,
    /// Qualified zero-speed.
    pub zero_speed: bool,
    /// Qualified TLA line levels in slot order.
    pub tla_active: [bool; TLA_CLASS_COUNT],
    /// Published speed band (post fault-forcing).
    pub speed_band: SpeedBand,
    /// Raw decode of the current bus sample (pre-forcing).
    pub raw_band: SpeedBand,
    /// Latched (permanent) flag per fault class in slot order.
    pub fault_latched: [bool; 4],
    /// Current vigilance FSM state.
    pub state: VigilanceState,
    /// Penalty brake demand.
    pub penalty_brake_applied: bool,
    /// Penalty brake feedback status (release pending in PenaltyNormal).
    pub penalty_brake_status: bool,
    /// Warning light command.
    pub warning_light: WarningLight,
    /// Warning buzzer command.
    pub buzzer: bool,
    /// Speed-limit timer running (warning-phase countdown active).
    pub speed_limit_timer_active: bool,
    /// Shared counter-pause gate, exported for the external PWM module.
    pub counters_paused: bool,
    /// Aggregated minor-fault report.
    pub minor_faults: MinorFault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sample_agreement() {
        assert!(ChannelSample::both(true).agrees());
        assert!(ChannelSample::both(false).agrees());
        assert!(!ChannelSample { ch1: true, ch2: false }.agrees());
    }

    #[test]
    fn quiescent_inputs_are_clean() {
        let inputs = TickInputs::quiescent();
        assert!(inputs.cab_active.agrees());
        assert!(inputs.input_valid);
        assert!(!inputs.self_test_done);
        assert_eq!(inputs.operating_mode, OperatingMode::Normal);
        // Thermometer part is a contiguous run of 4 ones.
        assert_eq!(inputs.speed_bus & 0xFF, 0b0000_1111);
    }
}
