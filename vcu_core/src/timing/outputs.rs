//! State-derived output signals.
//!
//! Every control output is a pure function of the current vigilance
//! state — no additional latches, so the outputs are queryable at any
//! tick boundary.

use vcu_common::state::{VigilanceState, WarningLight};

/// Derived output signal set for one vigilance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedOutputs {
    /// Penalty brake demand.
    pub penalty_brake_applied: bool,
    /// Brake release pending — held through the penalty dwell until the
    /// power-off release conditions are met.
    pub penalty_brake_status: bool,
    /// Warning light command.
    pub warning_light: WarningLight,
    /// Warning buzzer command.
    pub buzzer: bool,
    /// Warning-phase countdown running.
    pub speed_limit_timer_active: bool,
}

/// Map a vigilance state to its output signal set.
pub fn derive_outputs(state: VigilanceState) -> DerivedOutputs {
    use VigilanceState::*;
    DerivedOutputs {
        penalty_brake_applied: state.is_penalty_phase(),
        penalty_brake_status: matches!(state, PenaltyNormal),
        warning_light: match state {
            FirstStageWarning | Depressed => WarningLight::Solid,
            SecondStageWarning => WarningLight::Flashing,
            _ => WarningLight::Off,
        },
        buzzer: matches!(state, SecondStageWarning),
        speed_limit_timer_active: state.is_warning_phase(),
    }
}
