//! Integration tests for the vigilance timing core.
//!
//! These tests exercise the full per-tick pipeline — comparators, speed
//! monitor and FSM together — through realistic driver scenarios:
//! unattended escalation to the penalty brake, periodic acknowledging,
//! speed-sensor failure, channel masking, and penalty recovery.

use vcu_common::config::VcuConfig;
use vcu_common::consts::FAST_TICKS_PER_SLOW;
use vcu_common::fault::MinorFault;
use vcu_common::io::{ChannelSample, TickInputs};
use vcu_common::state::{SpeedBand, VigilanceState, WarningLight};
use vcu_core::cycle::VcuCore;

// ── Helpers ─────────────────────────────────────────────────────────

/// Run whole slow periods (1000 fast ticks each) with fixed inputs.
fn run_slow_periods(core: &mut VcuCore, inputs: &TickInputs, periods: u64) {
    for _ in 0..periods * FAST_TICKS_PER_SLOW as u64 {
        core.step(inputs);
    }
}

/// One-tick vigilance push pulse.
fn push_pulse(core: &mut VcuCore, base: &TickInputs) {
    let push = TickInputs {
        vigilance_push: ChannelSample::both(true),
        ..*base
    };
    core.step(&push);
    core.step(base);
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn unattended_driver_reaches_penalty_brake() {
    let mut core = VcuCore::new(VcuConfig::default());
    let inputs = TickInputs::quiescent();

    core.step(&inputs);
    assert_eq!(core.state(), VigilanceState::NoWarning);

    // T1 at 25-75 km/h: 45 s of silence.
    run_slow_periods(&mut core, &inputs, 89);
    assert_eq!(core.state(), VigilanceState::NoWarning);
    run_slow_periods(&mut core, &inputs, 1);
    assert_eq!(core.state(), VigilanceState::FirstStageWarning);
    let out = core.step(&inputs);
    assert_eq!(out.warning_light, WarningLight::Solid);
    assert!(!out.buzzer);

    // T2: 5 s of solid light.
    run_slow_periods(&mut core, &inputs, 10);
    assert_eq!(core.state(), VigilanceState::SecondStageWarning);
    let out = core.step(&inputs);
    assert_eq!(out.warning_light, WarningLight::Flashing);
    assert!(out.buzzer);

    // T3: 5 s of flashing light and buzzer, then the brake.
    run_slow_periods(&mut core, &inputs, 10);
    assert_eq!(core.state(), VigilanceState::BrakeApplicationNoReset);
    let out = core.step(&inputs);
    assert!(out.penalty_brake_applied);
    assert_eq!(out.warning_light, WarningLight::Off);
    assert!(!out.buzzer);
}

#[test]
fn acknowledging_driver_never_escalates() {
    let mut core = VcuCore::new(VcuConfig::default());
    let inputs = TickInputs::quiescent();
    core.step(&inputs);

    // Acknowledge every 30 s for over three full T1 periods.
    for _ in 0..5 {
        run_slow_periods(&mut core, &inputs, 60);
        push_pulse(&mut core, &inputs);
    }
    assert_eq!(core.state(), VigilanceState::NoWarning);
    // Only the power-on Idle → NoWarning transition ever happened.
    assert_eq!(core.stats().state_transitions, 1);
}

#[test]
fn speed_sensor_failure_forces_maximum_band() {
    let mut core = VcuCore::new(VcuConfig::default());
    // All-zero thermometer code with the cab active: under-range.
    let failed = TickInputs {
        speed_bus: 0b01_0000_0000,
        ..TickInputs::quiescent()
    };

    core.step(&failed);
    let out = core.step(&failed);
    assert_eq!(out.raw_band, SpeedBand::UnderRange);
    // Transient: not yet latched, band published as decoded.
    assert_eq!(out.speed_band, SpeedBand::UnderRange);
    assert!(!out.minor_faults.contains(MinorFault::SPD_UNDER_RANGE));

    // 20 s of sustained failure saturates the counter.
    run_slow_periods(&mut core, &failed, 40);
    let out = core.step(&failed);
    assert_eq!(out.speed_band, SpeedBand::Above110);
    assert_eq!(out.fault_latched, [true, false, false, false]);
    assert!(out.minor_faults.contains(MinorFault::SPD_UNDER_RANGE));

    // The next NoWarning entry loads the shortest T1 (25 s) because the
    // published band is forced to the maximum.
    push_pulse(&mut core, &failed);
    assert_eq!(core.state(), VigilanceState::NoWarning);
    assert_eq!(core.fsm().remaining_ticks(), 50);
}

#[test]
fn sustained_channel_disagreement_masks_and_pauses() {
    let mut core = VcuCore::new(VcuConfig::default());
    let inputs = TickInputs::quiescent();
    core.step(&inputs);

    // Cab pair splits; comparison confirms across two qualified samples.
    let split = TickInputs {
        cab_active: ChannelSample { ch1: true, ch2: false },
        ..inputs
    };
    core.step(&split);
    core.step(&split);

    // Ten self-test cycles flagging both channel banks faulty.
    let self_test = TickInputs {
        input_valid: false,
        self_test_done: true,
        self_test_fault_ch1: true,
        self_test_fault_ch2: true,
        ..split
    };
    for _ in 0..10 {
        core.step(&self_test);
    }

    // Both cab channels masked: qualified level forced low, which raises
    // the counter-pause gate and the minor-fault report in the same tick.
    let out = core.step(&split);
    assert!(!out.cab_active);
    assert!(out.counters_paused);
    assert!(out.minor_faults.contains(MinorFault::CH_CAB_MASKED));

    // Masking is sticky: long agreement does not clear it.
    run_slow_periods(&mut core, &inputs, 100);
    let out = core.step(&inputs);
    assert!(out.minor_faults.contains(MinorFault::CH_CAB_MASKED));
}

#[test]
fn penalty_recovery_at_standstill() {
    let mut core = VcuCore::new(VcuConfig::default());
    let inputs = TickInputs::quiescent();
    core.step(&inputs);

    // Escalate all the way to the brake.
    run_slow_periods(&mut core, &inputs, 110);
    assert_eq!(core.state(), VigilanceState::BrakeApplicationNoReset);

    // Train comes to a confirmed standstill.
    let stopped = TickInputs {
        zero_speed: ChannelSample::both(true),
        ..inputs
    };
    core.step(&stopped);
    assert_eq!(core.state(), VigilanceState::TrainStoppedNoReset);

    // T4 dwell (3 s), then the release-pending penalty state.
    run_slow_periods(&mut core, &stopped, 6);
    assert_eq!(core.state(), VigilanceState::PenaltyNormal);
    let out = core.step(&stopped);
    assert!(out.penalty_brake_applied);
    assert!(out.penalty_brake_status);

    // Release requires no power demanded and the cab held active.
    let released = TickInputs {
        mc_no_power: true,
        ..stopped
    };
    run_slow_periods(&mut core, &released, 6);
    assert_eq!(core.state(), VigilanceState::NoWarning);
    let out = core.step(&released);
    assert!(!out.penalty_brake_applied);
    assert!(!out.penalty_brake_status);
}
