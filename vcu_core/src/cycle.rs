//! Per-tick orchestration of the three subsystems.
//!
//! Fixed evaluation order within one fast tick:
//!   1. comparators qualify the redundant input pairs,
//!   2. the speed decoder and fault filter run on the qualified data,
//!   3. the vigilance FSM consumes the qualified and filtered signals.
//! A mask raised in stage 1 therefore reaches the FSM in the same tick.

use tracing::{debug, info};

use vcu_common::config::VcuConfig;
use vcu_common::consts::{FAST_TICKS_PER_SLOW, TLA_CLASS_COUNT};
use vcu_common::fault::MinorFault;
use vcu_common::io::{TickInputs, TickOutputs};
use vcu_common::state::{OperatingMode, VigilanceState};

use crate::comparator::{ComparatorPulses, DualChannelComparator};
use crate::speed::filter::{RawFaults, SpeedMonitor};
use crate::timing::fsm::{FsmInputs, VigilanceFsm};
use crate::timing::outputs::derive_outputs;

/// Running cycle counters for diagnostics and the periodic status log.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    /// Fast ticks processed since reset.
    pub fast_ticks: u64,
    /// Slow ticks derived since reset.
    pub slow_ticks: u64,
    /// Vigilance state transitions observed since reset.
    pub state_transitions: u64,
}

/// The complete vigilance control core.
///
/// Owns one comparator per redundant pair, the speed monitor and the
/// central FSM; [`VcuCore::step`] advances everything by one fast tick.
#[derive(Debug)]
pub struct VcuCore {
    cab_cmp: DualChannelComparator,
    push_cmp: DualChannelComparator,
    zero_cmp: DualChannelComparator,
    tla_cmps: [DualChannelComparator; TLA_CLASS_COUNT],
    speed: SpeedMonitor,
    fsm: VigilanceFsm,
    /// Previous qualified TLA levels, for rising-edge detection.
    prev_tla: [bool; TLA_CLASS_COUNT],
    stats: CycleStats,
}

impl VcuCore {
    pub fn new(config: VcuConfig) -> Self {
        let cmp = DualChannelComparator::new(config.disagree_streak_limit);
        Self {
            cab_cmp: cmp.clone(),
            push_cmp: cmp.clone(),
            zero_cmp: cmp.clone(),
            tla_cmps: core::array::from_fn(|_| cmp.clone()),
            speed: SpeedMonitor::new(config.fault_counter_ceiling),
            fsm: VigilanceFsm::new(config),
            prev_tla: [false; TLA_CLASS_COUNT],
            stats: CycleStats::default(),
        }
    }

    /// Current vigilance state.
    #[inline]
    pub fn state(&self) -> VigilanceState {
        self.fsm.state()
    }

    /// Running cycle counters.
    #[inline]
    pub const fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Central FSM (read-only, for diagnostics).
    #[inline]
    pub fn fsm(&self) -> &VigilanceFsm {
        &self.fsm
    }

    /// Speed monitor (read-only, for diagnostics).
    #[inline]
    pub fn speed(&self) -> &SpeedMonitor {
        &self.speed
    }

    /// Cab-active comparator, mutable for bench-style fault injection.
    pub fn cab_comparator_mut(&mut self) -> &mut DualChannelComparator {
        &mut self.cab_cmp
    }

    /// Full system reset: every subsystem back to its power-on state.
    pub fn reset(&mut self) {
        info!("full system reset");
        self.cab_cmp.reset();
        self.push_cmp.reset();
        self.zero_cmp.reset();
        for cmp in &mut self.tla_cmps {
            cmp.reset();
        }
        self.speed.reset();
        self.fsm.reset();
        self.prev_tla = [false; TLA_CLASS_COUNT];
        self.stats = CycleStats::default();
    }

    /// Advance the core by one fast (500 µs) tick.
    pub fn step(&mut self, inputs: &TickInputs) -> TickOutputs {
        self.stats.fast_ticks += 1;
        let slow_tick = self.stats.fast_ticks % FAST_TICKS_PER_SLOW as u64 == 0;
        if slow_tick {
            self.stats.slow_ticks += 1;
        }

        let pulses = ComparatorPulses {
            input_valid: inputs.input_valid,
            self_test_done: inputs.self_test_done,
            fault_ch1: inputs.self_test_fault_ch1,
            fault_ch2: inputs.self_test_fault_ch2,
        };

        // ── Stage 1: input qualification ──
        let cab_q = self.cab_cmp.sample(inputs.cab_active, pulses);
        let push_q = self.push_cmp.sample(inputs.vigilance_push, pulses);
        let zero_q = self.zero_cmp.sample(inputs.zero_speed, pulses);
        let mut tla_q = [false; TLA_CLASS_COUNT];
        for (i, cmp) in self.tla_cmps.iter_mut().enumerate() {
            tla_q[i] = cmp.sample(inputs.tla_lines[i], pulses);
        }

        // ── Stage 2: speed decode and fault filtering ──
        let counters_paused =
            !cab_q || inputs.operating_mode == OperatingMode::Suppressed;
        let (raw_band, raw_faults) = RawFaults::from_bus(inputs.speed_bus);
        if slow_tick {
            self.speed.slow_step(raw_faults, counters_paused);
        }
        let band = self.speed.published_band(raw_band);

        // ── Stage 3: vigilance FSM ──
        let mut tla_events = [false; TLA_CLASS_COUNT];
        for i in 0..TLA_CLASS_COUNT {
            tla_events[i] = tla_q[i] && !self.prev_tla[i];
        }
        self.prev_tla = tla_q;

        let before = self.fsm.state();
        self.fsm.step(&FsmInputs {
            mode: inputs.operating_mode,
            band,
            speed_fault_latched: self.speed.any_latched(),
            vigilance_push: push_q,
            zero_speed: zero_q,
            cab_active: cab_q,
            mc_no_power: inputs.mc_no_power,
            tla_events,
            slow_tick,
        });
        let after = self.fsm.state();
        if after != before {
            self.stats.state_transitions += 1;
            debug!(?before, ?after, tick = self.stats.fast_ticks, "state transition");
        }

        // ── Output snapshot ──
        let mut minor_faults = self.speed.minor_faults();
        if self.cab_cmp.any_masked() {
            minor_faults |= MinorFault::CH_CAB_MASKED;
        }
        if self.push_cmp.any_masked() {
            minor_faults |= MinorFault::CH_VIGILANCE_MASKED;
        }
        if self.zero_cmp.any_masked() {
            minor_faults |= MinorFault::CH_ZERO_SPEED_MASKED;
        }
        if self.tla_cmps.iter().any(|c| c.any_masked()) {
            minor_faults |= MinorFault::CH_TLA_MASKED;
        }

        let derived = derive_outputs(after);
        TickOutputs {
            cab_active: cab_q,
            vigilance_push: push_q,
            zero_speed: zero_q,
            tla_active: tla_q,
            speed_band: band,
            raw_band,
            fault_latched: self.speed.latched(),
            state: after,
            penalty_brake_applied: derived.penalty_brake_applied,
            penalty_brake_status: derived.penalty_brake_status,
            warning_light: derived.warning_light,
            buzzer: derived.buzzer,
            speed_limit_timer_active: derived.speed_limit_timer_active,
            counters_paused,
            minor_faults,
        }
    }
}
