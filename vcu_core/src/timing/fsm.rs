//! Central vigilance timing state machine (FPGA-REQ-50/51 family).
//!
//! One reloadable down-counter drives the whole escalation sequence:
//! every state entry reloads `remaining_ticks` from that state's
//! constant. TLA events and vigilance-push acknowledges reset whichever
//! timer is active; the penalty phase locks acknowledges out until the
//! power-off release conditions are met.

use vcu_common::config::VcuConfig;
use vcu_common::consts::{TLA_CLASS_COUNT, fast_ticks, slow_ticks};
use vcu_common::state::{OperatingMode, SpeedBand, TlaClass, VigilanceState};

use super::tla::{TlaManager, TlaVerdict};

/// Qualified inputs consumed by the FSM each fast tick.
#[derive(Debug, Clone, Copy)]
pub struct FsmInputs {
    /// Current operating mode.
    pub mode: OperatingMode,
    /// Published speed band (post fault-forcing).
    pub band: SpeedBand,
    /// Any speed fault class holds its latched permanent flag.
    pub speed_fault_latched: bool,
    /// Qualified vigilance-push level.
    pub vigilance_push: bool,
    /// Qualified zero-speed (standstill) level.
    pub zero_speed: bool,
    /// Qualified cab-active level.
    pub cab_active: bool,
    /// Motor controller reports no power demanded.
    pub mc_no_power: bool,
    /// TLA event pulses (rising edges) per class in slot order.
    pub tla_events: [bool; TLA_CLASS_COUNT],
    /// This fast tick coincides with a slow (500 ms) tick.
    pub slow_tick: bool,
}

/// The centralized vigilance timing FSM.
#[derive(Debug, Clone)]
pub struct VigilanceFsm {
    state: VigilanceState,
    /// The single shared down-counter, in slow ticks. Meaningful only
    /// relative to the state that loaded it.
    remaining_ticks: u32,
    /// Full reload value loaded at the last state entry.
    preload_ticks: u32,
    tla: TlaManager,
    config: VcuConfig,

    prev_mode: OperatingMode,
    prev_push: bool,
    /// Consecutive fast ticks with the push held.
    push_hold_fast: u32,
    /// Consecutive slow ticks with cab active (penalty release).
    cab_hold_slow: u32,
    /// Consecutive slow ticks of latched speed failure while braking.
    spd_fail_slow: u32,
    /// 2nd stage visited since the last NoWarning entry (re-arm preload).
    second_stage_visited: bool,
}

impl VigilanceFsm {
    pub fn new(config: VcuConfig) -> Self {
        let tla = TlaManager::new(&config);
        Self {
            state: VigilanceState::Idle,
            remaining_ticks: 0,
            preload_ticks: 0,
            tla,
            config,
            prev_mode: OperatingMode::Normal,
            prev_push: false,
            push_hold_fast: 0,
            cab_hold_slow: 0,
            spd_fail_slow: 0,
            second_stage_visited: false,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> VigilanceState {
        self.state
    }

    /// Remaining slow ticks on the active timer.
    #[inline]
    pub const fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// TLA slot state (read-only).
    #[inline]
    pub fn tla(&self) -> &TlaManager {
        &self.tla
    }

    /// Full system reset back to `Idle`.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
    }

    /// Test injection: force a state with an explicit timer preload.
    pub fn force_state(&mut self, state: VigilanceState, preload_ticks: u32) {
        self.state = state;
        self.remaining_ticks = preload_ticks;
        self.preload_ticks = preload_ticks;
    }

    /// Advance the FSM by one fast tick.
    pub fn step(&mut self, input: &FsmInputs) {
        self.tla.fast_tick();

        let push_pulse = input.vigilance_push && !self.prev_push;
        self.prev_push = input.vigilance_push;
        if input.vigilance_push {
            self.push_hold_fast = self.push_hold_fast.saturating_add(1);
        } else {
            self.push_hold_fast = 0;
        }

        let state_at_entry = self.state;

        // ── Reset-state exit, synchronized to the fast pulse ──
        if self.state == VigilanceState::Idle {
            if input.mode == OperatingMode::Suppressed {
                self.enter(VigilanceState::Suppressed, input.band);
            } else {
                self.enter(VigilanceState::NoWarning, input.band);
            }
            self.prev_mode = input.mode;
            return;
        }

        // ── Operating-mode transitions ──
        self.handle_mode_change(input);

        // ── Vigilance-push acknowledge ──
        if push_pulse {
            // An acknowledge restores every TLA slot, in any state.
            self.tla.restore_all();
            match self.state {
                VigilanceState::NoWarning
                | VigilanceState::FirstStageWarning
                | VigilanceState::SecondStageWarning
                | VigilanceState::Depressed => {
                    self.enter(VigilanceState::NoWarning, input.band);
                }
                _ => {}
            }
        }

        // ── TLA events (warning phase only) ──
        if self.state.is_warning_phase() {
            for (i, &fired) in input.tla_events.iter().enumerate() {
                if fired {
                    let class = TlaClass::ALL[i];
                    if self.tla.offer_event(class) == TlaVerdict::ResetTimer {
                        self.remaining_ticks = self.preload_ticks;
                    }
                }
            }
        }

        // ── VPB-held fast path: NoWarning → 1st stage without decode ──
        if self.state == VigilanceState::NoWarning
            && self.push_hold_fast >= fast_ticks(self.config.vpb_held_s)
        {
            self.enter(VigilanceState::FirstStageWarning, input.band);
        }

        // Entering a state reloads its timer; do not consume a slow tick
        // from the fresh preload on the same step.
        if self.state != state_at_entry {
            self.prev_mode = input.mode;
            return;
        }

        // ── Countdown and per-state exits ──
        match self.state {
            VigilanceState::NoWarning
            | VigilanceState::FirstStageWarning
            | VigilanceState::SecondStageWarning
            | VigilanceState::TrainStoppedNoReset => {
                if input.slow_tick {
                    if self.remaining_ticks > 0 {
                        self.remaining_ticks -= 1;
                    }
                    if self.remaining_ticks == 0 {
                        self.advance_on_expiry(input);
                    }
                }
            }
            VigilanceState::BrakeApplicationNoReset => {
                if input.slow_tick {
                    if input.speed_fault_latched {
                        self.spd_fail_slow += 1;
                    } else {
                        self.spd_fail_slow = 0;
                    }
                }
                if self.spd_fail_slow > slow_ticks(self.config.spd_failure_bypass_s) {
                    // Sustained speed-sensor failure while braking: a
                    // standstill can never be confirmed — skip the dwell.
                    self.enter(VigilanceState::PenaltyNormal, input.band);
                } else if !input.speed_fault_latched
                    && !input.band.is_fault_code()
                    && input.zero_speed
                {
                    self.enter(VigilanceState::TrainStoppedNoReset, input.band);
                }
            }
            VigilanceState::PenaltyNormal => {
                if input.slow_tick {
                    if input.cab_active {
                        self.cab_hold_slow += 1;
                    } else {
                        self.cab_hold_slow = 0;
                    }
                }
                let cab_held = self.cab_hold_slow > slow_ticks(self.config.cab_held_s);
                if input.mc_no_power && (cab_held || push_pulse) {
                    self.enter(VigilanceState::NoWarning, input.band);
                }
            }
            VigilanceState::Idle
            | VigilanceState::Depressed
            | VigilanceState::Suppressed => {}
        }

        self.prev_mode = input.mode;
    }

    fn handle_mode_change(&mut self, input: &FsmInputs) {
        // Entering Suppressed parks the FSM and restores the TLA slots.
        if input.mode == OperatingMode::Suppressed {
            if self.state != VigilanceState::Suppressed {
                self.tla.restore_all();
                self.enter(VigilanceState::Suppressed, input.band);
            }
            return;
        }

        // Leaving Suppressed resumes with a full NoWarning period.
        if self.state == VigilanceState::Suppressed {
            self.enter(VigilanceState::NoWarning, input.band);
            return;
        }

        // Depressed → Normal in the terminal state applies the brake
        // (FPGA-REQ-51); in any warning sub-state the current state
        // simply carries across (FPGA-REQ-50).
        if self.prev_mode == OperatingMode::Depressed
            && input.mode != OperatingMode::Depressed
            && self.state == VigilanceState::Depressed
        {
            self.enter(VigilanceState::BrakeApplicationNoReset, input.band);
        }
    }

    fn advance_on_expiry(&mut self, input: &FsmInputs) {
        match self.state {
            VigilanceState::NoWarning => {
                self.enter(VigilanceState::FirstStageWarning, input.band);
            }
            VigilanceState::FirstStageWarning => {
                self.enter(VigilanceState::SecondStageWarning, input.band);
            }
            VigilanceState::SecondStageWarning => {
                if input.mode == OperatingMode::Depressed {
                    self.enter(VigilanceState::Depressed, input.band);
                } else {
                    self.enter(VigilanceState::BrakeApplicationNoReset, input.band);
                }
            }
            VigilanceState::TrainStoppedNoReset => {
                self.enter(VigilanceState::PenaltyNormal, input.band);
            }
            _ => {}
        }
    }

    /// Enter a state, reloading the shared timer from its constant.
    fn enter(&mut self, state: VigilanceState, band: SpeedBand) {
        let preload = match state {
            VigilanceState::NoWarning => slow_ticks(self.config.t1_for_band(band)),
            VigilanceState::FirstStageWarning => slow_ticks(self.config.t2_s),
            VigilanceState::SecondStageWarning => {
                if self.second_stage_visited {
                    slow_ticks(self.config.t3_rearm_s)
                } else {
                    slow_ticks(self.config.t3_s)
                }
            }
            VigilanceState::TrainStoppedNoReset => slow_ticks(self.config.t4_s),
            _ => 0,
        };

        match state {
            VigilanceState::NoWarning => self.second_stage_visited = false,
            VigilanceState::SecondStageWarning => self.second_stage_visited = true,
            VigilanceState::BrakeApplicationNoReset => self.spd_fail_slow = 0,
            VigilanceState::PenaltyNormal => self.cab_hold_slow = 0,
            _ => {}
        }

        self.state = state;
        self.remaining_ticks = preload;
        self.preload_ticks = preload;
    }
}
