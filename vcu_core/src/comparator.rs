//! Dual-channel input qualification (FPGA-REQ-10 family).
//!
//! Produces a single trustworthy boolean from two redundant, possibly
//! faulty digital inputs. Transient disagreement is tolerated until the
//! next self-test boundary; disagreement sustained across the configured
//! number of self-test cycles masks the channel(s) the self-test
//! circuitry flags as faulty. Masking is sticky for the run.

use vcu_common::io::ChannelSample;
use vcu_common::state::ComparatorPhase;

/// Per-tick pulses consumed by the comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparatorPulses {
    /// Qualified-sample pulse — comparison happens only when set.
    pub input_valid: bool,
    /// Self-test cycle completion pulse.
    pub self_test_done: bool,
    /// Channel-1 flagged faulty by the self-test circuitry.
    pub fault_ch1: bool,
    /// Channel-2 flagged faulty by the self-test circuitry.
    pub fault_ch2: bool,
}

/// Comparator state machine for one redundant input pair.
///
/// Reset to `Comparing` only by [`DualChannelComparator::reset`] — never
/// by ordinary phase transitions.
#[derive(Debug, Clone)]
pub struct DualChannelComparator {
    phase: ComparatorPhase,
    masked: [bool; 2],
    /// Disagreement streak across self-test cycles (0..=limit).
    streak: u32,
    streak_limit: u32,
    /// Last agreed qualified value. `None` until first agreement.
    latched: Option<bool>,
}

impl DualChannelComparator {
    /// Create a comparator in `Comparing` with nothing latched.
    pub const fn new(streak_limit: u32) -> Self {
        Self {
            phase: ComparatorPhase::Comparing,
            masked: [false, false],
            streak: 0,
            streak_limit,
            latched: None,
        }
    }

    /// Current phase.
    #[inline]
    pub const fn phase(&self) -> ComparatorPhase {
        self.phase
    }

    /// Per-channel masked flags.
    #[inline]
    pub const fn masked(&self) -> [bool; 2] {
        self.masked
    }

    /// True if either channel is masked (minor-fault condition).
    #[inline]
    pub const fn any_masked(&self) -> bool {
        self.masked[0] || self.masked[1]
    }

    /// Current disagreement streak.
    #[inline]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    /// Full system reset — the only exit from `Masked`.
    pub fn reset(&mut self) {
        let limit = self.streak_limit;
        *self = Self::new(limit);
    }

    /// Test injection: force an internal phase and mask set.
    ///
    /// Replaces the hardware signal-spy used on the bench to jump the
    /// comparator directly into a phase (e.g. `DelayCheck` with both
    /// channels marked faulty).
    pub fn force_phase(&mut self, phase: ComparatorPhase, masked: [bool; 2]) {
        self.phase = phase;
        self.masked = masked;
    }

    /// Sample the pair for one fast tick and return the qualified output.
    pub fn sample(&mut self, raw: ChannelSample, pulses: ComparatorPulses) -> bool {
        // Masked channels override the phase logic outright: the masked
        // channel is forced to the other channel's value, both masked
        // forces logic-low. Applies to forced test states too.
        if self.any_masked() {
            self.phase = ComparatorPhase::Masked;
            return self.masked_output(raw);
        }

        match self.phase {
            ComparatorPhase::Comparing => {
                if pulses.input_valid {
                    if raw.agrees() {
                        self.latched = Some(raw.ch1);
                    } else {
                        self.phase = ComparatorPhase::DelayCheck;
                    }
                }
                self.held_output()
            }
            ComparatorPhase::DelayCheck => {
                // The next qualified sample confirms or clears the
                // disagreement before the self-test boundary is armed.
                if pulses.input_valid {
                    if raw.agrees() {
                        self.phase = ComparatorPhase::Comparing;
                        self.streak = 0;
                        self.latched = Some(raw.ch1);
                    } else {
                        self.phase = ComparatorPhase::AwaitSelfTest;
                    }
                }
                self.held_output()
            }
            ComparatorPhase::AwaitSelfTest => {
                if pulses.self_test_done {
                    if raw.agrees() {
                        self.phase = ComparatorPhase::Comparing;
                        self.streak = 0;
                        self.latched = Some(raw.ch1);
                    } else {
                        self.streak += 1;
                        if self.streak >= self.streak_limit {
                            self.mask_flagged(pulses);
                            return self.masked_output(raw);
                        }
                    }
                }
                self.held_output()
            }
            ComparatorPhase::Masked => self.masked_output(raw),
        }
    }

    /// Hold the last latched value; logic-low if nothing latched yet.
    #[inline]
    fn held_output(&self) -> bool {
        self.latched.unwrap_or(false)
    }

    fn masked_output(&self, raw: ChannelSample) -> bool {
        match self.masked {
            [true, true] => false,
            [true, false] => raw.ch2,
            [false, true] => raw.ch1,
            [false, false] => self.held_output(),
        }
    }

    fn mask_flagged(&mut self, pulses: ComparatorPulses) {
        self.phase = ComparatorPhase::Masked;
        if pulses.fault_ch1 || pulses.fault_ch2 {
            self.masked = [pulses.fault_ch1, pulses.fault_ch2];
        } else {
            // Streak exhausted with no diagnosis: an undiagnosed dual
            // fault isolates both channels.
            self.masked = [true, true];
        }
    }
}
