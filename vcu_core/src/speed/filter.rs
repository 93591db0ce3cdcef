//! Saturating fault persistence filtering (FPGA-REQ-31/32).
//!
//! Four independent counters, one per fault class, each stepped on the
//! slow (500 ms) tick: +1 while the raw fault holds, −1 while it is
//! clear, frozen while the system-wide counter-pause gate holds. A
//! counter that saturates latches a permanent fault which clears only
//! when the counter has decayed back to zero.

use vcu_common::fault::{FaultClass, MinorFault};
use vcu_common::state::SpeedBand;

use super::decode::{band_25km_fault, decode_bus};

/// One saturating error counter with a latched permanent flag.
#[derive(Debug, Clone, Copy)]
pub struct FaultCounter {
    count: u32,
    ceiling: u32,
    permanent: bool,
}

impl FaultCounter {
    pub const fn new(ceiling: u32) -> Self {
        Self {
            count: 0,
            ceiling,
            permanent: false,
        }
    }

    /// Current counter value (always in `0..=ceiling`).
    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Latched permanent-fault flag.
    #[inline]
    pub const fn permanent(&self) -> bool {
        self.permanent
    }

    /// Step the counter for one slow tick.
    ///
    /// Frozen in both directions while `paused` holds; the accumulated
    /// value survives the pause unchanged.
    pub fn slow_step(&mut self, raw_fault: bool, paused: bool) {
        if paused {
            return;
        }
        if raw_fault {
            if self.count < self.ceiling {
                self.count += 1;
                if self.count == self.ceiling {
                    self.permanent = true;
                }
            }
        } else if self.count > 0 {
            self.count -= 1;
            if self.count == 0 {
                self.permanent = false;
            }
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.permanent = false;
    }
}

/// Raw per-class fault image for one bus sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFaults {
    pub flags: [bool; 4],
}

impl RawFaults {
    /// Derive the raw fault image from a bus sample.
    pub fn from_bus(bus: u16) -> (SpeedBand, Self) {
        let band = decode_bus(bus);
        let flags = [
            band == SpeedBand::UnderRange,
            band == SpeedBand::OverRange,
            band == SpeedBand::Invalid,
            band_25km_fault(bus, band),
        ];
        (band, Self { flags })
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }
}

/// Speed decoder output filter: four counters plus the forced-maximum rule.
#[derive(Debug, Clone)]
pub struct SpeedMonitor {
    counters: [FaultCounter; 4],
}

impl SpeedMonitor {
    pub const fn new(ceiling: u32) -> Self {
        Self {
            counters: [FaultCounter::new(ceiling); 4],
        }
    }

    /// Step all four counters for one slow tick.
    pub fn slow_step(&mut self, raw: RawFaults, paused: bool) {
        for (counter, &fault) in self.counters.iter_mut().zip(raw.flags.iter()) {
            counter.slow_step(fault, paused);
        }
    }

    /// Counter for one fault class.
    #[inline]
    pub fn counter(&self, class: FaultClass) -> &FaultCounter {
        &self.counters[class as usize]
    }

    /// Latched flags in class-slot order.
    pub fn latched(&self) -> [bool; 4] {
        [
            self.counters[0].permanent(),
            self.counters[1].permanent(),
            self.counters[2].permanent(),
            self.counters[3].permanent(),
        ]
    }

    /// True while any class holds a latched permanent fault.
    pub fn any_latched(&self) -> bool {
        self.counters.iter().any(|c| c.permanent())
    }

    /// Published band: the raw decode, forced to the maximum band while
    /// any permanent flag holds — the latched flag, not the raw
    /// condition, gates the forcing.
    pub fn published_band(&self, raw_band: SpeedBand) -> SpeedBand {
        if self.any_latched() {
            SpeedBand::Above110
        } else {
            raw_band
        }
    }

    /// Minor-fault bits for all latched classes.
    pub fn minor_faults(&self) -> MinorFault {
        let mut report = MinorFault::empty();
        for class in FaultClass::ALL {
            if self.counters[class as usize].permanent() {
                report |= class.minor_fault_bit();
            }
        }
        report
    }

    pub fn reset(&mut self) {
        for counter in &mut self.counters {
            counter.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcu_common::consts::FAULT_COUNTER_CEILING;

    #[test]
    fn counter_saturates_at_ceiling() {
        let mut c = FaultCounter::new(FAULT_COUNTER_CEILING);
        for _ in 0..100 {
            c.slow_step(true, false);
        }
        assert_eq!(c.count(), FAULT_COUNTER_CEILING);
        assert!(c.permanent());
    }

    #[test]
    fn counter_blocks_at_zero() {
        let mut c = FaultCounter::new(FAULT_COUNTER_CEILING);
        for _ in 0..100 {
            c.slow_step(false, false);
        }
        assert_eq!(c.count(), 0);
        assert!(!c.permanent());
    }

    #[test]
    fn permanent_persists_until_full_decay() {
        let mut c = FaultCounter::new(FAULT_COUNTER_CEILING);
        for _ in 0..FAULT_COUNTER_CEILING {
            c.slow_step(true, false);
        }
        assert!(c.permanent());

        // Decrement is allowed while latched, but the flag holds.
        for _ in 0..(FAULT_COUNTER_CEILING - 1) {
            c.slow_step(false, false);
            assert!(c.permanent(), "flag must hold at count {}", c.count());
        }
        assert_eq!(c.count(), 1);

        c.slow_step(false, false);
        assert_eq!(c.count(), 0);
        assert!(!c.permanent());
    }

    #[test]
    fn pause_freezes_both_directions() {
        let mut c = FaultCounter::new(FAULT_COUNTER_CEILING);
        for _ in 0..7 {
            c.slow_step(true, false);
        }
        assert_eq!(c.count(), 7);

        // Frozen under pause regardless of the raw condition.
        for _ in 0..50 {
            c.slow_step(true, true);
            c.slow_step(false, true);
        }
        assert_eq!(c.count(), 7);

        // Resumes immediately on clearing.
        c.slow_step(true, false);
        assert_eq!(c.count(), 8);
    }

    #[test]
    fn raw_faults_from_bus() {
        let (band, raw) = RawFaults::from_bus(0b01_0000_0000);
        assert_eq!(band, SpeedBand::UnderRange);
        assert_eq!(raw.flags, [true, false, false, false]);

        let (band, raw) = RawFaults::from_bus(0b10_1111_1111);
        assert_eq!(band, SpeedBand::OverRange);
        assert_eq!(raw.flags, [false, true, false, false]);

        let (band, raw) = RawFaults::from_bus(0b01_0000_0101);
        assert_eq!(band, SpeedBand::Invalid);
        assert_eq!(raw.flags, [false, false, true, false]);

        // Valid band with contradictory aux pair → only the 25-km class.
        let (band, raw) = RawFaults::from_bus(0b01_0011_1111);
        assert_eq!(band, SpeedBand::B90To110);
        assert_eq!(raw.flags, [false, false, false, true]);

        // Clean sample.
        let (_, raw) = RawFaults::from_bus(0b10_0000_1111);
        assert!(!raw.any());
    }

    #[test]
    fn forced_maximum_while_latched() {
        let mut mon = SpeedMonitor::new(FAULT_COUNTER_CEILING);
        let (_, raw) = RawFaults::from_bus(0b01_0000_0000); // under-range
        for _ in 0..FAULT_COUNTER_CEILING {
            mon.slow_step(raw, false);
        }
        assert!(mon.any_latched());
        assert_eq!(mon.latched(), [true, false, false, false]);
        assert!(mon.minor_faults().contains(MinorFault::SPD_UNDER_RANGE));

        // Raw condition cleared: forcing persists while the latch decays.
        let (band, clean) = RawFaults::from_bus(0b10_0000_1111);
        mon.slow_step(clean, false);
        mon.slow_step(clean, false);
        assert!(mon.any_latched());
        assert_eq!(mon.published_band(band), SpeedBand::Above110);

        // Full decay clears the latch and the forcing.
        for _ in 0..FAULT_COUNTER_CEILING {
            mon.slow_step(clean, false);
        }
        assert!(!mon.any_latched());
        assert_eq!(mon.published_band(band), SpeedBand::B25To75);
        assert!(mon.minor_faults().is_empty());
    }

    #[test]
    fn classes_count_independently() {
        let mut mon = SpeedMonitor::new(FAULT_COUNTER_CEILING);
        let (_, under) = RawFaults::from_bus(0b01_0000_0000);
        let (_, invalid) = RawFaults::from_bus(0b01_0000_0101);
        for _ in 0..5 {
            mon.slow_step(under, false);
        }
        for _ in 0..3 {
            mon.slow_step(invalid, false);
        }
        // Under-range decayed while invalid-code accumulated.
        assert_eq!(mon.counter(FaultClass::UnderRange).count(), 2);
        assert_eq!(mon.counter(FaultClass::InvalidCode).count(), 3);
        assert_eq!(mon.counter(FaultClass::OverRange).count(), 0);
    }

    #[test]
    fn reset_clears_counters_and_latch() {
        let mut mon = SpeedMonitor::new(FAULT_COUNTER_CEILING);
        let (_, raw) = RawFaults::from_bus(0b01_0000_0000);
        for _ in 0..FAULT_COUNTER_CEILING {
            mon.slow_step(raw, false);
        }
        mon.reset();
        assert!(!mon.any_latched());
        assert_eq!(mon.counter(FaultClass::UnderRange).count(), 0);
    }
}
