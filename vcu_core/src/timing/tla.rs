//! Task-linked-activity event management (FPGA-REQ-40 family).
//!
//! Eight input classes share a slot array with heterogeneous policies:
//! a per-class maximum-consecutive-event count (`None` = unlimited, the
//! bypass-acknowledge behavior) and a per-class lockout period during
//! which repeats from the same class are ignored outright.

use heapless::Vec;

use vcu_common::config::VcuConfig;
use vcu_common::consts::{TLA_CLASS_COUNT, fast_ticks};
use vcu_common::state::TlaClass;

/// One consecutive-event slot. `remaining = None` encodes "unlimited".
#[derive(Debug, Clone, Copy)]
struct TlaSlot {
    remaining: Option<u32>,
    lockout_left: u32,
}

/// Outcome of offering an event to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlaVerdict {
    /// Event accepted — the active vigilance timer reloads.
    ResetTimer,
    /// Event accepted for counting, but the class cap is exhausted —
    /// the timer keeps counting down through this event.
    CapExhausted,
    /// Event inside the class lockout window — ignored entirely.
    LockedOut,
}

/// Shared consecutive-event counter array across the 8 TLA classes.
#[derive(Debug, Clone)]
pub struct TlaManager {
    slots: [TlaSlot; TLA_CLASS_COUNT],
    maxima: [Option<u32>; TLA_CLASS_COUNT],
    lockout_ticks: [u32; TLA_CLASS_COUNT],
    /// Classes that have fired since the last restore (diagnostics).
    fired: Vec<TlaClass, TLA_CLASS_COUNT>,
}

impl TlaManager {
    pub fn new(config: &VcuConfig) -> Self {
        let mut maxima = [None; TLA_CLASS_COUNT];
        let mut lockout_ticks = [0u32; TLA_CLASS_COUNT];
        for (i, entry) in config.tla.iter().enumerate() {
            maxima[i] = entry.max_consecutive;
            lockout_ticks[i] = fast_ticks(entry.lockout_s);
        }
        let slots = core::array::from_fn(|i| TlaSlot {
            remaining: maxima[i],
            lockout_left: 0,
        });
        Self {
            slots,
            maxima,
            lockout_ticks,
            fired: Vec::new(),
        }
    }

    /// Remaining consecutive events for a class (`None` = unlimited).
    #[inline]
    pub fn remaining(&self, class: TlaClass) -> Option<u32> {
        self.slots[class as usize].remaining
    }

    /// Classes fired since the last restore, in firing order.
    #[inline]
    pub fn fired_since_restore(&self) -> &[TlaClass] {
        &self.fired
    }

    /// Advance lockout windows by one fast tick.
    pub fn fast_tick(&mut self) {
        for slot in &mut self.slots {
            if slot.lockout_left > 0 {
                slot.lockout_left -= 1;
            }
        }
    }

    /// Offer one event of `class`.
    ///
    /// An accepted event restores every *other* class to its maximum,
    /// decrements its own slot, and re-arms its lockout window.
    pub fn offer_event(&mut self, class: TlaClass) -> TlaVerdict {
        let idx = class as usize;
        if self.slots[idx].lockout_left > 0 {
            return TlaVerdict::LockedOut;
        }

        // A different class firing restores all other counters.
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i != idx {
                slot.remaining = self.maxima[i];
            }
        }
        if !self.fired.contains(&class) {
            // Capacity equals the class count; push cannot fail.
            let _ = self.fired.push(class);
        }
        self.slots[idx].lockout_left = self.lockout_ticks[idx];

        match self.slots[idx].remaining {
            None => TlaVerdict::ResetTimer,
            Some(0) => TlaVerdict::CapExhausted,
            Some(n) => {
                self.slots[idx].remaining = Some(n - 1);
                TlaVerdict::ResetTimer
            }
        }
    }

    /// Restore every slot to its maximum.
    ///
    /// Called on a vigilance-push acknowledge and on an operating-mode
    /// transition to Suppressed.
    pub fn restore_all(&mut self) {
        for (slot, &max) in self.slots.iter_mut().zip(self.maxima.iter()) {
            slot.remaining = max;
        }
        self.fired.clear();
    }

    /// Full system reset: restore counters and clear lockouts.
    pub fn reset(&mut self) {
        self.restore_all();
        for slot in &mut self.slots {
            slot.lockout_left = 0;
        }
    }
}
