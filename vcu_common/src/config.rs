//! Configuration structs for the vigilance timing core.
//!
//! Every timing constant the requirements leave tunable lives here: the
//! speed-keyed T1 schedule, the fixed T2/T3/T4 durations, the per-TLA-class
//! event limits and lockouts, and the fault-counter/comparator ceilings.
//! Defaults encode the values observed on the reference hardware.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    CAB_HELD_S, DISAGREE_STREAK_LIMIT, FAULT_COUNTER_CEILING, IN_RANGE_BANDS, SLOW_TICK_MS,
    SPD_FAILURE_BYPASS_S, T2_S, T3_S, T4_S, TLA_CLASS_COUNT, VPB_HELD_S,
};
use crate::state::TlaClass;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("t1_schedule_s[{index}] = {value} must be positive")]
    NonPositiveT1 { index: usize, value: f64 },
    #[error("t1_schedule_s must be non-increasing: [{index}] = {value} > [{}] = {prev}", .index - 1)]
    NonMonotoneT1 { index: usize, value: f64, prev: f64 },
    #[error("{name} = {value} must be positive")]
    NonPositiveDuration { name: &'static str, value: f64 },
    #[error("{name} must be > 0")]
    ZeroCeiling { name: &'static str },
    #[error("tla[{class:?}].lockout_s = {value} must be >= 0")]
    NegativeLockout { class: TlaClass, value: f64 },
    #[error("tla[{class:?}].max_consecutive = 0 (use a positive limit, or omit for unlimited)")]
    ZeroEventLimit { class: TlaClass },
}

/// Per-TLA-class event policy.
///
/// `max_consecutive = None` encodes "unlimited" — the class always resets
/// the active timer (bypass-acknowledge behavior).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TlaClassConfig {
    /// Maximum consecutive accepted events before timer resets from this
    /// class are suppressed. `None` = unlimited.
    #[serde(default)]
    pub max_consecutive: Option<u32>,
    /// Lockout period after an accepted event during which repeats from
    /// the same class are ignored [s].
    #[serde(default)]
    pub lockout_s: f64,
}

/// Complete timing-core configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcuConfig {
    /// NoWarning duration T1 per in-range speed band, `B0To3..=Above110` [s].
    #[serde(default = "default_t1_schedule")]
    pub t1_schedule_s: [f64; IN_RANGE_BANDS],
    /// 1st-stage warning duration T2 [s].
    #[serde(default = "default_t2")]
    pub t2_s: f64,
    /// 2nd-stage warning duration T3 on first entry [s].
    #[serde(default = "default_t3")]
    pub t3_s: f64,
    /// T3 preload when 2nd stage is re-entered without passing through
    /// NoWarning (re-armed entry).
    #[serde(default = "default_t3_rearm")]
    pub t3_rearm_s: f64,
    /// Train-stopped dwell duration T4 [s].
    #[serde(default = "default_t4")]
    pub t4_s: f64,
    /// Vigilance-push hold for the NoWarning fast-path [s].
    #[serde(default = "default_vpb_held")]
    pub vpb_held_s: f64,
    /// Cab-active hold for the penalty-state release [s].
    #[serde(default = "default_cab_held")]
    pub cab_held_s: f64,
    /// Sustained speed-failure window for the braking bypass [s].
    #[serde(default = "default_spd_bypass")]
    pub spd_failure_bypass_s: f64,
    /// Saturation ceiling for the speed fault counters.
    #[serde(default = "default_fault_ceiling")]
    pub fault_counter_ceiling: u32,
    /// Slow tick period [ms] (fault counters, timer countdowns).
    #[serde(default = "default_slow_tick_ms")]
    pub slow_tick_ms: u64,
    /// Comparator disagreement streak that triggers masking.
    #[serde(default = "default_streak_limit")]
    pub disagree_streak_limit: u32,
    /// Per-class TLA policy in slot order.
    #[serde(default = "default_tla_table")]
    pub tla: [TlaClassConfig; TLA_CLASS_COUNT],
}

fn default_t1_schedule() -> [f64; IN_RANGE_BANDS] {
    // 45 s through the 25-75 band, tapering to 25 s above 110 km/h.
    [45.0, 45.0, 45.0, 45.0, 35.0, 30.0, 25.0]
}
fn default_t2() -> f64 {
    T2_S
}
fn default_t3() -> f64 {
    T3_S
}
fn default_t3_rearm() -> f64 {
    T3_S
}
fn default_t4() -> f64 {
    T4_S
}
fn default_vpb_held() -> f64 {
    VPB_HELD_S
}
fn default_cab_held() -> f64 {
    CAB_HELD_S
}
fn default_spd_bypass() -> f64 {
    SPD_FAILURE_BYPASS_S
}
fn default_fault_ceiling() -> u32 {
    FAULT_COUNTER_CEILING
}
fn default_slow_tick_ms() -> u64 {
    SLOW_TICK_MS
}
fn default_streak_limit() -> u32 {
    DISAGREE_STREAK_LIMIT
}

fn default_tla_table() -> [TlaClassConfig; TLA_CLASS_COUNT] {
    // Observed table: MC demand 15/0 s, horns 15/10 s, headlight 1/5 s,
    // wiper-washer 1/10 s, bypass-ack unlimited/10 s, spares 15/10 s.
    [
        TlaClassConfig { max_consecutive: Some(15), lockout_s: 0.0 },  // McDemand
        TlaClassConfig { max_consecutive: Some(15), lockout_s: 10.0 }, // HornLow
        TlaClassConfig { max_consecutive: Some(15), lockout_s: 10.0 }, // HornHigh
        TlaClassConfig { max_consecutive: Some(1), lockout_s: 5.0 },   // Headlight
        TlaClassConfig { max_consecutive: Some(1), lockout_s: 10.0 },  // WiperWasher
        TlaClassConfig { max_consecutive: None, lockout_s: 10.0 },     // BypassAck
        TlaClassConfig { max_consecutive: Some(15), lockout_s: 10.0 }, // Spare1
        TlaClassConfig { max_consecutive: Some(15), lockout_s: 10.0 }, // Spare2
    ]
}

impl Default for VcuConfig {
    fn default() -> Self {
        Self {
            t1_schedule_s: default_t1_schedule(),
            t2_s: default_t2(),
            t3_s: default_t3(),
            t3_rearm_s: default_t3_rearm(),
            t4_s: default_t4(),
            vpb_held_s: default_vpb_held(),
            cab_held_s: default_cab_held(),
            spd_failure_bypass_s: default_spd_bypass(),
            fault_counter_ceiling: default_fault_ceiling(),
            slow_tick_ms: default_slow_tick_ms(),
            disagree_streak_limit: default_streak_limit(),
            tla: default_tla_table(),
        }
    }
}

impl VcuConfig {
    /// Validate parameter bounds and schedule monotonicity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, &value) in self.t1_schedule_s.iter().enumerate() {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveT1 { index, value });
            }
            if index > 0 {
                let prev = self.t1_schedule_s[index - 1];
                if value > prev {
                    return Err(ConfigError::NonMonotoneT1 { index, value, prev });
                }
            }
        }

        for (name, value) in [
            ("t2_s", self.t2_s),
            ("t3_s", self.t3_s),
            ("t3_rearm_s", self.t3_rearm_s),
            ("t4_s", self.t4_s),
            ("vpb_held_s", self.vpb_held_s),
            ("cab_held_s", self.cab_held_s),
            ("spd_failure_bypass_s", self.spd_failure_bypass_s),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        if self.fault_counter_ceiling == 0 {
            return Err(ConfigError::ZeroCeiling {
                name: "fault_counter_ceiling",
            });
        }
        if self.slow_tick_ms == 0 {
            return Err(ConfigError::ZeroCeiling { name: "slow_tick_ms" });
        }
        if self.disagree_streak_limit == 0 {
            return Err(ConfigError::ZeroCeiling {
                name: "disagree_streak_limit",
            });
        }

        for (i, entry) in self.tla.iter().enumerate() {
            let class = TlaClass::ALL[i];
            if entry.lockout_s < 0.0 {
                return Err(ConfigError::NegativeLockout {
                    class,
                    value: entry.lockout_s,
                });
            }
            if entry.max_consecutive == Some(0) {
                return Err(ConfigError::ZeroEventLimit { class });
            }
        }

        Ok(())
    }

    /// T1 duration [s] for a speed band.
    ///
    /// Fault codes and the forced-maximum band load the top-band (shortest)
    /// constant; under-range loads the lowest-band constant.
    pub fn t1_for_band(&self, band: crate::state::SpeedBand) -> f64 {
        use crate::state::SpeedBand;
        match band.schedule_index() {
            Some(i) => self.t1_schedule_s[i],
            None => match band {
                SpeedBand::UnderRange => self.t1_schedule_s[0],
                // OverRange / Invalid: shortest T1 is the safe choice.
                _ => self.t1_schedule_s[IN_RANGE_BANDS - 1],
            },
        }
    }
}
