//! Nice Values and Load Weights
//!
//! # Overview
//!
//! Fairness is expressed through load weights: a task's nice value in
//! `[-20, +19]` maps to an integer weight, and virtual runtime accrues at a
//! rate inversely proportional to that weight. Two tasks with weights
//! `w_a` and `w_b` that stay runnable long enough converge to a CPU share
//! of `w_a : w_b`.
//!
//! # Weight Table
//!
//! The table is the canonical Linux `sched_prio_to_weight` mapping, built
//! around a ~1.25x step per nice level so that one nice level apart means
//! roughly a 10% CPU share difference. Nice 0 sits at [`NICE_0_WEIGHT`]
//! (1024), the reference point of the scale.

use std::fmt;

/// Weight assigned to nice 0; the reference point of the weight scale.
pub const NICE_0_WEIGHT: u64 = 1024;

/// Lowest (most favourable) nice value.
pub const NICE_MIN: i8 = -20;

/// Highest (least favourable) nice value.
pub const NICE_MAX: i8 = 19;

/// Canonical nice-to-weight table, indexed by `nice + 20`.
///
/// Derived from `weight(nice) = 1024 / 1.25^nice`, rounded the way the
/// kernel tradition rounds it.
const NICE_TO_WEIGHT: [u64; 40] = [
    /* -20 */ 88761, 71755, 56483, 46273, 36291,
    /* -15 */ 29154, 23254, 18705, 14949, 11916,
    /* -10 */ 9548, 7620, 6100, 4904, 3906,
    /*  -5 */ 3121, 2501, 1991, 1586, 1277,
    /*   0 */ 1024, 820, 655, 526, 423,
    /*   5 */ 335, 272, 215, 172, 137,
    /*  10 */ 110, 87, 70, 56, 45,
    /*  15 */ 36, 29, 23, 18, 15,
];

/// A validated nice value in `[-20, +19]`.
///
/// # Design Notes
///
/// The newtype guarantees that every `Nice` held by the engine indexes the
/// weight table in bounds, so the hot accounting path never range-checks.
/// Construction is the single validation point; parsers reject
/// out-of-range input before a `Nice` ever exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nice(i8);

impl Nice {
    /// Nice 0, the default priority.
    pub const ZERO: Nice = Nice(0);

    /// Create a nice value, rejecting anything outside `[-20, +19]`.
    #[inline]
    pub const fn new(value: i8) -> Option<Self> {
        if value >= NICE_MIN && value <= NICE_MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the raw nice value.
    #[inline(always)]
    pub const fn get(self) -> i8 {
        self.0
    }

    /// Load weight for this nice value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fairsim_core::domain::weight::{Nice, NICE_0_WEIGHT};
    ///
    /// assert_eq!(Nice::ZERO.weight(), NICE_0_WEIGHT);
    /// assert_eq!(Nice::new(-20).unwrap().weight(), 88761);
    /// assert_eq!(Nice::new(19).unwrap().weight(), 15);
    /// ```
    #[inline(always)]
    pub const fn weight(self) -> u64 {
        NICE_TO_WEIGHT[(self.0 + 20) as usize]
    }
}

impl fmt::Display for Nice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scale a granted slice of physical nanoseconds into virtual nanoseconds.
///
/// ```text
/// delta_vruntime = granted_ns * NICE_0_WEIGHT / weight(nice)
/// ```
///
/// The multiplication happens before the truncating division to preserve
/// precision; with the canonical weights the product stays far inside u64
/// for any realistic simulation horizon. A nice-0 task accrues virtual
/// time 1:1 with physical time; heavier tasks accrue more slowly and so
/// stay at the front of the ready order longer.
#[inline]
pub fn vruntime_delta(granted_ns: u64, nice: Nice) -> u64 {
    granted_ns * NICE_0_WEIGHT / nice.weight()
}
