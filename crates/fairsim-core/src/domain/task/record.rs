//! The task record: attributes, accounting, and metric transitions.

use crate::domain::clock::VirtualTimeNs;
use crate::domain::task::types::{Pid, TaskMetrics};
use crate::domain::weight::Nice;

/// One simulated task.
///
/// # Accounting Contract
///
/// The record owns its remaining-duration counter and its metrics; the
/// scheduler owns the clock and decides how much CPU to grant. Each
/// accounting tick goes through [`TaskRecord::step`], which consumes up to
/// the offered slice and reports completion, followed by
/// [`TaskRecord::advance_vruntime`] with the weight-scaled delta. Virtual
/// runtime is monotone by construction: the only other mutation,
/// [`TaskRecord::floor_vruntime`], takes a maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pid: Pid,
    nice: Nice,
    duration_ns: u64,
    remaining_ns: u64,
    v_runtime: u64,
    metrics: TaskMetrics,
}

impl TaskRecord {
    /// Create a task that arrives at `arrival_ns` and needs `duration_ns`
    /// of CPU in total.
    pub fn new(pid: Pid, nice: Nice, arrival_ns: VirtualTimeNs, duration_ns: u64) -> Self {
        Self {
            pid,
            nice,
            duration_ns,
            remaining_ns: duration_ns,
            v_runtime: 0,
            metrics: TaskMetrics::at_arrival(arrival_ns),
        }
    }

    /// Task identifier.
    #[inline(always)]
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    /// Nice value.
    #[inline(always)]
    pub const fn nice(&self) -> Nice {
        self.nice
    }

    /// Total CPU the task requires.
    #[inline(always)]
    pub const fn duration_ns(&self) -> u64 {
        self.duration_ns
    }

    /// CPU still owed.
    #[inline(always)]
    pub const fn remaining_ns(&self) -> u64 {
        self.remaining_ns
    }

    /// Accumulated virtual runtime.
    #[inline(always)]
    pub const fn v_runtime(&self) -> u64 {
        self.v_runtime
    }

    /// Recorded metrics.
    #[inline(always)]
    pub const fn metrics(&self) -> &TaskMetrics {
        &self.metrics
    }

    /// Consume up to `slice_ns` of CPU.
    ///
    /// Grants `min(slice_ns, remaining)`, so the final tick of a task whose
    /// duration is not a multiple of the granularity consumes exactly the
    /// remainder and `consumed_ns` lands on `duration_ns`.
    ///
    /// Returns `true` iff the task has now consumed its full duration.
    pub fn step(&mut self, slice_ns: u64) -> bool {
        let granted = slice_ns.min(self.remaining_ns);
        self.remaining_ns -= granted;
        self.metrics.consumed_ns += granted;
        self.remaining_ns == 0
    }

    /// Credit weight-scaled virtual runtime for a granted slice.
    #[inline]
    pub fn advance_vruntime(&mut self, delta: u64) {
        self.v_runtime += delta;
    }

    /// Raise virtual runtime to at least `floor`.
    ///
    /// Applied once per promotion out of the pending set so a late arrival
    /// cannot undercut the whole ready set with a zero accumulator. Never
    /// lowers the value.
    #[inline]
    pub fn floor_vruntime(&mut self, floor: u64) {
        self.v_runtime = self.v_runtime.max(floor);
    }

    /// Record the start of a dispatch episode at `now_ns`.
    ///
    /// The first call stamps `first_run_ns`; every call counts a burst.
    pub fn begin_burst(&mut self, now_ns: VirtualTimeNs) {
        if self.metrics.first_run_ns.is_none() {
            self.metrics.first_run_ns = Some(now_ns);
        }
        self.metrics.bursts += 1;
    }

    /// Record completion at `now_ns`.
    ///
    /// # Panics
    ///
    /// Panics if the task still owes CPU or was already completed; a
    /// double completion is a scheduler bug, not a task state.
    pub fn mark_completed(&mut self, now_ns: VirtualTimeNs) {
        assert_eq!(
            self.remaining_ns, 0,
            "completion with {}ns remaining on task {}",
            self.remaining_ns, self.pid
        );
        assert!(
            self.metrics.completion_ns.is_none(),
            "task {} completed twice",
            self.pid
        );
        self.metrics.completion_ns = Some(now_ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(duration_ns: u64) -> TaskRecord {
        TaskRecord::new(Pid::new(1), Nice::ZERO, 0, duration_ns)
    }

    #[test]
    fn test_step_whole_slices() {
        let mut t = task(12);
        assert!(!t.step(4));
        assert!(!t.step(4));
        assert!(t.step(4));
        assert_eq!(t.remaining_ns(), 0);
        assert_eq!(t.metrics().consumed_ns, 12);
    }

    #[test]
    fn test_step_partial_final_slice() {
        let mut t = task(10);
        assert!(!t.step(4));
        assert!(!t.step(4));
        // Only 2ns left; the tick grants the remainder, not the full slice.
        assert!(t.step(4));
        assert_eq!(t.metrics().consumed_ns, 10);
    }

    #[test]
    fn test_vruntime_floor_never_lowers() {
        let mut t = task(100);
        t.advance_vruntime(500);
        t.floor_vruntime(200);
        assert_eq!(t.v_runtime(), 500);
        t.floor_vruntime(900);
        assert_eq!(t.v_runtime(), 900);
    }

    #[test]
    fn test_first_run_stamped_once() {
        let mut t = task(100);
        t.begin_burst(10);
        t.begin_burst(50);
        assert_eq!(t.metrics().first_run_ns, Some(10));
        assert_eq!(t.metrics().bursts, 2);
    }

    #[test]
    #[should_panic(expected = "completion with")]
    fn test_premature_completion_panics() {
        let mut t = task(100);
        t.step(40);
        t.mark_completed(40);
    }
}
