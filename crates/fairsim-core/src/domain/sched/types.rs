//! Scheduler parameters and caller-facing errors.

use thiserror::Error;

use crate::domain::task::Pid;

/// Validated scheduler tuning parameters.
///
/// Both values are virtual nanoseconds. `time_quantum_ns` is the
/// scheduling-latency target: the period within which every ready task
/// should be dispatched at least once. `min_granularity_ns` is both the
/// floor of the per-dispatch slice and the atomic unit of simulated CPU
/// time in accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerParams {
    time_quantum_ns: u64,
    min_granularity_ns: u64,
}

impl SchedulerParams {
    /// Validate and construct; both parameters must be strictly positive.
    pub fn new(time_quantum_ns: u64, min_granularity_ns: u64) -> Result<Self, SchedulerError> {
        if time_quantum_ns == 0 {
            return Err(SchedulerError::InvalidTimeQuantum);
        }
        if min_granularity_ns == 0 {
            return Err(SchedulerError::InvalidMinGranularity);
        }
        Ok(Self {
            time_quantum_ns,
            min_granularity_ns,
        })
    }

    /// Scheduling-latency target.
    #[inline(always)]
    pub const fn time_quantum_ns(&self) -> u64 {
        self.time_quantum_ns
    }

    /// Minimum slice / accounting unit.
    #[inline(always)]
    pub const fn min_granularity_ns(&self) -> u64 {
        self.min_granularity_ns
    }
}

/// Contract violations detectable before the simulation runs.
///
/// Everything that can go wrong inside `run_all_tasks` itself is a
/// programmer error and aborts with a diagnostic; these variants cover
/// what a caller can get wrong while setting a simulation up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The scheduling-latency target was zero.
    #[error("time quantum must be a positive number of nanoseconds")]
    InvalidTimeQuantum,

    /// The minimum granularity was zero.
    #[error("minimum granularity must be a positive number of nanoseconds")]
    InvalidMinGranularity,

    /// A task with this pid is already part of the simulation.
    #[error("duplicate pid {pid}")]
    DuplicatePid {
        /// The offending pid.
        pid: Pid,
    },

    /// The task's arrival time is already in the past.
    #[error("task {pid} arrives at {arrival_ns}ns behind the clock at {now_ns}ns")]
    LateArrival {
        /// The offending pid.
        pid: Pid,
        /// The task's arrival instant.
        arrival_ns: u64,
        /// The clock reading at submission.
        now_ns: u64,
    },

    /// A nice value outside `[-20, +19]` reached the builder.
    #[error("nice value {value} outside [-20, +19]")]
    NiceOutOfRange {
        /// The rejected raw value.
        value: i8,
    },

    /// A task was declared with no work to do.
    #[error("task {pid} has zero duration")]
    ZeroDuration {
        /// The offending pid.
        pid: Pid,
    },
}
