//! Domain Layer
//!
//! # Architecture Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Domain Layer                          │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │  weight            clock             index                 │
//! │  ├─ Nice           ├─ SimClock       ├─ TaskIndex          │
//! │  └─ vruntime_delta └─ VirtualTimeNs  └─ cached leftmost    │
//! │                                                            │
//! │  task                        sched                         │
//! │  ├─ Pid                      ├─ SchedulerParams            │
//! │  ├─ TaskMetrics              ├─ SchedulerError             │
//! │  └─ TaskRecord               └─ Scheduler                  │
//! │                                                            │
//! │                 SimulationBuilder (assembly)               │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The leaves know nothing about each other; the scheduler composes them,
//! and the builder assembles a ready-to-run scheduler from raw workload
//! values.

pub mod clock;
pub mod index;
pub mod sched;
pub mod task;
pub mod weight;

pub use clock::{SimClock, VirtualTimeNs};
pub use index::TaskIndex;
pub use sched::{Scheduler, SchedulerError, SchedulerParams};
pub use task::{Pid, TaskLocation, TaskMetrics, TaskRecord};
pub use weight::{Nice, NICE_0_WEIGHT};

/// Declarative assembly of a simulation.
///
/// Validates raw workload values (range-checks nice, rejects empty
/// durations), assigns pids in insertion order starting at 1, and hands
/// back a scheduler with the pending set populated.
///
/// # Example
///
/// ```rust
/// use fairsim_core::domain::SimulationBuilder;
///
/// let mut sched = SimulationBuilder::new()
///     .time_quantum_ns(100_000_000)
///     .min_granularity_ns(4_000_000)
///     .task(0, 0, 40_000_000)
///     .task(0, 5, 40_000_000)
///     .build()
///     .unwrap();
///
/// sched.run_all_tasks();
/// assert_eq!(sched.completed().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    time_quantum_ns: u64,
    min_granularity_ns: u64,
    tasks: Vec<TaskSpec>,
}

/// Raw, not-yet-validated task declaration.
#[derive(Debug, Clone, Copy)]
struct TaskSpec {
    arrival_ns: u64,
    nice: i8,
    duration_ns: u64,
}

impl SimulationBuilder {
    /// Builder with conventional defaults: 20 ms latency target, 4 ms
    /// minimum granularity.
    pub fn new() -> Self {
        Self {
            time_quantum_ns: 20_000_000,
            min_granularity_ns: 4_000_000,
            tasks: Vec::new(),
        }
    }

    /// Set the scheduling-latency target in nanoseconds.
    pub fn time_quantum_ns(mut self, ns: u64) -> Self {
        self.time_quantum_ns = ns;
        self
    }

    /// Set the minimum granularity in nanoseconds.
    pub fn min_granularity_ns(mut self, ns: u64) -> Self {
        self.min_granularity_ns = ns;
        self
    }

    /// Append a task; the pid is its 1-based position in insertion order.
    pub fn task(mut self, arrival_ns: u64, nice: i8, duration_ns: u64) -> Self {
        self.tasks.push(TaskSpec {
            arrival_ns,
            nice,
            duration_ns,
        });
        self
    }

    /// Validate everything and assemble the scheduler.
    ///
    /// # Errors
    ///
    /// Parameter, nice-range, and duration violations surface as
    /// [`SchedulerError`]; the first offender wins.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        let params = SchedulerParams::new(self.time_quantum_ns, self.min_granularity_ns)?;
        let mut sched = Scheduler::new(params);

        for (i, spec) in self.tasks.into_iter().enumerate() {
            let pid = Pid::new(i as u32 + 1);
            let nice =
                Nice::new(spec.nice).ok_or(SchedulerError::NiceOutOfRange { value: spec.nice })?;
            if spec.duration_ns == 0 {
                return Err(SchedulerError::ZeroDuration { pid });
            }
            sched.schedule_task(TaskRecord::new(pid, nice, spec.arrival_ns, spec.duration_ns))?;
        }

        Ok(sched)
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assigns_sequential_pids() {
        let sched = SimulationBuilder::new()
            .task(0, 0, 1_000_000)
            .task(0, 0, 1_000_000)
            .task(0, 0, 1_000_000)
            .build()
            .unwrap();
        assert_eq!(sched.task_count(), 3);
        assert!(sched.task(Pid::new(1)).is_some());
        assert!(sched.task(Pid::new(3)).is_some());
        assert!(sched.task(Pid::new(4)).is_none());
    }

    #[test]
    fn test_builder_rejects_bad_nice() {
        let err = SimulationBuilder::new()
            .task(0, 21, 1_000_000)
            .build()
            .unwrap_err();
        assert_eq!(err, SchedulerError::NiceOutOfRange { value: 21 });
    }

    #[test]
    fn test_builder_rejects_zero_duration() {
        let err = SimulationBuilder::new().task(0, 0, 0).build().unwrap_err();
        assert_eq!(err, SchedulerError::ZeroDuration { pid: Pid::new(1) });
    }

    #[test]
    fn test_builder_rejects_zero_parameters() {
        let err = SimulationBuilder::new()
            .time_quantum_ns(0)
            .build()
            .unwrap_err();
        assert_eq!(err, SchedulerError::InvalidTimeQuantum);
    }
}
