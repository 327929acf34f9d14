//! Fairsim Scheduling Simulator
//!
//! # Overview
//!
//! `fairsim-core` is a deterministic discrete-event engine that models a
//! single CPU dispatching a finite workload under completely-fair
//! proportional scheduling. Time is virtual nanoseconds; the engine
//! advances it tick by tick while a task runs and jumps it forward across
//! idle gaps, so a run's outcome depends only on the workload and the two
//! tuning parameters.
//!
//! # Enforced Invariants
//!
//! The engine treats these as physical laws; violating one aborts the
//! simulation with a diagnostic naming it:
//!
//! ## Temporal
//! - **Clock Monotonicity**: virtual time never decreases.
//! - **Vruntime Monotonicity**: a task's virtual runtime never decreases.
//!
//! ## Fairness
//! - **Minimum Selection**: every dispatch takes the least
//!   `(v_runtime, pid)` entry of the ready set.
//! - **Deterministic Tie-break**: equal virtual runtimes resolve by pid,
//!   so identical workloads replay identically.
//! - **Latecomer Floor**: a task promoted out of the pending set starts
//!   at no less than the ready minimum's virtual runtime.
//!
//! ## Accounting
//! - **Conservation**: once the run completes, every task's consumed CPU
//!   equals its declared duration.
//! - **Single Residency**: every task is in exactly one of pending,
//!   ready, dispatched, completed.
//!
//! # Usage
//!
//! ```rust
//! use fairsim_core::domain::SimulationBuilder;
//!
//! let mut sched = SimulationBuilder::new()
//!     .time_quantum_ns(100_000_000)
//!     .min_granularity_ns(4_000_000)
//!     .task(0, 0, 40_000_000)          // arrival, nice, duration
//!     .task(50_000_000, -10, 20_000_000)
//!     .build()
//!     .unwrap();
//!
//! sched.run_all_tasks();
//!
//! for task in sched.completed_tasks() {
//!     println!(
//!         "pid {} finished at {}ns after {} bursts",
//!         task.pid(),
//!         task.metrics().completion_ns.unwrap(),
//!         task.metrics().bursts,
//!     );
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;

// Re-export the primary surface.
pub use domain::{
    Nice, Pid, Scheduler, SchedulerError, SchedulerParams, SimClock, SimulationBuilder,
    TaskLocation, TaskMetrics, TaskRecord, VirtualTimeNs,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty());
    }
}
