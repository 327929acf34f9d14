//! Scheduler Core
//!
//! # Overview
//!
//! The [`Scheduler`] owns everything the simulation touches: the task
//! table, the two ordered indices (ready keyed by virtual runtime, pending
//! keyed by arrival), the virtual clock, the dynamic quantum, and the
//! completion roster. [`Scheduler::run_all_tasks`] drives the workload to
//! exhaustion on one logical CPU.
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├─ params: SchedulerParams        (latency target, granularity)
//!   ├─ clock: SimClock                (virtual nanoseconds)
//!   ├─ tasks: BTreeMap<Pid, TaskRecord>
//!   ├─ pending: TaskIndex             keyed by (arrival, pid)
//!   ├─ ready: TaskIndex               keyed by (v_runtime, pid)
//!   ├─ quantum_ns                     max(granularity, latency / ready)
//!   └─ completed: Vec<Pid>            completion order
//! ```

mod core;
pub mod proofs;
mod types;

pub use self::core::Scheduler;
pub use types::{SchedulerError, SchedulerParams};
