//! Task identity, metrics, and residency types.

use std::fmt;

use crate::domain::clock::VirtualTimeNs;

/// Task identifier.
///
/// # Design Notes
///
/// A newtype rather than a raw integer: a pid cannot be confused with a
/// time or a weight in a signature, and it is the final tie-breaker in
/// every ordering the engine uses, so its `Ord` matters. Uniqueness is
/// enforced at admission, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub u32);

impl Pid {
    /// Create a new pid.
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a task currently resides.
///
/// Every task is in exactly one place at any observable instant: waiting
/// for its arrival time, eligible to run, or finished. The scheduler's
/// `locate` accessor reports this, and the residency tests lean on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLocation {
    /// In the pending index; arrival time not yet reached.
    Pending,
    /// In the ready index; eligible for dispatch.
    Ready,
    /// In the completion roster.
    Completed,
}

impl fmt::Display for TaskLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskLocation::Pending => write!(f, "PENDING"),
            TaskLocation::Ready => write!(f, "READY"),
            TaskLocation::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Per-task lifecycle metrics, filled in as the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMetrics {
    /// Instant the task entered the simulation (immutable).
    pub arrival_ns: VirtualTimeNs,
    /// Instant of the first dispatch; set exactly once.
    pub first_run_ns: Option<VirtualTimeNs>,
    /// Instant the task finished; set exactly once.
    pub completion_ns: Option<VirtualTimeNs>,
    /// Number of distinct dispatch episodes.
    pub bursts: u64,
    /// CPU nanoseconds actually granted so far.
    pub consumed_ns: u64,
}

impl TaskMetrics {
    /// Fresh metrics for a task arriving at `arrival_ns`.
    pub const fn at_arrival(arrival_ns: VirtualTimeNs) -> Self {
        Self {
            arrival_ns,
            first_run_ns: None,
            completion_ns: None,
            bursts: 0,
            consumed_ns: 0,
        }
    }

    /// Completion minus arrival, once the task has finished.
    #[inline]
    pub fn turnaround_ns(&self) -> Option<u64> {
        self.completion_ns.map(|c| c - self.arrival_ns)
    }

    /// First dispatch minus arrival, once the task has been dispatched.
    #[inline]
    pub fn wait_ns(&self) -> Option<u64> {
        self.first_run_ns.map(|f| f - self.arrival_ns)
    }
}
