//! Task Records
//!
//! The entity side of the simulation: one [`TaskRecord`] per simulated
//! task, holding its static attributes (pid, nice, total duration), its
//! dynamic accounting (virtual runtime, remaining work), and the metrics
//! recorded as it moves through the pipeline. Records are owned by the
//! scheduler's task table; the ordered indices refer to them by pid only.

mod record;
mod types;

pub use record::TaskRecord;
pub use types::{Pid, TaskLocation, TaskMetrics};
