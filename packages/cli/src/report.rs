//! Completion report formatting.
//!
//! The engine exposes completed tasks in completion order; this module
//! turns them into the user-facing report. Two renderings share one row
//! type: an aligned text table and, behind `--json`, a serialized array.

use fairsim_core::domain::Scheduler;
use serde::{Deserialize, Serialize};

/// One report line, in nanoseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRow {
    /// Task identifier.
    pub pid: u32,
    /// Nice value.
    pub nice: i8,
    /// Arrival instant.
    pub arrival_ns: u64,
    /// First dispatch instant.
    pub first_run_ns: u64,
    /// Completion instant.
    pub completion_ns: u64,
    /// Completion minus arrival.
    pub turnaround_ns: u64,
    /// Dispatch episodes.
    pub bursts: u64,
}

/// Build report rows from a finished simulation, in completion order.
///
/// # Panics
///
/// Panics if a task in the completion roster is missing its instants;
/// after `run_all_tasks` that would be an engine bug.
pub fn rows(sched: &Scheduler) -> Vec<ReportRow> {
    sched
        .completed_tasks()
        .map(|task| {
            let m = task.metrics();
            let completion_ns = m
                .completion_ns
                .expect("completed task without a completion instant");
            let first_run_ns = m
                .first_run_ns
                .expect("completed task that never ran");
            ReportRow {
                pid: task.pid().as_u32(),
                nice: task.nice().get(),
                arrival_ns: m.arrival_ns,
                first_run_ns,
                completion_ns,
                turnaround_ns: completion_ns - m.arrival_ns,
                bursts: m.bursts,
            }
        })
        .collect()
}

/// Aligned text table; the header prints even when there are no rows.
pub fn render_table(rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:>5} {:>14} {:>14} {:>14} {:>14} {:>7}\n",
        "PID", "NICE", "ARRIVAL", "FIRST_RUN", "COMPLETION", "TURNAROUND", "BURSTS"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:>6} {:>5} {:>14} {:>14} {:>14} {:>14} {:>7}\n",
            row.pid,
            row.nice,
            row.arrival_ns,
            row.first_run_ns,
            row.completion_ns,
            row.turnaround_ns,
            row.bursts
        ));
    }
    out
}

/// Pretty-printed JSON array of rows.
pub fn render_json(rows: &[ReportRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}
