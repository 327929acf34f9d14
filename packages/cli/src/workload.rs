//! Workload file parsing.
//!
//! The on-disk format is line-oriented: the first two meaningful lines are
//! the time quantum and the minimum granularity in decimal seconds, and
//! every following line declares one task as
//! `arrival_seconds nice duration_seconds`. Blank lines and lines starting
//! with `#` are ignored. Seconds are multiplied by 1e9 and truncated to
//! integer nanoseconds before they reach the engine.
//!
//! All validation happens here, with 1-based line numbers in every
//! diagnostic; the engine never sees out-of-range input.

use fairsim_core::domain::SimulationBuilder;
use thiserror::Error;

/// Nice values accepted by the simulator.
const NICE_RANGE: std::ops::RangeInclusive<i64> = -20..=19;

/// A parsed, validated workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    /// Scheduling-latency target in nanoseconds.
    pub time_quantum_ns: u64,
    /// Minimum granularity in nanoseconds.
    pub min_granularity_ns: u64,
    /// Task declarations in file order.
    pub tasks: Vec<TaskLine>,
}

/// One task declaration from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLine {
    /// Arrival instant in nanoseconds.
    pub arrival_ns: u64,
    /// Validated nice value.
    pub nice: i8,
    /// Required CPU in nanoseconds.
    pub duration_ns: u64,
}

/// Everything that can be wrong with a workload file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkloadError {
    /// The file ended before the time-quantum line.
    #[error("missing time quantum (first value line)")]
    MissingTimeQuantum,

    /// The file ended before the minimum-granularity line.
    #[error("missing minimum granularity (second value line)")]
    MissingMinGranularity,

    /// A field did not parse as a decimal number of seconds.
    #[error("line {line}: {found:?} is not a decimal number of seconds")]
    InvalidSeconds {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        found: String,
    },

    /// A field did not parse as an integer nice value.
    #[error("line {line}: {found:?} is not an integer nice value")]
    InvalidNice {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        found: String,
    },

    /// A task line had the wrong number of fields.
    #[error("line {line}: expected `arrival nice duration`, found {fields} fields")]
    WrongFieldCount {
        /// 1-based line number.
        line: usize,
        /// How many fields the line actually had.
        fields: usize,
    },

    /// A nice value outside `[-20, +19]`.
    #[error("line {line}: nice value {value} outside [-20, +19]")]
    NiceOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The rejected value.
        value: i64,
    },

    /// A value that must be strictly positive was not.
    #[error("line {line}: {field} must be positive")]
    NonPositive {
        /// 1-based line number.
        line: usize,
        /// Which field was at fault.
        field: &'static str,
    },

    /// A value that must not be negative was.
    #[error("line {line}: {field} must not be negative")]
    Negative {
        /// 1-based line number.
        line: usize,
        /// Which field was at fault.
        field: &'static str,
    },
}

/// Parse a whole workload file.
pub fn parse_str(input: &str) -> Result<Workload, WorkloadError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (line, text) = lines.next().ok_or(WorkloadError::MissingTimeQuantum)?;
    let time_quantum_ns = parse_positive_seconds(line, text, "time quantum")?;

    let (line, text) = lines.next().ok_or(WorkloadError::MissingMinGranularity)?;
    let min_granularity_ns = parse_positive_seconds(line, text, "minimum granularity")?;

    let mut tasks = Vec::new();
    for (line, text) in lines {
        tasks.push(parse_task_line(line, text)?);
    }

    Ok(Workload {
        time_quantum_ns,
        min_granularity_ns,
        tasks,
    })
}

impl Workload {
    /// Hand the workload to the engine's builder; pids are assigned in
    /// file order starting at 1.
    pub fn to_builder(&self) -> SimulationBuilder {
        let mut builder = SimulationBuilder::new()
            .time_quantum_ns(self.time_quantum_ns)
            .min_granularity_ns(self.min_granularity_ns);
        for task in &self.tasks {
            builder = builder.task(task.arrival_ns, task.nice, task.duration_ns);
        }
        builder
    }
}

/// `arrival_seconds nice duration_seconds`
fn parse_task_line(line: usize, text: &str) -> Result<TaskLine, WorkloadError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(WorkloadError::WrongFieldCount {
            line,
            fields: fields.len(),
        });
    }

    let arrival_ns = parse_seconds(line, fields[0], "arrival time")?;

    let nice: i64 = fields[1]
        .parse()
        .map_err(|_| WorkloadError::InvalidNice {
            line,
            found: fields[1].to_string(),
        })?;
    if !NICE_RANGE.contains(&nice) {
        return Err(WorkloadError::NiceOutOfRange { line, value: nice });
    }

    let duration_ns = parse_seconds(line, fields[2], "duration")?;
    if duration_ns == 0 {
        return Err(WorkloadError::NonPositive {
            line,
            field: "duration",
        });
    }

    Ok(TaskLine {
        arrival_ns,
        nice: nice as i8,
        duration_ns,
    })
}

/// Decimal seconds, non-negative, truncated to nanoseconds.
fn parse_seconds(line: usize, text: &str, field: &'static str) -> Result<u64, WorkloadError> {
    let seconds: f64 = text.parse().map_err(|_| WorkloadError::InvalidSeconds {
        line,
        found: text.to_string(),
    })?;
    if !seconds.is_finite() {
        return Err(WorkloadError::InvalidSeconds {
            line,
            found: text.to_string(),
        });
    }
    if seconds < 0.0 {
        return Err(WorkloadError::Negative { line, field });
    }
    Ok((seconds * 1e9) as u64)
}

fn parse_positive_seconds(
    line: usize,
    text: &str,
    field: &'static str,
) -> Result<u64, WorkloadError> {
    let ns = parse_seconds(line, text, field)?;
    if ns == 0 {
        return Err(WorkloadError::NonPositive { line, field });
    }
    Ok(ns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_workload() {
        let workload = parse_str("0.1\n0.004\n0 0 0.04\n").unwrap();
        assert_eq!(workload.time_quantum_ns, 100_000_000);
        assert_eq!(workload.min_granularity_ns, 4_000_000);
        assert_eq!(
            workload.tasks,
            vec![TaskLine {
                arrival_ns: 0,
                nice: 0,
                duration_ns: 40_000_000,
            }]
        );
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        let input = "# latency target\n0.1\n\n# granularity\n0.004\n\n# tasks\n0.05 -10 0.02\n";
        let workload = parse_str(input).unwrap();
        assert_eq!(workload.tasks.len(), 1);
        assert_eq!(workload.tasks[0].arrival_ns, 50_000_000);
        assert_eq!(workload.tasks[0].nice, -10);
    }

    #[test]
    fn test_seconds_truncate_to_nanoseconds() {
        // 1e-10 seconds is below one nanosecond; it truncates to zero,
        // which the duration check then rejects.
        let err = parse_str("0.1\n0.004\n0 0 0.0000000001\n").unwrap_err();
        assert_eq!(
            err,
            WorkloadError::NonPositive {
                line: 3,
                field: "duration",
            }
        );
    }

    #[test]
    fn test_empty_workload_is_valid() {
        let workload = parse_str("0.1\n0.004\n").unwrap();
        assert!(workload.tasks.is_empty());
    }

    #[test]
    fn test_missing_parameters() {
        assert_eq!(parse_str(""), Err(WorkloadError::MissingTimeQuantum));
        assert_eq!(
            parse_str("# only comments\n0.1\n"),
            Err(WorkloadError::MissingMinGranularity)
        );
    }

    #[test]
    fn test_diagnostics_carry_line_numbers() {
        let err = parse_str("0.1\n0.004\n0 0 0.04\n0 25 0.04\n").unwrap_err();
        assert_eq!(err, WorkloadError::NiceOutOfRange { line: 4, value: 25 });

        let err = parse_str("0.1\n0.004\n0 0\n").unwrap_err();
        assert_eq!(err, WorkloadError::WrongFieldCount { line: 3, fields: 2 });

        let err = parse_str("0.1\n0.004\nzero 0 0.04\n").unwrap_err();
        assert_eq!(
            err,
            WorkloadError::InvalidSeconds {
                line: 3,
                found: "zero".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_zero_parameters() {
        assert_eq!(
            parse_str("0\n0.004\n"),
            Err(WorkloadError::NonPositive {
                line: 1,
                field: "time quantum",
            })
        );
    }

    #[test]
    fn test_rejects_negative_arrival() {
        assert_eq!(
            parse_str("0.1\n0.004\n-1 0 0.04\n"),
            Err(WorkloadError::Negative {
                line: 3,
                field: "arrival time",
            })
        );
    }

    #[test]
    fn test_builder_round_trip() {
        let workload = parse_str("0.1\n0.004\n0 0 0.04\n0 0 0.04\n").unwrap();
        let mut sched = workload.to_builder().build().unwrap();
        sched.run_all_tasks();
        assert_eq!(sched.completed().len(), 2);
    }
}
