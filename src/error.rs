//! Engine errors.
//!
//! Infeasibility is not an error: it is reported through
//! [`FeasibilityResult`](crate::models::FeasibilityResult). The variants here
//! cover inputs the engine cannot simulate at all.

use std::fmt;

/// Which numeric field of a task triple was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    /// Compute time per instance.
    ExecTime,
    /// Release period.
    Period,
    /// Relative deadline.
    Deadline,
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExecTime => "exec_time",
            Self::Period => "period",
            Self::Deadline => "deadline",
        };
        f.write_str(name)
    }
}

/// Errors raised before or while setting up a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// No tasks were supplied.
    EmptyTaskSet,
    /// A task parameter is not a positive, finite value representable
    /// at the configured time scale.
    InvalidParameter {
        /// Index of the offending task.
        task_num: usize,
        /// Offending field.
        field: TaskField,
        /// Value as supplied.
        value: f64,
    },
    /// The least common multiple of the scaled periods does not fit in `u64`.
    HyperperiodOverflow,
    /// The configured time scale is zero.
    InvalidTimeScale,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTaskSet => f.write_str("task set is empty"),
            Self::InvalidParameter {
                task_num,
                field,
                value,
            } => write!(f, "task {task_num}: invalid {field} {value}"),
            Self::HyperperiodOverflow => f.write_str("hyperperiod overflows the tick range"),
            Self::InvalidTimeScale => f.write_str("time scale must be positive"),
        }
    }
}

impl std::error::Error for SimError {}
