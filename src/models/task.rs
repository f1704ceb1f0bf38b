//! Periodic task model.
//!
//! [`TaskSpec`] is the validated input triple handed to the engine.
//! [`Task`] is the registry entry the engine builds from it: constant
//! parameters in ticks plus the per-task state mutated during a run.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{SimError, TaskField};

/// Integer simulation time.
pub type Ticks = u64;

/// Index of a task in input order. Also the final tie-break key.
pub type TaskNum = usize;

/// One periodic workload as supplied by the caller, in decimal time units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Compute time required per instance.
    pub exec_time: f64,
    /// Release period.
    pub period: f64,
    /// Relative deadline, measured from each release.
    pub deadline: f64,
}

impl TaskSpec {
    /// Creates a task triple.
    pub fn new(exec_time: f64, period: f64, deadline: f64) -> Self {
        Self {
            exec_time,
            period,
            deadline,
        }
    }

    /// Creates a task whose deadline equals its period.
    pub fn implicit(exec_time: f64, period: f64) -> Self {
        Self::new(exec_time, period, period)
    }

    /// Fraction of the processor this task demands.
    pub fn utilization(&self) -> f64 {
        self.exec_time / self.period
    }
}

/// A task in the simulation registry.
///
/// Constant fields never change after creation. The remaining fields belong
/// to the engine and are rewritten as instances are dispatched, preempted and
/// completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Input-order index.
    pub task_num: TaskNum,
    /// Compute per instance (ticks).
    pub exec_time: Ticks,
    /// Period (ticks).
    pub period: Ticks,
    /// Relative deadline (ticks).
    pub deadline: Ticks,
    /// Fixed priority; equal to `period`, lower is more urgent.
    pub priority: Ticks,
    /// Remaining compute for the current or pending instance.
    pub exec_time_left: Ticks,
    /// When the task was last dispatched. `None` while not running.
    pub time_last_started: Option<Ticks>,
    /// Completed instances.
    pub num_times_run: u64,
    /// Genuine preemptions over the whole run.
    pub times_preempted: u64,
    /// Bumped whenever a scheduled completion is invalidated.
    pub generation: u64,
}

impl Task {
    /// Builds a registry entry from an input triple.
    pub fn from_spec(
        task_num: TaskNum,
        spec: &TaskSpec,
        config: &SimulationConfig,
    ) -> Result<Self, SimError> {
        let ticks = |value: f64, field: TaskField| {
            config.to_ticks(value).ok_or(SimError::InvalidParameter {
                task_num,
                field,
                value,
            })
        };

        let exec_time = ticks(spec.exec_time, TaskField::ExecTime)?;
        let period = ticks(spec.period, TaskField::Period)?;
        let deadline = ticks(spec.deadline, TaskField::Deadline)?;

        Ok(Self::new(task_num, exec_time, period, deadline))
    }

    /// Creates a task directly from tick values.
    pub fn new(task_num: TaskNum, exec_time: Ticks, period: Ticks, deadline: Ticks) -> Self {
        Self {
            task_num,
            exec_time,
            period,
            deadline,
            priority: period,
            exec_time_left: exec_time,
            time_last_started: None,
            num_times_run: 0,
            times_preempted: 0,
            generation: 0,
        }
    }

    /// Whether this task beats `other` for the processor.
    ///
    /// Smaller period wins; equal periods fall back to the smaller `task_num`.
    pub fn outranks(&self, other: &Task) -> bool {
        (self.priority, self.task_num) < (other.priority, other.task_num)
    }

    /// Whether the task currently holds the processor.
    pub fn is_running(&self) -> bool {
        self.time_last_started.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spec_scales_to_ticks() {
        let config = SimulationConfig::new();
        let task = Task::from_spec(3, &TaskSpec::new(0.25, 1.5, 1.2), &config).unwrap();

        assert_eq!(task.task_num, 3);
        assert_eq!(task.exec_time, 250);
        assert_eq!(task.period, 1500);
        assert_eq!(task.deadline, 1200);
        assert_eq!(task.priority, 1500);
        assert_eq!(task.exec_time_left, 250);
        assert!(!task.is_running());
    }

    #[test]
    fn test_from_spec_rejects_bad_field() {
        let config = SimulationConfig::new();
        let err = Task::from_spec(1, &TaskSpec::new(1.0, 0.0, 2.0), &config).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidParameter {
                task_num: 1,
                field: TaskField::Period,
                value: 0.0,
            }
        );
    }

    #[test]
    fn test_outranks() {
        let fast = Task::new(1, 1, 4, 4);
        let slow = Task::new(0, 1, 6, 6);
        let twin = Task::new(2, 1, 4, 4);

        assert!(fast.outranks(&slow));
        assert!(!slow.outranks(&fast));
        assert!(fast.outranks(&twin));
        assert!(!twin.outranks(&fast));
    }

    #[test]
    fn test_spec_utilization() {
        let spec = TaskSpec::implicit(1.0, 4.0);
        assert_eq!(spec.deadline, 4.0);
        assert!((spec.utilization() - 0.25).abs() < 1e-12);
    }
}
