//! Input validation for task sets.
//!
//! Checks every task triple before simulation and reports all problems at
//! once. Detects:
//! - An empty task set
//! - Non-finite parameters (NaN, infinities)
//! - Zero or negative parameters
//! - Parameters that round to zero ticks at the configured time scale
//!
//! Deadlines longer than the period are legal and not reported.

use crate::config::SimulationConfig;
use crate::error::TaskField;
use crate::models::{TaskNum, TaskSpec};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending task, `None` for set-level problems.
    pub task_num: Option<TaskNum>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The set has no tasks.
    EmptyTaskSet,
    /// A parameter is NaN or infinite.
    NonFinite,
    /// A parameter is zero or negative.
    NonPositive,
    /// A parameter is positive but smaller than one tick.
    BelowResolution,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        task_num: Option<TaskNum>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            task_num,
            message: message.into(),
        }
    }
}

/// Validates a task set at the default time scale.
pub fn validate_tasks(tasks: &[TaskSpec]) -> ValidationResult {
    validate_tasks_with(tasks, &SimulationConfig::new())
}

/// Validates a task set against a specific time scale.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_tasks_with(tasks: &[TaskSpec], config: &SimulationConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if tasks.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTaskSet,
            None,
            "Task set is empty",
        ));
    }

    for (task_num, task) in tasks.iter().enumerate() {
        let fields = [
            (TaskField::ExecTime, task.exec_time),
            (TaskField::Period, task.period),
            (TaskField::Deadline, task.deadline),
        ];
        for (field, value) in fields {
            if let Some(err) = check_value(task_num, field, value, config) {
                errors.push(err);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_value(
    task_num: TaskNum,
    field: TaskField,
    value: f64,
    config: &SimulationConfig,
) -> Option<ValidationError> {
    let kind = if !value.is_finite() {
        ValidationErrorKind::NonFinite
    } else if value <= 0.0 {
        ValidationErrorKind::NonPositive
    } else if config.to_ticks(value).is_none() {
        ValidationErrorKind::BelowResolution
    } else {
        return None;
    };

    Some(ValidationError::new(
        kind,
        Some(task_num),
        format!("Task {task_num}: {field} {value} is not usable ({kind:?})"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        let tasks = vec![TaskSpec::new(1.0, 4.0, 4.0), TaskSpec::new(2.0, 6.0, 8.0)];
        assert!(validate_tasks(&tasks).is_ok());
    }

    #[test]
    fn test_empty_set() {
        let errors = validate_tasks(&[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyTaskSet);
        assert_eq!(errors[0].task_num, None);
    }

    #[test]
    fn test_non_positive() {
        let tasks = vec![TaskSpec::new(1.0, 4.0, 4.0), TaskSpec::new(0.0, -6.0, 6.0)];
        let errors = validate_tasks(&tasks).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::NonPositive && e.task_num == Some(1)));
        assert!(errors[1].message.contains("period"));
    }

    #[test]
    fn test_non_finite() {
        let tasks = vec![TaskSpec::new(f64::NAN, f64::INFINITY, 1.0)];
        let errors = validate_tasks(&tasks).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::NonFinite));
    }

    #[test]
    fn test_below_resolution() {
        let tasks = vec![TaskSpec::new(0.0001, 1.0, 1.0)];
        let errors = validate_tasks(&tasks).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::BelowResolution);

        // A finer scale accepts it.
        let fine = SimulationConfig::new().with_time_scale(1_000_000);
        assert!(validate_tasks_with(&tasks, &fine).is_ok());
    }

    #[test]
    fn test_deadline_beyond_period_allowed() {
        assert!(validate_tasks(&[TaskSpec::new(1.0, 2.0, 5.0)]).is_ok());
    }
}
