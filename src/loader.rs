//! Plain-text task-set loader.
//!
//! One task per line as `exec_time,period,deadline`. Blank lines and lines
//! starting with `#` are skipped; whitespace around fields is ignored; fields
//! past the third are ignored.

use std::fmt;
use std::fs;
use std::path::Path;

use log::trace;

use crate::error::TaskField;
use crate::models::TaskSpec;

/// Why a task file could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io(std::io::Error),
    /// A line has fewer than three fields.
    MissingField {
        /// 1-based line number.
        line: usize,
        /// First missing field.
        field: TaskField,
    },
    /// A field is not a number.
    NotNumeric {
        /// 1-based line number.
        line: usize,
        /// Offending field.
        field: TaskField,
        /// Text as found.
        text: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read task file: {err}"),
            Self::MissingField { line, field } => {
                write!(f, "line {line}: missing {field}")
            }
            Self::NotNumeric { line, field, text } => {
                write!(f, "line {line}: {field} '{text}' is not a number")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Reads and parses a task file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<TaskSpec>, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_tasks(&text)
}

/// Parses task lines from text.
pub fn parse_tasks(text: &str) -> Result<Vec<TaskSpec>, LoadError> {
    let mut tasks = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let task = parse_line(idx + 1, line)?;
        trace!(
            "line {}: exec_time {}, period {}, deadline {}",
            idx + 1,
            task.exec_time,
            task.period,
            task.deadline
        );
        tasks.push(task);
    }

    Ok(tasks)
}

fn parse_line(line: usize, text: &str) -> Result<TaskSpec, LoadError> {
    let mut fields = text.split(',').map(str::trim);
    let mut next = |field: TaskField| -> Result<f64, LoadError> {
        let raw = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or(LoadError::MissingField { line, field })?;
        raw.parse().map_err(|_| LoadError::NotNumeric {
            line,
            field,
            text: raw.to_string(),
        })
    };

    let exec_time = next(TaskField::ExecTime)?;
    let period = next(TaskField::Period)?;
    let deadline = next(TaskField::Deadline)?;
    Ok(TaskSpec::new(exec_time, period, deadline))
}
